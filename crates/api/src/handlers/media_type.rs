//! Handler for the media-type message-template editor.
//!
//! The body carries raw catalog codes so that every unknown code is reported
//! at once, instead of deserialization stopping at the first one.

use axum::Json;
use monitor_core::media_type::{ContentType, EventSource, MediaKind, MessageType, RecoveryStage};
use monitor_core::message_template::{edit_message_template, TemplateEditParams, TemplateEditRequest};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;

/// Longest subject a stored template may have.
pub const SUBJECT_MAX_LEN: usize = 255;

/// Longest body a stored template may have.
pub const MESSAGE_MAX_LEN: usize = 65535;

/// Body for `POST /media-types/message-template`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct MessageTemplateInput {
    #[serde(rename = "type")]
    #[validate(required(message = "is required"), custom(function = "validate_media_kind"))]
    pub media_kind: Option<i32>,
    #[validate(required(message = "is required"), custom(function = "validate_content_type"))]
    pub content_type: Option<i32>,
    #[serde(default)]
    #[validate(custom(function = "validate_message_types"))]
    pub message_types: Vec<i32>,
    #[validate(custom(function = "validate_message_type"))]
    pub message_type: Option<i32>,
    #[validate(custom(function = "validate_message_type"))]
    pub old_message_type: Option<i32>,
    #[validate(custom(function = "validate_event_source"))]
    pub eventsource: Option<i32>,
    #[validate(custom(function = "validate_recovery_stage"))]
    pub recovery: Option<i32>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub subject: Option<String>,
    #[validate(length(max = 65535, message = "must be at most 65535 characters"))]
    pub message: Option<String>,
}

/// Access to a catalog enum's full value list from generic code.
trait CatalogCodes: Copy + Into<i32> + 'static {
    fn codes() -> &'static [Self];
}

macro_rules! catalog_codes {
    ($($ty:ty),+ $(,)?) => {
        $(impl CatalogCodes for $ty {
            fn codes() -> &'static [Self] {
                <$ty>::ALL
            }
        })+
    };
}

fn check_code<T: CatalogCodes>(code: i32) -> Result<(), ValidationError> {
    let mut accepted = T::codes().iter().map(|v| (*v).into());
    if accepted.any(|c| c == code) {
        return Ok(());
    }

    let listed = T::codes()
        .iter()
        .map(|v| (*v).into().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ValidationError::new("in").with_message(format!("{code} is not one of {listed}").into()))
}

catalog_codes!(MediaKind, ContentType, MessageType, EventSource, RecoveryStage);

fn validate_media_kind(code: i32) -> Result<(), ValidationError> {
    check_code::<MediaKind>(code)
}

fn validate_content_type(code: i32) -> Result<(), ValidationError> {
    check_code::<ContentType>(code)
}

fn validate_message_type(code: i32) -> Result<(), ValidationError> {
    check_code::<MessageType>(code)
}

fn validate_message_types(codes: &[i32]) -> Result<(), ValidationError> {
    codes.iter().try_for_each(|code| check_code::<MessageType>(*code))
}

fn validate_event_source(code: i32) -> Result<(), ValidationError> {
    check_code::<EventSource>(code)
}

fn validate_recovery_stage(code: i32) -> Result<(), ValidationError> {
    check_code::<RecoveryStage>(code)
}

impl TryFrom<MessageTemplateInput> for TemplateEditRequest {
    type Error = AppError;

    /// Convert validated input. Fails only if called on input that skipped
    /// validation.
    fn try_from(input: MessageTemplateInput) -> Result<Self, Self::Error> {
        let required = |field: &str, value: Option<i32>| {
            value.ok_or_else(|| AppError::InvalidParams(vec![format!("{field}: is required")]))
        };

        Ok(TemplateEditRequest {
            media_kind: MediaKind::try_from(required("type", input.media_kind)?)?,
            content_type: ContentType::try_from(required("content_type", input.content_type)?)?,
            message_types: input
                .message_types
                .into_iter()
                .map(MessageType::try_from)
                .collect::<Result<_, _>>()?,
            message_type: input.message_type.map(MessageType::try_from).transpose()?,
            old_message_type: input.old_message_type.map(MessageType::try_from).transpose()?,
            eventsource: input.eventsource.map(EventSource::try_from).transpose()?,
            recovery: input.recovery.map(RecoveryStage::try_from).transpose()?,
            subject: input.subject,
            message: input.message,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageTemplateForm {
    pub title: &'static str,
    pub params: TemplateEditParams,
}

/// POST /api/v1/media-types/message-template
///
/// Returns the editor state for adding or editing one message template.
/// Nothing is stored.
pub async fn edit_template(
    RequireAuth(user): RequireAuth,
    ValidatedJson(input): ValidatedJson<MessageTemplateInput>,
) -> AppResult<Json<DataResponse<MessageTemplateForm>>> {
    let request = TemplateEditRequest::try_from(input)?;
    let params = edit_message_template(request);

    if params.types_exhausted {
        tracing::info!(
            user_id = user.user_id,
            media_kind = params.media_kind.id(),
            "Every message type already has a template",
        );
    }

    Ok(Json(DataResponse {
        data: MessageTemplateForm {
            title: "Message template",
            params,
        },
    }))
}
