//! Message-template editor: prepares the form state for adding or editing
//! one message template of a media type.
//!
//! Nothing is persisted here; the result is handed back to the client,
//! which saves the media type as a whole.

use serde::Serialize;

use crate::media_type::{
    message_template, ContentType, EventSource, MediaKind, MessageType, RecoveryStage,
    FALLBACK_MESSAGE_TYPE,
};

/// Validated editor input.
#[derive(Debug, Clone)]
pub struct TemplateEditRequest {
    pub media_kind: MediaKind,
    pub content_type: ContentType,
    /// Message types that already have a template on this media type.
    pub message_types: Vec<MessageType>,
    pub message_type: Option<MessageType>,
    /// Present when an existing template is being edited.
    pub old_message_type: Option<MessageType>,
    pub eventsource: Option<EventSource>,
    pub recovery: Option<RecoveryStage>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Form state returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateEditParams {
    #[serde(rename = "type")]
    pub media_kind: MediaKind,
    pub content_type: ContentType,
    pub message_types: Vec<MessageType>,
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_message_type: Option<MessageType>,
    pub subject: String,
    pub message: String,
    pub eventsource: EventSource,
    pub recovery: RecoveryStage,
    /// Every message type already had a template, so the fallback type was
    /// picked even though it is in use.
    pub types_exhausted: bool,
}

/// First catalog type without a template, or `None` when all are taken.
pub fn first_unused_message_type(in_use: &[MessageType]) -> Option<MessageType> {
    MessageType::ALL
        .iter()
        .copied()
        .find(|t| !in_use.contains(t))
}

/// Build the editor state for `request`.
///
/// Editing an existing template frees its old type from the in-use list.
/// Adding one without a chosen type picks the first free type and fills in
/// the canned subject and body for it. Event source and recovery stage are
/// derived from the message type unless the client sent both.
pub fn edit_message_template(request: TemplateEditRequest) -> TemplateEditParams {
    let TemplateEditRequest {
        media_kind,
        content_type,
        mut message_types,
        message_type,
        old_message_type,
        eventsource,
        recovery,
        subject,
        message,
    } = request;

    let mut types_exhausted = false;

    let (message_type, subject, message) = match (old_message_type, message_type) {
        (Some(old), chosen) => {
            message_types.retain(|t| *t != old);
            (
                chosen.unwrap_or(old),
                subject.unwrap_or_default(),
                message.unwrap_or_default(),
            )
        }
        (None, Some(chosen)) => (chosen, subject.unwrap_or_default(), message.unwrap_or_default()),
        (None, None) => {
            let picked = match first_unused_message_type(&message_types) {
                Some(t) => t,
                None => {
                    types_exhausted = true;
                    FALLBACK_MESSAGE_TYPE
                }
            };
            let template = message_template(media_kind, picked, content_type);
            (picked, template.subject, template.message)
        }
    };

    let (eventsource, recovery) = match (eventsource, recovery) {
        (Some(source), Some(stage)) => (source, stage),
        _ => message_type.event_class(),
    };

    TemplateEditParams {
        media_kind,
        content_type,
        message_types,
        message_type,
        old_message_type,
        subject,
        message,
        eventsource,
        recovery,
        types_exhausted,
    }
}
