//! Media-type and message-type catalog (notification templates).
//!
//! Codes match the integer values stored in `media_type` and
//! `media_type_message` and sent by the client.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i32", into = "i32")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every value, in catalog order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the stored code.
            pub fn id(self) -> i32 {
                self as i32
            }
        }

        impl TryFrom<i32> for $name {
            type Error = CoreError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.id() == value)
                    .ok_or_else(|| {
                        CoreError::Validation(format!(
                            "{value} is not a valid {}",
                            stringify!($name)
                        ))
                    })
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value as i32
            }
        }
    };
}

define_code_enum! {
    /// Notification channel kind.
    MediaKind {
        Email = 0,
        Script = 1,
        Sms = 2,
        Jabber = 3,
        Webhook = 4,
        EzTexting = 100,
    }
}

define_code_enum! {
    /// Body format of an email message.
    ContentType {
        PlainText = 0,
        Html = 1,
    }
}

define_code_enum! {
    /// Event scenario a message template is written for.
    MessageType {
        Problem = 0,
        Recovery = 1,
        Update = 2,
        Discovery = 3,
        Autoregistration = 4,
        Internal = 5,
    }
}

define_code_enum! {
    /// Origin of an event.
    EventSource {
        Triggers = 0,
        Discovery = 1,
        Autoregistration = 2,
        Internal = 3,
    }
}

define_code_enum! {
    /// Action operation stage a message is sent from.
    RecoveryStage {
        Operation = 0,
        RecoveryOperation = 1,
        UpdateOperation = 2,
    }
}

/// Type picked for a blank template when every type is already in use.
pub const FALLBACK_MESSAGE_TYPE: MessageType = MessageType::Problem;

impl MessageType {
    /// The (event source, recovery stage) pair this message type stands for.
    pub fn event_class(self) -> (EventSource, RecoveryStage) {
        match self {
            MessageType::Problem => (EventSource::Triggers, RecoveryStage::Operation),
            MessageType::Recovery => (EventSource::Triggers, RecoveryStage::RecoveryOperation),
            MessageType::Update => (EventSource::Triggers, RecoveryStage::UpdateOperation),
            MessageType::Discovery => (EventSource::Discovery, RecoveryStage::Operation),
            MessageType::Autoregistration => {
                (EventSource::Autoregistration, RecoveryStage::Operation)
            }
            MessageType::Internal => (EventSource::Internal, RecoveryStage::Operation),
        }
    }

    /// Inverse of [`MessageType::event_class`]. `None` for pairs no type maps to.
    pub fn from_event_class(source: EventSource, stage: RecoveryStage) -> Option<Self> {
        MessageType::ALL
            .iter()
            .copied()
            .find(|t| t.event_class() == (source, stage))
    }
}

// ---------------------------------------------------------------------------
// Canned templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    pub subject: String,
    pub message: String,
}

fn full_text(message_type: MessageType) -> (&'static str, &'static str) {
    match message_type {
        MessageType::Problem => (
            "Problem: {EVENT.NAME}",
            "Problem started at {EVENT.TIME} on {EVENT.DATE}\r\n\
             Problem name: {EVENT.NAME}\r\n\
             Host: {HOST.NAME}\r\n\
             Severity: {EVENT.SEVERITY}\r\n\
             Operational data: {EVENT.OPDATA}\r\n\
             Original problem ID: {EVENT.ID}\r\n\
             {TRIGGER.URL}",
        ),
        MessageType::Recovery => (
            "Resolved in {EVENT.DURATION}: {EVENT.NAME}",
            "Problem has been resolved at {EVENT.RECOVERY.TIME} on {EVENT.RECOVERY.DATE}\r\n\
             Problem name: {EVENT.NAME}\r\n\
             Problem duration: {EVENT.DURATION}\r\n\
             Host: {HOST.NAME}\r\n\
             Severity: {EVENT.SEVERITY}\r\n\
             Original problem ID: {EVENT.ID}\r\n\
             {TRIGGER.URL}",
        ),
        MessageType::Update => (
            "Updated problem in {EVENT.AGE}: {EVENT.NAME}",
            "{USER.FULLNAME} {EVENT.UPDATE.ACTION} problem at {EVENT.UPDATE.DATE} {EVENT.UPDATE.TIME}.\r\n\
             {EVENT.UPDATE.MESSAGE}\r\n\
             \r\n\
             Current problem status is {EVENT.STATUS}, age is {EVENT.AGE}, acknowledged: {EVENT.ACK.STATUS}.",
        ),
        MessageType::Discovery => (
            "Discovery: {DISCOVERY.DEVICE.STATUS} {DISCOVERY.DEVICE.IPADDRESS}",
            "Discovery rule: {DISCOVERY.RULE.NAME}\r\n\
             \r\n\
             Device IP: {DISCOVERY.DEVICE.IPADDRESS}\r\n\
             Device DNS: {DISCOVERY.DEVICE.DNS}\r\n\
             Device status: {DISCOVERY.DEVICE.STATUS}\r\n\
             Device uptime: {DISCOVERY.DEVICE.UPTIME}\r\n\
             \r\n\
             Device service name: {DISCOVERY.SERVICE.NAME}\r\n\
             Device service port: {DISCOVERY.SERVICE.PORT}\r\n\
             Device service status: {DISCOVERY.SERVICE.STATUS}\r\n\
             Device service uptime: {DISCOVERY.SERVICE.UPTIME}",
        ),
        MessageType::Autoregistration => (
            "Autoregistration: {HOST.HOST}",
            "Host name: {HOST.HOST}\r\n\
             Host IP: {HOST.IP}\r\n\
             Agent port: {HOST.PORT}",
        ),
        MessageType::Internal => ("", ""),
    }
}

fn short_text(message_type: MessageType) -> &'static str {
    match message_type {
        MessageType::Problem => "{EVENT.SEVERITY}: {EVENT.NAME}\r\nHost: {HOST.NAME}\r\n{EVENT.DATE} {EVENT.TIME}",
        MessageType::Recovery => "RESOLVED: {EVENT.NAME}\r\nHost: {HOST.NAME}\r\n{EVENT.DATE} {EVENT.TIME}",
        MessageType::Update => {
            "{USER.FULLNAME} {EVENT.UPDATE.ACTION} problem at {EVENT.UPDATE.DATE} {EVENT.UPDATE.TIME}"
        }
        MessageType::Discovery => "Discovery: {DISCOVERY.DEVICE.STATUS} {DISCOVERY.DEVICE.IPADDRESS}",
        MessageType::Autoregistration => {
            "Autoregistration: {HOST.HOST}\r\nHost IP: {HOST.IP}\r\nAgent port: {HOST.PORT}"
        }
        MessageType::Internal => "",
    }
}

/// Canned subject and body for a blank template.
///
/// SMS gets a short body and no subject. Only email honours the HTML
/// content type; every other kind uses plain text.
pub fn message_template(
    kind: MediaKind,
    message_type: MessageType,
    content_type: ContentType,
) -> MessageTemplate {
    if kind == MediaKind::Sms {
        return MessageTemplate {
            subject: String::new(),
            message: short_text(message_type).to_string(),
        };
    }

    let (subject, message) = full_text(message_type);
    let message = if kind == MediaKind::Email && content_type == ContentType::Html {
        message.replace("\r\n", "<br>")
    } else {
        message.to_string()
    };

    MessageTemplate {
        subject: subject.to_string(),
        message,
    }
}
