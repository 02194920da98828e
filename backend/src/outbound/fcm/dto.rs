//! Wire DTOs for the FCM HTTP v1 `messages:send` call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ports::PushMessage;

#[derive(Debug, Serialize)]
pub(super) struct SendRequestDto<'a> {
    pub(super) message: MessageDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct MessageDto<'a> {
    pub(super) token: &'a str,
    pub(super) notification: NotificationDto<'a>,
    pub(super) data: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(super) struct NotificationDto<'a> {
    pub(super) title: &'a str,
    pub(super) body: &'a str,
}

impl<'a> SendRequestDto<'a> {
    pub(super) fn from_message(message: &'a PushMessage) -> Self {
        Self {
            message: MessageDto {
                token: message.token.expose(),
                notification: NotificationDto {
                    title: &message.notification.title,
                    body: &message.notification.body,
                },
                data: &message.data,
            },
        }
    }
}

/// Google API error envelope.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponseDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) status: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) details: Vec<ErrorDetailDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ErrorDetailDto {
    #[serde(default)]
    pub(super) error_code: Option<String>,
}

impl ErrorBodyDto {
    /// The FCM-specific error code, when present.
    pub(super) fn fcm_error_code(&self) -> Option<&str> {
        self.details
            .iter()
            .find_map(|detail| detail.error_code.as_deref())
    }

    /// `STATUS: message` summary for logs and error text.
    pub(super) fn summary(&self) -> String {
        match (self.status.as_deref(), self.message.as_deref()) {
            (Some(status), Some(message)) => format!("{status}: {message}"),
            (Some(status), None) => status.to_owned(),
            (None, Some(message)) => message.to_owned(),
            (None, None) => String::new(),
        }
    }
}
