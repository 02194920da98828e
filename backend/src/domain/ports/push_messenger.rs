//! Driven port for delivering push notifications to devices.
//!
//! Messages carry a visible notification (title and body) plus a flat map of
//! string data the mobile app uses for routing.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::DeliveryToken;

/// String key/value payload attached to a push.
pub type PushData = BTreeMap<String, String>;

/// Visible part of a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
}

impl PushNotification {
    /// Build a notification from borrowed text.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A push addressed to one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    /// Target device.
    pub token: DeliveryToken,
    /// Visible content.
    pub notification: PushNotification,
    /// Routing payload.
    pub data: PushData,
}

/// The same push addressed to many devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticastPushMessage {
    /// Target devices.
    pub tokens: Vec<DeliveryToken>,
    /// Visible content.
    pub notification: PushNotification,
    /// Routing payload.
    pub data: PushData,
}

impl MulticastPushMessage {
    /// The single-device message for one of the targets.
    pub fn for_token(&self, token: &DeliveryToken) -> PushMessage {
        PushMessage {
            token: token.clone(),
            notification: self.notification.clone(),
            data: self.data.clone(),
        }
    }
}

/// Per-token delivery counts of a multicast send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MulticastReport {
    /// Tokens the provider accepted.
    pub success_count: usize,
    /// Tokens the provider rejected or that could not be reached.
    pub failure_count: usize,
}

define_port_error! {
    /// Errors surfaced by push messaging adapters.
    pub enum PushMessengerError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "push transport failed: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } =>
            "push request timed out: {message}",
        /// The provider throttled the sender.
        RateLimited { message: String } =>
            "push provider rate limited request: {message}",
        /// The provider rejected the sender credentials.
        Unauthenticated { message: String } =>
            "push provider rejected credentials: {message}",
        /// The target token is no longer registered.
        UnregisteredToken { message: String } =>
            "push token is not registered: {message}",
        /// The provider rejected the message itself.
        InvalidMessage { message: String } =>
            "push message rejected: {message}",
        /// No provider is configured for this deployment.
        NotConfigured => "push messaging is not configured",
    }
}

/// Port for sending push notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushMessenger: Send + Sync {
    /// Deliver one message to one device.
    async fn send(&self, message: &PushMessage) -> Result<(), PushMessengerError>;

    /// Deliver one message to many devices.
    ///
    /// Individual token failures are counted in the report. An `Err` means
    /// the whole multicast could not be attempted.
    async fn send_multicast(
        &self,
        message: &MulticastPushMessage,
    ) -> Result<MulticastReport, PushMessengerError>;
}

/// Stand-in messenger for deployments without push credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredPushMessenger;

#[async_trait]
impl PushMessenger for UnconfiguredPushMessenger {
    async fn send(&self, _message: &PushMessage) -> Result<(), PushMessengerError> {
        Err(PushMessengerError::not_configured())
    }

    async fn send_multicast(
        &self,
        _message: &MulticastPushMessage,
    ) -> Result<MulticastReport, PushMessengerError> {
        Err(PushMessengerError::not_configured())
    }
}
