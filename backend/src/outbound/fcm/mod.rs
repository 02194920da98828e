//! Firebase Cloud Messaging outbound adapters.
//!
//! A thin HTTP v1 implementation of the `PushMessenger` port plus the bearer
//! credential it authenticates with.

mod credentials;
mod dto;
mod http_messenger;

pub use credentials::{FcmAccessToken, FcmCredentialError};
pub use http_messenger::{DEFAULT_FCM_ENDPOINT, FcmHttpConfig, FcmHttpMessenger, FcmSetupError};
