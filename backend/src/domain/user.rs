//! User records as far as push delivery is concerned.

use std::fmt;

use sha2::{Digest, Sha256};

use super::UserId;

/// Role value identifying drivers in the user collection.
pub const DRIVER_ROLE: &str = "driver";
/// Presence value for drivers currently accepting work.
pub const ONLINE_STATUS: &str = "online";

const FINGERPRINT_HEX_LEN: usize = 12;

/// Opaque per-device push address.
///
/// The raw value is a credential-like secret for the device, so `Debug` and
/// `Display` print only a short SHA-256 fingerprint.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DeliveryToken(String);

impl DeliveryToken {
    /// Wrap a raw token. Blank tokens count as absent.
    ///
    /// # Examples
    /// ```
    /// use pickup_backend::domain::DeliveryToken;
    ///
    /// assert!(DeliveryToken::new("  ").is_none());
    /// assert_eq!(DeliveryToken::new("T1").map(|t| t.expose().to_owned()), Some("T1".to_owned()));
    /// ```
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// The raw token, for the messaging adapter only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short, stable hex fingerprint safe to log.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(FINGERPRINT_HEX_LEN);
        encoded
    }
}

impl fmt::Debug for DeliveryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeliveryToken").field(&self.fingerprint()).finish()
    }
}

impl fmt::Display for DeliveryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fingerprint())
    }
}

/// The subset of a user record needed to address a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContact {
    /// User document identifier.
    pub id: UserId,
    /// Role string such as `"driver"`.
    pub role: String,
    /// Presence string such as `"online"`.
    pub status: String,
    /// Registered device token, if the app has reported one.
    pub fcm_token: Option<DeliveryToken>,
}

impl UserContact {
    /// Whether this user is a driver currently online.
    pub fn is_online_driver(&self) -> bool {
        self.role == DRIVER_ROLE && self.status == ONLINE_STATUS
    }
}
