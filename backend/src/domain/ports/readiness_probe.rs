//! Driven port checking that a backing dependency can serve traffic.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors reported by readiness probes.
    pub enum ReadinessProbeError {
        /// The dependency did not answer the probe.
        Unavailable { dependency: String, message: String } =>
            "{dependency} unavailable: {message}",
    }
}

/// Port for a cheap dependency round trip used by the readiness endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Succeed when the dependency answered.
    async fn check(&self) -> Result<(), ReadinessProbeError>;
}
