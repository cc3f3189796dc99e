//! Proxy configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use datasource_proxy::ProxyConfig;
//!
//! let config = ProxyConfig::default()
//!     .with_delegate_call_timeout_ms(2_000)
//!     .with_publish_events(false);
//! config.validate()?;
//! ```

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use shared_types::OperationId;
use std::time::Duration;

/// Proxy configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Permission an operator must hold to mutate the delegate chain.
    pub required_permission: OperationId,
    /// Upper bound on a single delegate consultation.
    pub delegate_call_timeout_ms: u64,
    /// Publish registry mutation events.
    pub publish_events: bool,
    /// How many proxies deep a consultation may reach this proxy when it
    /// sits in another proxy's chain. Zero forbids nesting it at all.
    pub max_nesting_depth: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            required_permission: OperationId::MANAGE_PAYMENTS,
            delegate_call_timeout_ms: 5_000,
            publish_events: true,
            max_nesting_depth: 8,
        }
    }
}

impl ProxyConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// `InvalidPermission` for permission 0, `ZeroTimeout` for a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.required_permission.get() == 0 {
            return Err(ConfigError::InvalidPermission);
        }
        if self.delegate_call_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Delegate call timeout as a `Duration`.
    #[must_use]
    pub fn delegate_call_timeout(&self) -> Duration {
        Duration::from_millis(self.delegate_call_timeout_ms)
    }

    /// Builder-style method to set the required permission
    #[must_use]
    pub fn with_required_permission(mut self, permission: OperationId) -> Self {
        self.required_permission = permission;
        self
    }

    /// Builder-style method to set the delegate call timeout
    #[must_use]
    pub fn with_delegate_call_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.delegate_call_timeout_ms = timeout_ms;
        self
    }

    /// Builder-style method to toggle event publishing
    #[must_use]
    pub fn with_publish_events(mut self, publish: bool) -> Self {
        self.publish_events = publish;
        self
    }

    /// Builder-style method to set the nesting bound
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProxyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.required_permission, OperationId::MANAGE_PAYMENTS);
        assert_eq!(config.delegate_call_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_zero_permission() {
        let config = ProxyConfig::default().with_required_permission(OperationId(0));
        assert_eq!(config.validate(), Err(ConfigError::InvalidPermission));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = ProxyConfig::default().with_delegate_call_timeout_ms(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_zero_nesting_depth_is_valid() {
        let config = ProxyConfig::default().with_max_nesting_depth(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ProxyConfig =
            serde_json::from_str(r#"{ "required_permission": 5 }"#).unwrap();
        assert_eq!(config.required_permission, OperationId::PROCESS_FEES);
        assert_eq!(config.delegate_call_timeout_ms, 5_000);
        assert!(config.publish_events);
        assert_eq!(config.max_nesting_depth, 8);
    }
}
