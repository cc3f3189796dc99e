//! # Event Schema
//!
//! Events emitted after a registry mutation commits. Failed mutations emit
//! nothing.

use serde::{Deserialize, Serialize};
use shared_types::{Address, ProjectId};

/// Event topics.
pub mod topics {
    /// A delegate was inserted into the chain.
    pub const DELEGATE_REGISTERED: &str = "datasource_proxy.delegate_registered";
    /// A delegate was removed from the chain.
    pub const DELEGATE_REMOVED: &str = "datasource_proxy.delegate_removed";
}

/// A committed registry mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProxyEvent {
    /// `delegate` now sits at `index` (after clamping).
    DelegateRegistered {
        /// Project the proxy serves.
        project_id: ProjectId,
        /// Inserted identity.
        delegate: Address,
        /// Final position.
        index: usize,
        /// Account that performed the mutation.
        caller: Address,
    },
    /// `delegate` was removed from `index`.
    DelegateRemoved {
        /// Project the proxy serves.
        project_id: ProjectId,
        /// Removed identity.
        delegate: Address,
        /// Position it was removed from.
        index: usize,
        /// Account that performed the mutation.
        caller: Address,
    },
}

impl ProxyEvent {
    /// Topic this event is published under.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::DelegateRegistered { .. } => topics::DELEGATE_REGISTERED,
            Self::DelegateRemoved { .. } => topics::DELEGATE_REMOVED,
        }
    }

    /// Delegate the event is about.
    #[must_use]
    pub fn delegate(&self) -> Address {
        match self {
            Self::DelegateRegistered { delegate, .. } | Self::DelegateRemoved { delegate, .. } => {
                *delegate
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_topic_and_tag() {
        let event = ProxyEvent::DelegateRemoved {
            project_id: ProjectId::new(2),
            delegate: Address::from_low_u8(4),
            index: 1,
            caller: Address::from_low_u8(1),
        };
        assert_eq!(event.topic(), topics::DELEGATE_REMOVED);
        assert_eq!(event.delegate(), Address::from_low_u8(4));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "delegate_removed");
        assert_eq!(json["project_id"], 2);
    }
}
