//! # Delegate Registry
//!
//! Ordered, index-addressed list of delegate identities.
//!
//! ## Invariants
//!
//! - Order only changes through `insert` and `remove`.
//! - `insert` clamps its index into `[0, len]`; past the end means append.
//! - `remove` drops the first occurrence only and keeps the rest in order.
//! - Duplicates are permitted.
//!
//! No authorization happens here; callers gate mutations first.

use crate::errors::ProxyError;
use shared_types::Address;

/// Ordered chain of delegate identities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DelegateRegistry {
    delegates: Vec<Address>,
}

impl DelegateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `delegates` in the given order.
    #[must_use]
    pub fn from_delegates(delegates: Vec<Address>) -> Self {
        Self { delegates }
    }

    /// Delegate at `index`.
    ///
    /// # Errors
    ///
    /// `DelegateIndexOutOfRange` if `index >= len`.
    pub fn get(&self, index: usize) -> Result<Address, ProxyError> {
        self.delegates
            .get(index)
            .copied()
            .ok_or(ProxyError::DelegateIndexOutOfRange {
                index,
                length: self.delegates.len(),
            })
    }

    /// Inserts `delegate` at `index`, shifting later entries back by one.
    ///
    /// Returns the position the delegate actually landed at.
    pub fn insert(&mut self, delegate: Address, index: usize) -> usize {
        let position = index.min(self.delegates.len());
        self.delegates.insert(position, delegate);
        position
    }

    /// Removes the first occurrence of `delegate`.
    ///
    /// Returns the position it was removed from.
    ///
    /// # Errors
    ///
    /// `InvalidDelegate` if it is not registered; the list is left untouched.
    pub fn remove(&mut self, delegate: Address) -> Result<usize, ProxyError> {
        let position = self
            .position_of(delegate)
            .ok_or(ProxyError::InvalidDelegate(delegate))?;
        self.delegates.remove(position);
        Ok(position)
    }

    /// Position of the first occurrence of `delegate`.
    #[must_use]
    pub fn position_of(&self, delegate: Address) -> Option<usize> {
        self.delegates.iter().position(|d| *d == delegate)
    }

    /// Number of registered delegates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    /// True if no delegate is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }

    /// Delegates in stored order.
    #[must_use]
    pub fn as_slice(&self) -> &[Address] {
        &self.delegates
    }

    /// Copy of the delegates in stored order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Address> {
        self.delegates.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
