//! # Core Funding Entities
//!
//! Primitives shared by every crate that talks to the funding platform:
//! identities, project identifiers, permission bits and token amounts.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`
//! - **Projects & Permissions**: `ProjectId`, `OperationId`
//! - **Value**: `TokenAmount`, `Metadata`, `U256`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 20-byte account or contract identity.
///
/// Delegates, terminals, owners and operators are all addressed this way.
/// The proxy treats the value as opaque.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address whose last byte is `id` and all others are zero.
    ///
    /// Handy for fixtures: `Address::from_low_u8(3)` is `0x00..03`.
    #[must_use]
    pub const fn from_low_u8(id: u8) -> Self {
        let mut bytes = [0u8; 20];
        bytes[19] = id;
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(slice).ok().map(Self)
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for [u8; 20] {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

// =============================================================================
// CLUSTER B: PROJECTS & PERMISSIONS
// =============================================================================

/// Identifier of a project registered with the platform.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl ProjectId {
    /// Reserved platform-wide scope.
    ///
    /// An operator permission granted under this id applies to every project
    /// the granting owner holds.
    pub const PLATFORM_ROOT: Self = Self(0);

    /// Creates a project id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns true for the platform root scope.
    #[must_use]
    pub const fn is_platform_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectId({})", self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ProjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Permission bit checked against the operator store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(pub u8);

impl OperationId {
    /// Fee processing on behalf of a project.
    pub const PROCESS_FEES: Self = Self(5);

    /// Management of a project's payment extensions (data sources, delegates).
    pub const MANAGE_PAYMENTS: Self = Self(254);

    /// Returns the raw permission index.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.0)
    }
}

// =============================================================================
// CLUSTER C: VALUE
// =============================================================================

/// An amount of some token, with the context needed to price it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct TokenAmount {
    /// Token contract (zero for the native token).
    pub token: Address,
    /// Raw amount in the token's smallest unit.
    pub value: U256,
    /// Decimals the value is expressed with.
    pub decimals: u8,
    /// Currency index the amount is denominated in.
    pub currency: U256,
}

impl TokenAmount {
    /// Creates a token amount.
    #[must_use]
    pub fn new(token: Address, value: U256, decimals: u8, currency: U256) -> Self {
        Self {
            token,
            value,
            decimals,
            currency,
        }
    }
}

/// Opaque, caller-supplied bytes forwarded to data sources untouched.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(#[serde_as(as = "Bytes")] pub Vec<u8>);

impl Metadata {
    /// Empty metadata.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Metadata({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Metadata {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// TESTS
// =============================================================================
