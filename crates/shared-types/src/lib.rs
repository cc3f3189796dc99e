//! # Shared Types Crate
//!
//! Funding-platform primitives shared by every crate in the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities, project ids, permission bits and
//!   token amounts are defined once, here.
//! - **Opaque Identities**: an `Address` carries no behavior; whatever it names
//!   is resolved by the crate that needs it.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
