//! # Domain Layer (Inner Hexagon)
//!
//! Pure logic of the proxy: the delegate registry, the merge policy and the
//! authorization basis. NO I/O, NO async.
//!
//! Dependencies point INWARD only (gate, aggregator and service depend on
//! this, not vice versa).

pub mod authorization;
pub mod entities;
pub mod invariants;
pub mod merge;
pub mod registry;

pub use authorization::*;
pub use entities::*;
pub use invariants::*;
pub use merge::*;
pub use registry::*;
