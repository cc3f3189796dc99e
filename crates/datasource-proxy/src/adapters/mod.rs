//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the outbound ports. Adapters implement
//! domain ports; the proxy never depends on them directly.

pub mod delegates;
pub mod event_log;
pub mod platform;
pub mod registries;

pub use delegates::*;
pub use event_log::*;
pub use platform::*;
pub use registries::*;
