//! # Ports Layer
//!
//! - `inbound`: the API the proxy offers terminals and administrators
//! - `outbound`: the collaborators the proxy depends on

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
