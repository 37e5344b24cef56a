//! Sigil server library: the HTTP gateway and the training entry point.
//!
//! The `sigil` binary wires these together; integration tests drive the
//! router directly through [`gateway::create_router_with_state`].

pub mod gateway;
pub mod train;

pub use gateway::{HandlerState, create_router_with_state};
