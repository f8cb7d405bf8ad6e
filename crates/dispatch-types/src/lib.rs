//! Common types for the dispatch queue engine.
//!
//! This crate defines the domain vocabulary shared by the queue core and the
//! service binary: the order record itself, its lifecycle and dispatch status
//! enums, the row-menu action catalogue, and the transition commands accepted
//! by the state machine.

/// Row-menu action catalogue and its mapping onto state transitions.
pub mod action;
/// The order record and its classification/commercial/status fields.
pub mod order;
/// Transition commands and escalation levels consumed by the state machine.
pub mod transition;

// Re-export all types for convenient access
pub use action::*;
pub use order::*;
pub use transition::*;
