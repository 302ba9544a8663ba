//! Placement of multi-process applications onto a network of
//! resource-constrained fog devices.

pub mod core;
pub mod experiment;
pub mod extensions;
pub mod simulation;
