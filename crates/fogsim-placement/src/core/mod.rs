//! Core placement model: resources, devices, applications and the
//! deployment engine.

pub mod application;
pub mod common;
pub mod config;
pub mod deployment;
pub mod device;
pub mod logger;
