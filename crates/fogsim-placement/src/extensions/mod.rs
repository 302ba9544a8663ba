//! Descriptor ingestion and workload generation.

pub mod application_reader;
pub mod inventory_reader;
pub mod workload_generator;
