//! Command implementations for the anonlike CLI

pub mod serve;

pub use serve::run_serve;
