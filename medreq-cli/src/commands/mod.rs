//! Command implementations for the medreq CLI

pub mod migrate;
pub mod register;
pub mod serve;

pub use migrate::run_migrate;
pub use register::run_register;
pub use serve::run_serve;
