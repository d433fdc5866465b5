//! Adapters for external dependencies.

pub mod store_sea;
