//! Bundled gateway implementations.

pub mod bogus;

pub use bogus::BogusGateway;
