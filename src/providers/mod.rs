//! Asset provider implementations

pub mod coincap;

pub use coincap::CoinCapProvider;
