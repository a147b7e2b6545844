//! Price Feed Adapters - Price Update Sources
//!
//! - Synthetic: Seeded random prices over a fixed security universe

pub mod synthetic;

pub use synthetic::SyntheticFeed;
