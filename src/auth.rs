//! Bearer token model and the provider that acquires, caches, and renews it.

pub mod provider;
pub mod token;

pub use provider::*;
pub use token::*;
