//! AI provider integrations and dual-provider aggregation

mod aggregator;
mod guard;
mod provider;
#[cfg(test)]
pub(crate) mod stub;

pub use aggregator::*;
pub use guard::*;
pub use provider::*;
