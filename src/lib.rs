pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod permutation;
pub mod schemes;
pub mod stats;
