pub mod analyze;
pub mod permute;
