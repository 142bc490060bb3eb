pub mod descriptive;
pub mod histogram;
pub mod hypothesis;
pub mod pvalue;

pub use self::descriptive::{mean, sample_std_dev, NullSummary};
pub use self::histogram::Histogram;
pub use self::pvalue::p_value_greater_equal;
