pub mod loader;
pub mod types;

pub use self::loader::{load_trials, load_trials_from_reader, LoadReport};
pub use self::types::{Dataset, GeneralizationOrder, RouteStep, Trial};
