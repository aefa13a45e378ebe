pub mod timing;

pub use timing::{AggregateTimer, Timer};
