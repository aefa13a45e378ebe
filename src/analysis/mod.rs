pub mod analyzer;
pub mod strikes;

pub use analyzer::{analyze, OiTotals};
pub use strikes::{select_window, StrikeWindow};
