pub mod pulse;
pub mod rolling_window;
pub mod source;
pub mod types;

pub use rolling_window::{RetentionPolicy, SampleWindow, Warmup};
pub use types::Sample;
