//! Utility modules for mongospy.

mod duration;

pub use duration::{DurationParseError, parse_duration};
