pub mod config;
pub mod observability;

mod session;

pub use session::{DayResolution, Session};
