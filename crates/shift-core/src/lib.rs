pub mod clock;
pub mod context;
pub mod error;
pub mod keys;
pub mod prompt;
pub mod store;
pub mod streak;
pub mod task;
pub mod timeline;

pub use error::{Result, ShiftError};
