pub mod context;
pub mod serve;
pub mod streak;
pub mod task;
pub mod timeline;
