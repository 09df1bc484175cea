pub mod ai;
pub mod dashboard;
pub mod tasks;
pub mod timelines;
