pub mod status;
pub mod store;
pub mod task;
