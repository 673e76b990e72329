pub mod cancellation;
pub mod event;
pub mod profile;
