pub mod bus;
pub mod collector;
pub mod engine;
pub mod platform;
pub mod snapshot;
pub mod source;
pub mod sources;
pub mod store;
