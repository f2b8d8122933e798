pub mod format;
pub mod manager;
pub mod persister;
pub mod store;
