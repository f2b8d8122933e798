pub mod catalog;
pub mod entry;
pub mod form;
pub mod month;
pub mod settings;
pub mod summary;
