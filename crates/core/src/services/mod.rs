pub mod amount_format;
pub mod confirm;
pub mod ledger_service;
pub mod summary_service;
pub mod validation;
