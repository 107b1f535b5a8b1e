pub mod bank_account;
pub mod earnings_entry;
pub mod order;
pub mod withdraw_request;
