pub mod account;
pub mod cache;
pub mod error;
pub mod overview;
pub mod processor;
