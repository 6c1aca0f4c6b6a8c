pub mod business;
pub mod category;
pub mod suggestion;
pub mod tag;
pub mod types;
pub mod user;
