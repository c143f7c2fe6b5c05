pub mod choice;
pub mod common;
pub mod poll;
pub mod question;
pub mod user;
