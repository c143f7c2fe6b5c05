pub mod poll;
pub mod question;
pub mod user;
pub mod vote;
