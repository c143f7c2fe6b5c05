pub mod forms;
pub mod models;
pub mod password;
pub mod permissions;
pub mod ports;
pub mod services;
