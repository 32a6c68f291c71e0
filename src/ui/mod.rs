pub mod admin;
pub mod login;
pub mod panels;
pub mod tables;
