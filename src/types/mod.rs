pub mod error;
pub mod mail;
pub mod team;
pub mod user;
