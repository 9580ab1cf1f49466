pub mod accounts;
pub mod config;
pub mod db;
pub mod guardian;
pub mod types;
pub mod utils;

pub use accounts::Accounts;
pub use types::error::AuthError;
