pub mod config;
mod error_helpers;

pub use self::error_helpers::{format_error_with_help, is_database_locked_error};
