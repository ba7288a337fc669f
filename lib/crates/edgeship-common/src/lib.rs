pub mod config;
pub mod types;

pub use config::ApiConfig;
pub use types::*;
