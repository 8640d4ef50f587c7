pub mod config;
pub mod error;
pub mod notes;

pub use config::Config;
pub use error::*;
pub use notes::*;
