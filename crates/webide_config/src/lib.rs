mod error;
mod ide_config;

pub use error::*;
pub use ide_config::*;
