pub mod consts;
pub mod config;
pub mod error;
pub mod hash;

pub use config::Config;
pub use error::{ConfigError, TransportError, ValidationError};
pub use hash::HashRange;
