pub mod config;
pub mod error;

pub use config::{parse_integer, ConfValue, Config, INTEGER_BITS, INTEGER_RADIX, VERSION};
pub use error::{ConfigError, ErrorKind, VarType};
