use std::fmt;
use std::io;

use thiserror::Error;

/// The type a caller asked an accessor for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarType {
    Bool,
    Array,
    String,
    Integer,
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VarType::Bool => "Bool",
            VarType::Array => "Array",
            VarType::String => "String",
            VarType::Integer => "Integer",
        };
        f.write_str(name)
    }
}

/// Coarse category of a [`ConfigError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    NotFound,
    TypeMismatch,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config input could not be read.
    #[error("config error: failed to read input: {0}")]
    Io(#[from] io::Error),

    /// The key is not present in the table.
    #[error("config error: requested value does not exist: ({key:?}, {expected})")]
    NotFound { key: String, expected: VarType },

    /// The key is present but holds another type, or an integer string did not parse.
    #[error("config error: requested type and actual type do not match: ({key:?}, {expected})")]
    TypeMismatch { key: String, expected: VarType },
}

impl ConfigError {
    pub(crate) fn not_found(key: &str, expected: VarType) -> Self {
        ConfigError::NotFound {
            key: key.to_string(),
            expected,
        }
    }

    pub(crate) fn type_mismatch(key: &str, expected: VarType) -> Self {
        ConfigError::TypeMismatch {
            key: key.to_string(),
            expected,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Io(_) => ErrorKind::Io,
            ConfigError::NotFound { .. } => ErrorKind::NotFound,
            ConfigError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        }
    }

    /// Key the failed lookup was made with, already lowercased. `None` for I/O failures.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::Io(_) => None,
            ConfigError::NotFound { key, .. } | ConfigError::TypeMismatch { key, .. } => Some(key),
        }
    }

    pub fn expected(&self) -> Option<VarType> {
        match self {
            ConfigError::Io(_) => None,
            ConfigError::NotFound { expected, .. } | ConfigError::TypeMismatch { expected, .. } => {
                Some(*expected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_errors_render_key_and_type() {
        let err = ConfigError::not_found("bind_addr", VarType::String);
        assert_eq!(
            err.to_string(),
            "config error: requested value does not exist: (\"bind_addr\", String)"
        );

        let err = ConfigError::type_mismatch("workers", VarType::Integer);
        assert_eq!(
            err.to_string(),
            "config error: requested type and actual type do not match: (\"workers\", Integer)"
        );
    }

    #[test]
    fn kind_and_fields() {
        let err = ConfigError::type_mismatch("peers", VarType::Array);
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.key(), Some("peers"));
        assert_eq!(err.expected(), Some(VarType::Array));

        let err: ConfigError = io::Error::new(io::ErrorKind::UnexpectedEof, "short read").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.key(), None);
        assert_eq!(err.expected(), None);
    }
}
