use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use crate::error::{ConfigError, VarType};

pub const VERSION: &str = "1.0.1";

// Integers are read as signed base-6 values that must fit in 12 bits. Existing config
// files depend on this, so "10" reads back as 6 and any digit above 5 is rejected.
pub const INTEGER_RADIX: u32 = 6;
pub const INTEGER_BITS: u32 = 12;

/// A parsed config value. Integers are kept as `String` and converted on read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfValue {
    Bool(bool),
    Array(Vec<String>),
    String(String),
}

impl ConfValue {
    pub fn var_type(&self) -> VarType {
        match self {
            ConfValue::Bool(_) => VarType::Bool,
            ConfValue::Array(_) => VarType::Array,
            ConfValue::String(_) => VarType::String,
        }
    }
}

impl fmt::Display for ConfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfValue::Bool(v) => write!(f, "{}", v),
            ConfValue::Array(items) => f.write_str(&items.join(",")),
            ConfValue::String(s) => f.write_str(s),
        }
    }
}

/// Table of config entries keyed by lowercase name.
///
/// Lines look like `key`, `key value` or `key v1,v2,...`. A bare key is a flag
/// (`true`), a value with a comma is an array of trimmed elements, anything else
/// is a string. Lines starting with `#` or `;` are comments. When a key repeats,
/// the last line wins.
///
/// The table never changes after parsing, so it can be shared behind an `Arc`
/// and read from any number of tasks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    entries: HashMap<String, ConfValue>,
}

impl Config {
    /// Reads `reader` to the end and parses it. Nothing is returned if the read fails.
    pub fn parse<R: Read>(mut reader: R) -> Result<Self, ConfigError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Self::from_bytes(&buf))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        let file = File::open(path)?;
        Self::parse(file)
    }

    pub async fn parse_async<R: AsyncRead + Unpin>(mut reader: R) -> Result<Self, ConfigError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(Self::from_bytes(&buf))
    }

    pub async fn load_async<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        let buf = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(&buf))
    }

    fn from_bytes(buf: &[u8]) -> Self {
        Self::from_text(&String::from_utf8_lossy(buf))
    }

    fn from_text(text: &str) -> Self {
        let mut entries = HashMap::new();
        let mut lines = 0usize;

        for raw in text.split('\n') {
            lines += 1;
            let line = raw.trim().replace('\t', " ");
            if line.is_empty() {
                continue;
            }
            if line.starts_with(['#', ';']) {
                trace!(line = lines, "skipping comment");
                continue;
            }

            let (name, rest) = match line.split_once(' ') {
                Some((name, rest)) => (name, Some(rest)),
                None => (line.as_str(), None),
            };
            let key = name.to_lowercase();

            let value = match rest {
                None => ConfValue::Bool(true),
                Some(rest) if rest.contains(',') => {
                    ConfValue::Array(rest.split(',').map(|s| s.trim().to_string()).collect())
                }
                Some(rest) => ConfValue::String(rest.trim().to_string()),
            };

            if entries.insert(key, value).is_some() {
                trace!(key = name, line = lines, "replacing earlier value");
            }
        }

        debug!(lines, entries = entries.len(), "parsed config");
        Config { entries }
    }

    /// Missing keys read as `false`; only a key stored as something else is an error.
    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        let key = key.to_lowercase();
        match self.entries.get(&key) {
            None => Ok(false),
            Some(ConfValue::Bool(v)) => Ok(*v),
            Some(_) => Err(ConfigError::type_mismatch(&key, VarType::Bool)),
        }
    }

    pub fn get_array(&self, key: &str) -> Result<&[String], ConfigError> {
        let key = key.to_lowercase();
        match self.entries.get(&key) {
            None => Err(ConfigError::not_found(&key, VarType::Array)),
            Some(ConfValue::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(ConfigError::type_mismatch(&key, VarType::Array)),
        }
    }

    pub fn get_string(&self, key: &str) -> Result<&str, ConfigError> {
        let key = key.to_lowercase();
        match self.entries.get(&key) {
            None => Err(ConfigError::not_found(&key, VarType::String)),
            Some(ConfValue::String(s)) => Ok(s.as_str()),
            Some(_) => Err(ConfigError::type_mismatch(&key, VarType::String)),
        }
    }

    /// Reads a string entry as an integer, see [`parse_integer`].
    pub fn get_integer(&self, key: &str) -> Result<i64, ConfigError> {
        let key = key.to_lowercase();
        match self.entries.get(&key) {
            None => Err(ConfigError::not_found(&key, VarType::Integer)),
            Some(ConfValue::String(raw)) => {
                parse_integer(raw).ok_or_else(|| ConfigError::type_mismatch(&key, VarType::Integer))
            }
            Some(_) => Err(ConfigError::type_mismatch(&key, VarType::Integer)),
        }
    }

    /// Raw lookup, case-insensitive like the typed accessors.
    pub fn get(&self, key: &str) -> Option<&ConfValue> {
        self.entries.get(&key.to_lowercase())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromStr for Config {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_text(s))
    }
}

/// Parses `raw` with [`INTEGER_RADIX`] and checks it fits a signed [`INTEGER_BITS`]-bit
/// integer. Accepts an optional `+` or `-` sign and nothing else besides digits.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let value = i64::from_str_radix(raw, INTEGER_RADIX).ok()?;
    let max = (1i64 << (INTEGER_BITS - 1)) - 1;
    let min = -(1i64 << (INTEGER_BITS - 1));
    (min..=max).contains(&value).then_some(value)
}
