//! Server configuration from a dotted-key config file.
//!
//! The file is a flat list of `key = value` lines; `#` starts a comment and
//! blank lines are ignored. Values are strings (quoted), integers, or the
//! booleans `true`/`false`. Assigning the same key twice is not an error:
//! the later assignment wins, and the options visible to the server are
//! exactly the final assignment of each key.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8888;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A line did not parse.
    #[error("config syntax error at line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    /// A key no option recognizes.
    #[error("unrecognized option: {0}")]
    UnknownKey(String),

    /// A value of the wrong scalar type.
    #[error("option {key} expects a {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// A value of the right type but out of range or unusable.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// A scalar configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Bool(bool),
}

/// The raw option mapping: dotted key to final assigned value.
#[derive(Debug, Clone, Default)]
pub struct Options(BTreeMap<String, Scalar>);

impl Options {
    /// Parse config file text. Later assignments of a key overwrite
    /// earlier ones.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_no = idx + 1;
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Syntax {
                    line: line_no,
                    reason: "expected 'key = value'".to_string(),
                });
            };
            let key = key.trim();
            let valid_key = !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
            if !valid_key {
                return Err(ConfigError::Syntax {
                    line: line_no,
                    reason: format!("invalid option name '{key}'"),
                });
            }
            let value = parse_scalar(value.trim()).ok_or_else(|| ConfigError::Syntax {
                line: line_no,
                reason: format!("unparseable value for '{key}'"),
            })?;
            map.insert(key.to_string(), value);
        }
        Ok(Options(map))
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn parse_scalar(raw: &str) -> Option<Scalar> {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return Some(Scalar::String(raw[1..raw.len() - 1].to_string()));
        }
    }
    match raw {
        "true" => Some(Scalar::Bool(true)),
        "false" => Some(Scalar::Bool(false)),
        _ => raw.parse::<i64>().ok().map(Scalar::Integer),
    }
}

/// Server configuration.
///
/// Built from [`Options`]; read-only after startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind. `"*"` means all interfaces.
    pub ip: String,
    /// Port to listen on.
    pub port: u16,
    /// Open the system browser at the served URL after binding.
    pub open_browser: bool,
    /// Permit running with an effective uid of 0.
    pub allow_root: bool,
    /// Directory served by the contents manager.
    pub root_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Register the script-export post-save hook at startup.
    pub script_on_save: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: DEFAULT_PORT,
            open_browser: true,
            allow_root: false,
            root_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            script_on_save: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a file.
    ///
    /// Recognized options:
    /// - `server.ip` (string, default `"localhost"`; `"*"` binds all interfaces)
    /// - `server.port` (integer, default 8888)
    /// - `server.open_browser` (boolean, default true)
    /// - `server.allow_root` (boolean, default false)
    /// - `server.root_dir` (string, default `"."`)
    /// - `server.log_level` (string, default `"info"`)
    /// - `export.script_on_save` (boolean, default false)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let options = Options::parse(&text)?;
        Self::from_options(&options)
    }

    /// Apply an option mapping on top of the defaults.
    ///
    /// Every key must be recognized and carry the right scalar type.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (key, value) in options.iter() {
            match key {
                "server.ip" => config.ip = expect_string(key, value)?,
                "server.port" => config.port = expect_port(key, value)?,
                "server.open_browser" => config.open_browser = expect_bool(key, value)?,
                "server.allow_root" => config.allow_root = expect_bool(key, value)?,
                "server.root_dir" => config.root_dir = PathBuf::from(expect_string(key, value)?),
                "server.log_level" => config.log_level = expect_string(key, value)?,
                "export.script_on_save" => config.script_on_save = expect_bool(key, value)?,
                other => return Err(ConfigError::UnknownKey(other.to_string())),
            }
        }
        Ok(config)
    }

    /// The socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = match self.ip.as_str() {
            "*" => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            "localhost" => IpAddr::V4(Ipv4Addr::LOCALHOST),
            other => other.parse().map_err(|_| ConfigError::InvalidValue {
                key: "server.ip".to_string(),
                reason: format!("not an IP address: {other}"),
            })?,
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn expect_string(key: &str, value: &Scalar) -> Result<String, ConfigError> {
    match value {
        Scalar::String(s) => Ok(s.clone()),
        _ => Err(ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: "string",
        }),
    }
}

fn expect_bool(key: &str, value: &Scalar) -> Result<bool, ConfigError> {
    match value {
        Scalar::Bool(b) => Ok(*b),
        _ => Err(ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: "boolean",
        }),
    }
}

fn expect_port(key: &str, value: &Scalar) -> Result<u16, ConfigError> {
    let Scalar::Integer(n) = value else {
        return Err(ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: "integer",
        });
    };
    u16::try_from(*n).map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: format!("port out of range: {n}"),
    })
}
