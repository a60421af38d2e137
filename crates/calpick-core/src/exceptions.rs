use std::fmt;

#[derive(Debug, PartialEq)]
pub enum GenericError {
    ParseError(String),
    ConfigError(String),
    IoError(String),
    RuntimeError(String),
}

impl fmt::Display for GenericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError(s) => write!(f, "ParseError: {s}"),
            Self::ConfigError(s) => write!(f, "ConfigError: {s}"),
            Self::IoError(s) => write!(f, "IoError: {s}"),
            Self::RuntimeError(s) => write!(f, "Runtime Error: {s}"),
        }
    }
}

impl std::error::Error for GenericError {}

impl From<std::io::Error> for GenericError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}
