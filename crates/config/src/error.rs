use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration file or environment could not be read or merged.
    #[display("failed to load configuration")]
    Load,
    /// The configuration file could not be written back.
    #[display("failed to save configuration to {_0}")]
    Save(#[error(not(source))] String),
    /// A `section.key` pair that isn't a known option, or isn't set.
    #[display("key {_0} does not exist")]
    UnknownKey(#[error(not(source))] String),
    /// No home directory could be determined for the default locations.
    #[display("could not determine home directory")]
    NoHomeDirectory,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Save(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::UnknownKey("paths.foo".to_string()).to_string(), "key paths.foo does not exist");
        assert_eq!(ErrorKind::Save("/etc/snak.toml".to_string()).to_string(), "failed to save configuration to /etc/snak.toml");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Save(String::new()).is_retryable());
        assert!(!ErrorKind::Load.is_retryable());
        assert!(!ErrorKind::UnknownKey(String::new()).is_retryable());
    }
}
