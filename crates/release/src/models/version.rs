use crate::error::{Error, ErrorKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A `major.minor.patch` interpreter version.
///
/// Ordering is numeric per component, so `3.9.18 < 3.10.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionNumber {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}
impl VersionNumber {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }
}
impl FromStr for VersionNumber {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.').map(|part| part.parse::<u64>());
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch)), None) => Ok(Self { major, minor, patch }),
            _ => exn::bail!(ErrorKind::MalformedAsset(format!("invalid version: {s}"))),
        }
    }
}
impl Display for VersionNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3.12.1", VersionNumber::new(3, 12, 1))]
    #[case("3.9.18", VersionNumber::new(3, 9, 18))]
    #[case("10.0.0", VersionNumber::new(10, 0, 0))]
    fn test_parse(#[case] input: &str, #[case] expected: VersionNumber) {
        let version: VersionNumber = input.parse().unwrap();
        assert_eq!(version, expected);
        assert_eq!(version.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("3.12")]
    #[case("3.12.1.1")]
    #[case("3.12.x")]
    #[case("3..1")]
    #[case("99999999999999999999.0.0")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<VersionNumber>().is_err());
    }

    #[test]
    fn test_ordering_is_numeric() {
        let older: VersionNumber = "3.9.18".parse().unwrap();
        let newer: VersionNumber = "3.10.0".parse().unwrap();
        assert!(older < newer);
        assert!(VersionNumber::new(3, 12, 1) < VersionNumber::new(3, 12, 10));
    }
}
