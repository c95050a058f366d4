use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Placeholder for a field that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";
/// Libc of builds that link against the platform's own C library.
pub const NATIVE_LIBC: &str = "native";
/// Marker inside a variant descriptor for builds without debug symbols.
pub const STRIPPED: &str = "stripped";

// cpython-<version>+<date>-<arch>-<vendor>-<os>-<tail>
regex!(
    ASSET_REGEX,
    r"^cpython-(?P<version>\d+\.\d+\.\d+)\+(?P<date>\d+)-(?P<arch>[^-]+)-(?P<vendor>[^-]+)-(?P<os>[^-]+)-(?P<tail>.*)$"
);
// [<libc>-]<variant>.tar.gz
regex!(TAIL_REGEX, r"^(?:(?P<libc>[^-]+)-)?(?P<variant>[^-]+)\.tar\.gz$");
