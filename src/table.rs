//! Terminal tables.

use comfy_table::presets::{ASCII_HORIZONTAL_ONLY, UTF8_HORIZONTAL_ONLY};
use comfy_table::Table;

const LOCALE_VARIABLES: [&str; 3] = ["LC_ALL", "LC_CTYPE", "LANG"];

/// Whether output may use characters beyond ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub unicode: bool,
}

impl Style {
    /// Style matching the character set of the current locale.
    pub fn detect() -> Self {
        Self { unicode: is_utf8_locale(LOCALE_VARIABLES.iter().map(|name| std::env::var(name).ok())) }
    }

    pub fn table<'a>(&self, header: impl IntoIterator<Item = &'a str>) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.unicode { UTF8_HORIZONTAL_ONLY } else { ASCII_HORIZONTAL_ONLY })
            .set_header(header.into_iter().collect::<Vec<_>>());
        table
    }

    pub fn mark(&self, value: bool) -> &'static str {
        match (self.unicode, value) {
            (true, true) => "✅",
            (true, false) => "❌",
            (false, true) => "yes",
            (false, false) => "no",
        }
    }
}

/// The first non-empty locale variable decides, as in the C library.
fn is_utf8_locale(values: impl IntoIterator<Item = Option<String>>) -> bool {
    values.into_iter().flatten().find(|value| !value.is_empty()).is_some_and(|value| {
        let value = value.to_ascii_lowercase();
        value.contains("utf-8") || value.contains("utf8")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vars(values: [Option<&str>; 3]) -> impl Iterator<Item = Option<String>> {
        values.into_iter().map(|value| value.map(str::to_string))
    }

    #[rstest]
    #[case([None, None, Some("en_GB.UTF-8")], true)]
    #[case([None, None, Some("C.utf8")], true)]
    #[case([Some("C"), None, Some("en_GB.UTF-8")], false)]
    #[case([Some(""), Some("de_DE.UTF-8"), Some("C")], true)]
    #[case([None, None, Some("POSIX")], false)]
    #[case([None, None, None], false)]
    fn test_is_utf8_locale(#[case] values: [Option<&str>; 3], #[case] expected: bool) {
        assert_eq!(is_utf8_locale(vars(values)), expected);
    }

    #[rstest]
    #[case(true, true, "✅")]
    #[case(true, false, "❌")]
    #[case(false, true, "yes")]
    #[case(false, false, "no")]
    fn test_mark(#[case] unicode: bool, #[case] value: bool, #[case] expected: &str) {
        assert_eq!(Style { unicode }.mark(value), expected);
    }

    #[test]
    fn test_ascii_table() {
        let style = Style { unicode: false };
        let mut table = style.table(["#", "Version"]);
        table.add_row(vec!["1".to_string(), "3.12.1".to_string()]);
        let rendered = table.to_string();
        assert!(rendered.contains("Version"));
        assert!(rendered.contains("3.12.1"));
        assert!(rendered.is_ascii());
    }
}
