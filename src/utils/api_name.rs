use regex::Regex;
use std::sync::LazyLock;

static SEPARATOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\-]+").unwrap());

static DISALLOWED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

static UNDERSCORE_RUN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}").unwrap());

/// Turn a human label into an API-name stem: separators become `_`, other
/// punctuation is dropped, underscore runs collapse, and edge underscores
/// are trimmed so an appended `__c` / `__e` suffix stays intact.
pub fn make_name_api_compatible(label: &str) -> String {
    let separated = SEPARATOR_PATTERN.replace_all(label.trim(), "_");
    let cleaned = DISALLOWED_PATTERN.replace_all(&separated, "");
    let collapsed = UNDERSCORE_RUN_PATTERN.replace_all(&cleaned, "_");
    collapsed.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(make_name_api_compatible("My App"), "My_App");
    }

    #[test]
    fn hyphens_and_runs_collapse() {
        assert_eq!(make_name_api_compatible("Order - Line  Item"), "Order_Line_Item");
    }

    #[test]
    fn punctuation_is_dropped() {
        assert_eq!(make_name_api_compatible("R&D (Team)!"), "RD_Team");
    }

    #[test]
    fn edge_underscores_are_trimmed() {
        assert_eq!(make_name_api_compatible(" _Foo_ "), "Foo");
    }

    #[test]
    fn preserves_case_and_digits() {
        assert_eq!(make_name_api_compatible("Invoice v2"), "Invoice_v2");
    }
}
