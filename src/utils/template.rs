//! String template rendering utilities.

pub struct TemplateVars;

impl TemplateVars {
    pub const LABEL: &'static str = "label";
    pub const PATH: &'static str = "path";
    pub const NAME: &'static str = "name";
    pub const SUFFIX: &'static str = "suffix";
    pub const COUNT: &'static str = "count";
    pub const DEVELOPER_NAME: &'static str = "developerName";
}

/// Replace every `{{key}}` placeholder with its value. Unknown placeholders
/// are left in place.
pub fn render(template: &str, variables: &[(&str, &str)]) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_all_occurrences() {
        let out = render(
            "{{label}} at {{path}} ({{label}})",
            &[(TemplateVars::LABEL, "App"), (TemplateVars::PATH, "a/b")],
        );
        assert_eq!(out, "App at a/b (App)");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        assert_eq!(render("{{missing}}", &[("label", "x")]), "{{missing}}");
    }
}
