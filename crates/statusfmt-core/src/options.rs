use serde::Deserialize;

/// Explicit rendering configuration for one instance.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormatterOptions {
    /// Scheme used for links that point back at this instance.
    pub scheme: String,
    /// Host name of this instance. Mentions scoped to it resolve locally.
    pub local_domain: String,
    /// Number of characters of a link (after the scheme) shown on screen.
    pub link_display_budget: usize,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            local_domain: "localhost".to_string(),
            link_display_budget: 30,
        }
    }
}

impl FormatterOptions {
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.local_domain)
    }

    pub fn local_profile_url(&self, username: &str) -> String {
        format!("{}/@{}", self.base_url(), username)
    }

    pub fn tag_url(&self, name: &str) -> String {
        format!("{}/tags/{}", self.base_url(), name.to_lowercase())
    }

    pub fn is_local_domain(&self, domain: &str) -> bool {
        domain.eq_ignore_ascii_case(&self.local_domain)
    }

    /// Collapses a domain naming this instance to `None`.
    pub fn normalize_domain<'a>(&self, domain: Option<&'a str>) -> Option<&'a str> {
        domain.filter(|domain| !self.is_local_domain(domain))
    }
}

#[cfg(test)]
mod tests {
    use super::FormatterOptions;

    #[test]
    fn urls_are_built_from_scheme_and_domain() {
        let options = FormatterOptions {
            local_domain: "social.example".to_string(),
            ..Default::default()
        };
        assert_eq!(
            options.local_profile_url("alice"),
            "https://social.example/@alice"
        );
        assert_eq!(
            options.tag_url("RustLang"),
            "https://social.example/tags/rustlang"
        );
    }

    #[test]
    fn local_domain_collapses_case_insensitively() {
        let options = FormatterOptions {
            local_domain: "social.example".to_string(),
            ..Default::default()
        };
        assert_eq!(options.normalize_domain(Some("SOCIAL.example")), None);
        assert_eq!(
            options.normalize_domain(Some("other.example")),
            Some("other.example")
        );
        assert_eq!(options.normalize_domain(None), None);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let options: FormatterOptions =
            serde_json::from_str(r#"{ "local_domain": "social.example" }"#)?;
        assert_eq!(options.local_domain, "social.example");
        assert_eq!(options.scheme, "https");
        assert_eq!(options.link_display_budget, 30);
        Ok(())
    }
}
