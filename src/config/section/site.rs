//! `[site]` configuration.
//!
//! Site metadata shared by every feed: the channel title suffix, the
//! site-wide link, the description and the declared character set.

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};

/// Site metadata for feed envelopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    /// Site name (site-wide feed title is "{title} Comments").
    pub title: String,

    /// Site URL, also the base for post permalinks.
    pub url: String,

    /// Site description (channel description).
    pub description: String,

    /// Character set declared in the XML prolog and Content-Type header.
    pub charset: String,

    /// Language code (e.g., "en", "zh-Hans").
    pub language: Option<String>,
}

impl Default for SiteInfoConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            url: String::new(),
            description: String::new(),
            charset: "UTF-8".into(),
            language: Some("en".into()),
        }
    }
}

impl SiteInfoConfig {
    /// Site URL without a trailing slash, ready for joining paths.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `url` must be a valid http(s) URL with a host
    /// - `charset` must be non-empty; non-UTF-8 charsets only warn
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.url.is_empty() {
            diag.error_with_hint(
                "site.url",
                "site url is not configured",
                "set site.url, e.g.: \"https://example.com\"",
            );
        } else {
            match url::Url::parse(&self.url) {
                Ok(parsed) => {
                    if !matches!(parsed.scheme(), "http" | "https") {
                        diag.error_with_hint(
                            "site.url",
                            format!(
                                "scheme '{}' not supported, must be http or https",
                                parsed.scheme()
                            ),
                            "use format like https://example.com",
                        );
                    }
                    if parsed.host_str().is_none() {
                        diag.error_with_hint(
                            "site.url",
                            "URL must have a valid host",
                            "use format like https://example.com",
                        );
                    }
                }
                Err(e) => {
                    diag.error_with_hint(
                        "site.url",
                        format!("invalid URL: {e}"),
                        "use format like https://example.com",
                    );
                }
            }
        }

        if self.charset.trim().is_empty() {
            diag.error("site.charset", "charset must not be empty");
        } else if !is_charset_token(&self.charset) {
            diag.error_with_hint(
                "site.charset",
                format!("`{}` is not a valid charset name", self.charset),
                "use an IANA charset name such as \"UTF-8\"",
            );
        } else if !is_utf8_label(&self.charset) {
            diag.warn(
                "site.charset",
                format!(
                    "`{}` is declared but feeds are always encoded as UTF-8",
                    self.charset
                ),
            );
        }
    }
}

/// Charset names end up in the XML declaration and a header value.
fn is_charset_token(charset: &str) -> bool {
    charset
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

fn is_utf8_label(charset: &str) -> bool {
    matches!(
        charset.trim().to_ascii_lowercase().as_str(),
        "utf-8" | "utf8" | "unicode-1-1-utf-8"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn validate(site: &SiteInfoConfig) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        site.validate(&mut diag);
        diag
    }

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.charset, "UTF-8");
        assert_eq!(config.site.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_base_url_trims_slash() {
        let config = test_parse_config("");
        assert_eq!(config.site.base_url(), "https://example.com");

        let site = SiteInfoConfig {
            url: "https://example.com/blog/".into(),
            ..SiteInfoConfig::default()
        };
        assert_eq!(site.base_url(), "https://example.com/blog");
    }

    #[test]
    fn test_validate_ok() {
        let config = test_parse_config("");
        let diag = validate(&config.site);
        assert!(!diag.has_errors());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_validate_missing_url() {
        let site = SiteInfoConfig::default();
        let diag = validate(&site);
        assert!(diag.errors().iter().any(|e| e.field == "site.url"));
    }

    #[test]
    fn test_validate_bad_scheme() {
        let site = SiteInfoConfig {
            url: "ftp://example.com".into(),
            ..SiteInfoConfig::default()
        };
        assert!(validate(&site).has_errors());
    }

    #[test]
    fn test_validate_non_utf8_charset_warns() {
        let site = SiteInfoConfig {
            url: "https://example.com".into(),
            charset: "ISO-8859-1".into(),
            ..SiteInfoConfig::default()
        };
        let diag = validate(&site);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
    }

    #[test]
    fn test_validate_charset_token() {
        let site = SiteInfoConfig {
            url: "https://example.com".into(),
            charset: "utf-8\"?><x".into(),
            ..SiteInfoConfig::default()
        };
        let diag = validate(&site);
        assert!(diag.errors().iter().any(|e| e.field == "site.charset"));
    }
}
