//! `[feed]` configuration.
//!
//! # Example
//!
//! ```toml
//! [feed]
//! limit = 10                       # Items per feed
//! permalink = "/?p={id}"           # Post permalink template ({id}, {slug})
//! password_cookie = "wp-postpass"  # Cookie carrying the post password
//! password_action = "/wp-pass.php" # Password form target
//! include_author_email = false     # Emit <author> for commenters with email
//! minify = false                   # Strip indentation from the document
//! ```

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};

/// Comment feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Maximum number of items per feed.
    pub limit: usize,

    /// Post permalink template relative to `site.url`.
    pub permalink: String,

    /// Name of the cookie holding the requester's post password.
    pub password_cookie: String,

    /// Where the password form posts to (relative to `site.url` unless absolute).
    pub password_action: String,

    /// Emit `<author>email (Name)</author>` when the commenter left an email.
    pub include_author_email: bool,

    /// Minify the XML output.
    pub minify: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            permalink: "/?p={id}".into(),
            password_cookie: "wp-postpass".into(),
            password_action: "/wp-pass.php".into(),
            include_author_email: false,
            minify: false,
        }
    }
}

impl FeedConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.limit == 0 {
            diag.error_with_hint(
                "feed.limit",
                "limit must be at least 1",
                "set feed.limit = 10",
            );
        }

        if !self.permalink.contains("{id}") && !self.permalink.contains("{slug}") {
            diag.error_with_hint(
                "feed.permalink",
                format!("`{}` does not identify a post", self.permalink),
                "include {id} or {slug}, e.g.: \"/?p={id}\"",
            );
        }

        if self.password_cookie.trim().is_empty() {
            diag.error("feed.password_cookie", "cookie name must not be empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.feed.limit, 10);
        assert_eq!(config.feed.permalink, "/?p={id}");
        assert_eq!(config.feed.password_cookie, "wp-postpass");
        assert!(!config.feed.include_author_email);
        assert!(!config.feed.minify);
    }

    #[test]
    fn test_custom_config() {
        let config = test_parse_config(
            "[feed]\nlimit = 25\npermalink = \"/posts/{slug}/\"\nminify = true",
        );
        assert_eq!(config.feed.limit, 25);
        assert_eq!(config.feed.permalink, "/posts/{slug}/");
        assert!(config.feed.minify);
    }

    #[test]
    fn test_validate_rejects_zero_limit_and_bad_template() {
        let feed = FeedConfig {
            limit: 0,
            permalink: "/posts/".into(),
            ..FeedConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        feed.validate(&mut diag);

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["feed.limit", "feed.permalink"]);
    }
}
