//! Request parsing: target path, post parameter, password cookie.

use percent_encoding::percent_decode_str;
use std::sync::LazyLock;
use thiserror::Error;
use tiny_http::Request;
use url::Url;

/// Query parameter selecting single-post mode.
pub const POST_PARAM: &str = "p";

static BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://localhost/").expect("static base URL is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("malformed request target `{0}`")]
    Target(String),

    #[error("invalid post id `{0}`")]
    PostId(String),
}

/// The parts of a request URL the feed cares about.
#[derive(Debug, PartialEq, Eq)]
pub struct FeedTarget {
    pub path: String,
    post_param: Option<String>,
}

impl FeedTarget {
    /// Parse a raw request target such as `/comments/feed?p=5`.
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let url = BASE
            .join(raw)
            .map_err(|_| RequestError::Target(raw.to_string()))?;

        let post_param = url
            .query_pairs()
            .find(|(key, _)| key == POST_PARAM)
            .map(|(_, value)| value.into_owned());

        Ok(Self {
            path: url.path().to_string(),
            post_param,
        })
    }

    /// Requested post id.
    ///
    /// A missing or empty `p` selects the site-wide feed. Anything else must
    /// be a decimal post id.
    pub fn post(&self) -> Result<Option<u64>, RequestError> {
        match self.post_param.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| RequestError::PostId(value.to_string())),
        }
    }

    /// Whether the path addresses the feed mounted at `mount`.
    pub fn is_at(&self, mount: &str) -> bool {
        self.path.trim_end_matches('/') == mount.trim_end_matches('/')
    }
}

/// Value of cookie `name` from the request, percent-decoded.
pub fn cookie(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .filter(|h| h.field.as_str().as_str().eq_ignore_ascii_case("cookie"))
        .find_map(|h| cookie_from_header(h.value.as_str(), name))
}

/// Find cookie `name` in a `Cookie` header value.
pub fn cookie_from_header(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| {
            let value = value.trim().trim_matches('"');
            percent_decode_str(value).decode_utf8_lossy().into_owned()
        })
}
