//! Comment feed rendering.
//!
//! # Module Structure
//!
//! ```text
//! feed/
//! ├── channel   # Envelope and item building (rss builders)
//! ├── protect   # Password gating
//! ├── xml       # Prolog, serialization, content type
//! └── mod.rs    # CommentFeedRenderer (this file)
//! ```
//!
//! A render is one straight pass: resolve the scope, query the store once,
//! build every item, validate the channel, then serialize. Nothing is written
//! until the whole document exists.

mod channel;
mod protect;
mod xml;


use crate::{
    config::SiteConfig,
    debug,
    store::{CommentStore, FeedScope, PostId, PostRef, QueryError},
};
use chrono::{DateTime, Utc};
use rss::validation::Validate;
use std::fmt::Display;
use thiserror::Error;

/// Errors produced while rendering a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("post {0} not found")]
    PostNotFound(PostId),

    #[error("RSS validation failed: {0}")]
    Invalid(String),

    #[error("failed to serialize feed: {0}")]
    Xml(String),
}

impl FeedError {
    fn xml(err: impl Display) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<rss::Error> for FeedError {
    fn from(err: rss::Error) -> Self {
        Self::xml(err)
    }
}

/// Everything a single feed request depends on.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub scope: FeedScope,
    /// Password credential presented by the requester.
    pub password: Option<String>,
    /// Render moment; also the eligibility cutoff.
    pub now: DateTime<Utc>,
}

impl FeedRequest {
    pub fn new(post: Option<PostId>, password: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            scope: FeedScope::from_post(post),
            password,
            now,
        }
    }
}

/// A finished feed document.
#[derive(Debug, Clone)]
pub struct RenderedFeed {
    /// `Content-Type` header value.
    pub content_type: String,
    pub body: String,
    pub items: usize,
}

/// Renders comment feeds from a [`CommentStore`].
pub struct CommentFeedRenderer<'a, S: CommentStore + ?Sized> {
    store: &'a S,
    config: &'a SiteConfig,
}

impl<'a, S: CommentStore + ?Sized> CommentFeedRenderer<'a, S> {
    pub fn new(store: &'a S, config: &'a SiteConfig) -> Self {
        Self { store, config }
    }

    /// Render the feed for `request`.
    ///
    /// Single-post requests fail with [`FeedError::PostNotFound`] when the
    /// post does not exist or is not visible yet. An empty comment set is
    /// still a valid feed.
    pub fn render(&self, request: &FeedRequest) -> Result<RenderedFeed, FeedError> {
        let post = match request.scope {
            FeedScope::SinglePost(id) => {
                let post = self
                    .store
                    .find_post(id, request.now)?
                    .ok_or(FeedError::PostNotFound(id))?;
                debug!("feed"; "post {} ({}, published {})", post.id, post.status, post.published_at);
                Some(PostRef::from(&post))
            }
            FeedScope::LatestAcrossSite => None,
        };

        let comments =
            self.store
                .eligible_comments(request.scope, request.now, self.config.feed.limit)?;

        let credential = request.password.as_deref();
        let items: Vec<_> = comments
            .iter()
            .map(|comment| channel::comment_item(self.config, comment, credential))
            .collect();
        let count = items.len();

        let channel = channel::envelope(self.config, post.as_ref(), request.now, items);
        channel
            .validate()
            .map_err(|e| FeedError::Invalid(e.to_string()))?;

        let charset = &self.config.site.charset;
        let body = xml::write_document(&channel, charset, self.config.feed.minify)?;

        debug!("feed"; "{:?}: {} item(s), {} bytes", request.scope, count, body.len());
        Ok(RenderedFeed {
            content_type: xml::content_type(charset),
            body,
            items: count,
        })
    }
}
