//! Content store access for comment feeds.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── model     # Post, PostStatus, FeedComment
//! ├── sqlite    # SqliteStore (rusqlite)
//! └── mod.rs    # CommentStore trait, FeedScope, QueryError (this file)
//! ```
//!
//! The store is the only place that decides eligibility. Both feed modes go
//! through one query, selected by [`FeedScope`]:
//!
//! | Scope              | Filter          | Order                 |
//! |--------------------|-----------------|-----------------------|
//! | `SinglePost(id)`   | `post_id = id`  | oldest first          |
//! | `LatestAcrossSite` | none            | newest first          |

mod model;
mod sqlite;

#[cfg(test)]
pub mod testing;

pub use model::{FeedComment, Post, PostRef, PostStatus};
pub use sqlite::{CommentRecord, SqliteStore};

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Post identifier as stored.
pub type PostId = u64;

/// Which comments a feed covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// Comments on one post, oldest first.
    SinglePost(PostId),
    /// Latest comments across the whole site, newest first.
    LatestAcrossSite,
}

impl FeedScope {
    /// Scope for an optional post id (`None` means site-wide).
    pub fn from_post(post: Option<PostId>) -> Self {
        post.map_or(Self::LatestAcrossSite, Self::SinglePost)
    }

    pub const fn post_id(self) -> Option<PostId> {
        match self {
            Self::SinglePost(id) => Some(id),
            Self::LatestAcrossSite => None,
        }
    }

    /// Whether comments are listed oldest first.
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::SinglePost(_))
    }
}

/// Store failures. Always fatal for the request.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("cannot open comment store `{0}`")]
    Open(PathBuf, #[source] rusqlite::Error),

    #[error("comment store query failed")]
    Sqlite(#[from] rusqlite::Error),

    #[error("malformed row in comment store: {0}")]
    Malformed(String),
}

/// Read access to posts and their eligible comments.
///
/// Implementations must only return comments that are approved, attached to
/// a published post or page, and dated at or before `now`.
pub trait CommentStore {
    /// Look up an eligible host post (published or page, not future-dated).
    fn find_post(&self, id: PostId, now: DateTime<Utc>) -> Result<Option<Post>, QueryError>;

    /// Fetch at most `limit` eligible comments for `scope`, ordered by scope.
    fn eligible_comments(
        &self,
        scope: FeedScope,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<FeedComment>, QueryError>;
}
