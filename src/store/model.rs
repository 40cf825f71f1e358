//! Read-only snapshots of posts and comments.

use super::PostId;
use chrono::{DateTime, Utc};
use std::fmt;

/// Publication status of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostStatus {
    Publish,
    Page,
    Draft,
    Private,
    Future,
    Other(String),
}

impl PostStatus {
    /// Parse the stored lowercase status text.
    pub fn from_db(s: &str) -> Self {
        match s {
            "publish" => Self::Publish,
            "page" => Self::Page,
            "draft" => Self::Draft,
            "private" => Self::Private,
            "future" => Self::Future,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Publish => "publish",
            Self::Page => "page",
            Self::Draft => "draft",
            Self::Private => "private",
            Self::Future => "future",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post as needed for a single-post feed envelope.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    /// Shared secret guarding the post's comments (`None` when unprotected).
    pub password: Option<String>,
    pub status: PostStatus,
    pub published_at: DateTime<Utc>,
}

/// The post fields joined onto each comment row.
#[derive(Debug, Clone)]
pub struct PostRef {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub password: Option<String>,
}

impl PostRef {
    /// Password that must be presented, if any. Empty strings do not protect.
    pub fn required_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

impl From<&Post> for PostRef {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            password: post.password.clone(),
        }
    }
}

/// An eligible comment joined with its host post.
#[derive(Debug, Clone)]
pub struct FeedComment {
    pub id: u64,
    pub author: String,
    pub author_email: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub post: PostRef,
}
