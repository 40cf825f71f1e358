//! Test fixtures for seeding an in-memory store.

use super::{CommentRecord, Post, PostId, PostStatus, SqliteStore};
use chrono::{DateTime, Utc};

/// Timestamp `secs` seconds after the Unix epoch.
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

/// Chainable seeding helper. Panics on insert failure (tests only).
pub struct Fixture<'a> {
    store: &'a SqliteStore,
}

impl<'a> Fixture<'a> {
    pub fn on(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Published, unprotected post dated at the epoch.
    pub fn post(self, id: PostId, title: &str) -> Self {
        self.post_with(id, title, PostStatus::Publish, None, at(0))
    }

    pub fn post_with(
        self,
        id: PostId,
        title: &str,
        status: PostStatus,
        password: Option<&str>,
        published_at: DateTime<Utc>,
    ) -> Self {
        let post = Post {
            id,
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            password: password.map(str::to_string),
            status,
            published_at,
        };
        self.store.insert_post(&post).unwrap();
        self
    }

    /// Approved comment with a body of `comment {id}`.
    pub fn comment(self, id: u64, post_id: PostId, created_at: DateTime<Utc>) -> Self {
        self.insert(id, post_id, created_at, true)
    }

    pub fn unapproved(self, id: u64, post_id: PostId, created_at: DateTime<Utc>) -> Self {
        self.insert(id, post_id, created_at, false)
    }

    /// Approved comment with explicit author and body.
    pub fn comment_by(
        self,
        id: u64,
        post_id: PostId,
        created_at: DateTime<Utc>,
        author: &str,
        content: &str,
    ) -> Self {
        self.store
            .insert_comment(&CommentRecord {
                id,
                post_id,
                author: author.to_string(),
                author_email: format!("{}@example.com", author.to_lowercase()),
                author_url: String::new(),
                created_at,
                content: content.to_string(),
                approved: true,
            })
            .unwrap();
        self
    }

    fn insert(self, id: u64, post_id: PostId, created_at: DateTime<Utc>, approved: bool) -> Self {
        self.store
            .insert_comment(&CommentRecord {
                id,
                post_id,
                author: format!("author{id}"),
                author_email: String::new(),
                author_url: String::new(),
                created_at,
                content: format!("comment {id}"),
                approved,
            })
            .unwrap();
        self
    }
}
