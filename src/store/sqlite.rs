//! SQLite-backed comment store.

use super::{CommentStore, FeedComment, FeedScope, Post, PostId, PostRef, PostStatus, QueryError};
use crate::{debug, utils::date};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use std::path::Path;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL DEFAULT '',
        slug TEXT NOT NULL DEFAULT '',
        password TEXT,
        status TEXT NOT NULL DEFAULT 'draft',
        published_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY,
        post_id INTEGER NOT NULL REFERENCES posts(id),
        author TEXT NOT NULL DEFAULT '',
        author_email TEXT NOT NULL DEFAULT '',
        author_url TEXT NOT NULL DEFAULT '',
        created_at INTEGER NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        approved INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_comments_post_date ON comments(post_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_comments_date ON comments(created_at);
"#;

const FIND_POST: &str = r#"
    SELECT id, title, slug, password, status, published_at
    FROM posts
    WHERE id = ?1
      AND status IN ('publish', 'page')
      AND published_at <= ?2
"#;

// ?1 = post id or NULL, ?2 = cutoff (unix seconds), ?3 = limit.
// A NULL post id selects every post and flips the order to newest first.
const ELIGIBLE_COMMENTS: &str = r#"
    SELECT c.id, c.author, c.author_email, c.created_at, c.content,
           p.id, p.title, p.slug, p.password
    FROM comments c
    JOIN posts p ON p.id = c.post_id
    WHERE (?1 IS NULL OR c.post_id = ?1)
      AND c.approved = 1
      AND p.status IN ('publish', 'page')
      AND c.created_at <= ?2
      AND p.published_at <= ?2
    ORDER BY
      CASE WHEN ?1 IS NULL THEN -c.created_at ELSE c.created_at END,
      CASE WHEN ?1 IS NULL THEN -c.id ELSE c.id END
    LIMIT ?3
"#;

/// A comment row to insert (used by `init --sample` and tests).
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: u64,
    pub post_id: PostId,
    pub author: String,
    pub author_email: String,
    pub author_url: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub approved: bool,
}

/// Comment store over a single SQLite connection.
///
/// Connections are not shared between threads; the server opens one store
/// per request.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing database read-only (feed rendering).
    pub fn open_read_only(path: &Path) -> Result<Self, QueryError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| QueryError::Open(path.to_path_buf(), e))?;
        Ok(Self { conn })
    }

    /// Open (or create) a database read-write and ensure the schema exists.
    pub fn create(path: &Path) -> Result<Self, QueryError> {
        let conn = Connection::open(path).map_err(|e| QueryError::Open(path.to_path_buf(), e))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Fresh in-memory database with the schema applied.
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, QueryError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create tables and indexes if missing. Idempotent.
    pub fn init_schema(&self) -> Result<(), QueryError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn insert_post(&self, post: &Post) -> Result<(), QueryError> {
        self.conn.execute(
            "INSERT INTO posts (id, title, slug, password, status, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                to_sql_id(post.id)?,
                post.title,
                post.slug,
                post.password,
                post.status.as_str(),
                post.published_at.timestamp(),
            ],
        )?;
        Ok(())
    }

    pub fn insert_comment(&self, comment: &CommentRecord) -> Result<(), QueryError> {
        self.conn.execute(
            "INSERT INTO comments
                (id, post_id, author, author_email, author_url, created_at, content, approved)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                to_sql_id(comment.id)?,
                to_sql_id(comment.post_id)?,
                comment.author,
                comment.author_email,
                comment.author_url,
                comment.created_at.timestamp(),
                comment.content,
                comment.approved,
            ],
        )?;
        Ok(())
    }

    /// Number of posts and comments stored (for `init` reporting).
    pub fn counts(&self) -> Result<(u64, u64), QueryError> {
        let posts: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        let comments: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))?;
        Ok((posts.unsigned_abs(), comments.unsigned_abs()))
    }
}

impl CommentStore for SqliteStore {
    fn find_post(&self, id: PostId, now: DateTime<Utc>) -> Result<Option<Post>, QueryError> {
        let post = self
            .conn
            .query_row(FIND_POST, params![to_sql_id(id)?, now.timestamp()], |row| {
                Ok(Post {
                    id: column_id(row, 0)?,
                    title: row.get(1)?,
                    slug: row.get(2)?,
                    password: row.get(3)?,
                    status: PostStatus::from_db(&row.get::<_, String>(4)?),
                    published_at: column_time(row, 5)?,
                })
            })
            .optional()?;
        Ok(post)
    }

    fn eligible_comments(
        &self,
        scope: FeedScope,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<FeedComment>, QueryError> {
        let post_id = scope.post_id().map(to_sql_id).transpose()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare_cached(ELIGIBLE_COMMENTS)?;
        let comments = stmt
            .query_map(params![post_id, now.timestamp(), limit], comment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let order = if scope.is_ascending() { "oldest first" } else { "newest first" };
        debug!("store"; "{:?}: {} eligible comment(s), {}", scope, comments.len(), order);
        Ok(comments)
    }
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<FeedComment> {
    Ok(FeedComment {
        id: column_id(row, 0)?,
        author: row.get(1)?,
        author_email: row.get(2)?,
        created_at: column_time(row, 3)?,
        content: row.get(4)?,
        post: PostRef {
            id: column_id(row, 5)?,
            title: row.get(6)?,
            slug: row.get(7)?,
            password: row.get(8)?,
        },
    })
}

fn to_sql_id(id: u64) -> Result<i64, QueryError> {
    i64::try_from(id).map_err(|_| QueryError::Malformed(format!("id {id} out of range")))
}

fn column_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(idx)?;
    u64::try_from(raw).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, raw))
}

fn column_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: i64 = row.get(idx)?;
    date::from_unix(raw).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{Fixture, at};

    #[test]
    fn test_schema_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        store.init_schema().unwrap();
        assert_eq!(store.counts().unwrap(), (0, 0));
    }

    #[test]
    fn test_open_read_only_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteStore::open_read_only(&dir.path().join("missing.db"))
            .err()
            .expect("missing database must fail");
        assert!(matches!(err, QueryError::Open(..)));
    }

    #[test]
    fn test_create_then_open_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.db");
        {
            let store = SqliteStore::create(&path).unwrap();
            Fixture::on(&store).post(1, "Hello").comment(10, 1, at(100));
        }
        let store = SqliteStore::open_read_only(&path).unwrap();
        let comments = store
            .eligible_comments(FeedScope::LatestAcrossSite, at(1_000), 10)
            .unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].post.title, "Hello");
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.db");
        drop(SqliteStore::create(&path).unwrap());

        let store = SqliteStore::open_read_only(&path).unwrap();
        let post = Post {
            id: 1,
            title: "Hello".into(),
            slug: "hello".into(),
            password: None,
            status: PostStatus::Publish,
            published_at: at(0),
        };
        assert!(store.insert_post(&post).is_err());
    }

    #[test]
    fn test_find_post_eligibility() {
        let store = SqliteStore::in_memory().unwrap();
        Fixture::on(&store)
            .post(1, "Published")
            .post_with(2, "Draft", PostStatus::Draft, None, at(0))
            .post_with(3, "About", PostStatus::Page, None, at(0))
            .post_with(4, "Scheduled", PostStatus::Publish, None, at(5_000));

        let now = at(1_000);
        assert_eq!(store.find_post(1, now).unwrap().unwrap().title, "Published");
        assert!(store.find_post(2, now).unwrap().is_none());
        assert_eq!(store.find_post(3, now).unwrap().unwrap().status, PostStatus::Page);
        assert!(store.find_post(4, now).unwrap().is_none());
        assert!(store.find_post(99, now).unwrap().is_none());
    }

    #[test]
    fn test_single_post_filters_and_orders_ascending() {
        let store = SqliteStore::in_memory().unwrap();
        Fixture::on(&store)
            .post(1, "One")
            .post(2, "Two")
            .comment(10, 1, at(300))
            .comment(11, 1, at(100))
            .comment(12, 2, at(200))
            .unapproved(13, 1, at(150))
            .comment(14, 1, at(2_000));

        let comments = store
            .eligible_comments(FeedScope::SinglePost(1), at(1_000), 10)
            .unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![11, 10]);
        assert!(comments.iter().all(|c| c.post.id == 1));
    }

    #[test]
    fn test_site_wide_orders_descending_and_limits() {
        let store = SqliteStore::in_memory().unwrap();
        let mut fixture = Fixture::on(&store).post(1, "One");
        for i in 0..12u64 {
            fixture = fixture.comment(100 + i, 1, at(i as i64 * 10));
        }

        let comments = store
            .eligible_comments(FeedScope::LatestAcrossSite, at(1_000), 10)
            .unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, (102..=111).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_site_wide_excludes_hidden_posts() {
        let store = SqliteStore::in_memory().unwrap();
        Fixture::on(&store)
            .post(1, "Public")
            .post_with(2, "Private", PostStatus::Private, None, at(0))
            .post_with(3, "Page", PostStatus::Page, None, at(0))
            .post_with(4, "Scheduled", PostStatus::Publish, None, at(5_000))
            .comment(10, 1, at(10))
            .comment(11, 2, at(20))
            .comment(12, 3, at(30))
            .comment(13, 4, at(40));

        let comments = store
            .eligible_comments(FeedScope::LatestAcrossSite, at(1_000), 10)
            .unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![12, 10]);
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let store = SqliteStore::in_memory().unwrap();
        Fixture::on(&store)
            .post(1, "One")
            .comment(10, 1, at(1_000))
            .comment(11, 1, at(1_001));

        for scope in [FeedScope::SinglePost(1), FeedScope::LatestAcrossSite] {
            let comments = store.eligible_comments(scope, at(1_000), 10).unwrap();
            assert_eq!(comments.len(), 1, "{scope:?}");
            assert_eq!(comments[0].id, 10);
        }
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_id() {
        let store = SqliteStore::in_memory().unwrap();
        Fixture::on(&store)
            .post(1, "One")
            .comment(21, 1, at(50))
            .comment(20, 1, at(50));

        let asc = store
            .eligible_comments(FeedScope::SinglePost(1), at(100), 10)
            .unwrap();
        assert_eq!(asc.iter().map(|c| c.id).collect::<Vec<_>>(), vec![20, 21]);

        let desc = store
            .eligible_comments(FeedScope::LatestAcrossSite, at(100), 10)
            .unwrap();
        assert_eq!(desc.iter().map(|c| c.id).collect::<Vec<_>>(), vec![21, 20]);
    }

    #[test]
    fn test_unknown_post_yields_no_comments() {
        let store = SqliteStore::in_memory().unwrap();
        Fixture::on(&store).post(1, "One").comment(10, 1, at(10));

        let comments = store
            .eligible_comments(FeedScope::SinglePost(u64::MAX >> 1), at(100), 10)
            .unwrap();
        assert!(comments.is_empty());

        assert!(matches!(
            store.eligible_comments(FeedScope::SinglePost(u64::MAX), at(100), 10),
            Err(QueryError::Malformed(_))
        ));
    }

    #[test]
    fn test_password_is_joined() {
        let store = SqliteStore::in_memory().unwrap();
        Fixture::on(&store)
            .post_with(5, "Secret", PostStatus::Publish, Some("abc"), at(0))
            .comment(10, 5, at(10));

        let comments = store
            .eligible_comments(FeedScope::SinglePost(5), at(100), 10)
            .unwrap();
        assert_eq!(comments[0].post.required_password(), Some("abc"));
    }
}
