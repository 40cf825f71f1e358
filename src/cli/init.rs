//! Project initialization.
//!
//! Writes a starter `comments.toml` and creates the comment store schema.

use crate::{
    config::SiteConfig,
    log,
    store::{CommentRecord, Post, PostStatus, SqliteStore},
    utils::date,
};
use anyhow::{Context, Result};
use chrono::TimeDelta;
use std::fs;

/// Initialize config and store.
///
/// An existing config file is kept unless `force` is set. The schema is
/// created idempotently; `sample` seeds demo data into an empty store.
pub fn init_project(config: &SiteConfig, force: bool, sample: bool) -> Result<()> {
    write_config(config, force)?;

    let store_path = &config.store.path;
    if let Some(parent) = store_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    let store = SqliteStore::create(store_path)?;

    if sample {
        seed_sample(&store)?;
    }

    let (posts, comments) = store.counts()?;
    log!("init"; "{} ({} posts, {} comments)", store_path.display(), posts, comments);
    Ok(())
}

fn write_config(config: &SiteConfig, force: bool) -> Result<()> {
    let path = &config.config_path;
    if path.exists() && !force {
        log!("init"; "{} exists, keeping it (use --force to overwrite)", path.display());
        return Ok(());
    }

    let content = SiteConfig::starter_toml()?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
    log!("init"; "wrote {}", path.display());
    Ok(())
}

/// Demo posts: one public, one protected (password `secret`), one draft.
fn seed_sample(store: &SqliteStore) -> Result<()> {
    let (posts, _) = store.counts()?;
    if posts > 0 {
        log!("init"; "store already has posts, skipping sample data");
        return Ok(());
    }

    let now = date::now();
    let days_ago = |days: i64| now - TimeDelta::days(days);

    let posts = [
        (1, "Hello world", None, PostStatus::Publish),
        (2, "Members only", Some("secret"), PostStatus::Publish),
        (3, "Work in progress", None, PostStatus::Draft),
    ];
    for (id, title, password, status) in posts {
        store.insert_post(&Post {
            id,
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            password: password.map(str::to_string),
            status,
            published_at: days_ago(7),
        })?;
    }

    let comments = [
        (1, 1, "Alice", "First!", 6),
        (2, 1, "Bob", "Nice post.\n\nLooking forward to the next one.", 5),
        (3, 2, "Carol", "Thanks for sharing this with us.", 4),
        (4, 3, "Dave", "Typo in the second paragraph.", 3),
    ];
    for (id, post_id, author, content, age) in comments {
        store.insert_comment(&CommentRecord {
            id,
            post_id,
            author: author.to_string(),
            author_email: format!("{}@example.com", author.to_lowercase()),
            author_url: String::new(),
            created_at: days_ago(age),
            content: content.to_string(),
            approved: true,
        })?;
    }

    log!("init"; "seeded sample data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CommentStore, FeedScope};

    fn config_in(dir: &std::path::Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.root = dir.to_path_buf();
        config.config_path = dir.join("comments.toml");
        config.store.path = dir.join("data").join("comments.db");
        config
    }

    #[test]
    fn test_init_writes_config_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        init_project(&config, false, false).unwrap();

        let written = fs::read_to_string(&config.config_path).unwrap();
        assert!(written.contains("[site]"));
        let store = SqliteStore::open_read_only(&config.store.path).unwrap();
        assert_eq!(store.counts().unwrap(), (0, 0));
    }

    #[test]
    fn test_init_keeps_existing_config_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(&config.config_path, "# mine\n").unwrap();

        init_project(&config, false, false).unwrap();
        assert_eq!(fs::read_to_string(&config.config_path).unwrap(), "# mine\n");

        init_project(&config, true, false).unwrap();
        assert!(fs::read_to_string(&config.config_path).unwrap().contains("[site]"));
    }

    #[test]
    fn test_sample_seeds_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        init_project(&config, false, true).unwrap();
        init_project(&config, false, true).unwrap();

        let store = SqliteStore::open_read_only(&config.store.path).unwrap();
        assert_eq!(store.counts().unwrap(), (3, 4));

        let visible = store
            .eligible_comments(FeedScope::LatestAcrossSite, date::now(), 10)
            .unwrap();
        let ids: Vec<_> = visible.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
