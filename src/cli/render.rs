//! `render` command: write one feed document to stdout or a file.

use super::RenderArgs;
use crate::{
    config::SiteConfig,
    feed::{CommentFeedRenderer, FeedRequest},
    log,
    logger::print_line,
    store::SqliteStore,
    utils::date,
};
use anyhow::{Context, Result};
use std::fs;

pub fn render_feed(args: &RenderArgs, config: &SiteConfig) -> Result<()> {
    let now = match &args.at {
        Some(at) => date::parse(at)?,
        None => date::now(),
    };

    let store = SqliteStore::open_read_only(&config.store.path)?;
    let request = FeedRequest::new(args.post, args.password.clone(), now);
    let feed = CommentFeedRenderer::new(&store, config)
        .render(&request)
        .with_context(|| match args.post {
            Some(id) => format!("Failed to render comment feed for post {id}"),
            None => "Failed to render site-wide comment feed".to_string(),
        })?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &feed.body)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            log!("feed"; "{} ({} items)", path.display(), feed.items);
        }
        None => print_line(&feed.body),
    }
    Ok(())
}
