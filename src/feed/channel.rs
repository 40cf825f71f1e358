//! RSS channel and item construction.

use super::protect::{self, PROTECTED_DESCRIPTION};
use crate::{
    config::SiteConfig,
    store::{FeedComment, PostRef},
    utils::{date, html},
};
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use std::collections::BTreeMap;

/// Namespace for `content:encoded`.
pub const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

/// Generator identifier (`comment-feed/<version>`).
pub const GENERATOR: &str = concat!("comment-feed/", env!("CARGO_PKG_VERSION"));

/// Characters escaped when a slug is placed into a URL path.
const SLUG: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Absolute permalink of a post, from the `feed.permalink` template.
pub fn post_permalink(config: &SiteConfig, post: &PostRef) -> String {
    let path = config
        .feed
        .permalink
        .replace("{id}", &post.id.to_string())
        .replace("{slug}", &utf8_percent_encode(&post.slug, SLUG).to_string());
    absolute_url(config.site.base_url(), &path)
}

/// Permalink anchor of a single comment.
pub fn comment_permalink(config: &SiteConfig, comment: &FeedComment) -> String {
    format!("{}#comment-{}", post_permalink(config, &comment.post), comment.id)
}

/// Resolve `target` against the site base URL unless already absolute.
pub fn absolute_url(base_url: &str, target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        return target.to_string();
    }
    match target.strip_prefix('/') {
        Some(rest) => format!("{base_url}/{rest}"),
        None => format!("{base_url}/{target}"),
    }
}

/// Build one feed item.
///
/// `credential` is the password presented by the requester; it only matters
/// for comments on protected posts.
pub fn comment_item(config: &SiteConfig, comment: &FeedComment, credential: Option<&str>) -> Item {
    let link = comment_permalink(config, comment);

    let (description, content) = if protect::is_unlocked(&comment.post, credential) {
        (
            html::to_plain_text(&comment.content),
            html::to_paragraphs(&comment.content),
        )
    } else {
        let action = absolute_url(config.site.base_url(), &config.feed.password_action);
        (
            PROTECTED_DESCRIPTION.to_string(),
            protect::password_form(&action, comment.post.id),
        )
    };

    ItemBuilder::default()
        .title(Some(format!("by: {}", display_author(&comment.author))))
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .pub_date(Some(date::to_rfc2822(comment.created_at)))
        .author(author_field(config, comment))
        .description(Some(cdata_safe(&description)))
        .content(Some(cdata_safe(&content)))
        .build()
}

/// Assemble the channel envelope around `items`.
///
/// `post` selects the single-post title and link; `None` describes the
/// site-wide feed.
pub fn envelope(
    config: &SiteConfig,
    post: Option<&PostRef>,
    now: DateTime<Utc>,
    items: Vec<Item>,
) -> Channel {
    let site = &config.site;
    let (title, link) = match post {
        Some(post) => (
            format!("Comments on: {}", post.title),
            post_permalink(config, post),
        ),
        None => (format!("{} Comments", site.title), site.url.clone()),
    };

    let mut namespaces = BTreeMap::new();
    namespaces.insert("content".to_string(), CONTENT_NAMESPACE.to_string());

    ChannelBuilder::default()
        .title(title)
        .link(link)
        .description(site.description.clone())
        .language(site.language.clone())
        .pub_date(Some(date::to_rfc2822(now)))
        .generator(Some(GENERATOR.to_string()))
        .namespaces(namespaces)
        .items(items)
        .build()
}

fn display_author(author: &str) -> &str {
    let author = author.trim();
    if author.is_empty() { "Anonymous" } else { author }
}

/// RSS `<author>` value: `email (Name)`.
fn author_field(config: &SiteConfig, comment: &FeedComment) -> Option<String> {
    if !config.feed.include_author_email {
        return None;
    }
    let email = comment.author_email.trim();
    (!email.is_empty()).then(|| format!("{} ({})", email, display_author(&comment.author)))
}

/// `rss` writes bodies as CDATA, which cannot contain its own terminator.
///
/// A terminator in the text closes the section after `]]` and reopens it
/// before `>`, so readers join both halves back into the original text.
fn cdata_safe(content: &str) -> String {
    content.replace("]]>", "]]]]><![CDATA[>")
}
