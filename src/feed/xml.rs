//! Feed document serialization.
//!
//! `rss` always declares `utf-8`. The document prolog is written here instead
//! so the declaration carries the configured charset, followed by the
//! generator comment.

use super::{FeedError, channel::GENERATOR};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesText, Event},
};
use rss::Channel;

const INDENT: usize = 2;

/// Serialize `channel` into a complete XML document.
pub fn write_document(channel: &Channel, charset: &str, minify: bool) -> Result<String, FeedError> {
    let body = if minify {
        channel.write_to(Vec::new())?
    } else {
        channel.pretty_write_to(Vec::new(), b' ', INDENT)?
    };
    let body = String::from_utf8(body).map_err(FeedError::xml)?;

    let mut out = prolog(charset)?;
    if !minify {
        out.push('\n');
    }
    out.push_str(strip_declaration(&body).trim_start());
    Ok(out)
}

/// XML declaration and generator comment.
fn prolog(charset: &str) -> Result<String, FeedError> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some(charset), None)))
        .map_err(FeedError::xml)?;
    writer.get_mut().push(b'\n');
    writer
        .write_event(Event::Comment(BytesText::from_escaped(format!(
            " generator=\"{GENERATOR}\" "
        ))))
        .map_err(FeedError::xml)?;
    String::from_utf8(writer.into_inner()).map_err(FeedError::xml)
}

/// Drop a leading `<?xml ... ?>` declaration, if any.
fn strip_declaration(xml: &str) -> &str {
    let trimmed = xml.trim_start();
    if trimmed.starts_with("<?xml")
        && let Some(end) = trimmed.find("?>")
    {
        return &trimmed[end + 2..];
    }
    trimmed
}

/// Content-Type header value for a charset.
pub fn content_type(charset: &str) -> String {
    format!("text/xml; charset={charset}")
}
