//! HTTP response handlers.

use crate::feed::RenderedFeed;
use anyhow::{Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

const PLAIN: &str = "text/plain; charset=utf-8";

/// Respond with a rendered feed (headers only for HEAD).
pub fn respond_feed(request: Request, feed: RenderedFeed) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, &feed.content_type);
    }
    send_body(request, 200, &feed.content_type, feed.body.into_bytes())
}

/// Respond with 400 Bad Request.
pub fn respond_bad_request(request: Request, reason: &str) -> Result<()> {
    send_plain(request, 400, format!("400 Bad Request: {reason}"))
}

/// Respond with 404 Not Found.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_plain(request, 404, "404 Not Found".to_string())
}

/// Respond with 405 Method Not Allowed.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_string("405 Method Not Allowed")
        .with_status_code(StatusCode(405))
        .with_header(make_header("Content-Type", PLAIN)?)
        .with_header(make_header("Allow", "GET, HEAD")?);
    request.respond(response)?;
    Ok(())
}

/// Respond with 500 Internal Server Error.
pub fn respond_server_error(request: Request) -> Result<()> {
    send_plain(request, 500, "500 Internal Server Error".to_string())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_plain(request, 503, "503 Service Unavailable".to_string())
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_plain(request: Request, status: u16, body: String) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, status, PLAIN);
    }
    send_body(request, status, PLAIN, body.into_bytes())
}

fn send_head(request: Request, status: u16, content_type: &str) -> Result<()> {
    let response =
        Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|_| anyhow!("invalid header `{key}: {value}`"))
}
