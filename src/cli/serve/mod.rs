//! HTTP feed server.
//!
//! A `tiny_http` accept loop hands each request to a small rayon pool. Every
//! request opens its own read-only store connection, renders, and responds;
//! nothing is shared between requests besides the config.
//!
//! | Request                               | Response                  |
//! |---------------------------------------|---------------------------|
//! | `GET`/`HEAD {serve.path}`             | site-wide feed            |
//! | `GET`/`HEAD {serve.path}?p=<id>`      | single-post feed          |
//! | non-numeric `p`                       | 400                       |
//! | unknown or hidden post, other paths   | 404                       |
//! | other methods                         | 405                       |
//! | store failure                         | 500                       |
//! | after Ctrl+C                          | 503                       |

mod lifecycle;
mod request;
mod response;

pub use lifecycle::setup_shutdown_handler;

use crate::{
    config::SiteConfig,
    debug,
    feed::{CommentFeedRenderer, FeedError, FeedRequest, RenderedFeed},
    log,
    store::SqliteStore,
    utils::date,
};
use anyhow::{Context, Result};
use request::{FeedTarget, cookie};
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// Bind the server and run the request loop until shutdown.
pub fn serve_feeds(config: &SiteConfig) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));

    log!("serve"; "http://{}{}", addr, config.serve.path);
    log!("serve"; "store: {}", config.store.path.display());

    run_request_loop(&server, Arc::new(config.clone()))
}

/// Accept requests on the calling thread and hand each one to the pool.
///
/// Returns once the server is unblocked.
fn run_request_loop(server: &Server, config: Arc<SiteConfig>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.serve.workers)
        .thread_name(|i| format!("feed-worker-{i}"))
        .build()
        .context("Failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let config = Arc::clone(&config);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config) {
                log!("serve"; "request error: {e:#}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    if lifecycle::is_shutdown() {
        return response::respond_unavailable(request);
    }

    debug!("serve"; "{} {}", request.method(), request.url());

    let target = match FeedTarget::parse(request.url()) {
        Ok(target) => target,
        Err(e) => return response::respond_bad_request(request, &e.to_string()),
    };

    if !target.is_at(&config.serve.path) {
        return response::respond_not_found(request);
    }

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    let post = match target.post() {
        Ok(post) => post,
        Err(e) => return response::respond_bad_request(request, &e.to_string()),
    };

    let password = cookie(&request, &config.feed.password_cookie);
    let feed_request = FeedRequest::new(post, password, date::now());

    match render(&feed_request, config) {
        Ok(feed) => response::respond_feed(request, feed),
        Err(FeedError::PostNotFound(id)) => {
            debug!("serve"; "post {} not found", id);
            response::respond_not_found(request)
        }
        Err(e) => {
            log!("error"; "{:#}", anyhow::Error::from(e));
            response::respond_server_error(request)
        }
    }
}

fn render(request: &FeedRequest, config: &SiteConfig) -> Result<RenderedFeed, FeedError> {
    let store = SqliteStore::open_read_only(&config.store.path)?;
    CommentFeedRenderer::new(&store, config).render(request)
}
