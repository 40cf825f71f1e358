//! Configuration section definitions.
//!
//! Each module corresponds to a section in `comments.toml`:
//!
//! | Module  | TOML Section | Purpose                                    |
//! |---------|--------------|--------------------------------------------|
//! | `site`  | `[site]`     | Site title, url, description, charset      |
//! | `feed`  | `[feed]`     | Item limit, permalinks, password handling  |
//! | `store` | `[store]`    | Comment database location                  |
//! | `serve` | `[serve]`    | HTTP feed server                           |

mod feed;
mod serve;
mod site;
mod store;

pub use feed::FeedConfig;
pub use serve::ServeConfig;
pub use site::SiteInfoConfig;
pub use store::StoreConfig;
