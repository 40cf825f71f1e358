//! Configuration utility types.
//!
//! | Module   | Purpose                                      |
//! |----------|----------------------------------------------|
//! | `error`  | ConfigError and collected diagnostics        |

mod error;

pub use error::{ConfigDiagnostics, ConfigError};
