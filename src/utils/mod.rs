//! Shared helpers for dates and comment markup.

pub mod date;
pub mod html;
