//! Server-rendered pages
//!
//! - `handlers::pages`: askama page handlers and view models
//! - `i18n`: zh-TW / en interface strings and the culture cookie

pub mod handlers;
pub mod i18n;
