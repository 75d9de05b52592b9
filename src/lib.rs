//! Personal spaced-repetition tracker for short knowledge items.

pub mod config;
pub mod knowledge;
pub mod server;
