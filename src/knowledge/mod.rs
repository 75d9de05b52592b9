//! Knowledge items and their review schedule
//!
//! This module provides:
//! - The fixed forgetting-curve interval table and review date calculation
//! - The `KnowledgeItem` record
//! - SQLite-backed storage with create, list, due-today, review and delete

pub mod models;
pub mod scheduler;
pub mod storage;

pub use models::*;
pub use storage::{KnowledgeError, KnowledgeStore};
