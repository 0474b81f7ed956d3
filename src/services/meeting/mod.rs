//! Meeting service entry point.
//! Synchronous SQLite operations live in `crud`/`queries`; `store` exposes the
//! async port the reschedule committer writes through.

use rusqlite::Connection;

pub mod crud;
pub mod queries;
mod shared;
pub mod store;

pub use store::{IntervalUpdate, MeetingStore, SqliteMeetingStore};

/// Service for managing meetings stored in SQLite.
pub struct MeetingService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> MeetingService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}
