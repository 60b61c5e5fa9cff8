//! Personal workout log: records sets under four rotating programs, keeps
//! them in a local CSV file mirrored to a GitHub gist, and derives the
//! calendar, history and progress views from the full record set.

pub mod calendar;
pub mod config;
pub mod entry;
pub mod error;
pub mod gist;
pub mod models;
pub mod queries;
pub mod routines;
pub mod store;

pub use config::{Config, RemoteConfig};
pub use error::{Error, RemoteError, Result, SyncWarning};
pub use models::{Program, WorkoutRecord};
pub use store::{DualStore, RecordStore, Synced};
