//! Controllers - business logic
//!
//! This module contains the controllers that operate on the domain model:
//! - `ContentController` owns the content collection and gates mutations by
//!   the bound actor's permissions
//! - `ReportController` aggregates over the content collection
//! - `UserDirectory` registers users and supplies the logged-in actor

pub mod content;
pub mod report;
pub mod user;

pub use content::{ContentController, ContentControllerError};
pub use report::{AuthorCount, CategoryCount, ContentStatistics, ReportController};
pub use user::{UserDirectory, UserDirectoryError};
