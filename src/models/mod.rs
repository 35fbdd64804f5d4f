//! Data models
//!
//! This module contains the domain entities of the content core:
//! - Content items and their variants (Article, Video, Image)
//! - Categories (hierarchical, with content counters)
//! - Tags (with usage counters)
//! - Users and the permission vocabulary
//! - Reports

mod category;
mod content;
mod report;
mod tag;
mod user;

pub use category::{Category, CategoryTree};
pub use content::{
    Article, Content, ContentKind, ContentStatus, ContentType, ContentTypeFilter, Image,
    PublishRejection, Video, ARTICLE_MIN_BODY_CHARS,
};
pub use report::{ExportFormat, Report, ReportEntry, ReportValue, CSV_HEADER};
pub use tag::{normalize_tag_name, Tag};
pub use user::{Permission, User, UserRole};
