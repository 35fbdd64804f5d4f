//! Report controller
//!
//! Read-only aggregation over the content controller's current collection:
//! - Content overview reports, recorded in a report history
//! - Live statistics, per-category and per-author counts
//! - Most recent content
//! - CSV / plain summary export of recorded reports
//!
//! Never mutates content, categories or tags.

use super::content::ContentController;
use crate::models::{Category, Content, ContentType, ExportFormat, Report};
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Report type label of overview reports
pub const CONTENT_REPORT_TYPE: &str = "Content overview";

/// Statistics labels, in report order
pub const STAT_TOTAL: &str = "total";
pub const STAT_PUBLISHED: &str = "published";
pub const STAT_DRAFTS: &str = "drafts";
pub const STAT_ARTICLES: &str = "articles";
pub const STAT_VIDEOS: &str = "videos";
pub const STAT_IMAGES: &str = "images";

/// Aggregate figures over the content collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContentStatistics {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
    pub articles: usize,
    pub videos: usize,
    pub images: usize,
}

impl ContentStatistics {
    /// Compute statistics from a content snapshot
    pub fn from_contents(contents: &[Content]) -> Self {
        let count_type = |t: ContentType| contents.iter().filter(|c| c.content_type() == t).count();
        let total = contents.len();
        let published = contents.iter().filter(|c| c.is_published()).count();

        Self {
            total,
            published,
            drafts: total - published,
            articles: count_type(ContentType::Article),
            videos: count_type(ContentType::Video),
            images: count_type(ContentType::Image),
        }
    }

    /// Label/value pairs in report order
    pub fn as_pairs(&self) -> Vec<(&'static str, usize)> {
        vec![
            (STAT_TOTAL, self.total),
            (STAT_PUBLISHED, self.published),
            (STAT_DRAFTS, self.drafts),
            (STAT_ARTICLES, self.articles),
            (STAT_VIDEOS, self.videos),
            (STAT_IMAGES, self.images),
        ]
    }
}

/// Number of items assigned to a category
#[derive(Debug, Clone)]
pub struct CategoryCount {
    pub category: Arc<Category>,
    pub count: usize,
}

/// Number of items written by an author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: usize,
}

/// Report controller
pub struct ReportController {
    contents: Arc<ContentController>,
    reports: RwLock<Vec<Report>>,
}

impl ReportController {
    /// Create a report controller reading from `contents`
    pub fn new(contents: Arc<ContentController>) -> Self {
        Self {
            contents,
            reports: RwLock::new(Vec::new()),
        }
    }

    fn reports(&self) -> RwLockReadGuard<'_, Vec<Report>> {
        self.reports.read().unwrap_or_else(|e| e.into_inner())
    }

    fn reports_mut(&self) -> RwLockWriteGuard<'_, Vec<Report>> {
        self.reports.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Build and record an overview report of the current collection
    pub fn generate_content_report(&self) -> Report {
        let stats = self.get_statistics();
        let mut report = Report::new(CONTENT_REPORT_TYPE);
        for (key, value) in stats.as_pairs() {
            report.add_data(key, value);
        }

        tracing::debug!(report_id = %report.id, total = stats.total, "Content report generated");
        self.reports_mut().push(report.clone());
        report
    }

    /// Current statistics, independent of the report history
    pub fn get_statistics(&self) -> ContentStatistics {
        ContentStatistics::from_contents(&self.contents.get_all_content())
    }

    /// Item counts per category identity, in order of first appearance.
    ///
    /// Categories without items are absent.
    pub fn get_contents_by_category(&self) -> Vec<CategoryCount> {
        let mut counts: Vec<CategoryCount> = Vec::new();
        for content in self.contents.get_all_content() {
            match counts.iter_mut().find(|c| c.category.id == content.category().id) {
                Some(entry) => entry.count += 1,
                None => counts.push(CategoryCount {
                    category: content.category().clone(),
                    count: 1,
                }),
            }
        }
        counts
    }

    /// Item counts per exact author string, in order of first appearance
    pub fn get_contents_by_author(&self) -> Vec<AuthorCount> {
        let mut counts: Vec<AuthorCount> = Vec::new();
        for content in self.contents.get_all_content() {
            match counts.iter_mut().find(|c| c.author == content.author()) {
                Some(entry) => entry.count += 1,
                None => counts.push(AuthorCount {
                    author: content.author().to_string(),
                    count: 1,
                }),
            }
        }
        counts
    }

    /// Up to `limit` items, newest first; ties keep collection order
    pub fn get_most_recent_content(&self, limit: usize) -> Vec<Content> {
        if limit == 0 {
            return Vec::new();
        }
        let mut contents = self.contents.get_all_content();
        contents.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        contents.truncate(limit);
        contents
    }

    /// Render a recorded report.
    ///
    /// Returns an empty string when no report has the given ID.
    pub fn export_report(&self, report_id: Uuid, format: ExportFormat) -> String {
        let reports = self.reports();
        let Some(report) = reports.iter().find(|r| r.id == report_id) else {
            tracing::debug!(%report_id, "Report not found for export");
            return String::new();
        };

        match format {
            ExportFormat::Csv => report.export_to_csv(),
            ExportFormat::Summary => report.generate_summary(),
        }
    }

    /// Snapshot of the report history
    pub fn get_all_reports(&self) -> Vec<Report> {
        self.reports().clone()
    }
}
