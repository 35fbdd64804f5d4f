//! Content model
//!
//! This module provides:
//! - `Content` entity shared by every content kind
//! - `ContentKind` with the `Article`, `Video` and `Image` variants
//! - `ContentStatus` for the draft/published lifecycle
//! - `ContentType` / `ContentTypeFilter` discriminants used by filters and reports
//! - `PublishRejection` describing why a variant refused to publish
//!
//! Each variant carries its own admission rule for entering `PUBLISHED`
//! and its own text rendering.

use super::category::Category;
use super::tag::Tag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Minimum trimmed body length, in characters, for an article to publish
pub const ARTICLE_MIN_BODY_CHARS: usize = 50;

/// Words read per minute used for reading time estimates
const WORDS_PER_MINUTE: usize = 200;

/// Content publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentStatus {
    /// Draft - not published
    #[default]
    Draft,
    /// Published
    Published,
}

impl ContentStatus {
    /// Token form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "DRAFT",
            ContentStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Ok(ContentStatus::Draft),
            "PUBLISHED" => Ok(ContentStatus::Published),
            _ => Err(anyhow::anyhow!("Invalid content status: {}", s)),
        }
    }
}

/// Discriminant identifying a content variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Article,
    Video,
    Image,
}

impl ContentType {
    /// Discriminant token
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "Article",
            ContentType::Video => "Video",
            ContentType::Image => "Image",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "article" => Ok(ContentType::Article),
            "video" => Ok(ContentType::Video),
            "image" => Ok(ContentType::Image),
            _ => Err(anyhow::anyhow!("Invalid content type: {}", s)),
        }
    }
}

/// Type filter for content queries.
///
/// `All` is the "no type filter" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentTypeFilter {
    #[default]
    All,
    Only(ContentType),
}

impl ContentTypeFilter {
    /// Check whether a content type passes this filter
    pub fn matches(&self, content_type: ContentType) -> bool {
        match self {
            ContentTypeFilter::All => true,
            ContentTypeFilter::Only(t) => *t == content_type,
        }
    }
}

impl From<ContentType> for ContentTypeFilter {
    fn from(t: ContentType) -> Self {
        ContentTypeFilter::Only(t)
    }
}

impl From<Option<ContentType>> for ContentTypeFilter {
    fn from(t: Option<ContentType>) -> Self {
        t.map_or(ContentTypeFilter::All, ContentTypeFilter::Only)
    }
}

impl FromStr for ContentTypeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(ContentTypeFilter::All);
        }
        s.parse::<ContentType>().map(ContentTypeFilter::Only)
    }
}

/// Reason a variant refused to enter `PUBLISHED`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishRejection {
    #[error("article body has {length} characters, at least {minimum} required")]
    BodyTooShort { length: usize, minimum: usize },

    #[error("media URL is blank")]
    MissingUrl,

    #[error("video duration must be greater than zero")]
    NonPositiveDuration,

    #[error("image format is missing")]
    MissingFormat,
}

/// Article variant: body text with a derived word count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    body: String,
    word_count: usize,
}

impl Article {
    pub fn new(body: impl Into<String>) -> Self {
        let body = body.into();
        let word_count = count_words(&body);
        Self { body, word_count }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Replace the body, recomputing the word count
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.word_count = count_words(&self.body);
    }

    /// Estimated reading time in minutes (at least one)
    pub fn reading_time_minutes(&self) -> usize {
        (self.word_count / WORDS_PER_MINUTE).max(1)
    }

    fn check_admission(&self) -> Result<(), PublishRejection> {
        let length = self.body.trim().chars().count();
        if length < ARTICLE_MIN_BODY_CHARS {
            return Err(PublishRejection::BodyTooShort {
                length,
                minimum: ARTICLE_MIN_BODY_CHARS,
            });
        }
        Ok(())
    }
}

/// Video variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub url: String,
    pub duration_secs: i64,
    pub resolution: String,
}

impl Video {
    pub fn new(url: impl Into<String>, duration_secs: i64, resolution: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            duration_secs,
            resolution: resolution.into(),
        }
    }

    /// Duration as `H:MM:SS`, or `M:SS` under an hour
    pub fn formatted_duration(&self) -> String {
        let total = self.duration_secs.max(0);
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{}:{:02}", minutes, seconds)
        }
    }

    /// Thumbnail location derived from the video URL
    pub fn thumbnail_url(&self) -> String {
        self.url.replace(".mp4", "_thumbnail.jpg")
    }

    fn check_admission(&self) -> Result<(), PublishRejection> {
        if self.url.trim().is_empty() {
            return Err(PublishRejection::MissingUrl);
        }
        if self.duration_secs <= 0 {
            return Err(PublishRejection::NonPositiveDuration);
        }
        Ok(())
    }
}

/// Image variant.
///
/// The format label is always stored upper-cased.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub url: String,
    pub dimensions: String,
    format: String,
}

impl Image {
    pub fn new(url: impl Into<String>, dimensions: impl Into<String>, format: &str) -> Self {
        Self {
            url: url.into(),
            dimensions: dimensions.into(),
            format: format.to_uppercase(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn set_format(&mut self, format: &str) {
        self.format = format.to_uppercase();
    }

    /// Estimated file size from `WIDTHxHEIGHT` dimensions.
    ///
    /// Assumes 3 bytes per pixel at 50% compression; malformed dimensions
    /// yield 0.
    pub fn file_size_bytes(&self) -> u64 {
        let mut parts = self.dimensions.split('x');
        let (Some(width), Some(height)) = (parts.next(), parts.next()) else {
            return 0;
        };
        match (width.parse::<u64>(), height.parse::<u64>()) {
            (Ok(w), Ok(h)) => (w as f64 * h as f64 * 3.0 * 0.5) as u64,
            _ => 0,
        }
    }

    /// Estimated file size rendered as B, KB or MB
    pub fn formatted_file_size(&self) -> String {
        let bytes = self.file_size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.2} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    fn check_admission(&self) -> Result<(), PublishRejection> {
        if self.url.trim().is_empty() {
            return Err(PublishRejection::MissingUrl);
        }
        if self.format.trim().is_empty() {
            return Err(PublishRejection::MissingFormat);
        }
        Ok(())
    }
}

/// Variant-specific payload of a content item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ContentKind {
    Article(Article),
    Video(Video),
    Image(Image),
}

impl ContentKind {
    /// Discriminant of this variant
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentKind::Article(_) => ContentType::Article,
            ContentKind::Video(_) => ContentType::Video,
            ContentKind::Image(_) => ContentType::Image,
        }
    }

    /// Evaluate the variant admission rule for publishing
    pub fn check_admission(&self) -> Result<(), PublishRejection> {
        match self {
            ContentKind::Article(a) => a.check_admission(),
            ContentKind::Video(v) => v.check_admission(),
            ContentKind::Image(i) => i.check_admission(),
        }
    }
}

/// Content entity.
///
/// The category and tags are shared handles; their counters are maintained
/// by the content controller while the item is live in its collection.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    /// Unique identifier
    id: Uuid,
    /// Title
    title: String,
    /// Author name
    author: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last modification timestamp
    updated_at: DateTime<Utc>,
    /// Assigned category
    #[serde(serialize_with = "serialize_category")]
    category: Arc<Category>,
    /// Tags, in insertion order, without duplicates
    #[serde(serialize_with = "serialize_tags")]
    tags: Vec<Arc<Tag>>,
    /// Publication status
    status: ContentStatus,
    /// Publication timestamp, present iff published
    published_at: Option<DateTime<Utc>>,
    /// Variant payload
    #[serde(flatten)]
    kind: ContentKind,
}

impl Content {
    /// Create a new draft content item
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        category: Arc<Category>,
        kind: ContentKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
            created_at: now,
            updated_at: now,
            category,
            tags: Vec::new(),
            status: ContentStatus::Draft,
            published_at: None,
            kind,
        }
    }

    /// Create a draft article
    pub fn article(
        title: impl Into<String>,
        author: impl Into<String>,
        category: Arc<Category>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(title, author, category, ContentKind::Article(Article::new(body)))
    }

    /// Create a draft video
    pub fn video(
        title: impl Into<String>,
        author: impl Into<String>,
        category: Arc<Category>,
        url: impl Into<String>,
        duration_secs: i64,
        resolution: impl Into<String>,
    ) -> Self {
        Self::new(
            title,
            author,
            category,
            ContentKind::Video(Video::new(url, duration_secs, resolution)),
        )
    }

    /// Create a draft image
    pub fn image(
        title: impl Into<String>,
        author: impl Into<String>,
        category: Arc<Category>,
        url: impl Into<String>,
        dimensions: impl Into<String>,
        format: &str,
    ) -> Self {
        Self::new(
            title,
            author,
            category,
            ContentKind::Image(Image::new(url, dimensions, format)),
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn category(&self) -> &Arc<Category> {
        &self.category
    }

    pub fn tags(&self) -> &[Arc<Tag>] {
        &self.tags
    }

    pub fn status(&self) -> ContentStatus {
        self.status
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn kind(&self) -> &ContentKind {
        &self.kind
    }

    /// Discriminant of this item's variant
    pub fn content_type(&self) -> ContentType {
        self.kind.content_type()
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }

    /// Check whether this item holds the given tag (by normalized name)
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|t| **t == *tag)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
        self.touch();
    }

    /// Replace the category.
    ///
    /// Counters are not touched here; reassigning a live item goes through
    /// `ContentController::reassign_category`.
    pub fn set_category(&mut self, category: Arc<Category>) {
        self.category = category;
        self.touch();
    }

    /// Add a tag unless an equal one is already present.
    ///
    /// Returns whether the tag was added.
    pub fn add_tag(&mut self, tag: Arc<Tag>) -> bool {
        if self.has_tag(&tag) {
            return false;
        }
        self.tags.push(tag);
        self.touch();
        true
    }

    /// Remove the tag equal to `tag`, returning the handle that was held.
    pub fn remove_tag(&mut self, tag: &Tag) -> Option<Arc<Tag>> {
        let index = self.tags.iter().position(|t| **t == *tag)?;
        let removed = self.tags.remove(index);
        self.touch();
        Some(removed)
    }

    /// Mutate the variant payload, updating the modification timestamp
    pub fn update_kind<R>(&mut self, f: impl FnOnce(&mut ContentKind) -> R) -> R {
        let result = f(&mut self.kind);
        self.touch();
        result
    }

    /// Move from draft to published if the variant admission rule holds.
    ///
    /// On rejection the status and publish date are left unchanged. Calling
    /// this on an already published item is a no-op.
    pub fn publish(&mut self) -> Result<(), PublishRejection> {
        if self.is_published() {
            return Ok(());
        }
        self.kind.check_admission()?;
        self.status = ContentStatus::Published;
        self.published_at = Some(Utc::now());
        Ok(())
    }

    /// Move back to draft, clearing the publish date
    pub fn unpublish(&mut self) {
        self.status = ContentStatus::Draft;
        self.published_at = None;
    }

    /// Take over `other`'s status and publish date
    pub(crate) fn keep_lifecycle_of(&mut self, other: &Content) {
        self.status = other.status;
        self.published_at = other.published_at;
    }

    /// One-line metadata summary
    pub fn metadata(&self) -> String {
        let id = self.id.simple().to_string();
        format!(
            "ID: {} | Title: {} | Author: {} | Status: {} | Category: {}",
            &id[..8],
            self.title,
            self.author,
            self.status,
            self.category.name()
        )
    }

    /// Multi-line human-readable rendering including all variant fields
    pub fn display(&self) -> String {
        match &self.kind {
            ContentKind::Article(article) => format!(
                "=== ARTICLE ===\nTitle: {}\nAuthor: {}\nWords: {}\nCategory: {}\n\nBody:\n{}",
                self.title,
                self.author,
                article.word_count(),
                self.category.name(),
                article.body()
            ),
            ContentKind::Video(video) => format!(
                "=== VIDEO ===\nTitle: {}\nAuthor: {}\nDuration: {}\nResolution: {}\nCategory: {}\nURL: {}",
                self.title,
                self.author,
                video.formatted_duration(),
                video.resolution,
                self.category.name(),
                video.url
            ),
            ContentKind::Image(image) => format!(
                "=== IMAGE ===\nTitle: {}\nAuthor: {}\nDimensions: {}\nFormat: {}\nCategory: {}\nURL: {}",
                self.title,
                self.author,
                image.dimensions,
                image.format(),
                self.category.name(),
                image.url
            ),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    #[cfg(test)]
    pub(crate) fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {}", self.content_type(), self.title, self.status)
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn serialize_category<S: Serializer>(category: &Arc<Category>, s: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;
    let mut state = s.serialize_struct("Category", 2)?;
    state.serialize_field("id", &category.id)?;
    state.serialize_field("name", &category.name())?;
    state.end()
}

fn serialize_tags<S: Serializer>(tags: &[Arc<Tag>], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(tags.iter().map(|t| t.name()))
}
