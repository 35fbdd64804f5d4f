//! Tag model
//!
//! This module defines the Tag entity for the content core.
//!
//! Tags are free-form labels shared by reference (`Arc<Tag>`) between
//! content items. Names are normalized (trimmed, lower-cased) so that two
//! tags created from "Rust" and " rust " are the same tag for membership
//! purposes.

use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Tag entity with a live usage counter.
///
/// The usage counter is maintained by the content controller and reflects
/// the number of live content items currently holding this tag instance.
#[derive(Debug, Serialize)]
pub struct Tag {
    /// Unique identifier
    pub id: Uuid,
    /// Normalized tag name
    name: String,
    /// Number of live content items holding this tag
    usage_count: AtomicUsize,
}

impl Tag {
    /// Create a new tag, normalizing the name.
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: normalize_tag_name(name),
            usage_count: AtomicUsize::new(0),
        }
    }

    /// Normalized name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current number of live content items holding this tag
    pub fn usage_count(&self) -> usize {
        self.usage_count.load(Ordering::SeqCst)
    }

    pub(crate) fn increment_usage(&self) {
        self.usage_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the usage counter, never going below zero.
    pub(crate) fn decrement_usage(&self) {
        let _ = self
            .usage_count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.name)
    }
}

/// Normalize a tag name: trim surrounding whitespace and lower-case.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}
