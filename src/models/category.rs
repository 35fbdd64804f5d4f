//! Category model
//!
//! This module defines the Category entity and its tree snapshot.
//!
//! Categories are shared by reference (`Arc<Category>`). A parent owns its
//! children; the child keeps only a `Weak` link back to its parent so the
//! hierarchy never forms an ownership cycle.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use uuid::Uuid;

/// Category entity representing a node in the category hierarchy.
///
/// Equality is by identity: two categories with the same name are distinct.
#[derive(Debug)]
pub struct Category {
    /// Unique identifier
    pub id: Uuid,
    /// Category name
    name: RwLock<String>,
    /// Category description
    description: RwLock<Option<String>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Non-owning link to the parent category
    parent: RwLock<Weak<Category>>,
    /// Owned child categories, in insertion order
    children: RwLock<Vec<Arc<Category>>>,
    /// Number of live content items assigned to this category
    content_count: AtomicUsize,
}

impl Category {
    /// Create a new root category.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: RwLock::new(name.into()),
            description: RwLock::new(description),
            created_at: Utc::now(),
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
            content_count: AtomicUsize::new(0),
        }
    }

    /// Create a new root category already wrapped for sharing.
    pub fn shared(name: impl Into<String>, description: Option<String>) -> Arc<Self> {
        Arc::new(Self::new(name, description))
    }

    pub fn name(&self) -> String {
        read(&self.name).clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *write(&self.name) = name.into();
    }

    pub fn description(&self) -> Option<String> {
        read(&self.description).clone()
    }

    pub fn set_description(&self, description: Option<String>) {
        *write(&self.description) = description;
    }

    /// Check if this is a root category (no live parent)
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Parent category, if it is still alive
    pub fn parent(&self) -> Option<Arc<Category>> {
        read(&self.parent).upgrade()
    }

    /// Snapshot of the direct child categories
    pub fn subcategories(&self) -> Vec<Arc<Category>> {
        read(&self.children).clone()
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    ///
    /// Returns false when the child is already attached to `parent`, is the
    /// parent itself, or is one of the parent's ancestors.
    pub fn add_subcategory(parent: &Arc<Category>, child: Arc<Category>) -> bool {
        if parent.id == child.id || parent.has_ancestor(child.id) {
            return false;
        }

        if let Some(previous) = child.parent() {
            if previous.id == parent.id {
                return false;
            }
            // A category has exactly one owner.
            write(&previous.children).retain(|c| c.id != child.id);
        }

        let mut children = write(&parent.children);
        if children.iter().any(|c| c.id == child.id) {
            return false;
        }

        *write(&child.parent) = Arc::downgrade(parent);
        children.push(child);
        true
    }

    fn has_ancestor(&self, id: Uuid) -> bool {
        let mut current = self.parent();
        while let Some(category) = current {
            if category.id == id {
                return true;
            }
            current = category.parent();
        }
        false
    }

    /// Number of live content items assigned to this category
    pub fn content_count(&self) -> usize {
        self.content_count.load(Ordering::SeqCst)
    }

    pub(crate) fn increment_content_count(&self) {
        self.content_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the content counter, never going below zero.
    pub(crate) fn decrement_content_count(&self) {
        let _ = self
            .content_count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// Build a serializable tree snapshot rooted at this category.
    pub fn tree(&self) -> CategoryTree {
        CategoryTree {
            id: self.id,
            name: self.name(),
            description: self.description(),
            content_count: self.content_count(),
            children: read(&self.children).iter().map(|c| c.tree()).collect(),
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

impl std::hash::Hash for Category {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&read(&self.name))
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// Point-in-time snapshot of a category and its descendants
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryTree {
    /// Category ID
    pub id: Uuid,
    /// Category name
    pub name: String,
    /// Category description
    pub description: Option<String>,
    /// Content counter at snapshot time
    pub content_count: usize,
    /// Child categories
    pub children: Vec<CategoryTree>,
}

impl CategoryTree {
    /// Get the total count of this category and all descendants
    pub fn total_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.total_count()).sum::<usize>()
    }

    /// Flatten the tree into a list of category IDs (depth-first)
    pub fn flatten_ids(&self) -> Vec<Uuid> {
        let mut result = vec![self.id];
        for child in &self.children {
            result.extend(child.flatten_ids());
        }
        result
    }

    /// Get all descendant IDs (not including self)
    pub fn descendant_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for child in &self.children {
            ids.push(child.id);
            ids.extend(child.descendant_ids());
        }
        ids
    }

    /// Sum of content counters over this category and all descendants
    pub fn total_content_count(&self) -> usize {
        self.content_count
            + self
                .children
                .iter()
                .map(|c| c.total_content_count())
                .sum::<usize>()
    }
}
