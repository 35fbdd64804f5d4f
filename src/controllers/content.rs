//! Content controller
//!
//! Sole gateway for content mutation and querying:
//! - Create, edit, delete content (permission gated)
//! - Publish / unpublish lifecycle transitions (permission gated)
//! - Category reassignment and tag changes on live items (permission gated)
//! - Keyword search and category / type / tag / status filters (unrestricted)
//!
//! The collection, the bound actor and every category/tag counter change
//! happen under one write lock, so a reader never sees an item removed from
//! the collection but still counted, or the reverse.

use crate::models::{
    Category, Content, ContentStatus, ContentTypeFilter, Permission, PublishRejection, Tag, User,
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Error types for content controller operations
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ContentControllerError {
    /// The bound actor lacks the permission (or no actor is bound)
    #[error("Permission denied: {0} required")]
    PermissionDenied(Permission),

    /// Content not found
    #[error("Content not found: {0}")]
    NotFound(Uuid),

    /// Content with the same ID is already in the collection
    #[error("Content already exists: {0}")]
    Duplicate(Uuid),

    /// Lifecycle transition not allowed from the current status
    #[error("Content {id} is already {status}")]
    InvalidTransition { id: Uuid, status: ContentStatus },

    /// Variant admission rule refused publication
    #[error("Content {id} cannot be published: {reason}")]
    PublishRejected { id: Uuid, reason: PublishRejection },
}

#[derive(Default)]
struct ControllerState {
    contents: Vec<Content>,
    actor: Option<User>,
}

impl ControllerState {
    fn authorize(&self, permission: Permission) -> Result<(), ContentControllerError> {
        match &self.actor {
            Some(actor) if actor.has_permission(permission) => Ok(()),
            actor => {
                tracing::warn!(
                    actor = actor.as_ref().map(|a| a.username.as_str()).unwrap_or("<none>"),
                    %permission,
                    "Permission denied"
                );
                Err(ContentControllerError::PermissionDenied(permission))
            }
        }
    }

    fn position(&self, id: Uuid) -> Result<usize, ContentControllerError> {
        self.contents
            .iter()
            .position(|c| c.id() == id)
            .ok_or(ContentControllerError::NotFound(id))
    }
}

/// Count a content item's category and tags as live
fn attach_counters(content: &Content) {
    content.category().increment_content_count();
    for tag in content.tags() {
        tag.increment_usage();
    }
}

/// Release a content item's category and tags
fn detach_counters(content: &Content) {
    content.category().decrement_content_count();
    for tag in content.tags() {
        tag.decrement_usage();
    }
}

/// Move counters from `old`'s assignment to `new`'s, touching only handles
/// that actually differ.
fn transfer_counters(old: &Content, new: &Content) {
    if !Arc::ptr_eq(old.category(), new.category()) {
        new.category().increment_content_count();
        old.category().decrement_content_count();
    }
    for tag in new.tags() {
        if !old.tags().iter().any(|t| Arc::ptr_eq(t, tag)) {
            tag.increment_usage();
        }
    }
    for tag in old.tags() {
        if !new.tags().iter().any(|t| Arc::ptr_eq(t, tag)) {
            tag.decrement_usage();
        }
    }
}

/// Content controller owning the authoritative content collection
#[derive(Default)]
pub struct ContentController {
    state: RwLock<ControllerState>,
}

impl ContentController {
    /// Create an empty controller with no bound actor
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty controller bound to `actor`
    pub fn with_actor(actor: User) -> Self {
        Self {
            state: RwLock::new(ControllerState {
                contents: Vec::new(),
                actor: Some(actor),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ControllerState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ControllerState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    // ========================================================================
    // Actor binding
    // ========================================================================

    /// Replace the bound actor
    pub fn set_current_actor(&self, actor: User) {
        tracing::debug!(actor = %actor, "Actor bound");
        self.write().actor = Some(actor);
    }

    /// Unbind the current actor
    pub fn clear_current_actor(&self) {
        self.write().actor = None;
    }

    /// Currently bound actor
    pub fn current_actor(&self) -> Option<User> {
        self.read().actor.clone()
    }

    /// Check whether the bound actor holds `permission`
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.read()
            .actor
            .as_ref()
            .is_some_and(|a| a.has_permission(permission))
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Add a content item to the collection.
    ///
    /// Requires `CREATE`, plus `PUBLISH` when the item arrives already
    /// published. The item's category and tags start counting it.
    pub fn create(&self, content: Content) -> Result<Uuid, ContentControllerError> {
        let mut state = self.write();
        state.authorize(Permission::Create)?;
        if content.is_published() {
            state.authorize(Permission::Publish)?;
        }

        let id = content.id();
        if state.contents.iter().any(|c| c.id() == id) {
            return Err(ContentControllerError::Duplicate(id));
        }

        attach_counters(&content);
        tracing::info!(content_id = %id, content_type = %content.content_type(), "Content created");
        state.contents.push(content);
        Ok(id)
    }

    /// Replace the item with the same ID, keeping its position.
    ///
    /// Requires `EDIT`. Counters move from the old assignment to the new one.
    /// Status and publish date stay as stored; only `publish_content` and
    /// `unpublish_content` change them.
    pub fn edit(&self, mut content: Content) -> Result<(), ContentControllerError> {
        let mut state = self.write();
        state.authorize(Permission::Edit)?;

        let index = state.position(content.id())?;
        content.keep_lifecycle_of(&state.contents[index]);
        transfer_counters(&state.contents[index], &content);
        tracing::info!(content_id = %content.id(), "Content edited");
        state.contents[index] = content;
        Ok(())
    }

    /// Remove an item, releasing its category and tag counters.
    ///
    /// Requires `DELETE`. Returns the removed item.
    pub fn delete(&self, id: Uuid) -> Result<Content, ContentControllerError> {
        let mut state = self.write();
        state.authorize(Permission::Delete)?;

        let index = state.position(id)?;
        let removed = state.contents.remove(index);
        detach_counters(&removed);
        tracing::info!(content_id = %id, "Content deleted");
        Ok(removed)
    }

    /// Look up an item by ID
    pub fn get_by_id(&self, id: Uuid) -> Option<Content> {
        self.read().contents.iter().find(|c| c.id() == id).cloned()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Publish a draft item through its variant admission rule.
    ///
    /// Requires `PUBLISH`. A rejected item stays in `DRAFT`.
    pub fn publish_content(&self, id: Uuid) -> Result<(), ContentControllerError> {
        let mut state = self.write();
        state.authorize(Permission::Publish)?;

        let index = state.position(id)?;
        let content = &mut state.contents[index];
        if content.is_published() {
            return Err(ContentControllerError::InvalidTransition {
                id,
                status: content.status(),
            });
        }

        content.publish().map_err(|reason| {
            tracing::warn!(content_id = %id, %reason, "Publish rejected");
            ContentControllerError::PublishRejected { id, reason }
        })?;
        tracing::info!(content_id = %id, "Content published");
        Ok(())
    }

    /// Move a published item back to draft.
    ///
    /// Requires `PUBLISH`.
    pub fn unpublish_content(&self, id: Uuid) -> Result<(), ContentControllerError> {
        let mut state = self.write();
        state.authorize(Permission::Publish)?;

        let index = state.position(id)?;
        let content = &mut state.contents[index];
        if !content.is_published() {
            return Err(ContentControllerError::InvalidTransition {
                id,
                status: content.status(),
            });
        }

        content.unpublish();
        tracing::info!(content_id = %id, "Content unpublished");
        Ok(())
    }

    // ========================================================================
    // Category and tag assignment on live items
    // ========================================================================

    /// Move a live item to another category.
    ///
    /// Requires `EDIT`.
    pub fn reassign_category(
        &self,
        id: Uuid,
        category: Arc<Category>,
    ) -> Result<(), ContentControllerError> {
        let mut state = self.write();
        state.authorize(Permission::Edit)?;

        let index = state.position(id)?;
        let content = &mut state.contents[index];
        if !Arc::ptr_eq(content.category(), &category) {
            category.increment_content_count();
            content.category().decrement_content_count();
            content.set_category(category);
        }
        Ok(())
    }

    /// Add a tag to a live item.
    ///
    /// Requires `EDIT`. Returns false when an equal tag was already present.
    pub fn add_tag(&self, id: Uuid, tag: Arc<Tag>) -> Result<bool, ContentControllerError> {
        let mut state = self.write();
        state.authorize(Permission::Edit)?;

        let index = state.position(id)?;
        let added = state.contents[index].add_tag(tag.clone());
        if added {
            tag.increment_usage();
        }
        Ok(added)
    }

    /// Remove a tag from a live item.
    ///
    /// Requires `EDIT`. Returns false when the item did not hold the tag.
    pub fn remove_tag(&self, id: Uuid, tag: &Tag) -> Result<bool, ContentControllerError> {
        let mut state = self.write();
        state.authorize(Permission::Edit)?;

        let index = state.position(id)?;
        match state.contents[index].remove_tag(tag) {
            Some(held) => {
                held.decrement_usage();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    fn select(&self, pred: impl Fn(&Content) -> bool) -> Vec<Content> {
        self.read()
            .contents
            .iter()
            .filter(|c| pred(*c))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring match on title or author.
    ///
    /// A missing or blank keyword returns the whole collection.
    pub fn search_by_keyword(&self, keyword: Option<&str>) -> Vec<Content> {
        let needle = match keyword {
            Some(k) if !k.trim().is_empty() => k.to_lowercase(),
            _ => return self.get_all_content(),
        };
        tracing::debug!(keyword = %needle, "Searching content");
        self.select(|c| {
            c.title().to_lowercase().contains(&needle) || c.author().to_lowercase().contains(&needle)
        })
    }

    /// Items assigned to `category` (by identity); `None` returns all
    pub fn filter_by_category(&self, category: Option<&Category>) -> Vec<Content> {
        match category {
            Some(category) => self.select(|c| **c.category() == *category),
            None => self.get_all_content(),
        }
    }

    /// Items of the given variant; `ContentTypeFilter::All` returns all
    pub fn filter_by_type(&self, filter: ContentTypeFilter) -> Vec<Content> {
        self.select(|c| filter.matches(c.content_type()))
    }

    /// Items holding `tag` (by normalized name); `None` returns all
    pub fn filter_by_tag(&self, tag: Option<&Tag>) -> Vec<Content> {
        match tag {
            Some(tag) => self.select(|c| c.has_tag(tag)),
            None => self.get_all_content(),
        }
    }

    /// Snapshot of the whole collection, in insertion order
    pub fn get_all_content(&self) -> Vec<Content> {
        self.read().contents.clone()
    }

    /// Published items
    pub fn get_published_content(&self) -> Vec<Content> {
        self.select(Content::is_published)
    }

    /// Items with the given status
    pub fn get_content_by_status(&self, status: ContentStatus) -> Vec<Content> {
        self.select(|c| c.status() == status)
    }

    /// Number of items in the collection
    pub fn len(&self) -> usize {
        self.read().contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().contents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;

    fn admin() -> User {
        User::administrator("admin", "admin123", "admin@example.com")
    }

    fn editor() -> User {
        User::editor("editor", "editor123", "editor@example.com")
    }

    fn setup() -> (ContentController, Arc<Category>) {
        (ContentController::with_actor(admin()), Category::shared("News", None))
    }

    fn ids(contents: &[Content]) -> Vec<Uuid> {
        contents.iter().map(Content::id).collect()
    }

    // ========================================================================
    // Permission tests
    // ========================================================================

    #[test]
    fn test_create_without_actor_is_denied() {
        let controller = ContentController::new();
        let category = Category::shared("News", None);

        let result = controller.create(Content::article("T", "A", category.clone(), "b"));
        assert_eq!(
            result,
            Err(ContentControllerError::PermissionDenied(Permission::Create))
        );
        assert!(controller.is_empty());
        assert_eq!(category.content_count(), 0);
    }

    #[test]
    fn test_editor_can_create_and_edit() {
        let controller = ContentController::with_actor(editor());
        let category = Category::shared("News", None);
        let mut content = Content::article("Draft", "Ana", category, "body");
        let id = controller.create(content.clone()).unwrap();

        content.set_title("Renamed");
        controller.edit(content).unwrap();
        assert_eq!(controller.get_by_id(id).unwrap().title(), "Renamed");
    }

    #[test]
    fn test_delete_without_permission_keeps_item() {
        let (controller, category) = setup();
        let id = controller
            .create(Content::article("T", "A", category.clone(), "b"))
            .unwrap();

        controller.set_current_actor(editor());
        let result = controller.delete(id);

        assert_eq!(
            result.unwrap_err(),
            ContentControllerError::PermissionDenied(Permission::Delete)
        );
        assert!(controller.get_by_id(id).is_some());
        assert_eq!(category.content_count(), 1);
    }

    #[test]
    fn test_editor_cannot_publish() {
        let (controller, category) = setup();
        let id = controller
            .create(Content::article("T", "A", category, "x".repeat(60)))
            .unwrap();

        controller.set_current_actor(editor());
        assert!(controller.publish_content(id).is_err());
        assert!(!controller.get_by_id(id).unwrap().is_published());
    }

    #[test]
    fn test_editor_cannot_publish_through_edit() {
        let (controller, category) = setup();
        let id = controller
            .create(Content::article("T", "A", category, "x".repeat(60)))
            .unwrap();

        controller.set_current_actor(editor());
        let mut copy = controller.get_by_id(id).unwrap();
        copy.publish().unwrap();
        copy.set_title("Edited");
        controller.edit(copy).unwrap();

        let stored = controller.get_by_id(id).unwrap();
        assert_eq!(stored.title(), "Edited");
        assert_eq!(stored.status(), ContentStatus::Draft);
        assert!(stored.published_at().is_none());
    }

    #[test]
    fn test_edit_does_not_unpublish() {
        let (controller, category) = setup();
        let id = controller
            .create(Content::article("T", "A", category, "x".repeat(60)))
            .unwrap();
        controller.publish_content(id).unwrap();
        let published_at = controller.get_by_id(id).unwrap().published_at();

        let mut copy = controller.get_by_id(id).unwrap();
        copy.unpublish();
        controller.edit(copy).unwrap();

        let stored = controller.get_by_id(id).unwrap();
        assert!(stored.is_published());
        assert_eq!(stored.published_at(), published_at);
    }

    #[test]
    fn test_editor_cannot_create_published_content() {
        let controller = ContentController::with_actor(editor());
        let category = Category::shared("News", None);
        let mut content = Content::article("T", "A", category.clone(), "x".repeat(60));
        content.publish().unwrap();

        assert_eq!(
            controller.create(content.clone()),
            Err(ContentControllerError::PermissionDenied(Permission::Publish))
        );
        assert!(controller.is_empty());
        assert_eq!(category.content_count(), 0);

        controller.set_current_actor(admin());
        controller.create(content).unwrap();
        assert_eq!(controller.get_published_content().len(), 1);
    }

    #[test]
    fn test_has_permission_follows_actor() {
        let controller = ContentController::new();
        assert!(!controller.has_permission(Permission::Create));

        controller.set_current_actor(editor());
        assert!(controller.has_permission(Permission::Edit));
        assert!(!controller.has_permission(Permission::Delete));

        controller.set_current_actor(admin());
        assert!(controller.has_permission(Permission::Delete));
        assert_eq!(controller.current_actor().unwrap().username, "admin");

        controller.clear_current_actor();
        assert!(controller.current_actor().is_none());
    }

    // ========================================================================
    // CRUD tests
    // ========================================================================

    #[test]
    fn test_create_rejects_duplicate_id() {
        let (controller, category) = setup();
        let content = Content::article("T", "A", category.clone(), "b");

        controller.create(content.clone()).unwrap();
        assert_eq!(
            controller.create(content.clone()),
            Err(ContentControllerError::Duplicate(content.id()))
        );
        assert_eq!(controller.len(), 1);
        assert_eq!(category.content_count(), 1);
    }

    #[test]
    fn test_edit_keeps_position() {
        let (controller, category) = setup();
        let first = Content::article("First", "A", category.clone(), "b");
        let mut second = Content::article("Second", "A", category.clone(), "b");
        let third = Content::article("Third", "A", category, "b");
        for c in [&first, &second, &third] {
            controller.create(c.clone()).unwrap();
        }

        second.set_title("Second (edited)");
        controller.edit(second.clone()).unwrap();

        let all = controller.get_all_content();
        assert_eq!(ids(&all), vec![first.id(), second.id(), third.id()]);
        assert_eq!(all[1].title(), "Second (edited)");
    }

    #[test]
    fn test_edit_unknown_id_is_not_found() {
        let (controller, category) = setup();
        let content = Content::article("T", "A", category, "b");

        assert_eq!(
            controller.edit(content.clone()),
            Err(ContentControllerError::NotFound(content.id()))
        );
        assert!(controller.is_empty());
    }

    #[test]
    fn test_edit_moves_counters() {
        let (controller, old_category) = setup();
        let new_category = Category::shared("Sports", None);
        let kept = Arc::new(Tag::new("kept"));
        let dropped = Arc::new(Tag::new("dropped"));
        let added = Arc::new(Tag::new("added"));

        let mut content = Content::article("T", "A", old_category.clone(), "b");
        content.add_tag(kept.clone());
        content.add_tag(dropped.clone());
        controller.create(content.clone()).unwrap();

        content.set_category(new_category.clone());
        content.remove_tag(&dropped);
        content.add_tag(added.clone());
        controller.edit(content).unwrap();

        assert_eq!(old_category.content_count(), 0);
        assert_eq!(new_category.content_count(), 1);
        assert_eq!(kept.usage_count(), 1);
        assert_eq!(dropped.usage_count(), 0);
        assert_eq!(added.usage_count(), 1);
    }

    #[test]
    fn test_delete_releases_counters() {
        let (controller, category) = setup();
        let tag = Arc::new(Tag::new("breaking"));
        let mut content = Content::article("T", "A", category.clone(), "b");
        content.add_tag(tag.clone());
        let id = controller.create(content).unwrap();

        assert_eq!(category.content_count(), 1);
        assert_eq!(tag.usage_count(), 1);

        let removed = controller.delete(id).unwrap();
        assert_eq!(removed.id(), id);
        assert_eq!(category.content_count(), 0);
        assert_eq!(tag.usage_count(), 0);
        assert!(controller.get_by_id(id).is_none());
    }

    #[test]
    fn test_delete_unknown_id() {
        let (controller, _) = setup();
        let id = Uuid::new_v4();
        assert!(matches!(
            controller.delete(id),
            Err(ContentControllerError::NotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_get_by_id_returns_copy() {
        let (controller, category) = setup();
        let id = controller
            .create(Content::article("Original", "A", category, "b"))
            .unwrap();

        let mut copy = controller.get_by_id(id).unwrap();
        copy.set_title("Changed locally");

        assert_eq!(controller.get_by_id(id).unwrap().title(), "Original");
    }

    // ========================================================================
    // Lifecycle tests
    // ========================================================================

    #[test]
    fn test_publish_long_article() {
        let (controller, category) = setup();
        let id = controller
            .create(Content::article("T", "A", category, "x".repeat(60)))
            .unwrap();

        assert!(controller.publish_content(id).is_ok());
        let content = controller.get_by_id(id).unwrap();
        assert_eq!(content.status(), ContentStatus::Published);
        assert!(content.published_at().is_some());
    }

    #[test]
    fn test_publish_short_article_is_rejected() {
        let (controller, category) = setup();
        let id = controller
            .create(Content::article("T", "A", category, "0123456789"))
            .unwrap();

        let result = controller.publish_content(id);
        assert!(matches!(
            result,
            Err(ContentControllerError::PublishRejected {
                reason: PublishRejection::BodyTooShort { length: 10, .. },
                ..
            })
        ));
        let content = controller.get_by_id(id).unwrap();
        assert_eq!(content.status(), ContentStatus::Draft);
        assert!(content.published_at().is_none());
    }

    #[test]
    fn test_publish_twice_is_invalid_transition() {
        let (controller, category) = setup();
        let id = controller
            .create(Content::video("V", "A", category, "https://cdn/v.mp4", 30, "720p"))
            .unwrap();

        controller.publish_content(id).unwrap();
        assert_eq!(
            controller.publish_content(id),
            Err(ContentControllerError::InvalidTransition {
                id,
                status: ContentStatus::Published
            })
        );
    }

    #[test]
    fn test_unpublish_only_from_published() {
        let (controller, category) = setup();
        let id = controller
            .create(Content::image("I", "A", category, "https://cdn/i", "2x2", "png"))
            .unwrap();

        assert!(matches!(
            controller.unpublish_content(id),
            Err(ContentControllerError::InvalidTransition { .. })
        ));

        controller.publish_content(id).unwrap();
        controller.unpublish_content(id).unwrap();
        let content = controller.get_by_id(id).unwrap();
        assert_eq!(content.status(), ContentStatus::Draft);
        assert!(content.published_at().is_none());
    }

    // ========================================================================
    // Live assignment tests
    // ========================================================================

    #[test]
    fn test_reassign_category_moves_counter() {
        let (controller, news) = setup();
        let sports = Category::shared("Sports", None);
        let id = controller
            .create(Content::article("T", "A", news.clone(), "b"))
            .unwrap();

        controller.reassign_category(id, sports.clone()).unwrap();
        assert_eq!(news.content_count(), 0);
        assert_eq!(sports.content_count(), 1);

        // Reassigning to the same category changes nothing
        controller.reassign_category(id, sports.clone()).unwrap();
        assert_eq!(sports.content_count(), 1);
        assert_eq!(
            controller.get_by_id(id).unwrap().category().id,
            sports.id
        );
    }

    #[test]
    fn test_add_and_remove_tag_on_live_item() {
        let (controller, category) = setup();
        let tag = Arc::new(Tag::new("Rust"));
        let id = controller
            .create(Content::article("T", "A", category, "b"))
            .unwrap();

        assert_eq!(controller.add_tag(id, tag.clone()), Ok(true));
        assert_eq!(controller.add_tag(id, Arc::new(Tag::new("rust"))), Ok(false));
        assert_eq!(tag.usage_count(), 1);

        assert_eq!(controller.remove_tag(id, &Tag::new("RUST")), Ok(true));
        assert_eq!(controller.remove_tag(id, &tag), Ok(false));
        assert_eq!(tag.usage_count(), 0);
    }

    #[test]
    fn test_live_tag_changes_require_edit() {
        let (controller, category) = setup();
        let id = controller
            .create(Content::article("T", "A", category, "b"))
            .unwrap();

        controller.clear_current_actor();
        assert_eq!(
            controller.add_tag(id, Arc::new(Tag::new("x"))),
            Err(ContentControllerError::PermissionDenied(Permission::Edit))
        );
    }

    // ========================================================================
    // Query tests
    // ========================================================================

    fn seeded() -> (ContentController, Arc<Category>, Arc<Category>, Arc<Tag>, Vec<Uuid>) {
        let controller = ContentController::with_actor(admin());
        let news = Category::shared("News", None);
        let sports = Category::shared("Sports", None);
        let tag = Arc::new(Tag::new("featured"));

        let mut a = Content::article("Rust Weekly", "Ana Lopez", news.clone(), "x".repeat(60));
        a.add_tag(tag.clone());
        let v = Content::video("Match Highlights", "Ben", sports.clone(), "https://v", 60, "1080p");
        let mut i = Content::image("Stadium", "ana", sports.clone(), "https://i", "4x3", "jpg");
        i.add_tag(tag.clone());

        let ids = vec![
            controller.create(a).unwrap(),
            controller.create(v).unwrap(),
            controller.create(i).unwrap(),
        ];
        controller.publish_content(ids[0]).unwrap();
        (controller, news, sports, tag, ids)
    }

    #[test]
    fn test_search_by_keyword() {
        let (controller, _, _, _, all) = seeded();

        assert_eq!(ids(&controller.search_by_keyword(Some("RUST"))), vec![all[0]]);
        assert_eq!(ids(&controller.search_by_keyword(Some("ana"))), vec![all[0], all[2]]);
        assert!(controller.search_by_keyword(Some("nothing")).is_empty());
    }

    #[test]
    fn test_search_blank_keyword_returns_all() {
        let (controller, _, _, _, all) = seeded();

        assert_eq!(ids(&controller.search_by_keyword(None)), all);
        assert_eq!(ids(&controller.search_by_keyword(Some(""))), all);
        assert_eq!(ids(&controller.search_by_keyword(Some("   "))), all);
    }

    #[test]
    fn test_filter_by_category() {
        let (controller, news, sports, _, all) = seeded();

        assert_eq!(ids(&controller.filter_by_category(Some(&news))), vec![all[0]]);
        assert_eq!(ids(&controller.filter_by_category(Some(&sports))), vec![all[1], all[2]]);
        assert_eq!(ids(&controller.filter_by_category(None)), all);

        let lookalike = Category::new("News", None);
        assert!(controller.filter_by_category(Some(&lookalike)).is_empty());
    }

    #[test]
    fn test_filter_by_type() {
        let (controller, _, _, _, all) = seeded();

        assert_eq!(ids(&controller.filter_by_type(ContentTypeFilter::All)), all);
        assert_eq!(
            ids(&controller.filter_by_type(ContentType::Video.into())),
            vec![all[1]]
        );
        assert_eq!(
            ids(&controller.filter_by_type("Image".parse().unwrap())),
            vec![all[2]]
        );
    }

    #[test]
    fn test_filter_by_tag() {
        let (controller, _, _, tag, all) = seeded();

        assert_eq!(ids(&controller.filter_by_tag(Some(&tag))), vec![all[0], all[2]]);
        assert_eq!(
            ids(&controller.filter_by_tag(Some(&Tag::new(" Featured ")))),
            vec![all[0], all[2]]
        );
        assert!(controller.filter_by_tag(Some(&Tag::new("other"))).is_empty());
        assert_eq!(ids(&controller.filter_by_tag(None)), all);
    }

    #[test]
    fn test_status_views() {
        let (controller, _, _, _, all) = seeded();

        assert_eq!(ids(&controller.get_published_content()), vec![all[0]]);
        assert_eq!(
            ids(&controller.get_content_by_status(ContentStatus::Draft)),
            vec![all[1], all[2]]
        );
        assert_eq!(
            ids(&controller.get_content_by_status(ContentStatus::Published)),
            vec![all[0]]
        );
    }

    #[test]
    fn test_query_results_are_independent() {
        let (controller, _, _, _, all) = seeded();

        let mut snapshot = controller.get_all_content();
        snapshot.clear();
        assert_eq!(ids(&controller.get_all_content()), all);
    }

    // ========================================================================
    // Property-Based Tests
    // ========================================================================

    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Create { category: usize, tags: Vec<usize> },
        Delete(usize),
        Reassign { item: usize, category: usize },
        AddTag { item: usize, tag: usize },
        RemoveTag { item: usize, tag: usize },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..3usize, proptest::collection::vec(0..4usize, 0..4))
                .prop_map(|(category, tags)| Op::Create { category, tags }),
            (0..8usize).prop_map(Op::Delete),
            (0..8usize, 0..3usize).prop_map(|(item, category)| Op::Reassign { item, category }),
            (0..8usize, 0..4usize).prop_map(|(item, tag)| Op::AddTag { item, tag }),
            (0..8usize, 0..4usize).prop_map(|(item, tag)| Op::RemoveTag { item, tag }),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Category and tag counters always equal the number of live items
        /// currently assigned to them.
        #[test]
        fn property_counters_match_live_assignment(
            ops in proptest::collection::vec(op_strategy(), 1..40)
        ) {
            let controller = ContentController::with_actor(admin());
            let categories: Vec<Arc<Category>> =
                (0..3).map(|i| Category::shared(format!("c{}", i), None)).collect();
            let tags: Vec<Arc<Tag>> =
                (0..4).map(|i| Arc::new(Tag::new(&format!("t{}", i)))).collect();

            for op in ops {
                let live = controller.get_all_content();
                match op {
                    Op::Create { category, tags: tag_idx } => {
                        let mut content =
                            Content::article("t", "a", categories[category].clone(), "b");
                        for t in tag_idx {
                            content.add_tag(tags[t].clone());
                        }
                        controller.create(content).unwrap();
                    }
                    Op::Delete(i) if !live.is_empty() => {
                        controller.delete(live[i % live.len()].id()).unwrap();
                    }
                    Op::Reassign { item, category } if !live.is_empty() => {
                        controller
                            .reassign_category(live[item % live.len()].id(), categories[category].clone())
                            .unwrap();
                    }
                    Op::AddTag { item, tag } if !live.is_empty() => {
                        controller.add_tag(live[item % live.len()].id(), tags[tag].clone()).unwrap();
                    }
                    Op::RemoveTag { item, tag } if !live.is_empty() => {
                        controller.remove_tag(live[item % live.len()].id(), &tags[tag]).unwrap();
                    }
                    _ => {}
                }

                let live = controller.get_all_content();
                for category in &categories {
                    let expected = live.iter().filter(|c| c.category().id == category.id).count();
                    prop_assert_eq!(category.content_count(), expected);
                }
                for tag in &tags {
                    let expected = live.iter().filter(|c| c.has_tag(tag)).count();
                    prop_assert_eq!(tag.usage_count(), expected);
                }
            }
        }

        /// Keyword search returns exactly the matching items in collection order.
        #[test]
        fn property_search_preserves_order(
            titles in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..10),
            keyword in "[a-zA-Z]{1,3}"
        ) {
            let controller = ContentController::with_actor(admin());
            let category = Category::shared("c", None);
            for title in &titles {
                controller
                    .create(Content::article(title.clone(), "author", category.clone(), "b"))
                    .unwrap();
            }

            let needle = keyword.to_lowercase();
            let expected: Vec<Uuid> = controller
                .get_all_content()
                .iter()
                .filter(|c| c.title().to_lowercase().contains(&needle) || "author".contains(&needle))
                .map(Content::id)
                .collect();

            prop_assert_eq!(ids(&controller.search_by_keyword(Some(&keyword))), expected);
        }
    }
}
