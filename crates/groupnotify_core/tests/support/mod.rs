//! Shared fixtures: in-memory host fakes and a call-counting store wrapper.
#![allow(dead_code)]

use groupnotify_core::{
    ActivityFeed, ActivityParams, ContentId, EventId, ForumProvider, ForumTopic, GroupDirectory,
    GroupEvent, GroupId, HostResult, Notification, NotificationFilter, NotificationStore,
    RepoResult, RouteInfo, TopicStatus, UserId, GROUPS_COMPONENT,
};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

pub fn event(id: EventId, group_id: GroupId, actor: UserId) -> GroupEvent {
    GroupEvent {
        id,
        group_id,
        actor_user_id: actor,
        component: GROUPS_COMPONENT.to_string(),
        action: format!("<a href=\"/members/u{actor}/\">U{actor}</a> posted an update"),
    }
}

pub fn group_params(group_id: GroupId, actor: UserId) -> ActivityParams {
    ActivityParams {
        component: GROUPS_COMPONENT.to_string(),
        item_id: group_id,
        actor_user_id: actor,
        kind: Some("activity_update".to_string()),
    }
}

pub fn topic_route(group_id: GroupId, slug: &str) -> RouteInfo {
    RouteInfo {
        is_single_group_item: true,
        is_groups_area: true,
        action: "forum".to_string(),
        action_variables: vec!["topic".to_string(), slug.to_string()],
        current_group_id: group_id,
    }
}

/// In-memory group directory fake.
#[derive(Default)]
pub struct FakeGroups {
    members: RefCell<BTreeMap<GroupId, BTreeSet<UserId>>>,
    names: RefCell<BTreeMap<GroupId, String>>,
}

impl FakeGroups {
    pub fn with_group(self, group_id: GroupId, name: &str, members: &[UserId]) -> Self {
        self.members
            .borrow_mut()
            .insert(group_id, members.iter().copied().collect());
        self.names.borrow_mut().insert(group_id, name.to_string());
        self
    }
}

impl GroupDirectory for FakeGroups {
    fn member_ids(&self, group_id: GroupId) -> HostResult<BTreeSet<UserId>> {
        Ok(self
            .members
            .borrow()
            .get(&group_id)
            .cloned()
            .unwrap_or_default())
    }

    fn group_name(&self, group_id: GroupId) -> HostResult<Option<String>> {
        Ok(self.names.borrow().get(&group_id).cloned())
    }

    fn group_link(&self, group_id: GroupId) -> String {
        format!("https://example.test/groups/{group_id}/")
    }
}

/// In-memory activity feed fake.
#[derive(Default)]
pub struct FakeFeed {
    events: RefCell<BTreeMap<EventId, GroupEvent>>,
    /// Flags seen by the last `load_events` call.
    pub last_batch_flags: Cell<Option<(bool, bool)>>,
}

impl FakeFeed {
    pub fn with_event(self, event: GroupEvent) -> Self {
        self.events.borrow_mut().insert(event.id, event);
        self
    }

    pub fn add_event(&self, event: GroupEvent) {
        self.events.borrow_mut().insert(event.id, event);
    }
}

impl ActivityFeed for FakeFeed {
    fn resolve_event_id(&self, params: &ActivityParams) -> HostResult<Option<EventId>> {
        // Latest activity matching the raw creation parameters.
        Ok(self
            .events
            .borrow()
            .values()
            .filter(|event| {
                event.component == params.component
                    && event.group_id == params.item_id
                    && event.actor_user_id == params.actor_user_id
            })
            .map(|event| event.id)
            .max())
    }

    fn load_event(&self, event_id: EventId) -> HostResult<Option<GroupEvent>> {
        Ok(self.events.borrow().get(&event_id).cloned())
    }

    fn load_events(
        &self,
        event_ids: &[EventId],
        include_hidden: bool,
        include_spam: bool,
    ) -> HostResult<Vec<GroupEvent>> {
        self.last_batch_flags
            .set(Some((include_hidden, include_spam)));
        let events = self.events.borrow();
        Ok(event_ids
            .iter()
            .filter_map(|id| events.get(id).cloned())
            .collect())
    }

    fn event_permalink(&self, event: &GroupEvent) -> String {
        format!("https://example.test/activity/p/{}/", event.id)
    }
}

/// In-memory forum fake with call counting for short-circuit assertions.
pub struct FakeForum {
    pub available: bool,
    topics: RefCell<Vec<ForumTopic>>,
    replies: RefCell<BTreeMap<ContentId, Vec<ContentId>>>,
    event_links: RefCell<BTreeMap<ContentId, EventId>>,
    pub calls: Rc<Cell<usize>>,
}

impl Default for FakeForum {
    fn default() -> Self {
        Self {
            available: true,
            topics: RefCell::new(Vec::new()),
            replies: RefCell::new(BTreeMap::new()),
            event_links: RefCell::new(BTreeMap::new()),
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl FakeForum {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    pub fn with_topic(self, topic_id: ContentId, slug: &str, status: TopicStatus) -> Self {
        self.topics.borrow_mut().push(ForumTopic {
            id: topic_id,
            slug: slug.to_string(),
            status,
        });
        self
    }

    pub fn with_replies(self, topic_id: ContentId, reply_ids: &[ContentId]) -> Self {
        self.replies
            .borrow_mut()
            .insert(topic_id, reply_ids.to_vec());
        self
    }

    pub fn with_event_link(self, content_id: ContentId, event_id: EventId) -> Self {
        self.event_links.borrow_mut().insert(content_id, event_id);
        self
    }

    fn count_call(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl ForumProvider for FakeForum {
    fn is_available(&self) -> bool {
        self.available
    }

    fn topic_by_slug(
        &self,
        slug: &str,
        statuses: &[TopicStatus],
    ) -> HostResult<Option<ForumTopic>> {
        self.count_call();
        Ok(self
            .topics
            .borrow()
            .iter()
            .find(|topic| topic.slug == slug && statuses.contains(&topic.status))
            .cloned())
    }

    fn reply_ids(&self, topic_id: ContentId) -> HostResult<Vec<ContentId>> {
        self.count_call();
        Ok(self
            .replies
            .borrow()
            .get(&topic_id)
            .cloned()
            .unwrap_or_default())
    }

    fn event_id_for_content(&self, content_id: ContentId) -> HostResult<Option<EventId>> {
        self.count_call();
        Ok(self.event_links.borrow().get(&content_id).copied())
    }
}

/// Per-operation call counters for [`CountingStore`].
#[derive(Default)]
pub struct StoreCalls {
    pub create: Cell<usize>,
    pub exists: Cell<usize>,
    pub find: Cell<usize>,
    pub delete: Cell<usize>,
}

impl StoreCalls {
    pub fn total_beyond_exists(&self) -> usize {
        self.create.get() + self.find.get() + self.delete.get()
    }
}

/// Store decorator that counts calls without changing behavior.
pub struct CountingStore<S: NotificationStore> {
    inner: S,
    pub calls: Rc<StoreCalls>,
}

impl<S: NotificationStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Rc::new(StoreCalls::default()),
        }
    }
}

impl<S: NotificationStore> NotificationStore for CountingStore<S> {
    fn create(&self, notification: &Notification) -> RepoResult<bool> {
        self.calls.create.set(self.calls.create.get() + 1);
        self.inner.create(notification)
    }

    fn exists(&self, filter: &NotificationFilter) -> RepoResult<bool> {
        self.calls.exists.set(self.calls.exists.get() + 1);
        self.inner.exists(filter)
    }

    fn find(&self, filter: &NotificationFilter) -> RepoResult<Vec<Notification>> {
        self.calls.find.set(self.calls.find.get() + 1);
        self.inner.find(filter)
    }

    fn delete(&self, filter: &NotificationFilter) -> RepoResult<usize> {
        self.calls.delete.set(self.calls.delete.get() + 1);
        self.inner.delete(filter)
    }
}
