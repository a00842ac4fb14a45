//! Notification rendering for the host's notification listings.
//!
//! # Responsibility
//! - Render one notification, or an aggregated count, into a link + text
//!   pair or a combined markup string.
//! - Strip host markup from event action text before reuse.
//!
//! # Invariants
//! - Aggregate rendering links to the group page and discards individual
//!   event identity.
//! - Single rendering links to the event permalink.

use crate::host::{ActivityFeed, GroupDirectory};
use crate::model::event::{EventId, GroupId};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid markup tag regex"));

/// Output shape selector; a pure presentation switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatShape {
    /// One combined anchor-markup string.
    Markup,
    /// Separate link and text fields.
    Parts,
}

/// A rendered notification in the requested shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedNotification {
    Markup(String),
    Parts { link: String, text: String },
}

impl FormattedNotification {
    fn build(shape: FormatShape, link: String, title: &str, text: String) -> Self {
        match shape {
            FormatShape::Markup => {
                Self::Markup(format!("<a href=\"{link}\" title=\"{title}\">{text}</a>"))
            }
            FormatShape::Parts => Self::Parts { link, text },
        }
    }
}

/// Renders a notification for display.
///
/// With `total_items > 1` this produces the aggregate "N new activities"
/// message linking to the group page; otherwise it renders the single
/// event's stripped action text linking to the event permalink. Returns
/// `None` when the group or event can no longer be loaded.
pub fn format_notification(
    groups: &dyn GroupDirectory,
    feed: &dyn ActivityFeed,
    action: &str,
    group_id: GroupId,
    event_id: EventId,
    total_items: u32,
    shape: FormatShape,
) -> Option<FormattedNotification> {
    debug!(
        "event=format module=service status=start action={action} group_id={group_id} event_id={event_id} total={total_items}"
    );

    if total_items > 1 {
        let group_name = match groups.group_name(group_id) {
            Ok(Some(name)) => name,
            Ok(None) => return None,
            Err(err) => {
                warn!(
                    "event=format module=service status=error error_code=group_lookup_failed group_id={group_id} error={err}"
                );
                return None;
            }
        };

        let link = groups.group_link(group_id);
        let text = format!("{total_items} new activities in the group \"{group_name}\"");
        return Some(FormattedNotification::build(
            shape,
            link,
            "New group Activities",
            text,
        ));
    }

    let event = match feed.load_event(event_id) {
        Ok(Some(event)) => event,
        Ok(None) => return None,
        Err(err) => {
            warn!(
                "event=format module=service status=error error_code=event_load_failed event_id={event_id} error={err}"
            );
            return None;
        }
    };

    let text = strip_markup(&event.action);
    let link = feed.event_permalink(&event);
    let title = text.clone();
    Some(FormattedNotification::build(shape, link, &title, text))
}

/// Removes markup tags from host-rendered action text.
pub fn strip_markup(value: &str) -> String {
    MARKUP_TAG_RE.replace_all(value, "").trim().to_string()
}
