mod support;

use groupnotify_core::{format_notification, FormatShape, FormattedNotification};
use support::{event, FakeFeed, FakeGroups};

fn fixtures() -> (FakeGroups, FakeFeed) {
    let groups = FakeGroups::default().with_group(7, "Cycling", &[1, 2, 3]);
    let feed = FakeFeed::default().with_event(event(100, 7, 1));
    (groups, feed)
}

#[test]
fn single_notification_links_to_the_event_with_stripped_text() {
    let (groups, feed) = fixtures();

    let rendered = format_notification(
        &groups,
        &feed,
        "group-local-notification-100",
        7,
        100,
        1,
        FormatShape::Markup,
    )
    .unwrap();

    let FormattedNotification::Markup(markup) = rendered else {
        panic!("expected markup shape");
    };
    assert!(markup.contains("https://example.test/activity/p/100/"));
    assert!(markup.contains("U1 posted an update"));
    // Host markup in the action text must not leak through.
    assert!(!markup.contains("/members/u1/"));
}

#[test]
fn aggregate_notification_links_to_the_group_page() {
    let (groups, feed) = fixtures();

    let rendered = format_notification(
        &groups,
        &feed,
        "group-local-notification-100",
        7,
        100,
        5,
        FormatShape::Markup,
    )
    .unwrap();

    let FormattedNotification::Markup(markup) = rendered else {
        panic!("expected markup shape");
    };
    assert!(markup.contains("https://example.test/groups/7/"));
    assert!(markup.contains("5 new activities in the group \"Cycling\""));
    assert!(markup.contains("title=\"New group Activities\""));
}

#[test]
fn parts_shape_returns_link_and_text_separately() {
    let (groups, feed) = fixtures();

    let single = format_notification(
        &groups,
        &feed,
        "group-local-notification-100",
        7,
        100,
        1,
        FormatShape::Parts,
    )
    .unwrap();
    assert_eq!(
        single,
        FormattedNotification::Parts {
            link: "https://example.test/activity/p/100/".to_string(),
            text: "U1 posted an update".to_string(),
        }
    );

    let aggregate = format_notification(
        &groups,
        &feed,
        "group-local-notification-100",
        7,
        100,
        3,
        FormatShape::Parts,
    )
    .unwrap();
    assert_eq!(
        aggregate,
        FormattedNotification::Parts {
            link: "https://example.test/groups/7/".to_string(),
            text: "3 new activities in the group \"Cycling\"".to_string(),
        }
    );
}

#[test]
fn unknown_event_or_group_renders_nothing() {
    let (groups, feed) = fixtures();

    assert!(format_notification(
        &groups,
        &feed,
        "group-local-notification-999",
        7,
        999,
        1,
        FormatShape::Markup,
    )
    .is_none());

    assert!(format_notification(
        &groups,
        &feed,
        "group-local-notification-100",
        8,
        100,
        4,
        FormatShape::Markup,
    )
    .is_none());
}
