//! Per-tab match counting through the tab lifecycle.

use all_my_web::coordinator::{Coordinator, Event};
use all_my_web::host::{InMemoryHost, TabApi};
use all_my_web::models::UserScript;
use all_my_web::storage::{KeyValueStore, MemoryStore, SCRIPTS_KEY};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn script(id: u32, body: &str) -> UserScript {
    UserScript {
        id,
        name: format!("Script {}", id),
        requirement: String::new(),
        body: body.to_string(),
        is_paused: false,
    }
}

fn seeded(scripts: &[UserScript]) -> (Arc<InMemoryHost>, Coordinator) {
    let store = Arc::new(MemoryStore::new());
    store
        .set(SCRIPTS_KEY, serde_json::to_value(scripts).unwrap())
        .unwrap();
    let host = Arc::new(InMemoryHost::new());
    let coordinator = Coordinator::new(store, host.clone(), host.clone());
    (host, coordinator)
}

#[test]
fn test_completed_tab_gets_count_and_badge() {
    let (host, mut coordinator) =
        seeded(&[script(1, "// @match https://example.com/*")]);
    coordinator.startup().unwrap();

    host.open_tab(1, Some("https://example.com/page1"), None);
    coordinator
        .dispatch(Event::TabComplete {
            tab: 1,
            url: "https://example.com/page1".to_string(),
        })
        .unwrap();

    assert_eq!(coordinator.tracker().count_for(1), Some(1));
    assert_eq!(host.badge_text(1).as_deref(), Some("1"));
}

#[test]
fn test_url_change_recomputes_count() {
    let (host, mut coordinator) =
        seeded(&[script(1, "// @match https://example.com/*")]);
    coordinator.startup().unwrap();

    host.open_tab(1, Some("https://example.com/page1"), None);
    coordinator
        .dispatch(Event::TabComplete {
            tab: 1,
            url: "https://example.com/page1".to_string(),
        })
        .unwrap();
    assert_eq!(coordinator.tracker().count_for(1), Some(1));

    host.navigate_tab(1, "https://other.com/page1");
    coordinator.dispatch(Event::TabLoading { tab: 1 }).unwrap();
    coordinator
        .dispatch(Event::TabComplete {
            tab: 1,
            url: "https://other.com/page1".to_string(),
        })
        .unwrap();

    assert_eq!(coordinator.tracker().count_for(1), Some(0));
    assert_eq!(host.badge_text(1), None);
}

#[test]
fn test_loading_tab_has_no_count_yet() {
    let (host, mut coordinator) = seeded(&[script(1, "// @match *://*/*")]);
    coordinator.startup().unwrap();

    host.open_tab(2, None, None);
    coordinator.dispatch(Event::TabLoading { tab: 2 }).unwrap();

    assert_eq!(coordinator.tracker().count_for(2), None);
    assert_eq!(host.badge_text(2), None);
}

#[test]
fn test_closed_tab_entry_is_removed() {
    let (host, mut coordinator) = seeded(&[script(1, "// @match *://*/*")]);
    coordinator.startup().unwrap();

    host.open_tab(3, Some("https://example.com/"), None);
    coordinator
        .dispatch(Event::TabComplete {
            tab: 3,
            url: "https://example.com/".to_string(),
        })
        .unwrap();
    assert_eq!(coordinator.tracker().count_for(3), Some(1));

    host.close_tab(3);
    coordinator.dispatch(Event::TabRemoved { tab: 3 }).unwrap();

    assert_eq!(coordinator.tracker().count_for(3), None);
    assert_eq!(host.badge_text(3), None);
}

#[test]
fn test_counts_follow_pause_toggle() {
    let (host, mut coordinator) =
        seeded(&[script(1, "// @match https://example.com/*")]);
    host.open_tab(4, Some("https://example.com/page"), None);
    coordinator.startup().unwrap();
    assert_eq!(coordinator.tracker().count_for(4), Some(1));

    coordinator.toggle_pause(1).unwrap();
    assert_eq!(coordinator.tracker().count_for(4), Some(0));
    assert_eq!(host.badge_text(4), None);

    coordinator.toggle_pause(1).unwrap();
    assert_eq!(coordinator.tracker().count_for(4), Some(1));
}

#[test]
fn test_activation_republishes_badge() {
    let (host, mut coordinator) = seeded(&[script(1, "// @match *://*/*")]);
    host.open_tab(5, Some("https://example.com/"), None);
    coordinator.startup().unwrap();
    assert_eq!(host.badge_text(5).as_deref(), Some("1"));

    // The badge was lost host-side (e.g. browser restart of the UI surface).
    host.set_badge_text(5, "").unwrap();
    host.activate_tab(5);
    coordinator.dispatch(Event::TabActivated { tab: 5 }).unwrap();

    assert_eq!(host.badge_text(5).as_deref(), Some("1"));
}

#[test]
fn test_multiple_scripts_count_once_each() {
    let (host, mut coordinator) = seeded(&[
        script(1, "// @match https://example.com/*\n// @match *://*/*"),
        script(2, "// @match https://example.com/*"),
        script(3, "// @match https://unrelated.org/*"),
    ]);
    host.open_tab(6, Some("https://example.com/a"), None);
    coordinator.startup().unwrap();

    // Script 1 matches twice but counts once; script 3 not at all.
    assert_eq!(coordinator.tracker().count_for(6), Some(2));
}
