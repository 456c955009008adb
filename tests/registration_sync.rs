//! End-to-end synchronization behavior: the persisted script list drives the
//! host registration set, wholesale and without partial states.

use all_my_web::coordinator::{Coordinator, Event};
use all_my_web::host::{InMemoryHost, UserScriptHost};
use all_my_web::models::{StatusKind, UserScript};
use all_my_web::storage::{KeyValueStore, MemoryStore, SCRIPTS_KEY};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn script(id: u32, body: &str, paused: bool) -> UserScript {
    UserScript {
        id,
        name: format!("Script {}", id),
        requirement: String::new(),
        body: body.to_string(),
        is_paused: paused,
    }
}

fn seeded(scripts: &[UserScript]) -> (Arc<MemoryStore>, Arc<InMemoryHost>, Coordinator) {
    let store = Arc::new(MemoryStore::new());
    store
        .set(SCRIPTS_KEY, serde_json::to_value(scripts).unwrap())
        .unwrap();
    let host = Arc::new(InMemoryHost::new());
    let coordinator = Coordinator::new(store.clone(), host.clone(), host.clone());
    (store, host, coordinator)
}

fn registered_ids(host: &InMemoryHost) -> Vec<String> {
    host.registered_scripts()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect()
}

#[test]
fn test_paused_scripts_are_not_registered() {
    let (_, host, mut coordinator) = seeded(&[
        script(1, "// @match https://example.com/*", false),
        script(2, "// @match https://test.com/*", true),
    ]);
    coordinator.startup().unwrap();

    assert_eq!(registered_ids(&host), vec!["amw-script-1".to_string()]);
}

#[test]
fn test_synchronization_is_idempotent() {
    let (_, host, mut coordinator) = seeded(&[
        script(1, "// @match https://example.com/*\n// @run-at document_start", false),
        script(2, "console.log('no directives');", false),
    ]);
    coordinator.startup().unwrap();
    let first = host.registered_scripts().unwrap();

    coordinator.dispatch(Event::ScriptsChanged).unwrap();
    let second = host.registered_scripts().unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_world_is_configured_on_startup() {
    let (_, host, mut coordinator) = seeded(&[]);
    coordinator.startup().unwrap();

    let world = host.world_config().unwrap();
    assert!(world.messaging);
    assert!(world.csp.contains("unsafe-eval"));
}

#[test]
fn test_capability_unavailable_fails_fast_without_host_calls() {
    let store = Arc::new(MemoryStore::new());
    let host = Arc::new(InMemoryHost::new());
    host.set_capability_disabled(true);
    let mut coordinator = Coordinator::new(store, host.clone(), host.clone());

    let result = coordinator.startup();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("developer mode is disabled"));
    // No unregister or register call was attempted.
    assert_eq!(host.registration_calls(), 0);
}

#[test]
fn test_register_failure_propagates_and_full_retry_recovers() {
    let (_, host, mut coordinator) =
        seeded(&[script(1, "// @match https://example.com/*", false)]);
    host.set_fail_register(true);

    assert!(coordinator.startup().is_err());

    // The caller retries with another full synchronization.
    host.set_fail_register(false);
    coordinator.dispatch(Event::ScriptsChanged).unwrap();
    assert_eq!(registered_ids(&host), vec!["amw-script-1".to_string()]);
}

#[test]
fn test_unregister_failure_aborts_before_registering() {
    let (_, host, mut coordinator) =
        seeded(&[script(1, "// @match https://example.com/*", false)]);
    coordinator.startup().unwrap();

    host.set_fail_unregister(true);
    let calls_before = host.registration_calls();
    assert!(coordinator.dispatch(Event::ScriptsChanged).is_err());
    // Only the failed unregister happened, no register on top of it.
    assert_eq!(host.registration_calls(), calls_before + 1);
}

#[test]
fn test_sync_failure_is_relayed_to_active_tab() {
    let (_, host, mut coordinator) =
        seeded(&[script(1, "// @match https://example.com/*", false)]);
    host.open_tab(1, Some("https://example.com/"), Some("Example"));
    host.activate_tab(1);
    host.set_fail_register(true);

    assert!(coordinator.startup().is_err());

    let delivered = host.delivered_messages();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].1.kind, StatusKind::Error);
}

#[test]
fn test_queued_script_change_burst_synchronizes_once() {
    let (_, host, mut coordinator) =
        seeded(&[script(1, "// @match https://example.com/*", false)]);
    coordinator.startup().unwrap();
    let calls_before = host.registration_calls();

    // Several change notifications arrive before the queue is pumped.
    coordinator.enqueue(Event::ScriptsChanged);
    coordinator.enqueue(Event::ScriptsChanged);
    coordinator.dispatch(Event::ScriptsChanged).unwrap();

    // Exactly one unregister plus one register: the burst ran as one sync.
    assert_eq!(host.registration_calls(), calls_before + 2);
    assert_eq!(registered_ids(&host), vec!["amw-script-1".to_string()]);
}

#[test]
fn test_external_store_change_is_picked_up() {
    let (store, host, mut coordinator) =
        seeded(&[script(1, "// @match https://example.com/*", false)]);
    coordinator.startup().unwrap();
    assert_eq!(registered_ids(&host).len(), 1);

    // Another device wrote a second script through the sync-scoped store.
    let external = vec![
        script(1, "// @match https://example.com/*", false),
        script(2, "// @match https://other.com/*", false),
    ];
    store
        .set(SCRIPTS_KEY, serde_json::to_value(&external).unwrap())
        .unwrap();
    coordinator.dispatch(Event::ScriptsChanged).unwrap();

    assert_eq!(
        registered_ids(&host),
        vec!["amw-script-1".to_string(), "amw-script-2".to_string()]
    );
}

#[test]
fn test_delete_removes_registration_and_counts() {
    let (_, host, mut coordinator) = seeded(&[
        script(1, "// @match https://example.com/*", false),
        script(2, "// @match https://example.com/*", false),
    ]);
    host.open_tab(7, Some("https://example.com/page"), None);
    coordinator.startup().unwrap();
    assert_eq!(coordinator.tracker().count_for(7), Some(2));

    coordinator.delete_script(1).unwrap();

    assert_eq!(registered_ids(&host), vec!["amw-script-2".to_string()]);
    assert_eq!(coordinator.tracker().count_for(7), Some(1));
    assert_eq!(host.badge_text(7).as_deref(), Some("1"));
}

#[test]
fn test_registration_carries_patterns_timing_and_body() {
    let body = "// @match https://example.com/*\n// @run-at document_end\nconsole.log('x');";
    let (_, host, mut coordinator) = seeded(&[script(3, body, false)]);
    coordinator.startup().unwrap();

    let registered = host.registered_scripts().unwrap();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].id, "amw-script-3");
    assert_eq!(registered[0].matches, vec!["https://example.com/*"]);
    assert_eq!(registered[0].run_at.as_str(), "document_end");
    assert_eq!(registered[0].code, body);
}
