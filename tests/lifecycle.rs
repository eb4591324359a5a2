//! End-to-end resolver sessions.
//!
//! These tests drive a resolver through whole sessions against real
//! collaborators: the in-memory and file stores, a host-driven signal, and the
//! OS-backed signal with a swapped detector.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use serial_test::serial;
use tempfile::TempDir;
use theme_switch::{
    set_scheme_detector, FileStore, ManualSignal, MemoryStore, OsSignal, PreferenceStore,
    ResolverState, RootClasses, Theme, ThemeResolver, ThemeSource,
};

fn record(resolver: &ThemeResolver) -> (Rc<RefCell<Vec<Theme>>>, theme_switch::Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sub = {
        let seen = Rc::clone(&seen);
        resolver.subscribe(move |theme| seen.borrow_mut().push(theme))
    };
    (seen, sub)
}

#[test]
fn test_first_visit_then_toggle_then_system_change() {
    let store = MemoryStore::new();
    let signal = ManualSignal::new(false);
    let root = RootClasses::new();
    let resolver = ThemeResolver::builder()
        .store(store.clone())
        .signal(signal.clone())
        .surface(root.clone())
        .build();
    let (seen, _sub) = record(&resolver);

    assert_eq!(
        resolver.state(),
        ResolverState {
            theme: Theme::Light,
            overridden: false
        }
    );
    assert!(root.contains("light"));

    resolver.toggle();
    assert_eq!(
        resolver.state(),
        ResolverState {
            theme: Theme::Dark,
            overridden: true
        }
    );
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

    signal.set_dark(true);
    assert_eq!(
        resolver.state(),
        ResolverState {
            theme: Theme::Dark,
            overridden: true
        }
    );
    assert_eq!(*seen.borrow(), vec![Theme::Dark]);
    assert_eq!(root.class_attr(), "dark");
}

#[test]
fn test_stored_dark_beats_light_environment() {
    for env_dark in [false, true] {
        let resolver = ThemeResolver::builder()
            .store(MemoryStore::with_entry("theme", "dark"))
            .signal(ManualSignal::new(env_dark))
            .build();
        assert_eq!(resolver.theme(), Theme::Dark);
        assert!(resolver.is_overridden());
    }
}

#[test]
fn test_dark_environment_without_record() {
    let resolver = ThemeResolver::builder()
        .store(MemoryStore::new())
        .signal(ManualSignal::new(true))
        .build();
    assert_eq!(resolver.theme(), Theme::Dark);
    assert!(!resolver.is_overridden());
}

#[test]
fn test_environment_sequence_before_any_toggle() {
    let signal = ManualSignal::new(false);
    let resolver = ThemeResolver::builder()
        .store(MemoryStore::new())
        .signal(signal.clone())
        .build();
    let (seen, _sub) = record(&resolver);

    signal.set_dark(true);
    signal.set_dark(false);

    assert_eq!(*seen.borrow(), vec![Theme::Dark, Theme::Light]);
    assert_eq!(resolver.theme(), Theme::Light);
}

#[test]
fn test_choice_survives_into_next_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let resolver = ThemeResolver::builder()
            .store(FileStore::new(&path))
            .signal(ManualSignal::new(false))
            .build();
        assert_eq!(resolver.source(), ThemeSource::Environment);
        resolver.toggle();
    }

    let signal = ManualSignal::new(false);
    let resolver = ThemeResolver::builder()
        .store(FileStore::new(&path))
        .signal(signal.clone())
        .build();
    assert_eq!(resolver.theme(), Theme::Dark);
    assert_eq!(resolver.source(), ThemeSource::Stored);

    signal.set_dark(true);
    signal.set_dark(false);
    assert_eq!(resolver.theme(), Theme::Dark);
}

#[test]
fn test_environment_only_session_leaves_no_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    let signal = ManualSignal::new(true);

    {
        let _resolver = ThemeResolver::builder()
            .store(FileStore::new(&path))
            .signal(signal.clone())
            .build();
        signal.set_dark(false);
    }

    assert!(!path.exists());
    assert_eq!(signal.subscriber_count(), 0);
}

#[test]
fn test_corrupt_preference_file_falls_through_to_environment() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "theme = dark").unwrap();

    let resolver = ThemeResolver::builder()
        .store(FileStore::new(&path))
        .signal(ManualSignal::new(true))
        .build();
    assert_eq!(resolver.theme(), Theme::Dark);
    assert!(!resolver.is_overridden());

    resolver.toggle();
    assert_eq!(
        FileStore::new(&path).get("theme").unwrap().as_deref(),
        Some("light")
    );
}

#[test]
fn test_stored_choice_in_shared_settings_file_wins() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, r#"{"theme": "dark", "window_width": 1280}"#).unwrap();

    let resolver = ThemeResolver::builder()
        .store(FileStore::new(&path))
        .signal(ManualSignal::new(false))
        .build();
    assert_eq!(resolver.theme(), Theme::Dark);
    assert_eq!(resolver.source(), ThemeSource::Stored);

    resolver.toggle();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("window_width"));
    assert!(content.contains("\"light\""));
}

#[test]
#[serial]
fn test_os_signal_polling_drives_resolver() {
    set_scheme_detector(|| Theme::Light);
    let signal = OsSignal::new();
    let resolver = ThemeResolver::builder()
        .store(MemoryStore::new())
        .signal(signal.clone())
        .build();
    assert_eq!(resolver.theme(), Theme::Light);

    set_scheme_detector(|| Theme::Dark);
    assert!(signal.poll());
    assert_eq!(resolver.theme(), Theme::Dark);

    resolver.toggle();
    set_scheme_detector(|| Theme::Light);
    signal.poll();
    assert_eq!(resolver.theme(), Theme::Light);
    set_scheme_detector(|| Theme::Dark);
    signal.poll();
    assert_eq!(resolver.theme(), Theme::Light);

    set_scheme_detector(|| Theme::Light);
}

proptest! {
    #[test]
    fn prop_even_toggles_return_to_start(pairs in 0usize..16, env_dark in any::<bool>()) {
        let resolver = ThemeResolver::builder()
            .store(MemoryStore::new())
            .signal(ManualSignal::new(env_dark))
            .build();
        let start = resolver.theme();

        for _ in 0..pairs * 2 {
            resolver.toggle();
        }
        prop_assert_eq!(resolver.theme(), start);
    }

    #[test]
    fn prop_each_toggle_changes_theme(count in 1usize..16, stored in prop::option::of(prop_oneof![Just("light"), Just("dark")])) {
        let store = match stored {
            Some(value) => MemoryStore::with_entry("theme", value),
            None => MemoryStore::new(),
        };
        let resolver = ThemeResolver::builder().store(store.clone()).build();

        for _ in 0..count {
            let before = resolver.theme();
            let after = resolver.toggle();
            prop_assert_ne!(before, after);
            let stored_now = store.get("theme").unwrap();
            prop_assert_eq!(stored_now.as_deref(), Some(after.as_str()));
        }
        prop_assert!(resolver.is_overridden());
    }
}
