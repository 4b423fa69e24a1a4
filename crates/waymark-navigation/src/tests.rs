use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use proptest::prelude::*;

use crate::*;

fn routes() -> Arc<RouteTable<String>> {
    let t = RouteTable::new();
    t.register_authorized("home", &[], |_| "Home".to_string())
        .unwrap();
    t.register("signin/general", &["twiderex://signin"], |_| {
        "SignIn".to_string()
    })
    .unwrap();
    t.register_authorized("status/{statusKey}", &[], |s| {
        format!("Status({})", s.path::<String>("statusKey").unwrap_or_default())
    })
    .unwrap();
    t.register_authorized("media/status/{statusKey}?selectedIndex", &[], |s| {
        format!(
            "Media({}, {})",
            s.path::<String>("statusKey").unwrap_or_default(),
            s.entry().query_or("selectedIndex", 0usize)
        )
    })
    .unwrap();
    t.register_authorized("user/{userKey}", &["twiderex://user/{userKey}"], |s| {
        format!("User({})", s.path::<String>("userKey").unwrap_or_default())
    })
    .unwrap();
    t.register_authorized("compose", &[], |_| "Compose".to_string())
        .unwrap();
    t.register_authorized("compose/search/user", &[], |_| {
        "ComposeSearchUser".to_string()
    })
    .unwrap();
    t.register("settings", &[], |_| "Settings".to_string()).unwrap();
    t.register("settings/display", &[], |_| "Display".to_string())
        .unwrap();
    t.register("item/{n}", &[], |s| format!("Item({})", s.path::<u32>("n").unwrap_or(0)))
        .unwrap();
    Arc::new(t)
}

fn nav() -> Navigator<String> {
    Navigator::new(routes(), "home").unwrap()
}

#[test]
fn initial_route_is_the_root() {
    let nav = nav();
    assert_eq!(nav.depth(), 1);
    assert!(!nav.can_go_back());
    assert_eq!(nav.current_entry().unwrap().route(), "home");
}

#[test]
fn unknown_initial_route_fails_construction() {
    let err = Navigator::new(routes(), "nowhere").err();
    assert!(matches!(err, Some(NavError::Route(RouteError::NotFound(_)))));
}

#[test]
fn navigate_to_status() {
    let nav = nav();
    let outcome = nav.navigate("status/42");
    assert!(matches!(outcome, NavOutcome::Pushed(_)));

    let top = nav.current_entry().unwrap();
    assert_eq!(top.path::<String>("statusKey").as_deref(), Some("42"));
    assert_eq!(top.path::<u64>("statusKey"), Some(42));
    assert_eq!(top.pattern(), "status/{statusKey}");
    assert!(nav.can_go_back());
}

#[test]
fn repeated_navigation_to_top_is_a_no_op() {
    let nav = nav();
    let first = nav.navigate("status/42");
    let NavOutcome::Pushed(id) = first else {
        panic!("expected a push, got {first:?}");
    };
    assert_eq!(nav.navigate("status/42"), NavOutcome::AlreadyOnTop(id));
    // encoded and decoded spellings are one destination
    assert_eq!(nav.navigate("status/%34%32"), NavOutcome::AlreadyOnTop(id));
    assert_eq!(nav.depth(), 2);

    // different params is a different destination
    assert!(matches!(nav.navigate("status/43"), NavOutcome::Pushed(_)));
    assert_eq!(nav.depth(), 3);
}

#[test]
fn unknown_route_is_reported_and_ignored() {
    let nav = nav();
    let missing = Arc::new(Mutex::new(Vec::new()));
    nav.subscribe({
        let missing = missing.clone();
        move |ev| {
            if let NavEvent::RouteNotFound { route } = ev {
                missing.lock().push(route.clone());
            }
        }
    });

    assert_eq!(nav.navigate("unregistered/path"), NavOutcome::NotFound);
    assert_eq!(nav.depth(), 1);
    assert_eq!(*missing.lock(), vec!["unregistered/path".to_string()]);
}

#[test]
fn go_back_at_root_is_absorbed() {
    let nav = nav();
    assert!(!nav.go_back());
    assert!(!nav.go_back_with(7u32));
    assert!(!nav.pop_back_stack());
    assert_eq!(nav.depth(), 1);
}

#[test]
fn result_round_trip() {
    let nav = nav();
    nav.navigate("compose");
    let pending = nav.navigate_for_result("compose/search/user").unwrap();
    assert_eq!(nav.depth(), 3);
    assert_eq!(pending.entry(), nav.current_entry().map(|e| e.id()));

    assert!(nav.go_back_with("@result".to_string()));
    let value = pollster::block_on(pending).and_then(|r| r.take::<String>());
    assert_eq!(value.as_deref(), Some("@result"));
    assert_eq!(nav.depth(), 2);
    assert_eq!(nav.current_entry().unwrap().route(), "compose");
}

#[test]
fn plain_go_back_resumes_with_none() {
    let nav = nav();
    let pending = nav.navigate_for_result("compose/search/user").unwrap();
    assert!(nav.go_back());
    assert!(pollster::block_on(pending).is_none());
    assert_eq!(nav.depth(), 1);
}

#[test]
fn result_waits_across_threads() {
    let nav = nav();
    let pending = nav.navigate_for_result("compose/search/user").unwrap();
    let popper = {
        let nav = nav.clone();
        std::thread::spawn(move || {
            while nav.depth() < 2 {
                std::thread::yield_now();
            }
            nav.go_back_with(99u64)
        })
    };
    let value = pollster::block_on(pending).and_then(|r| r.take::<u64>());
    assert!(popper.join().unwrap());
    assert_eq!(value, Some(99));
}

#[test]
fn result_type_mismatch_reads_as_absent() {
    let nav = nav();
    let pending = nav.navigate_for_result("settings").unwrap();
    nav.go_back_with(5i32);
    let result = pollster::block_on(pending).unwrap();
    assert!(result.is::<i32>());
    assert!(result.take::<String>().is_none());
}

#[test]
fn second_waiter_on_same_entry_fails_fast() {
    let nav = nav();
    let first = nav.navigate_for_result("compose/search/user").unwrap();
    let second = nav.navigate_for_result("compose/search/user");
    match second {
        Err(NavError::DuplicateResultWaiter(id)) => assert_eq!(Some(id), first.entry()),
        other => panic!("expected duplicate waiter error, got {other:?}"),
    }
    assert_eq!(nav.depth(), 2);

    // the first waiter is untouched
    nav.go_back_with(1u8);
    assert_eq!(pollster::block_on(first).and_then(|r| r.take::<u8>()), Some(1));
}

#[test]
fn dropped_waiter_releases_the_binding() {
    let nav = nav();
    let first = nav.navigate_for_result("settings").unwrap();
    drop(first);
    let second = nav.navigate_for_result("settings").unwrap();
    nav.go_back_with("ok");
    assert_eq!(
        pollster::block_on(second).and_then(|r| r.take::<&str>()),
        Some("ok")
    );
}

#[test]
fn unmatched_result_navigation_resolves_immediately() {
    let nav = nav();
    let pending = nav.navigate_for_result("unregistered/path").unwrap();
    assert_eq!(pending.entry(), None);
    assert!(pollster::block_on(pending).is_none());
    assert_eq!(nav.depth(), 1);
}

#[test]
fn clearing_the_stack_cancels_waiters() {
    let nav = nav();
    let pending = nav.navigate_for_result("compose").unwrap();
    nav.navigate("status/1");

    let outcome = nav.navigate_with("signin/general", NavOptions::clear_stack());
    assert!(matches!(outcome, NavOutcome::Pushed(_)));
    assert_eq!(nav.depth(), 1);
    assert!(!nav.can_go_back());
    assert!(pollster::block_on(pending).is_none());
}

#[test]
fn clearing_the_stack_to_the_current_top_drops_everything_below() {
    let nav = nav();
    nav.navigate("settings");
    let pending = nav.navigate_for_result("status/1").unwrap();
    assert_eq!(nav.depth(), 3);

    let outcome = nav.navigate_with("status/1", NavOptions::clear_stack());
    let NavOutcome::Pushed(id) = outcome else {
        panic!("expected a fresh entry, got {outcome:?}");
    };
    assert_eq!(nav.depth(), 1);
    assert!(!nav.can_go_back());
    let top = nav.current_entry().unwrap();
    assert_eq!(top.id(), id);
    assert_eq!(top.route(), "status/1");
    assert!(pollster::block_on(pending).is_none());

    // Without truncating options the same call stays a no-op.
    assert_eq!(nav.navigate("status/1"), NavOutcome::AlreadyOnTop(id));
}

#[test]
fn teardown_cancels_waiters() {
    let nav = nav();
    let pending = nav.navigate_for_result("compose").unwrap();
    drop(nav);
    assert!(pollster::block_on(pending).is_none());
}

#[test]
fn single_top_replaces_same_template() {
    let nav = nav();
    nav.navigate("user/a@x");
    let outcome = nav.navigate_with("user/b@x", NavOptions::new().single_top());
    assert!(matches!(outcome, NavOutcome::Pushed(_)));
    assert_eq!(nav.depth(), 2);
    assert_eq!(
        nav.current_entry().unwrap().path::<String>("userKey").as_deref(),
        Some("b@x")
    );
}

#[test]
fn pop_up_to_trims_the_tail() {
    let nav = nav();
    nav.navigate("settings");
    nav.navigate("settings/display");
    nav.navigate("status/1");

    nav.navigate_with("user/a@x", NavOptions::new().pop_up_to("settings", false));
    let routes: Vec<_> = nav
        .stack()
        .entries()
        .iter()
        .map(|e| e.route().to_string())
        .collect();
    assert_eq!(routes, ["home", "settings", "user/a@x"]);

    // popping down onto the destination itself does not duplicate it
    let outcome = nav.navigate_with("home", NavOptions::new().pop_up_to("home", false));
    assert!(matches!(outcome, NavOutcome::AlreadyOnTop(_)));
    assert_eq!(nav.depth(), 1);
}

#[test]
fn depth_limit_refuses_pushes() {
    let nav = Navigator::with_config(routes(), "home", NavigatorConfig::default().with_max_depth(2))
        .unwrap();
    assert!(matches!(nav.navigate("item/1"), NavOutcome::Pushed(_)));
    assert_eq!(nav.navigate("item/2"), NavOutcome::DepthLimited);
    assert_eq!(nav.depth(), 2);
    // replacing does not grow the stack
    let outcome = nav.navigate_with("item/2", NavOptions::new().single_top());
    assert!(matches!(outcome, NavOutcome::Pushed(_)));
    assert_eq!(nav.depth(), 2);
}

#[test]
fn observers_see_pushes_and_pops() {
    let nav = nav();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let id = nav.subscribe({
        let seen = seen.clone();
        move |ev| {
            if let NavEvent::StackChanged(change) = ev {
                seen.lock()
                    .push((change.dir, change.depth, change.top.route().to_string()));
            }
        }
    });

    nav.navigate("status/1");
    nav.navigate("status/1");
    nav.go_back();
    assert!(nav.unsubscribe(id));
    nav.navigate("settings");

    assert_eq!(
        *seen.lock(),
        vec![
            (TransitionDir::Push, 2, "status/1".to_string()),
            (TransitionDir::Pop, 1, "home".to_string()),
        ]
    );
    assert!(!nav.unsubscribe(id));
}

#[test]
fn push_is_visible_to_observers_before_the_result_arrives() {
    let nav = nav();
    let order = Arc::new(Mutex::new(Vec::new()));
    nav.subscribe({
        let order = order.clone();
        move |ev| {
            if let NavEvent::StackChanged(c) = ev {
                order.lock().push(format!("{:?}:{}", c.dir, c.top.route()));
            }
        }
    });
    let pending = nav.navigate_for_result("compose/search/user").unwrap();
    order.lock().push("waiting".to_string());
    nav.go_back_with(());
    pollster::block_on(pending);
    assert_eq!(
        *order.lock(),
        ["Push:compose/search/user", "waiting", "Pop:home"]
    );
}

#[test]
fn observer_may_navigate_reentrantly() {
    let nav = nav();
    let redirected = Arc::new(AtomicBool::new(false));
    nav.subscribe({
        let nav = nav.clone();
        let redirected = redirected.clone();
        move |ev| {
            if let NavEvent::StackChanged(c) = ev
                && c.top.route() == "settings"
                && !redirected.swap(true, Ordering::SeqCst)
            {
                nav.navigate("settings/display");
            }
        }
    });
    nav.navigate("settings");
    assert_eq!(nav.depth(), 3);
    assert_eq!(nav.current_entry().unwrap().route(), "settings/display");
}

#[test]
fn deep_link_navigation_uses_canonical_route() {
    let nav = nav();
    let outcome = nav.open_deep_link("twiderex://user/alice@twitter.com");
    let NavOutcome::Pushed(id) = outcome else {
        panic!("expected a push, got {outcome:?}");
    };
    let top = nav.current_entry().unwrap();
    assert_eq!(top.route(), "user/alice@twitter.com");
    assert_eq!(top.path::<String>("userKey").as_deref(), Some("alice@twitter.com"));

    // same destination through the direct route is deduplicated
    assert_eq!(nav.navigate("user/alice@twitter.com"), NavOutcome::AlreadyOnTop(id));
    assert_eq!(nav.open_deep_link("twiderex://nope"), NavOutcome::NotFound);
}

#[test]
fn authorized_scenes_go_through_the_guard() {
    let nav = nav();
    let signed_in = Arc::new(AtomicBool::new(false));
    let calls = Arc::new(AtomicUsize::new(0));
    nav.set_authorization_guard({
        let signed_in = signed_in.clone();
        let calls = calls.clone();
        move |_: &SceneScope<String>, content: &dyn Fn() -> String| {
            calls.fetch_add(1, Ordering::SeqCst);
            if signed_in.load(Ordering::SeqCst) {
                content()
            } else {
                "RequireSignIn".to_string()
            }
        }
    });

    assert_eq!(nav.render().as_deref(), Some("RequireSignIn"));
    signed_in.store(true, Ordering::SeqCst);
    nav.navigate("media/status/7?selectedIndex=2");
    assert_eq!(nav.render().as_deref(), Some("Media(7, 2)"));

    // unauthorized scenes bypass the guard
    nav.navigate("settings");
    assert_eq!(nav.render().as_deref(), Some("Settings"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn scene_can_navigate_through_its_scope() {
    let table = routes();
    table
        .register("redirect", &[], |s| {
            s.navigator().navigate("settings");
            "Redirect".to_string()
        })
        .unwrap();
    let nav = Navigator::new(table, "redirect").unwrap();
    assert_eq!(nav.render().as_deref(), Some("Redirect"));
    assert_eq!(nav.current_entry().unwrap().route(), "settings");
}

#[test]
fn snapshot_restores_routes() {
    let nav = nav();
    nav.navigate("status/1");
    nav.navigate("media/status/1?selectedIndex=3");
    let json = nav.to_json().unwrap();

    let restored = nav_from(&json);
    let routes: Vec<_> = restored
        .stack()
        .entries()
        .iter()
        .map(|e| e.route().to_string())
        .collect();
    assert_eq!(routes, ["home", "status/1", "media/status/1?selectedIndex=3"]);
    assert_eq!(restored.snapshot(), nav.snapshot());
    assert_eq!(restored.stack().last_dir(), TransitionDir::None);
}

fn nav_from(json: &str) -> Navigator<String> {
    let nav = Navigator::new(routes(), "settings").unwrap();
    nav.restore_json(json).unwrap();
    nav
}

#[test]
fn restore_skips_stale_routes_and_rejects_empty() {
    let nav = nav();
    let snapshot = StackSnapshot {
        entries: vec![
            SnapshotEntry {
                route: "home".into(),
                params: RouteParams::new(),
            },
            SnapshotEntry {
                route: "removed/screen".into(),
                params: RouteParams::new(),
            },
            SnapshotEntry {
                route: "status/9".into(),
                params: RouteParams::new().with_path("statusKey", "9"),
            },
        ],
    };
    assert_eq!(nav.restore(&snapshot).unwrap(), 2);

    let stale = StackSnapshot {
        entries: vec![SnapshotEntry {
            route: "removed/screen".into(),
            params: RouteParams::new(),
        }],
    };
    assert!(matches!(nav.restore(&stale), Err(NavError::EmptySnapshot)));
    assert_eq!(nav.depth(), 2);
    assert!(matches!(nav.restore_json("not json"), Err(NavError::Json(_))));
}

proptest! {
    #[test]
    fn n_pushes_unwind_with_n_pops(n in 1usize..24, extra in 0usize..4) {
        let nav = nav();
        for i in 0..n {
            let pushed = matches!(nav.navigate(&format!("item/{i}")), NavOutcome::Pushed(_));
            prop_assert!(pushed);
        }
        prop_assert!(nav.can_go_back());
        prop_assert_eq!(nav.depth(), n + 1);
        for _ in 0..n {
            prop_assert!(nav.go_back());
        }
        prop_assert_eq!(nav.depth(), 1);
        for _ in 0..extra {
            prop_assert!(!nav.go_back());
        }
        prop_assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn resolved_params_rebuild_the_route(key in "[A-Za-z0-9@._-]{1,16}", idx in 0usize..100) {
        let table = routes();
        let route = format!("media/status/{key}?selectedIndex={idx}");
        let resolved = table.resolve(&route).unwrap();
        prop_assert_eq!(resolved.params.path_str("statusKey"), Some(key.as_str()));
        prop_assert_eq!(resolved.binding.template().build(&resolved.params).unwrap(), route);
    }
}
