use std::sync::Arc;

use waymark_navigation::{NavEvent, NavOptions, Navigator, NavigatorConfig};

mod model;
mod routes;

use model::{ComposeType, MicroBlogKey, Screen};
use routes::{INITIAL_ROUTE, RequireAuthorization, route};

/// Optional JSON navigator config, e.g. `{"max_depth": 16}`.
const CONFIG_ENV: &str = "TIMELINE_NAV_CONFIG";

fn config() -> anyhow::Result<NavigatorConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(json) => Ok(NavigatorConfig::from_json(&json)?),
        Err(_) => Ok(NavigatorConfig::default().with_max_depth(32)),
    }
}

fn show(nav: &Navigator<Screen>) {
    let route = nav
        .current_entry()
        .map(|e| e.route().to_string())
        .unwrap_or_default();
    log::info!("[{}] {route} => {:?}", nav.depth(), nav.render());
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let table = Arc::new(routes::build()?);
    let nav = Navigator::with_config(table, INITIAL_ROUTE, config()?)?;
    let auth = RequireAuthorization::default();
    nav.set_authorization_guard(auth.clone());

    nav.subscribe(|ev| match ev {
        NavEvent::StackChanged(c) => {
            log::debug!("{:?} -> {} (depth {})", c.dir, c.top.route(), c.depth)
        }
        NavEvent::RouteNotFound { route } => log::warn!("no scene for `{route}`"),
    });

    show(&nav);
    nav.navigate(route::SIGN_IN);
    nav.navigate(&route::twitter_sign_in("key", "secret"));
    show(&nav);

    // Signing in resets the stack to the timeline.
    auth.sign_in();
    nav.navigate_with(route::HOME, NavOptions::clear_stack());
    show(&nav);

    let status = MicroBlogKey::twitter("1234");
    nav.navigate(&route::status(&status));
    nav.navigate(&route::status(&status));
    nav.navigate(&route::status_media(&status, 2));
    show(&nav);
    nav.go_back();
    let alice: MicroBlogKey = "alice@mastodon.social".parse()?;
    nav.navigate(&route::user(&alice));
    nav.navigate(&route::followers(&status));
    nav.navigate(&route::following(&status));
    nav.navigate(&route::raw_media("https://pbs.example.com/media/a b.jpg"));
    show(&nav);

    // Compose picks a user mention through a result-bearing navigation.
    nav.navigate_with(
        &route::compose(ComposeType::Reply, Some(&status)),
        NavOptions::new().pop_up_to(route::HOME, false),
    );
    show(&nav);
    let pending = nav.navigate_for_result(route::COMPOSE_SEARCH_USER)?;
    show(&nav);
    nav.go_back_with("@alice".to_string());
    let mention = pollster::block_on(pending).and_then(|r| r.take::<String>());
    log::info!("picked mention: {mention:?}");
    show(&nav);

    for uri in [
        "https://twitter.com/alice/status/42",
        "https://mobile.twitter.com/bob",
        "https://twitter.com/search?q=rust+lang",
        "twiderex://user/carol@mastodon.social",
        "twiderex://nowhere",
    ] {
        nav.open_deep_link(uri);
        show(&nav);
    }

    nav.navigate(&route::search("rust lang"));
    nav.navigate(&route::search_input(Some("rust")));
    nav.navigate(&route::search_input(None));
    nav.navigate(route::SETTINGS);
    for r in [
        route::SETTINGS_APPEARANCE,
        route::SETTINGS_DISPLAY,
        route::SETTINGS_ABOUT,
        route::DRAFTS,
        route::SIGN_IN_MASTODON,
    ] {
        nav.navigate_with(r, NavOptions::new().single_top());
    }
    nav.navigate(&route::draft_compose("draft 1"));
    nav.navigate("unregistered/path");
    show(&nav);

    let saved = nav.to_json()?;
    log::info!("saved stack: {saved}");
    let restored = Navigator::new(nav.stack().table().clone(), INITIAL_ROUTE)?;
    restored.set_authorization_guard(auth);
    let depth = restored.restore_json(&saved)?;
    log::info!("restored {depth} entries");
    while restored.can_go_back() {
        show(&restored);
        restored.pop_back_stack();
    }
    show(&restored);
    Ok(())
}
