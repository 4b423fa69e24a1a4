use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use waymark_navigation::{AuthorizationGuard, RouteError, RouteTable, SceneScope};

use crate::model::{ComposeType, MicroBlogKey, Screen};

pub const INITIAL_ROUTE: &str = route::HOME;
pub const SCHEME: &str = "twiderex";

const TWITTER_HOSTS: [&str; 3] = [
    "https://twitter.com",
    "https://mobile.twitter.com",
    "https://www.twitter.com",
];

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Outbound route strings. Values are percent-encoded here; the router decodes.
pub mod route {
    use super::*;

    pub const HOME: &str = "home";
    pub const SIGN_IN: &str = "signin/general";
    pub const SIGN_IN_MASTODON: &str = "signin/mastodon";
    pub const DRAFTS: &str = "draft/list";
    pub const COMPOSE_SEARCH_USER: &str = "compose/search/user";
    pub const SETTINGS: &str = "settings";
    pub const SETTINGS_APPEARANCE: &str = "settings/appearance";
    pub const SETTINGS_DISPLAY: &str = "settings/display";
    pub const SETTINGS_ABOUT: &str = "settings/about";

    pub fn twitter_sign_in(consumer_key: &str, consumer_secret: &str) -> String {
        format!(
            "signin/twitter?consumerKey={}&consumerSecret={}",
            encode(consumer_key),
            encode(consumer_secret)
        )
    }

    pub fn user(key: &MicroBlogKey) -> String {
        format!("user/{}", encode(&key.to_string()))
    }

    pub fn status(key: &MicroBlogKey) -> String {
        format!("status/{}", encode(&key.to_string()))
    }

    pub fn status_media(key: &MicroBlogKey, selected: usize) -> String {
        format!(
            "media/status/{}?selectedIndex={selected}",
            encode(&key.to_string())
        )
    }

    pub fn raw_media(url: &str) -> String {
        format!("media/raw/{}", encode(url))
    }

    pub fn search(keyword: &str) -> String {
        format!("search/result/{}", encode(keyword))
    }

    pub fn search_input(keyword: Option<&str>) -> String {
        match keyword {
            Some(k) => format!("search/input?keyword={}", encode(k)),
            None => "search/input".to_string(),
        }
    }

    pub fn compose(kind: ComposeType, status: Option<&MicroBlogKey>) -> String {
        match status {
            Some(key) => format!(
                "compose?composeType={}&statusKey={}",
                kind.name(),
                encode(&key.to_string())
            ),
            None => format!("compose?composeType={}", kind.name()),
        }
    }

    pub fn followers(key: &MicroBlogKey) -> String {
        format!("followers/{}", encode(&key.to_string()))
    }

    pub fn following(key: &MicroBlogKey) -> String {
        format!("following/{}", encode(&key.to_string()))
    }

    pub fn draft_compose(draft_id: &str) -> String {
        format!("draft/compose/{}", encode(draft_id))
    }
}

/// Stand-in for the account layer: scenes registered as authorized render
/// [`Screen::RequireSignIn`] until someone signs in.
#[derive(Clone, Default)]
pub struct RequireAuthorization {
    signed_in: Arc<AtomicBool>,
}

impl RequireAuthorization {
    pub fn sign_in(&self) {
        self.signed_in.store(true, Ordering::SeqCst);
    }
}

impl AuthorizationGuard<Screen> for RequireAuthorization {
    fn authorize(&self, scope: &SceneScope<Screen>, content: &dyn Fn() -> Screen) -> Screen {
        if self.signed_in.load(Ordering::SeqCst) {
            content()
        } else {
            log::info!("`{}` needs an account", scope.entry().route());
            Screen::RequireSignIn
        }
    }
}

fn key(s: &SceneScope<Screen>, name: &str) -> Option<MicroBlogKey> {
    s.path::<MicroBlogKey>(name)
}

fn aliases(suffix: &str) -> Vec<String> {
    TWITTER_HOSTS.iter().map(|h| format!("{h}/{suffix}")).collect()
}

fn refs(v: &[String]) -> Vec<&str> {
    v.iter().map(String::as_str).collect()
}

pub fn build() -> Result<RouteTable<Screen>, RouteError> {
    let t = RouteTable::new();

    t.register_authorized(route::HOME, &[], |_| Screen::Home)?;
    t.register(route::SIGN_IN, &[format!("{SCHEME}://signin").as_str()], |_| Screen::SignIn)?;
    t.register("signin/twitter?consumerKey&consumerSecret", &[], |s| {
        match (s.query::<String>("consumerKey"), s.query::<String>("consumerSecret")) {
            (Some(consumer_key), Some(_)) => Screen::TwitterSignIn { consumer_key },
            _ => Screen::Blank,
        }
    })?;
    t.register(route::SIGN_IN_MASTODON, &[], |_| Screen::SignIn)?;
    t.register("signin/twitter/web/{target}", &[], |s| {
        s.path("target")
            .map_or(Screen::Blank, |target| Screen::WebSignIn { target })
    })?;
    t.register("signin/mastodon/web/{target}", &[], |s| {
        s.path("target")
            .map_or(Screen::Blank, |target| Screen::WebSignIn { target })
    })?;

    // Search aliases go first: `https://twitter.com/{screenName}` would claim
    // `https://twitter.com/search` otherwise.
    let mut search_links = aliases("search?q={keyword}");
    search_links.push(format!("{SCHEME}://search/{{keyword}}"));
    t.register_authorized("search/result/{keyword}", &refs(&search_links), |s| {
        s.path::<String>("keyword")
            .filter(|k| !k.is_empty())
            .map_or(Screen::Blank, |keyword| Screen::Search { keyword })
    })?;
    t.register_authorized("search/input?keyword", &[], |s| Screen::SearchInput {
        keyword: s.query("keyword"),
    })?;

    let mut status_links = aliases("{screenName}/status/{statusId}");
    status_links.push(format!("{SCHEME}://twitter/status/{{statusId}}"));
    t.register_authorized("deeplink/twitter/status/{statusId}", &refs(&status_links), |s| {
        s.path::<String>("statusId")
            .map_or(Screen::Blank, |id| Screen::Status(MicroBlogKey::twitter(id)))
    })?;

    let mut user_links = aliases("{screenName}");
    user_links.push(format!("{SCHEME}://twitter/user/{{screenName}}"));
    t.register_authorized("deeplink/twitter/user/{screenName}", &refs(&user_links), |s| {
        s.path("screenName")
            .map_or(Screen::Blank, |screen_name| Screen::TwitterUser { screen_name })
    })?;

    t.register_authorized("user/{userKey}", &[format!("{SCHEME}://user/{{userKey}}").as_str()], |s| {
        key(s, "userKey").map_or(Screen::Blank, Screen::User)
    })?;
    t.register_authorized("status/{statusKey}", &[], |s| {
        key(s, "statusKey").map_or(Screen::Blank, Screen::Status)
    })?;
    t.register_authorized("media/status/{statusKey}?selectedIndex", &[], |s| {
        key(s, "statusKey").map_or(Screen::Blank, |status| Screen::StatusMedia {
            status,
            selected: s.entry().query_or("selectedIndex", 0),
        })
    })?;
    t.register_authorized("media/raw/{url}", &[], |s| {
        s.path("url").map_or(Screen::Blank, |url| Screen::RawMedia { url })
    })?;
    t.register_authorized("compose?composeType&statusKey", &[], |s| Screen::Compose {
        kind: s.query("composeType").unwrap_or(ComposeType::New),
        status: s.query("statusKey"),
    })?;
    t.register_authorized(route::COMPOSE_SEARCH_USER, &[], |_| Screen::ComposeSearchUser)?;
    t.register_authorized("followers/{userKey}", &[], |s| {
        key(s, "userKey").map_or(Screen::Blank, Screen::Followers)
    })?;
    t.register_authorized("following/{userKey}", &[], |s| {
        key(s, "userKey").map_or(Screen::Blank, Screen::Following)
    })?;

    t.register(route::SETTINGS, &[], |_| Screen::Settings("home"))?;
    t.register(route::SETTINGS_APPEARANCE, &[], |_| Screen::Settings("appearance"))?;
    t.register(route::SETTINGS_DISPLAY, &[], |_| Screen::Settings("display"))?;
    t.register(route::SETTINGS_ABOUT, &[], |_| Screen::Settings("about"))?;
    t.register(route::DRAFTS, &[], |_| Screen::Drafts)?;
    t.register("draft/compose/{draftId}", &[], |s| {
        s.path("draftId")
            .map_or(Screen::Blank, |draft_id| Screen::DraftCompose { draft_id })
    })?;

    Ok(t)
}
