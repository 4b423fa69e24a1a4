use std::fmt;
use std::str::FromStr;

/// `id@host`, e.g. `1234@twitter.com` or `alice@mastodon.social`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MicroBlogKey {
    pub id: String,
    pub host: String,
}

impl MicroBlogKey {
    pub fn twitter(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            host: "twitter.com".into(),
        }
    }
}

impl fmt::Display for MicroBlogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.host)
    }
}

impl FromStr for MicroBlogKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, host) = s
            .rsplit_once('@')
            .ok_or_else(|| anyhow::anyhow!("`{s}` is not an id@host key"))?;
        if id.is_empty() || host.is_empty() {
            anyhow::bail!("`{s}` is not an id@host key");
        }
        Ok(Self {
            id: id.to_string(),
            host: host.to_string(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposeType {
    New,
    Reply,
    Quote,
    Thread,
}

impl ComposeType {
    pub fn name(self) -> &'static str {
        match self {
            ComposeType::New => "New",
            ComposeType::Reply => "Reply",
            ComposeType::Quote => "Quote",
            ComposeType::Thread => "Thread",
        }
    }
}

impl FromStr for ComposeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "New" => ComposeType::New,
            "Reply" => ComposeType::Reply,
            "Quote" => ComposeType::Quote,
            "Thread" => ComposeType::Thread,
            other => anyhow::bail!("unknown compose type `{other}`"),
        })
    }
}

/// What a scene "renders" in this demo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Home,
    SignIn,
    TwitterSignIn { consumer_key: String },
    WebSignIn { target: String },
    User(MicroBlogKey),
    TwitterUser { screen_name: String },
    Status(MicroBlogKey),
    StatusMedia { status: MicroBlogKey, selected: usize },
    RawMedia { url: String },
    SearchInput { keyword: Option<String> },
    Search { keyword: String },
    Compose { kind: ComposeType, status: Option<MicroBlogKey> },
    ComposeSearchUser,
    Followers(MicroBlogKey),
    Following(MicroBlogKey),
    Settings(&'static str),
    Drafts,
    DraftCompose { draft_id: String },
    /// A required parameter was absent or malformed.
    Blank,
    /// Rendered by the authorization guard in place of the real scene.
    RequireSignIn,
}
