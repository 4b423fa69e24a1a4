use std::fmt;
use std::sync::Arc;

use crate::entry::BackStackEntry;
use crate::navigator::Navigator;
use crate::template::RouteTemplate;

/// What a scene factory sees: the entry it renders and the navigator that owns it.
pub struct SceneScope<V: 'static> {
    entry: Arc<BackStackEntry>,
    nav: Navigator<V>,
}

impl<V: 'static> SceneScope<V> {
    pub(crate) fn new(entry: Arc<BackStackEntry>, nav: Navigator<V>) -> Self {
        Self { entry, nav }
    }
    pub fn entry(&self) -> &BackStackEntry {
        &self.entry
    }
    pub fn navigator(&self) -> &Navigator<V> {
        &self.nav
    }
    pub fn path<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.entry.path(name)
    }
    pub fn query<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.entry.query(key)
    }
}

pub type SceneFactory<V> = Arc<dyn Fn(&SceneScope<V>) -> V + Send + Sync>;

pub fn scene<V: 'static>(f: impl Fn(&SceneScope<V>) -> V + Send + Sync + 'static) -> SceneFactory<V> {
    Arc::new(f)
}

/// Wraps the factory call of scenes registered as authorized. The guard
/// decides whether to call `content` or render something else in its place.
pub trait AuthorizationGuard<V: 'static>: Send + Sync {
    fn authorize(&self, scope: &SceneScope<V>, content: &dyn Fn() -> V) -> V;
}

impl<V: 'static, F> AuthorizationGuard<V> for F
where
    F: Fn(&SceneScope<V>, &dyn Fn() -> V) -> V + Send + Sync,
{
    fn authorize(&self, scope: &SceneScope<V>, content: &dyn Fn() -> V) -> V {
        self(scope, content)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RouteId(pub(crate) usize);

/// One registration: a canonical template, its deep-link aliases, and the
/// factory both resolve to.
pub struct SceneBinding<V: 'static> {
    pub(crate) id: RouteId,
    pub(crate) template: RouteTemplate,
    pub(crate) deep_links: Vec<RouteTemplate>,
    pub(crate) factory: SceneFactory<V>,
    pub(crate) authorized: bool,
}

impl<V: 'static> SceneBinding<V> {
    pub fn id(&self) -> RouteId {
        self.id
    }
    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }
    pub fn deep_links(&self) -> &[RouteTemplate] {
        &self.deep_links
    }
    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub(crate) fn render(
        &self,
        scope: &SceneScope<V>,
        guard: Option<&dyn AuthorizationGuard<V>>,
    ) -> V {
        let content = || (self.factory)(scope);
        match guard {
            Some(guard) if self.authorized => guard.authorize(scope, &content),
            None if self.authorized => {
                log::debug!(
                    "no authorization guard installed; rendering `{}` directly",
                    self.template
                );
                content()
            }
            _ => content(),
        }
    }
}

impl<V: 'static> fmt::Debug for SceneBinding<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneBinding")
            .field("id", &self.id)
            .field("template", &self.template.pattern())
            .field(
                "deep_links",
                &self.deep_links.iter().map(|t| t.pattern()).collect::<Vec<_>>(),
            )
            .field("authorized", &self.authorized)
            .finish()
    }
}
