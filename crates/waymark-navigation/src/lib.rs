//! # Back-stack navigation
//!
//! Routes are strings such as `status/42` or `media/status/42?selectedIndex=1`.
//! A [`RouteTable`] maps route templates (`status/{statusKey}`) to scene
//! factories; a [`Navigator`] owns the stack of entries built from them.
//!
//! ```rust
//! use std::sync::Arc;
//! use waymark_navigation::*;
//!
//! let table = Arc::new(RouteTable::new());
//! table.register("home", &[], |_| "home".to_string()).unwrap();
//! table
//!     .register("status/{statusKey}", &[], |s| {
//!         format!("status {}", s.path::<String>("statusKey").unwrap_or_default())
//!     })
//!     .unwrap();
//!
//! let nav = Navigator::new(table, "home").unwrap();
//! nav.navigate("status/42");
//! assert_eq!(nav.current_entry().unwrap().path::<u64>("statusKey"), Some(42));
//! assert!(nav.can_go_back());
//! assert_eq!(nav.render().as_deref(), Some("status 42"));
//! ```
//!
//! ## Results
//!
//! `navigate_for_result` pushes and hands back a future that completes when
//! that entry is popped:
//!
//! ```rust
//! # use std::sync::Arc;
//! # use waymark_navigation::*;
//! # let table = Arc::new(RouteTable::new());
//! # table.register("compose", &[], |_| ()).unwrap();
//! # table.register("compose/search/user", &[], |_| ()).unwrap();
//! # let nav = Navigator::new(table, "compose").unwrap();
//! let pending = nav.navigate_for_result("compose/search/user").unwrap();
//! nav.go_back_with("@alice".to_string());
//! let picked = pollster::block_on(pending).and_then(|r| r.take::<String>());
//! assert_eq!(picked.as_deref(), Some("@alice"));
//! ```
//!
//! ## Deep links
//!
//! Templates may list aliases (`twiderex://user/{userKey}`,
//! `https://twitter.com/{screenName}`). [`DeepLinkResolver`] maps a URI onto the
//! canonical route of the matching registration, and
//! [`Navigator::open_deep_link`] navigates there.

pub mod config;
pub mod deep_link;
pub mod entry;
pub mod error;
pub mod event;
pub mod navigator;
pub mod options;
pub mod params;
pub mod result;
pub mod scene;
pub mod snapshot;
pub mod stack;
pub mod table;
pub mod template;

mod codec;
#[cfg(test)]
mod tests;

pub use config::NavigatorConfig;
pub use deep_link::DeepLinkResolver;
pub use entry::{BackStackEntry, EntryId};
pub use error::{NavError, RouteError};
pub use event::{NavEvent, StackChange, SubscriptionId, TransitionDir};
pub use navigator::Navigator;
pub use options::{LaunchFlags, NavOptions, PopUpTo};
pub use params::RouteParams;
pub use result::{NavResult, PendingResult};
pub use scene::{AuthorizationGuard, RouteId, SceneBinding, SceneFactory, SceneScope, scene};
pub use snapshot::{SnapshotEntry, StackSnapshot};
pub use stack::{NavOutcome, RouteStackManager};
pub use table::{Resolved, RouteTable};
pub use template::RouteTemplate;
