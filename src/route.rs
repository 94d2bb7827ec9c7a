//! Navigation paths.

use crate::ids::{ChannelId, MessageId};
use crate::signal::{Signal, Subscription};

pub const HOME_PATH: &str = "/";

/// Parsed navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Channel(ChannelId),
    /// Permalink; the message becomes the entry message of its channel.
    Message(MessageId),
}

impl Route {
    /// Parse a path. Anything unrecognised resolves to `Home`.
    pub fn parse(path: &str) -> Self {
        let mut segments = path.trim_matches('/').split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("channels"), Some(id), None) => {
                id.parse().map(Route::Channel).unwrap_or(Route::Home)
            }
            (Some("messages"), Some(id), None) => {
                id.parse().map(Route::Message).unwrap_or(Route::Home)
            }
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => HOME_PATH.to_string(),
            Route::Channel(id) => format!("/channels/{}", id),
            Route::Message(id) => format!("/messages/{}", id),
        }
    }
}

/// Owns the current path. Views subscribe to react to navigation.
#[derive(Debug, Clone)]
pub struct Navigator {
    path: Signal<String>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(HOME_PATH)
    }
}

impl Navigator {
    pub fn new(start: &str) -> Self {
        Self {
            path: Signal::new(Route::parse(start).path()),
        }
    }

    /// Go to `path`. Paths are normalised first, so spellings of the same
    /// route (`/channels/<id>/`) do not count as navigation.
    pub fn navigate(&self, path: impl AsRef<str>) {
        let path = Route::parse(path.as_ref()).path();
        let changed = self.path.with(|current| *current != path);
        if changed {
            tracing::debug!(%path, "navigate");
            self.path.set(path);
        }
    }

    pub fn go(&self, route: Route) {
        self.navigate(route.path());
    }

    pub fn current(&self) -> Route {
        self.path.with(|p| Route::parse(p))
    }

    pub fn current_path(&self) -> String {
        self.path.get()
    }

    /// The path signal, for observers that detach on navigation.
    pub fn path_signal(&self) -> Signal<String> {
        self.path.clone()
    }

    pub fn on_change(&self, callback: impl FnMut(&String) + 'static) -> Subscription {
        self.path.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_parse_routes() {
        let ch = ChannelId::random();
        let msg = MessageId::random();
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(&format!("/channels/{}", ch)), Route::Channel(ch));
        assert_eq!(Route::parse(&format!("/messages/{}/", msg)), Route::Message(msg));
        assert_eq!(Route::parse("/channels/general"), Route::Home);
        assert_eq!(Route::parse("/settings/profile/extra"), Route::Home);
    }

    #[test]
    fn test_path_round_trip() {
        let route = Route::Channel(ChannelId::random());
        assert_eq!(Route::parse(&route.path()), route);
    }

    #[test]
    fn test_navigate_same_path_is_noop() {
        let nav = Navigator::default();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let _sub = nav.on_change(move |_| counter.set(counter.get() + 1));

        nav.navigate("/");
        let route = Route::Channel(ChannelId::random());
        nav.go(route);
        nav.go(route);

        assert_eq!(hits.get(), 1);
        assert_eq!(nav.current(), route);
    }

    #[test]
    fn test_equivalent_paths_are_not_navigation() {
        let id = ChannelId::random();
        let nav = Navigator::new(&format!("channels/{}/", id));
        assert_eq!(nav.current_path(), format!("/channels/{}", id));

        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let _sub = nav.on_change(move |_| counter.set(counter.get() + 1));

        nav.navigate(format!("/channels/{}/", id));
        nav.navigate(format!("//channels/{}", id));
        assert_eq!(hits.get(), 0);

        // Unknown paths collapse to home
        nav.navigate("/settings");
        assert_eq!(nav.current_path(), HOME_PATH);
        assert_eq!(hits.get(), 1);
    }
}
