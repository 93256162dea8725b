//! The host framework as seen from the dispatch core.

/// Types supplied by the host UI framework.
///
/// A single `Host` implementation ties together everything the core needs to
/// know about its environment without depending on it:
///
/// - `Context` is handed to every handler factory at registration and to
///   every handler call afterwards (a window, a theme, a resource loader).
/// - `Container` is the view container the host allocates for each row.
/// - `Callback` is the screen-level listener shared by all handlers. It may be
///   a trait object such as `dyn MyListEvents`.
///
/// ```
/// use motley_list::Host;
///
/// trait FeedEvents {
///     fn open(&self, id: u64);
/// }
///
/// struct Terminal;
///
/// impl Host for Terminal {
///     type Context = String;
///     type Container = Vec<String>;
///     type Callback = dyn FeedEvents;
/// }
/// ```
pub trait Host: 'static {
    type Context: 'static;
    type Container: 'static;
    type Callback: ?Sized + 'static;
}

/// Invalidation signal sent to the host after the item sequence changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// The whole sequence was replaced; every mounted row must be re-resolved.
    DataSetChanged {
        /// Item count after the change.
        count: usize,
    },
}

/// Listener receiving [`Invalidation`] signals.
pub type InvalidationListener = Box<dyn FnMut(Invalidation)>;
