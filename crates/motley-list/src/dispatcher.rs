//! The dispatcher answers the host's per-position queries.
//!
//! A host list view drives a [`Dispatcher`] through four calls:
//!
//! 1. [`item_count`](Dispatcher::item_count) for the scroll extent;
//! 2. [`type_key_for`](Dispatcher::type_key_for) per visible position, to
//!    pick a pooled row or decide to create one;
//! 3. [`create_slot_for_type`](Dispatcher::create_slot_for_type) when no row
//!    of that key is available;
//! 4. [`bind_slot`](Dispatcher::bind_slot) to populate a row for a position.
//!
//! None of these fail. Unknown item types render as inert placeholders and
//! out-of-range positions are answered with `None`.

use std::any::TypeId;
use std::convert::Infallible;
use std::rc::Rc;

use crate::config::{DispatcherConfig, EmptyItemsPolicy};
use crate::error::{FactoryError, RegistryResult};
use crate::handler::{BindMismatch, ItemHandler};
use crate::host::{Host, Invalidation, InvalidationListener};
use crate::item::AnyItem;
use crate::profiling::profile_function;
use crate::registry::{HandlerRegistry, TypeKey};
use crate::slot::RenderSlot;

/// Result of [`Dispatcher::set_items`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetItemsOutcome {
    /// The sequence was replaced and the host invalidated.
    Replaced { count: usize },
    /// Empty input cleared the sequence ([`EmptyItemsPolicy::Clear`]).
    Cleared,
    /// Empty input was ignored ([`EmptyItemsPolicy::Ignore`]).
    Ignored,
}

/// Result of [`Dispatcher::bind_slot`]. Every variant other than `Bound` is
/// a silent skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// The handler rendered the item.
    Bound,
    /// The slot is a placeholder.
    Placeholder,
    /// No item at the position.
    MissingItem,
    /// The item's type has no handler.
    MissingHandler,
    /// The slot was created for a different item type than the one at the
    /// position.
    TypeMismatch,
    /// The slot was built by a handler that has since been replaced. The host
    /// should drop it and create a new one.
    StaleSlot,
}

/// Routes host queries for a heterogeneous item list to per-type handlers.
///
/// # Example
///
/// ```
/// use motley_list::{AnyItem, BindContext, BindOutcome, Dispatcher, Host, ItemHandler};
///
/// struct Console;
/// impl Host for Console {
///     type Context = ();
///     type Container = String;
///     type Callback = ();
/// }
///
/// struct Note(&'static str);
///
/// #[derive(Default)]
/// struct NoteHandler;
///
/// impl ItemHandler<Console> for NoteHandler {
///     type Item = Note;
///     type Slot = ();
///
///     fn create_slot(&mut self, _container: &mut String, _context: &()) {}
///
///     fn render(&mut self, _: &mut (), row: &mut String, note: &Note, _: &BindContext<'_, Console>) {
///         *row = note.0.to_string();
///     }
/// }
///
/// let mut dispatcher = Dispatcher::<Console>::new(());
/// dispatcher.register_default::<NoteHandler>().unwrap();
/// dispatcher.set_items(vec![AnyItem::new(Note("a")), AnyItem::new(Note("b"))]);
///
/// let key = dispatcher.type_key_for(1).unwrap();
/// let mut slot = dispatcher.create_slot_for_type(key, String::new());
/// assert_eq!(dispatcher.bind_slot(&mut slot, 1), BindOutcome::Bound);
/// assert_eq!(slot.container(), "b");
/// ```
pub struct Dispatcher<H: Host> {
    items: Vec<AnyItem>,
    registry: HandlerRegistry<H>,
    callback: Option<Rc<H::Callback>>,
    listener: Option<InvalidationListener>,
    config: DispatcherConfig,
    invalidations: u64,
}

impl<H: Host> Dispatcher<H> {
    /// Create an empty dispatcher. `context` is shared with every handler.
    pub fn new(context: H::Context) -> Self {
        Self::with_config(context, DispatcherConfig::default())
    }

    pub fn with_config(context: H::Context, config: DispatcherConfig) -> Self {
        Self {
            items: Vec::new(),
            registry: HandlerRegistry::with_policy(context, config.duplicate_registration),
            callback: None,
            listener: None,
            config,
            invalidations: 0,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry<H> {
        &self.registry
    }

    pub fn context(&self) -> &H::Context {
        self.registry.context()
    }

    /// Build a handler with `factory` and register it. See
    /// [`HandlerRegistry::register`].
    ///
    /// When items of the handler's type are already present, the host is
    /// invalidated so rows resolved before the registration (placeholders, or
    /// slots of a replaced handler) are re-resolved.
    pub fn register<D, F, E>(&mut self, factory: F) -> RegistryResult<TypeKey>
    where
        D: ItemHandler<H>,
        F: FnOnce(&H::Context) -> Result<D, E>,
        E: Into<FactoryError>,
    {
        let key = self.registry.register(factory)?;

        let item_type = TypeId::of::<D::Item>();
        if self.items.iter().any(|item| item.type_id() == item_type) {
            tracing::debug!("Registered {} with items already present", key);
            self.invalidate();
        }
        Ok(key)
    }

    pub fn register_handler<D: ItemHandler<H>>(&mut self, handler: D) -> RegistryResult<TypeKey> {
        self.register(|_| Ok::<_, Infallible>(handler))
    }

    pub fn register_default<D: ItemHandler<H> + Default>(&mut self) -> RegistryResult<TypeKey> {
        self.register(|_| Ok::<_, Infallible>(D::default()))
    }

    /// Typed access to a registered handler.
    pub fn handler<D: ItemHandler<H>>(&self) -> Option<&D> {
        self.registry.handler::<D>()
    }

    pub fn handler_mut<D: ItemHandler<H>>(&mut self) -> Option<&mut D> {
        self.registry.handler_mut::<D>()
    }

    /// Install the listener that receives invalidation signals.
    pub fn set_invalidation_listener(&mut self, listener: impl FnMut(Invalidation) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Number of invalidation signals sent so far.
    pub fn invalidation_count(&self) -> u64 {
        self.invalidations
    }

    /// Replace the whole item sequence.
    ///
    /// A non-empty input replaces the current items and sends exactly one
    /// [`Invalidation::DataSetChanged`]. An empty input follows
    /// [`DispatcherConfig::empty_items`]; by default it is ignored and the
    /// current items stay in place.
    pub fn set_items<I>(&mut self, items: I) -> SetItemsOutcome
    where
        I: IntoIterator<Item = AnyItem>,
    {
        profile_function!();

        let items: Vec<AnyItem> = items.into_iter().collect();
        if items.is_empty() {
            return match self.config.empty_items {
                EmptyItemsPolicy::Ignore => {
                    tracing::debug!(
                        "Ignoring empty item list, keeping {} items",
                        self.items.len()
                    );
                    SetItemsOutcome::Ignored
                }
                EmptyItemsPolicy::Clear => {
                    self.items.clear();
                    self.invalidate();
                    SetItemsOutcome::Cleared
                }
            };
        }

        self.items = items;
        tracing::debug!("Replaced item list with {} items", self.items.len());
        self.invalidate();
        SetItemsOutcome::Replaced {
            count: self.items.len(),
        }
    }

    /// Current items in order.
    pub fn items(&self) -> &[AnyItem] {
        &self.items
    }

    /// Number of items the host should lay out.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Item at `position`, or `None` when out of range.
    pub fn item_at(&self, position: usize) -> Option<&AnyItem> {
        self.items.get(position)
    }

    /// Type key for the item at `position`.
    ///
    /// `Some` for every valid position. Items whose type has no handler
    /// report [`TypeKey::PLACEHOLDER`].
    pub fn type_key_for(&self, position: usize) -> Option<TypeKey> {
        let item = self.items.get(position)?;
        Some(
            self.registry
                .key_of(item.type_id())
                .unwrap_or(TypeKey::PLACEHOLDER),
        )
    }

    /// Create a render slot for rows of type `key`, wrapping `container`.
    ///
    /// Returns an inert placeholder slot when no handler is registered under
    /// `key`; the host always gets a slot back.
    pub fn create_slot_for_type(&mut self, key: TypeKey, container: H::Container) -> RenderSlot<H> {
        profile_function!();

        match self.registry.create_slot(key, container) {
            Ok(slot) => {
                tracing::trace!("Created slot for {}", key);
                slot
            }
            Err(container) => {
                if !key.is_placeholder() {
                    tracing::debug!("No handler for {}, creating placeholder slot", key);
                }
                RenderSlot::placeholder(container)
            }
        }
    }

    /// Bind the item at `position` into `slot`.
    ///
    /// Placeholders, missing items, missing handlers, slots of another type
    /// and slots of a replaced handler are skipped; the returned
    /// [`BindOutcome`] says which.
    pub fn bind_slot(&mut self, slot: &mut RenderSlot<H>, position: usize) -> BindOutcome {
        profile_function!();

        if slot.is_placeholder() {
            return BindOutcome::Placeholder;
        }
        let Some(item) = self.items.get(position) else {
            return BindOutcome::MissingItem;
        };
        let Some(key) = self.registry.key_of(item.type_id()) else {
            return BindOutcome::MissingHandler;
        };
        if slot.type_key() != key {
            tracing::warn!(
                "Slot {} cannot bind {} at position {} ({})",
                slot.type_key(),
                item.type_name(),
                position,
                key
            );
            return BindOutcome::TypeMismatch;
        }

        match self
            .registry
            .bind(key, slot, item, position, self.callback.as_ref())
        {
            Some(Ok(())) => {
                tracing::trace!("Bound position {} with {}", position, key);
                BindOutcome::Bound
            }
            Some(Err(BindMismatch::Stale)) => {
                tracing::debug!(
                    "Slot for {} predates the current handler, position {} needs a new slot",
                    key,
                    position
                );
                BindOutcome::StaleSlot
            }
            Some(Err(mismatch)) => {
                tracing::warn!(
                    "Handler {} rejected {} at position {}: {:?} mismatch",
                    key,
                    item.type_name(),
                    position,
                    mismatch
                );
                BindOutcome::TypeMismatch
            }
            None => BindOutcome::MissingHandler,
        }
    }

    /// Install (or clear) the callback shared by all handlers.
    ///
    /// Every handler sees the new callback from its next bind on.
    pub fn set_callback(&mut self, callback: Option<Rc<H::Callback>>) {
        tracing::debug!(
            "Callback {} for {} handlers",
            if callback.is_some() { "installed" } else { "cleared" },
            self.registry.len()
        );
        self.callback = callback;
    }

    pub fn callback(&self) -> Option<&Rc<H::Callback>> {
        self.callback.as_ref()
    }

    /// Clear all items and reset every handler. Registrations are kept.
    ///
    /// The host is invalidated only if there were items to clear, so
    /// repeated resets send at most one signal.
    pub fn reset(&mut self) {
        let had_items = !self.items.is_empty();
        self.items.clear();
        self.registry.reset_all();
        tracing::debug!("Reset dispatcher ({} handlers)", self.registry.len());
        if had_items {
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
        let signal = Invalidation::DataSetChanged {
            count: self.items.len(),
        };
        if let Some(listener) = self.listener.as_mut() {
            listener(signal);
        }
    }
}

impl<H: Host> std::fmt::Debug for Dispatcher<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("items", &self.items.len())
            .field("registry", &self.registry)
            .field("has_callback", &self.callback.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
