//! Handler registry for dispatching create/bind operations by item type.
//!
//! Each registered handler receives a [`TypeKey`] issued in registration order.
//! Keys are small dense integers: the host uses them to pool rows, and the
//! registry uses them as indices for O(1) lookup. A separate `TypeId` index
//! resolves a runtime item to its key.

use std::any::TypeId;
use std::fmt;
use std::rc::Rc;

use motley_core::alloc::HashMap;

use crate::config::DuplicatePolicy;
use crate::error::{FactoryError, RegistryError, RegistryResult};
use crate::handler::{BindContext, BindMismatch, ErasedHandler, ItemHandler};
use crate::host::Host;
use crate::item::{AnyItem, ItemType};
use crate::slot::RenderSlot;

/// Identifier the host uses to tell row types apart.
///
/// Issued by the registry, one per registered item type, starting at zero.
/// Every item type without a handler shares [`TypeKey::PLACEHOLDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(u32);

impl TypeKey {
    /// Key reported for items whose type has no handler.
    pub const PLACEHOLDER: TypeKey = TypeKey(u32::MAX);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_placeholder(self) -> bool {
        self.0 == u32::MAX
    }

    /// Key for the entry at `index`, or `None` once the key space is used up.
    fn issue(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .filter(|&raw| raw != Self::PLACEHOLDER.0)
            .map(Self)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_placeholder() {
            f.write_str("#placeholder")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// One registered handler and the item type it serves.
pub struct HandlerEntry<H: Host> {
    key: TypeKey,
    item_type: ItemType,
    generation: u32,
    pub(crate) handler: Box<dyn ErasedHandler<H>>,
}

impl<H: Host> HandlerEntry<H> {
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Item type this handler binds.
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Number of times the handler under this key has been replaced.
    ///
    /// Slots record the generation they were built with; binding a slot from
    /// an earlier generation is refused.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Type name of the handler, for diagnostics.
    pub fn handler_name(&self) -> &'static str {
        self.handler.handler_name()
    }

    /// Typed access to the handler.
    pub fn downcast_ref<D: ItemHandler<H>>(&self) -> Option<&D> {
        self.handler.as_any().downcast_ref::<D>()
    }

    pub fn downcast_mut<D: ItemHandler<H>>(&mut self) -> Option<&mut D> {
        self.handler.as_any_mut().downcast_mut::<D>()
    }
}

impl<H: Host> fmt::Debug for HandlerEntry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("key", &self.key)
            .field("item_type", &self.item_type.name())
            .field("generation", &self.generation)
            .field("handler", &self.handler_name())
            .finish()
    }
}

/// Registry mapping item types to handler singletons.
///
/// Populated during setup and read on every host query. Late registration is
/// allowed; keys already handed out never change.
pub struct HandlerRegistry<H: Host> {
    context: H::Context,
    entries: Vec<HandlerEntry<H>>,
    keys: HashMap<TypeId, TypeKey>,
    duplicates: DuplicatePolicy,
}

impl<H: Host> HandlerRegistry<H> {
    /// Create an empty registry that injects `context` into every handler.
    pub fn new(context: H::Context) -> Self {
        Self::with_policy(context, DuplicatePolicy::default())
    }

    pub fn with_policy(context: H::Context, duplicates: DuplicatePolicy) -> Self {
        Self {
            context,
            entries: Vec::new(),
            keys: HashMap::default(),
            duplicates,
        }
    }

    /// Host context handed to every handler.
    pub fn context(&self) -> &H::Context {
        &self.context
    }

    /// Build a handler with `factory` and register it for its item type.
    ///
    /// The factory runs at most once. If it fails, the error is logged and
    /// returned and the item type stays as it was: unregistered, or still
    /// served by the previous handler.
    pub fn register<D, F, E>(&mut self, factory: F) -> RegistryResult<TypeKey>
    where
        D: ItemHandler<H>,
        F: FnOnce(&H::Context) -> Result<D, E>,
        E: Into<FactoryError>,
    {
        let item_type = ItemType::of::<D::Item>();
        let existing = self.keys.get(&item_type.id()).copied();

        if let Some(existing) = existing
            && self.duplicates == DuplicatePolicy::Reject
        {
            tracing::warn!(
                "Rejected handler {} for {}: already registered as {}",
                std::any::type_name::<D>(),
                item_type,
                existing
            );
            return Err(RegistryError::Duplicate {
                item_type,
                existing,
            });
        }

        let handler = match factory(&self.context) {
            Ok(handler) => handler,
            Err(source) => {
                let err = RegistryError::Construction {
                    handler: std::any::type_name::<D>(),
                    source: source.into(),
                };
                tracing::warn!("{err}; {item_type} left unchanged");
                return Err(err);
            }
        };

        let key = match existing {
            Some(key) => {
                let entry = &mut self.entries[key.index()];
                entry.handler = Box::new(handler);
                entry.generation = entry.generation.wrapping_add(1);
                tracing::debug!(
                    "Replaced handler for {} ({}) with {}, generation {}",
                    item_type,
                    key,
                    std::any::type_name::<D>(),
                    entry.generation
                );
                key
            }
            None => {
                let Some(key) = TypeKey::issue(self.entries.len()) else {
                    let err = RegistryError::KeysExhausted { item_type };
                    tracing::warn!("{err}");
                    return Err(err);
                };
                self.entries.push(HandlerEntry {
                    key,
                    item_type,
                    generation: 0,
                    handler: Box::new(handler),
                });
                self.keys.insert(item_type.id(), key);
                tracing::debug!(
                    "Registered {} for {} as {}",
                    std::any::type_name::<D>(),
                    item_type,
                    key
                );
                key
            }
        };
        Ok(key)
    }

    /// Register an already constructed handler.
    pub fn register_handler<D: ItemHandler<H>>(&mut self, handler: D) -> RegistryResult<TypeKey> {
        self.register(|_| Ok::<_, std::convert::Infallible>(handler))
    }

    /// Register a handler built with `D::default()`.
    pub fn register_default<D: ItemHandler<H> + Default>(&mut self) -> RegistryResult<TypeKey> {
        self.register_handler(D::default())
    }

    /// Look up the handler registered under `key`.
    pub fn lookup(&self, key: TypeKey) -> Option<&HandlerEntry<H>> {
        self.entries.get(key.index())
    }

    /// Create a render slot with the handler registered under `key`.
    ///
    /// Hands the container back untouched when no such handler exists.
    pub(crate) fn create_slot(
        &mut self,
        key: TypeKey,
        mut container: H::Container,
    ) -> Result<RenderSlot<H>, H::Container> {
        let Self {
            context, entries, ..
        } = self;
        match entries.get_mut(key.index()) {
            Some(entry) => {
                let state = entry.handler.create_slot(&mut container, context);
                Ok(RenderSlot::for_handler(
                    key,
                    entry.generation,
                    container,
                    state,
                ))
            }
            None => Err(container),
        }
    }

    /// Bind `item` into `slot` with the handler registered under `key`.
    ///
    /// `None` when no such handler exists.
    pub(crate) fn bind(
        &mut self,
        key: TypeKey,
        slot: &mut RenderSlot<H>,
        item: &AnyItem,
        position: usize,
        callback: Option<&Rc<H::Callback>>,
    ) -> Option<Result<(), BindMismatch>> {
        let Self {
            context, entries, ..
        } = self;
        let entry = entries.get_mut(key.index())?;
        if slot.generation != entry.generation {
            return Some(Err(BindMismatch::Stale));
        }
        let cx = BindContext::new(context, callback, position);
        Some(entry.handler.bind(slot, item, &cx))
    }

    /// Key registered for a runtime item type.
    pub fn key_of(&self, type_id: TypeId) -> Option<TypeKey> {
        self.keys.get(&type_id).copied()
    }

    /// Key registered for item type `T`.
    pub fn key_for<T: 'static>(&self) -> Option<TypeKey> {
        self.key_of(TypeId::of::<T>())
    }

    /// Check whether a handler is registered for the given item type.
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.keys.contains_key(&type_id)
    }

    /// Typed access to the handler serving `D::Item`.
    pub fn handler<D: ItemHandler<H>>(&self) -> Option<&D> {
        self.key_for::<D::Item>()
            .and_then(|key| self.lookup(key))
            .and_then(HandlerEntry::downcast_ref::<D>)
    }

    pub fn handler_mut<D: ItemHandler<H>>(&mut self) -> Option<&mut D> {
        let key = self.key_for::<D::Item>()?;
        self.entries
            .get_mut(key.index())
            .and_then(|entry| entry.downcast_mut::<D>())
    }

    /// Registered handlers in key order.
    pub fn iter(&self) -> impl Iterator<Item = &HandlerEntry<H>> {
        self.entries.iter()
    }

    /// Call `reset` on every handler.
    pub fn reset_all(&mut self) {
        for entry in &mut self.entries {
            entry.handler.reset();
        }
    }

    /// Number of registered item types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Host> fmt::Debug for HandlerRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("entries", &self.entries)
            .field("duplicates", &self.duplicates)
            .finish_non_exhaustive()
    }
}
