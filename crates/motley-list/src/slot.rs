//! Render slots: a host container plus the item last bound into it.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::host::Host;
use crate::item::AnyItem;
use crate::registry::TypeKey;

/// What kind of row a slot was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Created by the handler registered under the given key.
    Handler(TypeKey),
    /// Inert stand-in for an item type without a handler. Never bound.
    Placeholder,
}

/// A live row: one host container, the handler's view state for it, and the
/// most recently bound item.
///
/// Slots are created by [`Dispatcher::create_slot_for_type`] and handed back
/// to [`Dispatcher::bind_slot`] for every (re)bind. Only the latest bound item
/// is kept. A slot belongs to the handler that built it: once that handler is
/// replaced the slot is stale and must be recreated.
///
/// [`Dispatcher::create_slot_for_type`]: crate::Dispatcher::create_slot_for_type
/// [`Dispatcher::bind_slot`]: crate::Dispatcher::bind_slot
pub struct RenderSlot<H: Host> {
    pub(crate) kind: SlotKind,
    pub(crate) generation: u32,
    pub(crate) container: H::Container,
    pub(crate) state: Option<Box<dyn Any>>,
    pub(crate) bound: Option<AnyItem>,
}

impl<H: Host> RenderSlot<H> {
    pub(crate) fn for_handler(
        key: TypeKey,
        generation: u32,
        container: H::Container,
        state: Box<dyn Any>,
    ) -> Self {
        Self {
            kind: SlotKind::Handler(key),
            generation,
            container,
            state: Some(state),
            bound: None,
        }
    }

    pub(crate) fn placeholder(container: H::Container) -> Self {
        Self {
            kind: SlotKind::Placeholder,
            generation: 0,
            container,
            state: None,
            bound: None,
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == SlotKind::Placeholder
    }

    /// Type key of the handler that created this slot.
    pub fn type_key(&self) -> TypeKey {
        match self.kind {
            SlotKind::Handler(key) => key,
            SlotKind::Placeholder => TypeKey::PLACEHOLDER,
        }
    }

    pub fn container(&self) -> &H::Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut H::Container {
        &mut self.container
    }

    /// Give the container back to the host, dropping the bound item and the
    /// handler's view state.
    pub fn into_container(self) -> H::Container {
        self.container
    }

    /// Item from the most recent successful bind.
    pub fn bound_item(&self) -> Option<&AnyItem> {
        self.bound.as_ref()
    }

    /// Most recently bound item, if it is a `T`.
    pub fn bound_as<T: 'static>(&self) -> Option<Rc<T>> {
        self.bound.as_ref().and_then(AnyItem::downcast_rc::<T>)
    }

    /// The handler's view state, if it is an `S`.
    pub fn state<S: 'static>(&self) -> Option<&S> {
        self.state.as_ref().and_then(|state| state.downcast_ref::<S>())
    }
}

impl<H: Host> fmt::Debug for RenderSlot<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderSlot")
            .field("kind", &self.kind)
            .field("generation", &self.generation)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}
