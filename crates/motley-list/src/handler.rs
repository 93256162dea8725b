//! Per-type item handlers.
//!
//! An [`ItemHandler`] owns everything specific to one item type: how to build
//! the view state for a fresh row, and how to render an item into it. The
//! dispatcher stores handlers behind a private object-safe trait so that
//! handlers with different `Item`/`Slot` types can live in one registry.
//!
//! # Example
//!
//! ```
//! use motley_list::{BindContext, Host, ItemHandler};
//!
//! struct Console;
//! impl Host for Console {
//!     type Context = ();
//!     type Container = Vec<String>;
//!     type Callback = ();
//! }
//!
//! struct Note(String);
//!
//! struct NoteHandler;
//!
//! impl ItemHandler<Console> for NoteHandler {
//!     type Item = Note;
//!     type Slot = ();
//!
//!     fn create_slot(&mut self, _container: &mut Vec<String>, _context: &()) {}
//!
//!     fn render(
//!         &mut self,
//!         _slot: &mut (),
//!         container: &mut Vec<String>,
//!         note: &Note,
//!         cx: &BindContext<'_, Console>,
//!     ) {
//!         container.clear();
//!         container.push(format!("{}: {}", cx.position(), note.0));
//!     }
//! }
//! ```

use std::any::Any;
use std::rc::Rc;

use crate::host::Host;
use crate::item::AnyItem;
use crate::slot::RenderSlot;

/// Everything a handler may read while rendering one item.
pub struct BindContext<'a, H: Host> {
    context: &'a H::Context,
    callback: Option<&'a Rc<H::Callback>>,
    position: usize,
}

impl<'a, H: Host> BindContext<'a, H> {
    pub(crate) fn new(
        context: &'a H::Context,
        callback: Option<&'a Rc<H::Callback>>,
        position: usize,
    ) -> Self {
        Self {
            context,
            callback,
            position,
        }
    }

    /// Host context injected at registration.
    pub fn context(&self) -> &'a H::Context {
        self.context
    }

    /// Shared callback currently installed on the dispatcher, if any.
    pub fn callback(&self) -> Option<&'a Rc<H::Callback>> {
        self.callback
    }

    /// Position of the item being bound.
    ///
    /// Valid for this call only; positions shift whenever items are replaced.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Creates and populates rows for one item type.
///
/// One instance exists per registered item type and lives as long as the
/// dispatcher. The item type a handler serves is its [`Item`](Self::Item)
/// associated type.
pub trait ItemHandler<H: Host>: 'static {
    /// Payload type this handler renders.
    type Item: 'static;

    /// Per-row view state kept next to the host container (child views,
    /// cached layout, listeners).
    type Slot: 'static;

    /// Build the view state for a new row. No item is available yet.
    fn create_slot(&mut self, container: &mut H::Container, context: &H::Context) -> Self::Slot;

    /// Populate `container` from `item`.
    ///
    /// By the time this runs the render slot already records `item` as its
    /// bound item.
    fn render(
        &mut self,
        slot: &mut Self::Slot,
        container: &mut H::Container,
        item: &Self::Item,
        cx: &BindContext<'_, H>,
    );

    /// Release per-type cached state. Called on every dispatcher reset.
    fn reset(&mut self) {}
}

/// Why a bind could not reach the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindMismatch {
    /// The item is not the handler's `Item` type.
    Item,
    /// The slot state was built by another handler.
    Slot,
    /// The slot was built by a handler that has since been replaced.
    Stale,
}

/// Object-safe view of an [`ItemHandler`], implemented for every handler.
pub(crate) trait ErasedHandler<H: Host> {
    fn handler_name(&self) -> &'static str;

    fn create_slot(&mut self, container: &mut H::Container, context: &H::Context) -> Box<dyn Any>;

    fn bind(
        &mut self,
        slot: &mut RenderSlot<H>,
        item: &AnyItem,
        cx: &BindContext<'_, H>,
    ) -> Result<(), BindMismatch>;

    fn reset(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<H, D> ErasedHandler<H> for D
where
    H: Host,
    D: ItemHandler<H>,
{
    fn handler_name(&self) -> &'static str {
        std::any::type_name::<D>()
    }

    fn create_slot(&mut self, container: &mut H::Container, context: &H::Context) -> Box<dyn Any> {
        Box::new(<D as ItemHandler<H>>::create_slot(self, container, context))
    }

    fn bind(
        &mut self,
        slot: &mut RenderSlot<H>,
        item: &AnyItem,
        cx: &BindContext<'_, H>,
    ) -> Result<(), BindMismatch> {
        let Some(payload) = item.downcast_ref::<D::Item>() else {
            return Err(BindMismatch::Item);
        };
        let Some(state) = slot
            .state
            .as_mut()
            .and_then(|state| state.downcast_mut::<D::Slot>())
        else {
            return Err(BindMismatch::Slot);
        };

        slot.bound = Some(item.clone());
        <D as ItemHandler<H>>::render(self, state, &mut slot.container, payload, cx);
        Ok(())
    }

    fn reset(&mut self) {
        <D as ItemHandler<H>>::reset(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
