//! Motley List - type-dispatching adapter for heterogeneous lists
//!
//! A host list view shows a single ordered sequence of items whose runtime
//! types differ. This crate keeps that sequence and routes every per-position
//! query to the handler registered for the item's type:
//! - Handlers are registered per item type and issued a stable [`TypeKey`]
//! - Unregistered types render as inert placeholders instead of failing
//! - A shared callback is handed to every bind through [`BindContext`]
//! - [`VirtualList`] is a recycling host that mounts only visible rows
//!
//! ## Quick Start
//!
//! ```rust
//! use motley_list::{items, BindContext, Dispatcher, Host, ItemHandler};
//!
//! struct Terminal;
//! impl Host for Terminal {
//!     type Context = ();
//!     type Container = String;
//!     type Callback = ();
//! }
//!
//! struct Heading(&'static str);
//!
//! #[derive(Default)]
//! struct HeadingHandler;
//!
//! impl ItemHandler<Terminal> for HeadingHandler {
//!     type Item = Heading;
//!     type Slot = ();
//!
//!     fn create_slot(&mut self, _container: &mut String, _context: &()) {}
//!
//!     fn render(&mut self, _: &mut (), row: &mut String, item: &Heading, _: &BindContext<'_, Terminal>) {
//!         *row = format!("# {}", item.0);
//!     }
//! }
//!
//! let mut dispatcher = Dispatcher::<Terminal>::new(());
//! dispatcher.register_default::<HeadingHandler>().unwrap();
//! dispatcher.set_items(items([Heading("intro"), Heading("usage")]));
//!
//! // In the host's layout pass:
//! let key = dispatcher.type_key_for(1).unwrap();
//! let mut row = dispatcher.create_slot_for_type(key, String::new());
//! dispatcher.bind_slot(&mut row, 1);
//! assert_eq!(row.container(), "# usage");
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod host;
pub mod item;
mod profiling;
pub mod registry;
pub mod slot;
pub mod virtual_scroll;

pub use config::{DispatcherConfig, DuplicatePolicy, EmptyItemsPolicy};
pub use dispatcher::{BindOutcome, Dispatcher, SetItemsOutcome};
pub use error::{FactoryError, RegistryError, RegistryResult};
pub use handler::{BindContext, ItemHandler};
pub use host::{Host, Invalidation, InvalidationListener};
pub use item::{AnyItem, ItemType, items};
pub use registry::{HandlerEntry, HandlerRegistry, TypeKey};
pub use slot::{RenderSlot, SlotKind};
pub use virtual_scroll::{ViewportState, VirtualList, VirtualListConfig, VirtualListUpdate};
