//! Test utilities for Motley list dispatch.
//!
//! This crate provides a mock host and call-recording handlers so tests can
//! drive a [`Dispatcher`](motley_list::Dispatcher) without a real list view.
//!
//! # Overview
//!
//! - [`MockHost`] - Host whose containers are plain [`MockContainer`] rows
//! - [`RecordingHandler`] - Handler that records every call into a [`CallLog`]
//! - [`RecordingEvents`] - Callback that records which rows were clicked
//!
//! # Example
//!
//! ```rust
//! use motley_list::{AnyItem, BindOutcome, Dispatcher};
//! use motley_test_utils::{CallLog, MockContainer, MockContext, MockHost, RecordingHandler};
//!
//! let log = CallLog::new();
//! let mut dispatcher = Dispatcher::<MockHost>::new(MockContext::default());
//! dispatcher
//!     .register_handler(RecordingHandler::<u32>::new("numbers", log.clone()))
//!     .unwrap();
//! dispatcher.set_items(vec![AnyItem::new(7u32)]);
//!
//! let key = dispatcher.type_key_for(0).unwrap();
//! let mut slot = dispatcher.create_slot_for_type(key, MockContainer::new(0));
//! assert_eq!(dispatcher.bind_slot(&mut slot, 0), BindOutcome::Bound);
//!
//! assert_eq!(slot.container().content, "numbers: 7");
//! assert_eq!(log.count_renders(), 1);
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use motley_list::{BindContext, Host, ItemHandler};
use parking_lot::Mutex;

/// Host used throughout the tests.
pub struct MockHost;

impl Host for MockHost {
    type Context = MockContext;
    type Container = MockContainer;
    type Callback = dyn ListEvents;
}

/// Shared context handed to handler factories and binds.
#[derive(Debug, Clone)]
pub struct MockContext {
    pub theme: &'static str,
}

impl Default for MockContext {
    fn default() -> Self {
        Self { theme: "light" }
    }
}

/// A row container. Handlers write their output into `content`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockContainer {
    pub id: usize,
    /// Handler that created the slot wrapping this container.
    pub owner: Option<&'static str>,
    pub content: String,
    pub renders: usize,
}

impl MockContainer {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

/// Callback shared by all handlers of a [`MockHost`] dispatcher.
pub trait ListEvents {
    fn label(&self) -> &str;
    fn clicked(&self, position: usize);
}

/// [`ListEvents`] implementation that records clicks.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    label: String,
    clicks: Mutex<Vec<usize>>,
}

impl RecordingEvents {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            clicks: Mutex::new(Vec::new()),
        }
    }

    pub fn clicks(&self) -> Vec<usize> {
        self.clicks.lock().clone()
    }
}

impl ListEvents for RecordingEvents {
    fn label(&self) -> &str {
        &self.label
    }

    fn clicked(&self, position: usize) {
        self.clicks.lock().push(position);
    }
}

/// Records a handler call for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerCall {
    CreateSlot {
        handler: &'static str,
        container: usize,
    },
    Render {
        handler: &'static str,
        position: usize,
        /// Label of the callback visible during the bind.
        callback: Option<String>,
    },
    Reset {
        handler: &'static str,
    },
}

/// Call log shared between handlers and the test body.
///
/// Cloning is cheap; all clones append to the same log.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<HandlerCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: HandlerCall) {
        self.calls.lock().push(call);
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<HandlerCall> {
        self.calls.lock().clone()
    }

    pub fn count_creates(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, HandlerCall::CreateSlot { .. }))
            .count()
    }

    pub fn count_renders(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, HandlerCall::Render { .. }))
            .count()
    }

    pub fn count_resets(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, HandlerCall::Reset { .. }))
            .count()
    }

    /// Callback labels seen by renders, in call order.
    pub fn render_callbacks(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                HandlerCall::Render { callback, .. } => Some(callback.clone()),
                _ => None,
            })
            .collect()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}

/// Per-slot state created by a [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSlot {
    /// Creation order within the handler, starting at 0.
    pub serial: usize,
}

/// Handler for items of type `T` that records every call.
///
/// Rendering writes `"{name}: {item:?}"` into the container.
pub struct RecordingHandler<T> {
    name: &'static str,
    log: CallLog,
    created: usize,
    resets: usize,
    _item: PhantomData<fn() -> T>,
}

impl<T> RecordingHandler<T> {
    pub fn new(name: &'static str, log: CallLog) -> Self {
        Self {
            name,
            log,
            created: 0,
            resets: 0,
            _item: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of slots this handler created.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Number of times this handler was reset.
    pub fn resets(&self) -> usize {
        self.resets
    }
}

impl<T: Debug + 'static> ItemHandler<MockHost> for RecordingHandler<T> {
    type Item = T;
    type Slot = RecordedSlot;

    fn create_slot(&mut self, container: &mut MockContainer, _context: &MockContext) -> RecordedSlot {
        self.log.record(HandlerCall::CreateSlot {
            handler: self.name,
            container: container.id,
        });
        container.owner = Some(self.name);

        let slot = RecordedSlot {
            serial: self.created,
        };
        self.created += 1;
        slot
    }

    fn render(
        &mut self,
        _slot: &mut RecordedSlot,
        container: &mut MockContainer,
        item: &T,
        cx: &BindContext<'_, MockHost>,
    ) {
        self.log.record(HandlerCall::Render {
            handler: self.name,
            position: cx.position(),
            callback: cx.callback().map(|events| events.label().to_string()),
        });
        container.content = format!("{}: {:?}", self.name, item);
        container.renders += 1;
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.log.record(HandlerCall::Reset { handler: self.name });
    }
}
