//! Virtual scrolling host for a [`Dispatcher`].
//!
//! [`VirtualList`] plays the part of a recycling list view: it keeps render
//! slots only for the visible range plus an overscan buffer, pools slots that
//! scroll out of view by [`TypeKey`], and reuses them for newly visible
//! positions of the same key. It talks to the dispatcher exclusively through
//! the four host-facing calls.

use std::cell::Cell;
use std::ops::Range;
use std::rc::Rc;

use motley_core::alloc::HashMap;

use crate::dispatcher::{BindOutcome, Dispatcher};
use crate::host::{Host, Invalidation};
use crate::registry::TypeKey;
use crate::slot::RenderSlot;

/// Configuration for virtual scrolling behavior.
#[derive(Debug, Clone)]
pub struct VirtualListConfig {
    /// Number of items to keep mounted above/below the visible area.
    pub overscan: usize,
    /// Height of every row.
    pub item_height: f32,
}

impl Default for VirtualListConfig {
    fn default() -> Self {
        Self {
            overscan: 3,
            item_height: 1.0,
        }
    }
}

/// Scroll position and visible range of a fixed-height list.
#[derive(Debug, Clone)]
pub struct ViewportState {
    config: VirtualListConfig,
    total_items: usize,
    scroll_offset: f32,
    viewport_height: f32,
}

impl ViewportState {
    pub fn new(config: VirtualListConfig) -> Self {
        Self {
            config,
            total_items: 0,
            scroll_offset: 0.0,
            viewport_height: 0.0,
        }
    }

    /// Updates the total number of items, clamping the scroll offset.
    pub fn set_total_items(&mut self, count: usize) {
        if self.total_items != count {
            self.total_items = count;
            self.clamp_scroll_offset();
        }
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Updates the viewport height, clamping the scroll offset.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.clamp_scroll_offset();
    }

    fn clamp_scroll_offset(&mut self) {
        let max_offset = self.max_scroll_offset();
        if self.scroll_offset > max_offset {
            self.scroll_offset = max_offset;
        }
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn total_height(&self) -> f32 {
        self.config.item_height * self.total_items as f32
    }

    pub fn max_scroll_offset(&self) -> f32 {
        (self.total_height() - self.viewport_height).max(0.0)
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset.clamp(0.0, self.max_scroll_offset());
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.set_scroll_offset(self.scroll_offset + delta);
    }

    /// Scrolls the minimum distance needed to show `index` fully.
    pub fn scroll_to_item(&mut self, index: usize) {
        if index >= self.total_items {
            return;
        }

        let item_offset = self.item_offset(index);
        let item_height = self.config.item_height;

        if item_offset >= self.scroll_offset
            && item_offset + item_height <= self.scroll_offset + self.viewport_height
        {
            return;
        }

        let target = if item_offset < self.scroll_offset {
            item_offset
        } else {
            (item_offset + item_height - self.viewport_height).max(0.0)
        };
        self.set_scroll_offset(target);
    }

    /// Gets the Y offset for an item at the given index.
    pub fn item_offset(&self, index: usize) -> f32 {
        self.config.item_height * index as f32
    }

    /// Gets the item index at a given Y position.
    pub fn item_at_position(&self, y: f32) -> Option<usize> {
        if y < 0.0 || self.total_items == 0 || self.config.item_height <= 0.0 {
            return None;
        }
        let index = (y / self.config.item_height) as usize;
        (index < self.total_items).then_some(index)
    }

    /// Visible range including overscan.
    pub fn visible_range(&self) -> Range<usize> {
        if self.total_items == 0 || self.viewport_height <= 0.0 {
            return 0..0;
        }

        let start_index = self
            .item_at_position(self.scroll_offset)
            .unwrap_or(0)
            .saturating_sub(self.config.overscan);

        let end_y = self.scroll_offset + self.viewport_height;
        let end_index = self
            .item_at_position(end_y)
            .map(|i| i + 1)
            .unwrap_or(self.total_items)
            .saturating_add(self.config.overscan)
            .min(self.total_items);

        start_index..end_index
    }

    pub fn config(&self) -> &VirtualListConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut VirtualListConfig {
        &mut self.config
    }
}

/// Information about what changed during a [`VirtualList::update`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VirtualListUpdate {
    /// Slots created through the dispatcher.
    pub created: usize,
    /// Slots taken from the recycle pool.
    pub recycled: usize,
    /// Positions successfully bound.
    pub bound: usize,
    /// Positions whose bind was skipped (placeholders, mismatches).
    pub skipped: usize,
    /// Slots discarded because the dispatcher refused them, then recreated.
    pub rebuilt: usize,
    /// Positions that left the visible range.
    pub unmounted: usize,
}

impl VirtualListUpdate {
    /// Returns true if any changes occurred.
    pub fn has_changes(&self) -> bool {
        self.created + self.recycled + self.unmounted > 0
    }
}

/// A recycling list host that mounts only the visible rows.
pub struct VirtualList<H: Host> {
    viewport: ViewportState,
    mounted: HashMap<usize, RenderSlot<H>>,
    pool: HashMap<TypeKey, Vec<RenderSlot<H>>>,
    stale: Rc<Cell<bool>>,
}

impl<H: Host> VirtualList<H> {
    pub fn new(config: VirtualListConfig) -> Self {
        Self {
            viewport: ViewportState::new(config),
            mounted: HashMap::default(),
            pool: HashMap::default(),
            stale: Rc::new(Cell::new(false)),
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportState {
        &mut self.viewport
    }

    /// Listener to install with [`Dispatcher::set_invalidation_listener`].
    ///
    /// Any signal marks every mounted row stale; the next
    /// [`update`](Self::update) re-resolves and rebinds them.
    pub fn invalidation_listener(&self) -> impl FnMut(Invalidation) + 'static {
        let stale = Rc::clone(&self.stale);
        move |_| stale.set(true)
    }

    /// Mark every mounted row stale without a dispatcher signal.
    pub fn invalidate(&mut self) {
        self.stale.set(true);
    }

    /// Bring mounted rows in line with the dispatcher and scroll position.
    ///
    /// `make_container` is called whenever a new slot must be created.
    pub fn update(
        &mut self,
        dispatcher: &mut Dispatcher<H>,
        mut make_container: impl FnMut() -> H::Container,
    ) -> VirtualListUpdate {
        let mut update = VirtualListUpdate::default();

        self.viewport.set_total_items(dispatcher.item_count());
        let range = self.viewport.visible_range();

        if self.stale.replace(false) {
            let positions: Vec<usize> = self.mounted.keys().copied().collect();
            for position in positions {
                self.unmount(position);
            }
            tracing::trace!("Recycled all rows after invalidation");
        }

        let out_of_range: Vec<usize> = self
            .mounted
            .keys()
            .copied()
            .filter(|position| !range.contains(position))
            .collect();
        for position in out_of_range {
            self.unmount(position);
            update.unmounted += 1;
        }

        for position in range {
            if self.mounted.contains_key(&position) {
                continue;
            }
            let Some(key) = dispatcher.type_key_for(position) else {
                continue;
            };

            let mut slot = match self.pool.get_mut(&key).and_then(Vec::pop) {
                Some(slot) => {
                    update.recycled += 1;
                    slot
                }
                None => {
                    update.created += 1;
                    dispatcher.create_slot_for_type(key, make_container())
                }
            };

            let mut outcome = dispatcher.bind_slot(&mut slot, position);
            if matches!(outcome, BindOutcome::StaleSlot | BindOutcome::TypeMismatch) {
                tracing::debug!(
                    "Rebuilding slot for {} at position {} ({:?})",
                    key,
                    position,
                    outcome
                );
                slot = dispatcher.create_slot_for_type(key, make_container());
                update.created += 1;
                update.rebuilt += 1;
                outcome = dispatcher.bind_slot(&mut slot, position);
            }

            match outcome {
                BindOutcome::Bound => update.bound += 1,
                _ => update.skipped += 1,
            }
            self.mounted.insert(position, slot);
        }

        update
    }

    fn unmount(&mut self, position: usize) {
        if let Some(slot) = self.mounted.remove(&position) {
            self.pool.entry(slot.type_key()).or_default().push(slot);
        }
    }

    /// Slot mounted at `position`.
    pub fn slot(&self, position: usize) -> Option<&RenderSlot<H>> {
        self.mounted.get(&position)
    }

    /// Mounted positions in ascending order.
    pub fn mounted_positions(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self.mounted.keys().copied().collect();
        positions.sort_unstable();
        positions
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    /// Number of pooled slots for `key`.
    pub fn pooled(&self, key: TypeKey) -> usize {
        self.pool.get(&key).map_or(0, Vec::len)
    }
}
