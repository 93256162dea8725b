//! Tests for the recycling virtual list host.
//!
//! The list mounts only visible rows, pools rows that scroll away by type key
//! and rebinds every mounted row after the dispatcher invalidates it.

use motley_list::{
    AnyItem, BindContext, Dispatcher, ItemHandler, TypeKey, VirtualList, VirtualListConfig,
    VirtualListUpdate,
};
use motley_test_utils::{CallLog, MockContainer, MockContext, MockHost, RecordingHandler};

#[derive(Debug)]
struct Note(u32);

#[derive(Debug)]
struct Photo {
    id: u32,
}

#[derive(Debug)]
struct Video;

/// Note handler whose slot state differs from `RecordingHandler`'s.
#[derive(Default)]
struct CompactNoteHandler;

impl ItemHandler<MockHost> for CompactNoteHandler {
    type Item = Note;
    type Slot = u16;

    fn create_slot(&mut self, container: &mut MockContainer, _context: &MockContext) -> u16 {
        container.owner = Some("compact");
        0
    }

    fn render(
        &mut self,
        renders: &mut u16,
        container: &mut MockContainer,
        note: &Note,
        _cx: &BindContext<'_, MockHost>,
    ) {
        *renders += 1;
        container.content = format!("compact: {:?}", note);
        container.renders += 1;
    }
}

/// Even positions are notes, odd positions photos.
fn alternating(count: u32, offset: u32) -> Vec<AnyItem> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                AnyItem::new(Note(i + offset))
            } else {
                AnyItem::new(Photo { id: i + offset })
            }
        })
        .collect()
}

struct Fixture {
    log: CallLog,
    dispatcher: Dispatcher<MockHost>,
    list: VirtualList<MockHost>,
    next_container: usize,
}

impl Fixture {
    /// Rows are 10 units tall in a 30 unit viewport without overscan.
    fn new() -> Self {
        let log = CallLog::new();
        let mut dispatcher = Dispatcher::new(MockContext::default());
        dispatcher
            .register_handler(RecordingHandler::<Note>::new("notes", log.clone()))
            .unwrap();
        dispatcher
            .register_handler(RecordingHandler::<Photo>::new("photos", log.clone()))
            .unwrap();

        let mut list = VirtualList::new(VirtualListConfig {
            overscan: 0,
            item_height: 10.0,
        });
        list.viewport_mut().set_viewport_height(30.0);
        dispatcher.set_invalidation_listener(list.invalidation_listener());

        Self {
            log,
            dispatcher,
            list,
            next_container: 0,
        }
    }

    fn update(&mut self) -> VirtualListUpdate {
        let next = &mut self.next_container;
        self.list.update(&mut self.dispatcher, || {
            *next += 1;
            MockContainer::new(*next)
        })
    }

    fn content(&self, position: usize) -> Option<&str> {
        self.list
            .slot(position)
            .map(|slot| slot.container().content.as_str())
    }
}

#[test]
fn test_initial_update_mounts_visible_rows() {
    let mut fx = Fixture::new();
    fx.dispatcher.set_items(alternating(100, 0));

    let update = fx.update();

    // 30 units of viewport touch rows 0..=3
    assert_eq!(update.created, 4);
    assert_eq!(update.recycled, 0);
    assert_eq!(update.bound, 4);
    assert_eq!(fx.list.mounted_positions(), vec![0, 1, 2, 3]);
    assert_eq!(fx.content(0), Some("notes: Note(0)"));
    assert_eq!(fx.content(1), Some("photos: Photo { id: 1 }"));
    assert_eq!(fx.list.viewport().total_height(), 1000.0);
}

#[test]
fn test_update_without_changes_is_idle() {
    let mut fx = Fixture::new();
    fx.dispatcher.set_items(alternating(100, 0));
    fx.update();
    fx.log.clear();

    let update = fx.update();
    assert!(!update.has_changes());
    assert_eq!(update.bound, 0);
    assert!(fx.log.is_empty());
}

#[test]
fn test_scrolling_recycles_rows_by_type() {
    let mut fx = Fixture::new();
    fx.dispatcher.set_items(alternating(100, 0));
    fx.update();

    fx.list.viewport_mut().scroll_by(20.0);
    let update = fx.update();

    assert_eq!(update.unmounted, 2);
    assert_eq!(update.recycled, 2);
    assert_eq!(update.created, 0);
    assert_eq!(update.bound, 2);
    assert_eq!(fx.list.mounted_positions(), vec![2, 3, 4, 5]);

    // Row 4 reuses the note container from row 0, row 5 the photo one
    let row4 = fx.list.slot(4).unwrap();
    assert_eq!(row4.container().owner, Some("notes"));
    assert_eq!(row4.container().content, "notes: Note(4)");
    assert_eq!(row4.container().renders, 2);
    assert_eq!(fx.content(5), Some("photos: Photo { id: 5 }"));
    assert_eq!(fx.log.count_creates(), 4);
}

#[test]
fn test_invalidation_rebinds_mounted_rows() {
    let mut fx = Fixture::new();
    fx.dispatcher.set_items(alternating(100, 0));
    fx.update();

    fx.dispatcher.set_items(alternating(100, 1000));
    let update = fx.update();

    assert_eq!(update.created, 0);
    assert_eq!(update.recycled, 4);
    assert_eq!(update.bound, 4);
    assert_eq!(fx.content(0), Some("notes: Note(1000)"));
    assert_eq!(fx.content(3), Some("photos: Photo { id: 1003 }"));
}

#[test]
fn test_invalidation_after_shrink_pools_extra_rows() {
    let mut fx = Fixture::new();
    fx.dispatcher.set_items(alternating(100, 0));
    fx.update();
    fx.list.viewport_mut().set_scroll_offset(500.0);
    fx.update();
    assert_eq!(fx.list.mounted_positions(), vec![50, 51, 52, 53]);

    fx.dispatcher.set_items(alternating(2, 0));
    fx.update();

    assert_eq!(fx.list.viewport().scroll_offset(), 0.0);
    assert_eq!(fx.list.mounted_positions(), vec![0, 1]);

    let note = fx.dispatcher.type_key_for(0).unwrap();
    let photo = fx.dispatcher.type_key_for(1).unwrap();
    assert_eq!(fx.list.pooled(note) + fx.list.pooled(photo), 2);
}

#[test]
fn test_reset_empties_the_list() {
    let mut fx = Fixture::new();
    fx.dispatcher.set_items(alternating(100, 0));
    fx.update();

    fx.dispatcher.reset();
    fx.update();

    assert_eq!(fx.list.mounted_count(), 0);
    assert_eq!(fx.list.viewport().visible_range(), 0..0);
    assert_eq!(fx.log.count_resets(), 2);
}

#[test]
fn test_unregistered_rows_use_placeholder_slots() {
    let mut fx = Fixture::new();
    fx.dispatcher.set_items(vec![
        AnyItem::new(Video),
        AnyItem::new(Note(1)),
        AnyItem::new(Video),
    ]);

    let update = fx.update();
    assert_eq!(update.created, 3);
    assert_eq!(update.bound, 1);
    assert_eq!(update.skipped, 2);

    let placeholder = fx.list.slot(0).unwrap();
    assert!(placeholder.is_placeholder());
    assert_eq!(placeholder.container().content, "");

    fx.list.invalidate();
    fx.update();
    assert_eq!(fx.list.pooled(TypeKey::PLACEHOLDER), 0);
    assert!(fx.list.slot(2).unwrap().is_placeholder());
}

#[test]
fn test_replaced_handler_rebuilds_its_rows() {
    let mut fx = Fixture::new();
    fx.dispatcher.set_items(alternating(100, 0));
    fx.update();

    fx.dispatcher
        .register_default::<CompactNoteHandler>()
        .unwrap();
    fx.dispatcher.set_items(alternating(100, 1000));
    let update = fx.update();

    // Note rows (0 and 2) held slots of the replaced handler
    assert_eq!(update.recycled, 4);
    assert_eq!(update.rebuilt, 2);
    assert_eq!(update.created, 2);
    assert_eq!(update.bound, 4);
    assert_eq!(update.skipped, 0);
    assert_eq!(fx.content(0), Some("compact: Note(1000)"));
    assert_eq!(fx.content(2), Some("compact: Note(1002)"));
    assert_eq!(fx.content(1), Some("photos: Photo { id: 1001 }"));
    assert_eq!(fx.list.slot(0).unwrap().container().owner, Some("compact"));

    // Rebuilt slots recycle normally afterwards
    fx.list.viewport_mut().scroll_by(20.0);
    let update = fx.update();
    assert_eq!(update.rebuilt, 0);
    assert_eq!(update.bound, 2);
    assert_eq!(fx.content(4), Some("compact: Note(1004)"));
}

#[test]
fn test_replacement_alone_refreshes_mounted_rows() {
    let mut fx = Fixture::new();
    fx.dispatcher.set_items(alternating(100, 0));
    fx.update();

    fx.dispatcher
        .register_default::<CompactNoteHandler>()
        .unwrap();
    let update = fx.update();

    assert_eq!(update.rebuilt, 2);
    assert_eq!(fx.content(0), Some("compact: Note(0)"));
    assert_eq!(fx.content(3), Some("photos: Photo { id: 3 }"));
}

#[test]
fn test_late_registration_replaces_placeholder_rows() {
    let mut fx = Fixture::new();
    fx.dispatcher
        .set_items(vec![AnyItem::new(Video), AnyItem::new(Note(1))]);
    fx.update();
    assert!(fx.list.slot(0).unwrap().is_placeholder());

    fx.dispatcher
        .register_handler(RecordingHandler::<Video>::new("videos", fx.log.clone()))
        .unwrap();
    let update = fx.update();

    let row = fx.list.slot(0).unwrap();
    assert!(!row.is_placeholder());
    assert_eq!(row.container().content, "videos: Video");
    assert_eq!(update.bound, 2);
    assert_eq!(fx.list.pooled(TypeKey::PLACEHOLDER), 1);
}
