//! Mixed Feed Example - one list, three item types
//!
//! Demonstrates registering per-type handlers, a shared callback, an
//! unregistered item type falling back to a placeholder row, and a
//! [`VirtualList`] recycling rows while scrolling.
//!
//! Run with: cargo run -p motley-list --example feed
//! Set RUST_LOG=motley_list=trace to see every bind.

use std::rc::Rc;

use motley_core::logging;
use motley_core::profiling::{ProfilingBackend, init_profiling, new_pass};
use motley_list::{
    AnyItem, BindContext, Dispatcher, Host, ItemHandler, VirtualList, VirtualListConfig,
};

trait FeedEvents {
    fn open(&self, title: &str);
}

struct Terminal;

impl Host for Terminal {
    type Context = Theme;
    type Container = String;
    type Callback = dyn FeedEvents;
}

struct Theme {
    bullet: char,
}

struct Post {
    title: String,
}

struct Ad {
    sponsor: &'static str,
}

struct Poll;

struct PostHandler;

impl ItemHandler<Terminal> for PostHandler {
    type Item = Post;
    type Slot = char;

    fn create_slot(&mut self, _row: &mut String, theme: &Theme) -> char {
        theme.bullet
    }

    fn render(&mut self, bullet: &mut char, row: &mut String, post: &Post, cx: &BindContext<'_, Terminal>) {
        *row = format!("{} [{}] {}", bullet, cx.position(), post.title);
        if let Some(events) = cx.callback() {
            events.open(&post.title);
        }
    }
}

#[derive(Default)]
struct AdHandler {
    impressions: usize,
}

impl ItemHandler<Terminal> for AdHandler {
    type Item = Ad;
    type Slot = ();

    fn create_slot(&mut self, _row: &mut String, _theme: &Theme) {}

    fn render(&mut self, _: &mut (), row: &mut String, ad: &Ad, _: &BindContext<'_, Terminal>) {
        self.impressions += 1;
        *row = format!("  sponsored by {}", ad.sponsor);
    }

    fn reset(&mut self) {
        self.impressions = 0;
    }
}

struct Printer;

impl FeedEvents for Printer {
    fn open(&self, title: &str) {
        tracing::trace!("prefetching {title}");
    }
}

fn main() {
    logging::init();
    init_profiling(ProfilingBackend::InProcess);

    let mut dispatcher = Dispatcher::<Terminal>::new(Theme { bullet: '*' });
    dispatcher
        .register(|_: &Theme| Ok::<_, std::convert::Infallible>(PostHandler))
        .expect("post handler");
    dispatcher.register_default::<AdHandler>().expect("ad handler");
    let printer: Rc<dyn FeedEvents> = Rc::new(Printer);
    dispatcher.set_callback(Some(printer));

    let feed = (0..40).map(|i| match i % 7 {
        3 => AnyItem::new(Ad { sponsor: "Acme" }),
        6 => AnyItem::new(Poll),
        _ => AnyItem::new(Post {
            title: format!("Post number {i}"),
        }),
    });
    dispatcher.set_items(feed);

    let mut list = VirtualList::new(VirtualListConfig {
        overscan: 1,
        item_height: 1.0,
    });
    list.viewport_mut().set_viewport_height(8.0);
    dispatcher.set_invalidation_listener(list.invalidation_listener());

    for page in 0..3 {
        let update = list.update(&mut dispatcher, String::new);
        new_pass();
        println!("--- page {page}: {update:?}");
        for position in list.viewport().visible_range() {
            if let Some(slot) = list.slot(position) {
                let text = if slot.is_placeholder() {
                    "  (unsupported item)"
                } else {
                    slot.container().as_str()
                };
                println!("{text}");
            }
        }
        list.viewport_mut().scroll_by(8.0);
    }

    if let Some(ads) = dispatcher.handler::<AdHandler>() {
        println!("ad impressions: {}", ads.impressions);
    }
    dispatcher.reset();
}
