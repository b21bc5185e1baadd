//! Integration tests driving the adapters the way a host list widget does.

use std::collections::BTreeSet;
use std::sync::Arc;

use board_adapter::{
    AdapterDelegate, AdapterError, Container, DelegateAdapter, DelegateManager,
    DelegatePagingAdapter, DiffOp, ErrorAdapterDelegate, ErrorTextView, ErrorValue,
    ItemAdapterDelegate, ItemView, Items, KeyedDiffCallback, LayoutId, ListDiff, RecycleAware,
    StateBundle, Variant, VariantAdapterDelegate, adapt_to, static_layout_for_value,
};
use parking_lot::Mutex;

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("board_adapter=trace")
        .with_test_writer()
        .try_init();
}

const POST_LAYOUT: LayoutId = LayoutId::new("feed_post");
const COMMENT_LAYOUT: LayoutId = LayoutId::new("comment");
const LOADING_LAYOUT: LayoutId = LayoutId::new("feed_loading");

/// The host widget's parent view.
struct FeedList;

/// A row view. Video rows hold a player that must be released on recycle.
#[derive(Debug, Default)]
struct FeedCell {
    layout: &'static str,
    text: String,
    player_running: bool,
    released: usize,
}

impl RecycleAware for FeedCell {
    fn on_view_recycled(&mut self) {
        self.player_running = false;
        self.released += 1;
    }
}

impl ItemView for FeedCell {
    fn recycle_aware(&mut self) -> Option<&mut dyn RecycleAware> {
        if self.layout == POST_LAYOUT.name() {
            Some(self)
        } else {
            None
        }
    }
}

impl ErrorTextView for FeedCell {
    fn set_error_text(&mut self, text: &str) {
        self.text = text.to_owned();
    }
}

impl Container for FeedList {
    type View = FeedCell;

    fn inflate(&self, layout: LayoutId) -> FeedCell {
        FeedCell {
            layout: layout.name(),
            ..FeedCell::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Post {
    id: u64,
    title: String,
    video: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Comment {
    id: u64,
    body: String,
}

#[derive(Debug, Clone, PartialEq)]
enum FeedRow {
    Post(Post),
    Comment(Comment),
    Error(ErrorValue),
    Loading,
}

impl Variant<Post> for FeedRow {
    fn variant(&self) -> Option<&Post> {
        match self {
            FeedRow::Post(post) => Some(post),
            _ => None,
        }
    }
}

impl Variant<ErrorValue> for FeedRow {
    fn variant(&self) -> Option<&ErrorValue> {
        match self {
            FeedRow::Error(value) => Some(value),
            _ => None,
        }
    }
}

struct PostDelegate;

impl VariantAdapterDelegate<Post, FeedList> for PostDelegate {
    fn create_view(&self, parent: &FeedList) -> FeedCell {
        parent.inflate(POST_LAYOUT)
    }

    fn bind_variant(&self, view: &mut FeedCell, post: &Post) {
        view.text = post.title.clone();
        view.player_running = post.video;
    }
}

/// Renders comments and remembers which ones the user expanded.
#[derive(Default)]
struct CommentDelegate {
    expanded: BTreeSet<u64>,
}

impl ItemAdapterDelegate<Comment, FeedList> for CommentDelegate {
    fn is_for_item(&self, _item: &Comment) -> bool {
        true
    }

    fn create_view(&self, parent: &FeedList) -> FeedCell {
        parent.inflate(COMMENT_LAYOUT)
    }

    fn bind_item(&self, view: &mut FeedCell, comment: &Comment) {
        view.text = if self.expanded.contains(&comment.id) {
            comment.body.clone()
        } else {
            comment.body.chars().take(8).collect()
        };
    }

    fn save_state(&self, out: &mut StateBundle) {
        out.put("comments.expanded", &self.expanded)
            .expect("a set of ids serializes");
    }

    fn restore_state(&mut self, state: &StateBundle) {
        self.expanded = state.get("comments.expanded").unwrap_or_default();
    }
}

fn as_comment(row: &FeedRow) -> Option<Comment> {
    match row {
        FeedRow::Comment(comment) => Some(comment.clone()),
        _ => None,
    }
}

fn feed_manager(comments: CommentDelegate) -> DelegateManager<FeedRow, FeedList> {
    DelegateManager::<FeedRow, FeedList>::builder()
        .add_variant::<ErrorValue, _>(ErrorAdapterDelegate::new())
        .add_variant::<Post, _>(PostDelegate)
        .add_item(adapt_to(comments, as_comment))
        .add(static_layout_for_value(LOADING_LAYOUT, FeedRow::Loading))
        .build()
}

fn post(id: u64, title: &str) -> FeedRow {
    FeedRow::Post(Post {
        id,
        title: title.to_owned(),
        video: false,
    })
}

fn comment(id: u64, body: &str) -> FeedRow {
    FeedRow::Comment(Comment {
        id,
        body: body.to_owned(),
    })
}

/// Resolve, create and bind every position, like a first layout pass.
fn layout_pass(adapter: &DelegateAdapter<FeedRow, FeedList>) -> Vec<FeedCell> {
    (0..adapter.item_count())
        .map(|position| {
            let view_type = adapter.item_view_type(position);
            let mut holder = adapter.create_view_holder(&FeedList, view_type);
            adapter.bind_view_holder(&mut holder, position);
            holder.into_view()
        })
        .collect()
}

#[test]
fn test_feed_layout_pass() {
    setup();
    let adapter = DelegateAdapter::new("feed", feed_manager(CommentDelegate::default()));
    adapter.submit_list(vec![
        post(1, "first"),
        comment(10, "a long comment body"),
        FeedRow::Error(ErrorValue::from_text("could not load more")),
        FeedRow::Loading,
    ]);

    let types: Vec<usize> = (0..4).map(|p| adapter.item_view_type(p)).collect();
    assert_eq!(types, vec![1, 2, 0, 3]);

    let cells = layout_pass(&adapter);
    let layouts: Vec<&str> = cells.iter().map(|c| c.layout).collect();
    assert_eq!(layouts, vec!["feed_post", "comment", "feed_error", "feed_loading"]);
    assert_eq!(cells[0].text, "first");
    assert_eq!(cells[1].text, "a long c");
    assert_eq!(cells[2].text, "could not load more");
    assert!(cells[3].text.is_empty());
}

#[test]
fn test_state_survives_reconstruction() {
    setup();
    let mut comments = CommentDelegate::default();
    comments.expanded.insert(10);
    let adapter = DelegateAdapter::new("comments", feed_manager(comments));
    let saved = adapter.save_instance_state().to_json();

    // The screen is rebuilt from scratch.
    let mut rebuilt = DelegateAdapter::new("comments", feed_manager(CommentDelegate::default()));
    rebuilt.restore_instance_state(&StateBundle::from_json(&saved).unwrap());
    rebuilt.submit_list(vec![comment(10, "a long comment body"), comment(11, "another long one")]);

    let cells = layout_pass(&rebuilt);
    assert_eq!(cells[0].text, "a long comment body");
    assert_eq!(cells[1].text, "another ");
    assert_eq!(rebuilt.save_instance_state().to_json(), saved);
}

#[test]
fn test_recycling_releases_players() {
    setup();
    let adapter = DelegateAdapter::new("feed", feed_manager(CommentDelegate::default()));
    adapter.submit_list(vec![
        FeedRow::Post(Post {
            id: 1,
            title: "clip".into(),
            video: true,
        }),
        FeedRow::Loading,
    ]);

    let mut video = adapter.create_view_holder(&FeedList, adapter.item_view_type(0));
    adapter.bind_view_holder(&mut video, 0);
    assert!(video.view().player_running);

    assert!(adapter.on_view_recycled(&mut video));
    assert!(!adapter.on_view_recycled(&mut video));
    assert!(!video.view().player_running);
    assert_eq!(video.view().released, 1);

    let mut spinner = adapter.create_view_holder(&FeedList, adapter.item_view_type(1));
    adapter.bind_view_holder(&mut spinner, 1);
    assert!(adapter.on_view_recycled(&mut spinner));
    assert_eq!(spinner.view().released, 0);
}

#[test]
fn test_submit_reports_edit_script() {
    setup();
    let manager = feed_manager(CommentDelegate::default());
    let by_id = KeyedDiffCallback::new(|row: &FeedRow| match row {
        FeedRow::Post(p) => Some(p.id),
        FeedRow::Comment(c) => Some(c.id),
        _ => None,
    });
    let adapter = DelegateAdapter::with_diff_callback("feed", manager, by_id);

    let scripts = Arc::new(Mutex::new(Vec::<ListDiff>::new()));
    let sink = scripts.clone();
    adapter.items_changed().connect(move |diff| sink.lock().push(diff.clone()));

    adapter.submit_list(vec![post(1, "a"), post(2, "b"), FeedRow::Loading]);
    let diff = adapter.submit_list(vec![post(1, "a"), post(2, "b (edited)"), post(3, "c")]);

    assert_eq!(
        diff.ops(),
        &[
            DiffOp::Inserted {
                position: 3,
                count: 1
            },
            DiffOp::Removed {
                position: 2,
                count: 1
            },
            DiffOp::Changed {
                position: 1,
                count: 1
            },
        ]
    );
    assert_eq!(scripts.lock().len(), 2);
}

#[test]
fn test_unmatched_item_in_feed() {
    setup();
    let manager = DelegateManager::<FeedRow, FeedList>::builder()
        .add_variant::<Post, _>(PostDelegate)
        .build();
    let adapter = DelegateAdapter::new("posts only", manager);
    adapter.submit_list(vec![post(1, "a"), FeedRow::Loading]);

    let err = adapter.try_item_view_type(1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "no adapter delegate matches item at position 1 (of 2 items, 1 delegates registered)"
    );
}

#[test]
fn test_paged_feed() {
    setup();
    let adapter = DelegatePagingAdapter::new("paged", feed_manager(CommentDelegate::default()));
    adapter.append_page(vec![post(1, "a"), post(2, "b")]);
    adapter.set_placeholders(2);
    assert_eq!(adapter.item_count(), 4);

    let view_type = adapter.item_view_type(1);
    let mut holder = adapter.create_view_holder(&FeedList, view_type);
    adapter.bind_view_holder(&mut holder, 1);
    assert_eq!(holder.view().text, "b");

    assert!(matches!(
        adapter.try_item_view_type(2),
        Err(AdapterError::Placeholder { position: 2 })
    ));

    adapter.append_page(vec![post(3, "c"), FeedRow::Loading]);
    assert_eq!(adapter.placeholder_count(), 0);
    assert_eq!(adapter.item_view_type(3), 3);
}

#[test]
#[should_panic(expected = "placeholder not supported")]
fn test_paged_feed_binding_placeholder_panics() {
    let adapter = DelegatePagingAdapter::new("paged", feed_manager(CommentDelegate::default()));
    adapter.append_page(vec![post(1, "a"), post(2, "b")]);
    adapter.set_placeholders(1);

    let mut holder = adapter.create_view_holder(&FeedList, 1);
    adapter.bind_view_holder(&mut holder, 2);
}

#[test]
fn test_manager_over_borrowed_items() {
    let manager = feed_manager(CommentDelegate::default());
    let rows = [FeedRow::Loading, post(5, "p")];
    let items = Items::new(&rows);

    // A delegate written against the full contract sees the same items.
    struct FirstRowOnly;
    impl AdapterDelegate<FeedRow, FeedList> for FirstRowOnly {
        fn is_for_view_type(&self, _items: Items<'_, FeedRow>, index: usize) -> bool {
            index == 0
        }
        fn create_view(&self, parent: &FeedList) -> FeedCell {
            parent.inflate(LayoutId::new("header"))
        }
        fn bind_view(&self, _view: &mut FeedCell, _items: Items<'_, FeedRow>, _index: usize) {}
    }

    assert_eq!(manager.item_view_type(items, 0), 3);
    let with_header = DelegateManager::<FeedRow, FeedList>::builder()
        .add(FirstRowOnly)
        .add_variant::<Post, _>(PostDelegate)
        .build();
    assert_eq!(with_header.item_view_type(items, 0), 0);
    assert_eq!(with_header.item_view_type(items, 1), 1);
}
