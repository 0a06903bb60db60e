//! Pass-through methods: argument order, queue routing, chaining.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use openads_ast::{
    AstClient, DebugModeParams, DispatcherConfig, InlineQueue, OnEventParams, RecordingTagClient,
    ShowTagParams, TagCall, TagDefinition, Work, WorkQueue,
};
use parking_lot::Mutex;
use serde_json::json;
use tokio_test::assert_ok;

fn setup() -> (AstClient, Arc<RecordingTagClient>, Arc<InlineQueue>) {
    let tags = Arc::new(RecordingTagClient::new());
    let queue = Arc::new(InlineQueue::new());
    let adapter = assert_ok!(AstClient::new(tags.clone(), queue.clone(), DispatcherConfig::default()));
    (adapter, tags, queue)
}

#[tokio::test]
async fn debug_mode_updates_flag_without_queue() {
    let (adapter, tags, queue) = setup();

    adapter.debug_mode(DebugModeParams { enabled: true });
    assert!(tags.debug());
    adapter.debug_mode(DebugModeParams { enabled: false });
    assert!(!tags.debug());

    assert_eq!(queue.submitted(), 0);
    assert!(tags.calls().is_empty());
}

#[tokio::test]
async fn on_event_forwards_event_then_target() {
    let (adapter, tags, queue) = setup();
    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();

    adapter.on_event(OnEventParams {
        target_id: "id".into(),
        event: "THE_EVENT".into(),
        callback: Arc::new(move |_: &serde_json::Value| {
            h.fetch_add(1, Ordering::SeqCst);
        }),
    });

    assert_eq!(queue.submitted(), 1);
    assert_eq!(
        tags.calls(),
        vec![TagCall::OnEvent { event: "THE_EVENT".into(), target_id: "id".into() }]
    );

    // The callback handed over is the caller's own.
    assert_eq!(tags.emit("THE_EVENT", "id", &json!({})), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn define_tag_passes_definition_verbatim() {
    let (adapter, tags, queue) = setup();
    let raw = json!({
        "member": 3296,
        "targetId": "2",
        "keywords": {},
        "invCode": "5",
        "sizes": [300, 250],
        "native": null
    });
    let tag: TagDefinition = serde_json::from_value(raw.clone()).unwrap();

    adapter.define_tag(tag.clone());

    assert_eq!(queue.submitted(), 1);
    assert_eq!(tags.calls(), vec![TagCall::DefineTag { tag: tag.clone() }]);
    assert_eq!(serde_json::to_value(&tag).unwrap(), raw);
}

#[tokio::test]
async fn show_tag_forwards_target_id() {
    let (adapter, tags, queue) = setup();

    adapter.show_tag(ShowTagParams { target_id: "id".into() });

    assert_eq!(queue.submitted(), 1);
    assert_eq!(tags.calls(), vec![TagCall::ShowTag { target_id: "id".into() }]);
}

#[tokio::test]
async fn pass_through_calls_are_never_merged() {
    let (adapter, tags, queue) = setup();

    adapter
        .show_tag(ShowTagParams { target_id: "a".into() })
        .show_tag(ShowTagParams { target_id: "a".into() })
        .define_tag(TagDefinition::new("b"))
        .debug_mode(DebugModeParams { enabled: true });

    assert_eq!(queue.submitted(), 3);
    assert_eq!(
        tags.calls(),
        vec![
            TagCall::ShowTag { target_id: "a".into() },
            TagCall::ShowTag { target_id: "a".into() },
            TagCall::DefineTag { tag: TagDefinition::new("b") },
        ]
    );
}

#[test]
fn construction_requires_runtime() {
    let tags = Arc::new(RecordingTagClient::new());
    let queue = Arc::new(InlineQueue::new());
    let result = AstClient::new(tags, queue, DispatcherConfig::default());
    assert!(matches!(result, Err(openads_ast::AdapterError::NoRuntime)));
}

#[test]
fn with_handle_works_from_outside_runtime() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let tags = Arc::new(RecordingTagClient::new());
    let queue = Arc::new(InlineQueue::new());
    let adapter = AstClient::with_handle(
        tags.clone(),
        queue,
        DispatcherConfig::default(),
        rt.handle().clone(),
    );

    adapter.refresh(["x"]).refresh(["y"]);
    rt.block_on(async { tokio::time::sleep(std::time::Duration::from_millis(50)).await });

    assert_eq!(tags.refresh_calls(), vec![vec!["x".to_string(), "y".to_string()]]);
}

/// Holds submitted work until the test runs it.
#[derive(Default)]
struct HoldingQueue {
    held: Mutex<Vec<Work>>,
}

impl HoldingQueue {
    fn held(&self) -> usize {
        self.held.lock().len()
    }

    fn run_next(&self) {
        let unit = self.held.lock().remove(0);
        unit();
    }
}

impl WorkQueue for HoldingQueue {
    fn submit(&self, work: Work) {
        self.held.lock().push(work);
    }
}

#[tokio::test]
async fn passthrough_calls_wait_for_their_own_queued_work() {
    let tags = Arc::new(RecordingTagClient::new());
    let queue = Arc::new(HoldingQueue::default());
    let adapter = assert_ok!(AstClient::new(tags.clone(), queue.clone(), DispatcherConfig::default()));

    adapter
        .on_event(OnEventParams {
            target_id: "a".into(),
            event: "adLoaded".into(),
            callback: Arc::new(|_: &serde_json::Value| {}),
        })
        .define_tag(TagDefinition::new("b"))
        .show_tag(ShowTagParams { target_id: "c".into() });

    assert_eq!(queue.held(), 3);
    assert!(tags.calls().is_empty());

    queue.run_next();
    assert_eq!(
        tags.calls(),
        vec![TagCall::OnEvent { event: "adLoaded".into(), target_id: "a".into() }]
    );

    queue.run_next();
    assert_eq!(tags.calls().len(), 2);
    assert_eq!(tags.calls()[1], TagCall::DefineTag { tag: TagDefinition::new("b") });

    queue.run_next();
    assert_eq!(tags.calls()[2], TagCall::ShowTag { target_id: "c".into() });
    assert_eq!(queue.held(), 0);
}
