//! Batching behaviour of the adapter surface.

use std::sync::Arc;
use std::time::Duration;

use openads_ast::{AstClient, BatchKind, DispatcherConfig, InlineQueue, RecordingTagClient, TagCall};

fn setup() -> (AstClient, Arc<RecordingTagClient>, Arc<InlineQueue>) {
    let tags = Arc::new(RecordingTagClient::new());
    let queue = Arc::new(InlineQueue::new());
    let adapter = AstClient::new(tags.clone(), queue.clone(), DispatcherConfig::default()).unwrap();
    (adapter, tags, queue)
}

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}

#[tokio::test(start_paused = true)]
async fn single_load_tags_goes_through_queue() {
    let (adapter, tags, queue) = setup();

    adapter.load_tags();
    settle().await;

    assert_eq!(queue.submitted(), 1);
    assert_eq!(tags.calls(), vec![TagCall::LoadTags]);
}

#[tokio::test(start_paused = true)]
async fn eight_load_tags_calls_produce_one_external_call() {
    let (adapter, tags, queue) = setup();

    adapter
        .load_tags()
        .load_tags()
        .load_tags()
        .load_tags()
        .load_tags()
        .load_tags()
        .load_tags()
        .load_tags();
    settle().await;

    assert_eq!(queue.submitted(), 1);
    assert_eq!(tags.load_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn load_tags_after_window_produces_second_call() {
    let (adapter, tags, queue) = setup();

    adapter.load_tags().load_tags().load_tags().load_tags();
    tokio::time::sleep(Duration::from_millis(20)).await;
    adapter.load_tags();
    settle().await;

    assert_eq!(queue.submitted(), 2);
    assert_eq!(tags.load_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn single_refresh_passes_targets_in_order() {
    let (adapter, tags, queue) = setup();

    adapter.refresh(["target1", "target2"]);
    settle().await;

    assert_eq!(queue.submitted(), 1);
    assert_eq!(tags.refresh_calls(), vec![ids(&["target1", "target2"])]);
}

#[tokio::test(start_paused = true)]
async fn consecutive_refreshes_are_concatenated() {
    let (adapter, tags, queue) = setup();

    adapter
        .refresh(["target1"])
        .refresh(["target2", "target3"])
        .refresh(["target4"])
        .refresh(["target5"])
        .refresh(["target6"])
        .refresh(["target7"])
        .refresh(["target8"]);
    settle().await;

    assert_eq!(queue.submitted(), 1);
    assert_eq!(
        tags.refresh_calls(),
        vec![ids(&[
            "target1", "target2", "target3", "target4", "target5", "target6", "target7",
            "target8"
        ])]
    );
}

#[tokio::test(start_paused = true)]
async fn refresh_after_window_is_scoped_to_its_own_targets() {
    let (adapter, tags, queue) = setup();

    adapter
        .refresh(["t1"])
        .refresh(["t2", "t3"])
        .refresh(["t4"])
        .refresh(["t5"])
        .refresh(["t6"])
        .refresh(["t7"])
        .refresh(["t8"]);
    tokio::time::sleep(Duration::from_millis(20)).await;
    adapter.refresh(["t9"]);
    settle().await;

    assert_eq!(queue.submitted(), 2);
    assert_eq!(
        tags.refresh_calls(),
        vec![ids(&["t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8"]), ids(&["t9"])]
    );
}

#[tokio::test(start_paused = true)]
async fn duplicates_and_arbitrary_ids_pass_through() {
    let (adapter, tags, _queue) = setup();

    adapter.refresh(["a", "a"]).refresh(["", "with space", "a"]);
    settle().await;

    assert_eq!(tags.refresh_calls(), vec![ids(&["a", "a", "", "with space", "a"])]);
}

#[tokio::test(start_paused = true)]
async fn pending_state_clears_after_flush() {
    let (adapter, _tags, _queue) = setup();

    adapter.refresh(["x"]);
    assert_eq!(
        adapter.dispatcher().pending_targets(BatchKind::RefreshNamed),
        Some(ids(&["x"]))
    );
    settle().await;
    assert_eq!(adapter.dispatcher().pending_targets(BatchKind::RefreshNamed), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_window() {
    let tags = Arc::new(RecordingTagClient::new());
    let queue = Arc::new(InlineQueue::new());
    let config = DispatcherConfig { delay: Duration::from_millis(200) };
    let adapter = Arc::new(AstClient::new(tags.clone(), queue.clone(), config).unwrap());

    let mut handles = Vec::new();
    for i in 0..8 {
        let adapter = adapter.clone();
        handles.push(tokio::spawn(async move {
            adapter.refresh([format!("slot-{i}")]);
        }));
    }
    for h in handles {
        h.await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(queue.submitted(), 1);
    let calls = tags.refresh_calls();
    assert_eq!(calls.len(), 1);
    let mut seen = calls[0].clone();
    seen.sort();
    let mut expected: Vec<String> = (0..8).map(|i| format!("slot-{i}")).collect();
    expected.sort();
    assert_eq!(seen, expected);
}
