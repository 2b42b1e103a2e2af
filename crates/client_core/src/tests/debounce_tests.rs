use super::*;
use tokio::time::advance;

#[tokio::test(start_paused = true)]
async fn burst_emits_only_last_value() {
    let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(150));

    debouncer.push("s");
    advance(Duration::from_millis(50)).await;
    debouncer.push("sh");
    advance(Duration::from_millis(100)).await;
    debouncer.push("sho");

    assert_eq!(rx.recv().await, Some("sho"));
    advance(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn inputs_separated_by_quiet_window_both_emit() {
    let (mut debouncer, mut rx) = Debouncer::new(DEFAULT_SEARCH_DEBOUNCE);

    debouncer.push(1);
    assert_eq!(rx.recv().await, Some(1));
    debouncer.push(2);
    assert_eq!(rx.recv().await, Some(2));
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_pending_emission() {
    let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(150));

    debouncer.push("hat");
    assert!(debouncer.is_pending());
    debouncer.cancel();
    assert!(!debouncer.is_pending());

    sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn nothing_is_emitted_before_window_elapses() {
    let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(150));

    debouncer.push("hat");
    advance(Duration::from_millis(149)).await;

    assert!(rx.try_recv().is_err());
    assert!(debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn settle_waits_for_pending_emission() {
    let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(150));

    debouncer.push("hat");
    debouncer.settle().await;

    assert!(!debouncer.is_pending());
    assert_eq!(rx.try_recv().ok(), Some("hat"));
}

#[tokio::test(start_paused = true)]
async fn settle_after_emission_leaves_value_queued() {
    let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(150));

    debouncer.push("hat");
    sleep(Duration::from_millis(200)).await;
    assert!(!debouncer.is_pending());

    debouncer.settle().await;
    assert_eq!(rx.try_recv().ok(), Some("hat"));
    assert!(rx.try_recv().is_err());
}
