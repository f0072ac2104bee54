//! Async driver tests on paused tokio time

use std::time::Duration;

use cardvault_core::{Pin, RecordId};
use cardvault_reveal::{
    PadResponse, PadState, RevealDriver, RevealError, RevealEvent, RevealHandle, RevealPolicy,
};
use tokio::sync::mpsc::UnboundedReceiver;

fn spawn(pin: &str) -> (RevealHandle, UnboundedReceiver<RevealEvent>, RecordId) {
    let id = RecordId::new();
    let (handle, events) = RevealDriver::spawn(id, Pin::new(pin).unwrap(), RevealPolicy::default());
    (handle, events, id)
}

async fn wrong(handle: &RevealHandle, pin: &str) -> PadResponse {
    handle.enter_pin(pin).await.unwrap();
    handle.submit().await.unwrap()
}

/// Receive events until one matches, returning everything seen
async fn collect_until(
    events: &mut UnboundedReceiver<RevealEvent>,
    stop: impl Fn(&RevealEvent) -> bool,
) -> Vec<RevealEvent> {
    let mut seen = Vec::new();
    while let Some(event) = events.recv().await {
        let done = stop(&event);
        seen.push(event);
        if done {
            break;
        }
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn test_rejection_then_lock_then_unlock() {
    let (handle, mut events, _) = spawn("4321");

    assert_eq!(
        wrong(&handle, "1234").await,
        PadResponse::Rejected { attempts_remaining: 2 }
    );
    assert_eq!(
        handle.view().message.as_deref(),
        Some("Incorrect PIN. 2 attempts remaining.")
    );
    wrong(&handle, "1111").await;
    assert_eq!(
        wrong(&handle, "2222").await,
        PadResponse::LockedOut { seconds: 30 }
    );
    assert!(handle.view().locked);

    tokio::time::sleep(Duration::from_millis(29_500)).await;
    let view = handle.view();
    assert!(view.locked);
    assert_eq!(view.lock_remaining_seconds, 1);
    assert_eq!(handle.append_digit(1).await.unwrap(), PadResponse::Ignored);

    let seen = collect_until(&mut events, |e| *e == RevealEvent::Unlocked).await;
    assert_eq!(seen.last(), Some(&RevealEvent::Unlocked));
    assert!(seen.contains(&RevealEvent::Lockout { remaining_seconds: 1 }));

    let view = handle.view();
    assert!(!view.locked);
    assert_eq!(view.attempt_count, 0);
    assert_eq!(view.entered_digit_count, 0);
    assert_eq!(handle.append_digit(4).await.unwrap(), PadResponse::Accepted);
}

#[tokio::test(start_paused = true)]
async fn test_disclosure_expires_after_one_minute() {
    let (handle, mut events, _) = spawn("4321");
    let start = tokio::time::Instant::now();

    handle.enter_pin("4321").await.unwrap();
    assert_eq!(handle.submit().await.unwrap(), PadResponse::Verified);
    assert_eq!(events.recv().await, Some(RevealEvent::Verified));
    assert!(handle.view().visible);

    assert_eq!(events.recv().await, Some(RevealEvent::DisclosureExpired));
    assert!(start.elapsed() >= Duration::from_secs(60));
    assert!(!handle.view().visible);
    assert_eq!(handle.view().state, PadState::Closed);

    // Session gone: no more events, no more commands
    assert_eq!(events.recv().await, None);
    assert_eq!(handle.submit().await, Err(RevealError::SessionClosed));
}

#[tokio::test(start_paused = true)]
async fn test_forgot_pin_tears_down() {
    let (handle, mut events, id) = spawn("4321");
    for pin in ["1234", "1111", "2222"] {
        wrong(&handle, pin).await;
    }
    assert!(handle.view().forgot_pin_available);

    assert_eq!(
        handle.forgot_pin().await.unwrap(),
        PadResponse::DeleteRequested
    );

    let seen = collect_until(&mut events, |e| {
        matches!(e, RevealEvent::DeleteRequested { .. })
    })
    .await;
    assert_eq!(
        seen.last(),
        Some(&RevealEvent::DeleteRequested { record_id: id })
    );
    assert_eq!(events.recv().await, None);
    assert!(handle.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_forgot_pin_ignored_when_not_locked() {
    let (handle, _events, _) = spawn("4321");
    assert_eq!(handle.forgot_pin().await.unwrap(), PadResponse::Ignored);
    assert!(!handle.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels() {
    let (handle, mut events, _) = spawn("4321");
    handle.shutdown().await;

    assert_eq!(events.recv().await, Some(RevealEvent::Cancelled));
    assert_eq!(events.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_drop_stops_ticking() {
    let (handle, mut events, _) = spawn("4321");
    for pin in ["1234", "1111", "2222"] {
        wrong(&handle, pin).await;
    }
    drop(handle);

    let seen = collect_until(&mut events, |_| false).await;
    assert!(seen
        .iter()
        .all(|e| !matches!(e, RevealEvent::Unlocked | RevealEvent::Lockout { remaining_seconds: 0..=28 })));
}

#[tokio::test(start_paused = true)]
async fn test_subscribe_sees_countdown() {
    let (handle, _events, _) = spawn("4321");
    let mut views = handle.subscribe();
    for pin in ["1234", "1111", "2222"] {
        wrong(&handle, pin).await;
    }

    views.changed().await.unwrap();
    let mut last = views.borrow_and_update().lock_remaining_seconds;
    while views.changed().await.is_ok() {
        let view = views.borrow_and_update().clone();
        if !view.locked {
            break;
        }
        assert!(view.lock_remaining_seconds <= last);
        last = view.lock_remaining_seconds;
    }
    assert_eq!(handle.view().attempt_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_disclosure_countdown_is_published() {
    let (handle, _events, _) = spawn("4321");
    handle.enter_pin("4321").await.unwrap();
    handle.submit().await.unwrap();
    assert_eq!(handle.view().visible_remaining_seconds, 60);

    tokio::time::sleep(Duration::from_millis(15_500)).await;
    assert_eq!(handle.view().visible_remaining_seconds, 45);

    tokio::time::sleep(Duration::from_secs(44)).await;
    assert_eq!(handle.view().visible_remaining_seconds, 1);
    assert!(handle.view().visible);
}
