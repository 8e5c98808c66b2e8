//! BoundedLock behaviour.

use filth_rust::{BoundedLock, BoundedLockConfig};

use crate::support::{init_tracing, settle, Recorder};

fn take_recorded(lock: &BoundedLock, log: &Recorder, name: &str) {
    let log = log.clone();
    let name = name.to_string();
    lock.take(move || log.push(name));
}

// ============================================================================
// Capacity
// ============================================================================

#[tokio::test(start_paused = true)]
async fn extra_take_waits_for_free() {
    init_tracing();
    let lock = BoundedLock::new(3).unwrap();
    let ran = Recorder::new();

    for name in ["a", "b", "c", "d"] {
        take_recorded(&lock, &ran, name);
    }
    settle().await;
    assert_eq!(ran.events(), vec!["a", "b", "c"]);
    assert_eq!(lock.taken(), 3);
    assert_eq!(lock.queue_len(), 1);

    lock.free();
    settle().await;
    assert_eq!(ran.events(), vec!["a", "b", "c", "d"]);
    assert_eq!(lock.taken(), 3);
}

#[tokio::test(start_paused = true)]
async fn default_config_is_a_mutex() {
    let lock = BoundedLock::from_config(&BoundedLockConfig::default()).unwrap();
    let ran = Recorder::new();

    take_recorded(&lock, &ran, "first");
    take_recorded(&lock, &ran, "second");
    settle().await;
    assert_eq!(ran.events(), vec!["first"]);

    lock.free();
    settle().await;
    assert_eq!(ran.events(), vec!["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn take_never_runs_job_inline() {
    let lock = BoundedLock::new(1).unwrap();
    let ran = Recorder::new();

    take_recorded(&lock, &ran, "job");
    assert!(ran.events().is_empty());

    settle().await;
    assert_eq!(ran.events(), vec!["job"]);
}

// ============================================================================
// Pause / play
// ============================================================================

#[tokio::test(start_paused = true)]
async fn pause_stops_dispatch_and_play_resumes_in_order() {
    let lock = BoundedLock::new(2).unwrap();
    let ran = Recorder::new();

    lock.pause();
    for name in ["a", "b", "c"] {
        take_recorded(&lock, &ran, name);
    }
    settle().await;
    assert!(ran.events().is_empty());
    assert_eq!(lock.queue_len(), 3);

    // free while paused only drains capacity
    lock.free();
    settle().await;
    assert!(ran.events().is_empty());
    assert_eq!(lock.taken(), 0);

    lock.play();
    assert!(!lock.is_paused());
    assert_eq!(lock.taken(), 2);
    settle().await;
    assert_eq!(ran.events(), vec!["a", "b"]);

    lock.free();
    settle().await;
    assert_eq!(ran.events(), vec!["a", "b", "c"]);
}

#[tokio::test(start_paused = true)]
async fn pause_leaves_running_jobs_alone() {
    let lock = BoundedLock::new(1).unwrap();
    let ran = Recorder::new();

    take_recorded(&lock, &ran, "running");
    take_recorded(&lock, &ran, "queued");
    lock.pause();
    settle().await;
    assert_eq!(ran.events(), vec!["running"]);

    lock.free();
    settle().await;
    assert_eq!(ran.events(), vec!["running"]);
    assert_eq!(lock.queue_len(), 1);

    lock.play();
    settle().await;
    assert_eq!(ran.events(), vec!["running", "queued"]);
}

// ============================================================================
// Clear
// ============================================================================

#[tokio::test(start_paused = true)]
async fn clear_drops_queue_and_keeps_lock_paused() {
    let lock = BoundedLock::new(1).unwrap();
    let ran = Recorder::new();

    take_recorded(&lock, &ran, "a");
    take_recorded(&lock, &ran, "b");
    take_recorded(&lock, &ran, "c");
    settle().await;

    lock.clear();
    assert!(lock.is_paused());
    assert_eq!(lock.queue_len(), 0);

    // the running job still frees its slot
    lock.free();
    take_recorded(&lock, &ran, "d");
    settle().await;
    assert_eq!(ran.events(), vec!["a"]);
    assert_eq!(lock.queue_len(), 1);

    lock.play();
    settle().await;
    assert_eq!(ran.events(), vec!["a", "d"]);
}
