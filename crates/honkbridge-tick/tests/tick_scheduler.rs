//! Integration tests for the frame scheduler.
//!
//! Tests run on a paused Tokio clock, so `sleep_until` resolves as soon
//! as every task is idle and `dt` values are exact.

use std::time::Duration;

use honkbridge_tick::{TickConfig, TickPolicy, TickScheduler};

// =========================================================================
// Helpers
// =========================================================================

fn no_jitter(rate: u32) -> TickConfig {
    TickConfig {
        initial_jitter_us: 0,
        ..TickConfig::with_rate(rate)
    }
}

// =========================================================================
// TickConfig
// =========================================================================

#[test]
fn test_default_config_is_30hz_skip() {
    let cfg = TickConfig::default();
    assert_eq!(cfg.tick_rate_hz, 30);
    assert_eq!(cfg.policy, TickPolicy::Skip);
    assert_eq!(cfg.tick_duration(), Duration::from_secs_f64(1.0 / 30.0));
}

#[test]
fn test_rate_is_clamped() {
    assert_eq!(TickConfig::with_rate(0).validated().tick_rate_hz, 1);
    assert_eq!(
        TickConfig::with_rate(1000).validated().tick_rate_hz,
        TickConfig::MAX_TICK_RATE_HZ
    );
}

#[test]
fn test_scheduler_initial_state() {
    let s = TickScheduler::new(no_jitter(20));
    assert_eq!(s.tick_count(), 0);
    assert_eq!(s.tick_rate_hz(), 20);
    assert_eq!(s.tick_duration(), Duration::from_millis(50));
    assert!(!s.is_paused());
    assert_eq!(s.stats().total_ticks, 0);
}

// =========================================================================
// Tick firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_ticks_are_numbered_with_fixed_dt() {
    let mut s = TickScheduler::new(no_jitter(20));

    for expected in 1..=5 {
        let info = s.wait_for_tick().await;
        assert_eq!(info.tick, expected);
        assert_eq!(info.dt, Duration::from_millis(50));
        assert!(!info.overrun);
        assert_eq!(info.ticks_skipped, 0);
    }
    assert_eq!(s.stats().total_ticks, 5);
}

#[tokio::test(start_paused = true)]
async fn test_jitter_delays_only_the_first_tick() {
    let mut s = TickScheduler::new(TickConfig {
        initial_jitter_us: 4_000,
        ..TickConfig::with_rate(20)
    });
    let start = tokio::time::Instant::now();
    // The paused clock fires timers on whole milliseconds, so allow one
    // millisecond of rounding on every bound.
    let slack = Duration::from_millis(1);

    let first = s.wait_for_tick().await;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed <= Duration::from_millis(54) + slack);
    assert!(first.dt >= Duration::from_millis(50));
    assert!(first.dt <= Duration::from_millis(50) + slack);

    let second = s.wait_for_tick().await;
    assert!(second.dt >= Duration::from_millis(50));
    assert!(second.dt <= Duration::from_millis(50) + slack);
}

// =========================================================================
// Overruns
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_skip_policy_reports_full_gap_in_dt() {
    let mut s = TickScheduler::new(no_jitter(20));

    tokio::time::advance(Duration::from_millis(175)).await;
    let late = s.wait_for_tick().await;
    assert!(late.overrun);
    assert_eq!(late.ticks_skipped, 2);
    assert_eq!(late.dt, Duration::from_millis(175));

    let next = s.wait_for_tick().await;
    assert!(!next.overrun);
    assert_eq!(next.dt, Duration::from_millis(50));
    assert_eq!(s.stats().total_overruns, 1);
    assert_eq!(s.stats().total_skipped, 2);
}

#[tokio::test(start_paused = true)]
async fn test_drop_policy_keeps_cadence() {
    let mut s = TickScheduler::new(TickConfig {
        policy: TickPolicy::Drop,
        ..no_jitter(20)
    });

    tokio::time::advance(Duration::from_millis(175)).await;
    let late = s.wait_for_tick().await;
    assert!(late.overrun);
    assert_eq!(late.ticks_skipped, 0);

    // The planned 100 ms deadline is already behind us.
    let catch_up = s.wait_for_tick().await;
    assert_eq!(catch_up.tick, 2);
    assert_eq!(catch_up.dt, Duration::ZERO);
}

// =========================================================================
// Pause / Resume
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_pause_prevents_ticks() {
    let mut s = TickScheduler::new(no_jitter(20));
    s.wait_for_tick().await;

    s.pause();
    s.pause();
    assert!(s.is_paused());

    let result = tokio::time::timeout(Duration::from_secs(1), s.wait_for_tick()).await;
    assert!(result.is_err(), "paused scheduler should pend");
}

#[tokio::test(start_paused = true)]
async fn test_resume_does_not_count_paused_time() {
    let mut s = TickScheduler::new(no_jitter(20));
    s.wait_for_tick().await;

    s.pause();
    tokio::time::advance(Duration::from_secs(3)).await;
    s.resume();
    s.resume();
    assert!(!s.is_paused());

    let info = s.wait_for_tick().await;
    assert_eq!(info.tick, 2);
    assert_eq!(info.dt, Duration::from_millis(50));
    assert!(!info.overrun);
}

// =========================================================================
// Stats
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_record_tick_end_tracks_max_work_time() {
    let mut s = TickScheduler::new(no_jitter(20));

    s.record_tick_end();
    assert_eq!(s.stats().max_tick_time, Duration::ZERO);

    s.wait_for_tick().await;
    // record_tick_end measures wall-clock time, which the paused Tokio
    // clock does not control.
    std::thread::sleep(Duration::from_micros(50));
    s.record_tick_end();
    assert!(s.stats().max_tick_time > Duration::ZERO);
}

// =========================================================================
// select! loop, the way the client drives a session
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_select_loop_until_shutdown() {
    let mut s = TickScheduler::new(no_jitter(20));
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(160)).await;
        let _ = tx.send(());
    });

    let mut shutdown = rx;
    let mut total = Duration::ZERO;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            info = s.wait_for_tick() => {
                total += info.dt;
                s.record_tick_end();
            }
        }
    }

    assert_eq!(s.tick_count(), 3);
    assert_eq!(total, Duration::from_millis(150));
}
