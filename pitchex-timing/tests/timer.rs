use pitchex_timing::{HighPrecisionTimer, Timer};
use std::time::Duration;

#[test]
fn timestamps_are_monotonic() {
    let timer = HighPrecisionTimer::new();
    let a = timer.now();
    let b = timer.now();
    assert!(b >= a);
}

#[test]
fn sleep_lasts_at_least_the_requested_duration() {
    let timer = HighPrecisionTimer::new();
    let before = timer.now();
    timer.sleep(Duration::from_millis(15));
    assert!(timer.elapsed(before) >= Duration::from_millis(15));
    assert!(timer.elapsed_ms(before) >= 15);
}

#[test]
fn zero_sleep_returns_immediately() {
    let timer = HighPrecisionTimer::new();
    let before = timer.now();
    timer.sleep(Duration::ZERO);
    assert!(timer.elapsed(before) < Duration::from_millis(50));
}

#[test]
fn elapsed_saturates_for_future_timestamps() {
    let timer = HighPrecisionTimer::new();
    let future = timer.now() + 10_000_000_000;
    assert_eq!(timer.elapsed(future), Duration::ZERO);
}
