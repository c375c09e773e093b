// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn system_clock_epoch_is_after_2020() {
    assert!(SystemClock.epoch_ms() > 1_577_836_800_000);
}

#[test]
fn fake_clock_advances_both_readings() {
    let clock = FakeClock::at_epoch_ms(5_000);
    let t1 = clock.now();
    clock.advance(Duration::from_secs(60));
    assert!(clock.now().duration_since(t1) >= Duration::from_secs(60));
    assert_eq!(clock.epoch_ms(), 65_000);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let before = clock1.epoch_ms();
    clock2.advance_secs(30);
    assert_eq!(clock1.epoch_ms(), before + 30_000);
}

#[test]
fn ms_since_saturates_for_future_timestamps() {
    let clock = FakeClock::at_epoch_ms(10_000);
    assert_eq!(clock.ms_since(4_000), 6_000);
    assert_eq!(clock.ms_since(20_000), 0);
}
