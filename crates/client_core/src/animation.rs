//! Price count-up animation: pure easing/display helpers plus a tokio
//! frame driver. Every frame is computed from elapsed time alone, so
//! dropped or late frames cannot desynchronize the final value.

use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};

/// Fixed duration of the count-up from 0 to the predicted price.
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(800);

/// Nominal frame cadence of the driver.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Ease-out cubic: `1 - (1 - t)^3`, with `t` clamped to [0, 1].
pub fn eased_progress(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// The integer price shown `elapsed` into a count-up toward `target`.
/// At or beyond `duration` this is exactly `target`, whatever the frame
/// timing looked like on the way there.
pub fn displayed_price(target: i64, elapsed: Duration, duration: Duration) -> i64 {
    if elapsed >= duration || duration.is_zero() {
        return target;
    }
    let t = elapsed.as_secs_f64() / duration.as_secs_f64();
    (target as f64 * eased_progress(t)).round() as i64
}

/// Renders with thousands separators: `180921` becomes `"180,921"`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    let lead = digits.len() % 3;
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && index % 3 == lead % 3 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Drives the count-up, handing each rendered frame to `sink`. The last
/// frame always renders exactly `format_thousands(target)`.
pub async fn run_count_up<F>(target: i64, duration: Duration, frame: Duration, mut sink: F)
where
    F: FnMut(String),
{
    let started = Instant::now();
    let mut frames = interval(frame);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        frames.tick().await;
        let elapsed = started.elapsed();
        sink(format_thousands(displayed_price(target, elapsed, duration)));
        if elapsed >= duration {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_both_endpoints_and_decelerates() {
        assert_eq!(eased_progress(0.0), 0.0);
        assert_eq!(eased_progress(1.0), 1.0);
        // Out-of-range inputs clamp rather than overshoot.
        assert_eq!(eased_progress(-0.5), 0.0);
        assert_eq!(eased_progress(2.0), 1.0);
        // Ease-out: more than half the distance is covered by the midpoint.
        assert!(eased_progress(0.5) > 0.5);
    }

    #[test]
    fn displayed_price_is_exact_at_and_beyond_the_duration() {
        let duration = COUNT_UP_DURATION;
        assert_eq!(displayed_price(180_921, duration, duration), 180_921);
        assert_eq!(
            displayed_price(180_921, duration + Duration::from_millis(250), duration),
            180_921
        );
        assert_eq!(displayed_price(180_921, Duration::ZERO, duration), 0);
        assert_eq!(displayed_price(180_921, duration, Duration::ZERO), 180_921);
    }

    #[test]
    fn displayed_price_climbs_monotonically() {
        let duration = COUNT_UP_DURATION;
        let mut previous = -1;
        for millis in (0..=800).step_by(40) {
            let value = displayed_price(250_000, Duration::from_millis(millis), duration);
            assert!(value >= previous, "dipped at {millis}ms");
            previous = value;
        }
        assert_eq!(previous, 250_000);
    }

    #[test]
    fn formats_thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(180_921), "180,921");
        assert_eq!(format_thousands(2_500_000), "2,500,000");
        assert_eq!(format_thousands(-54_321), "-54,321");
    }

    #[tokio::test(start_paused = true)]
    async fn count_up_final_frame_is_exact_with_awkward_frame_timing() {
        // 17ms frames never divide 800ms evenly; the driver must still
        // land exactly on the target.
        let mut frames = Vec::new();
        run_count_up(
            180_921,
            COUNT_UP_DURATION,
            Duration::from_millis(17),
            |rendered| frames.push(rendered),
        )
        .await;

        assert_eq!(frames.first().map(String::as_str), Some("0"));
        assert_eq!(frames.last().map(String::as_str), Some("180,921"));
        assert!(frames.len() > 2);
    }

    #[tokio::test(start_paused = true)]
    async fn count_up_with_zero_target_still_terminates() {
        let mut frames = Vec::new();
        run_count_up(0, Duration::from_millis(50), Duration::from_millis(16), |f| {
            frames.push(f)
        })
        .await;
        assert_eq!(frames.last().map(String::as_str), Some("0"));
    }
}
