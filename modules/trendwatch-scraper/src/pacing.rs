//! Deliberate inter-request pacing. These delays are backpressure against
//! the target sites, not resource-contention management.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

/// Delay ranges (milliseconds) between the sweep's suspension points.
#[derive(Debug, Clone)]
pub struct Pacing {
    /// Between platform scrapes within the creator loop.
    pub platform_gap: RangeInclusive<u64>,
    /// Between individual tweet-media downloads.
    pub media_gap: RangeInclusive<u64>,
    /// Between Instagram post visits.
    pub post_gap: RangeInclusive<u64>,
    /// Between hashtag searches.
    pub hashtag_gap: RangeInclusive<u64>,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            platform_gap: 5_000..=10_000,
            media_gap: 1_000..=3_000,
            post_gap: 2_000..=5_000,
            hashtag_gap: 3_000..=7_000,
        }
    }
}

impl Pacing {
    /// Zero delays, for tests.
    pub fn none() -> Self {
        Self {
            platform_gap: 0..=0,
            media_gap: 0..=0,
            post_gap: 0..=0,
            hashtag_gap: 0..=0,
        }
    }
}

/// Sleep a uniformly random duration drawn from `range`.
pub async fn pause(range: &RangeInclusive<u64>) {
    let ms = rand::rng().random_range(range.clone());
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gaps_match_the_intended_throttle() {
        let pacing = Pacing::default();
        assert_eq!(pacing.platform_gap, 5_000..=10_000);
        assert_eq!(pacing.media_gap, 1_000..=3_000);
        assert_eq!(pacing.post_gap, 2_000..=5_000);
        assert_eq!(pacing.hashtag_gap, 3_000..=7_000);
    }

    #[tokio::test]
    async fn zero_range_does_not_sleep() {
        let start = std::time::Instant::now();
        pause(&(0..=0)).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
