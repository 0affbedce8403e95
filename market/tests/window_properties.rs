use market::pulse::{NoiseStrategy, path_ratio, score};
use market::{RetentionPolicy, SampleWindow};
use proptest::prelude::*;

fn ticks() -> impl Strategy<Value = Vec<(u64, f64)>> {
    // (gap since previous push in ms, price)
    prop::collection::vec((0u64..30_000, 0.01f64..100_000.0), 0..64)
}

proptest! {
    #[test]
    fn never_retains_samples_older_than_max_age(
        max_age_ms in 1u64..120_000,
        pushes in ticks(),
    ) {
        let mut w = SampleWindow::new(RetentionPolicy::MaxAge { max_age_ms });
        let mut now = 0u64;

        for (gap, price) in pushes {
            now += gap;
            w.push(now, price);

            let newest = w.latest().map(|s| s.ts_ms).unwrap_or(now);
            prop_assert_eq!(newest, now);
            for s in w.samples() {
                prop_assert!(newest - s.ts_ms <= max_age_ms);
            }
        }
    }

    #[test]
    fn timestamps_stay_non_decreasing(
        raw in prop::collection::vec((0u64..1_000_000, 0.01f64..1_000.0), 0..64),
    ) {
        let mut w = SampleWindow::new(RetentionPolicy::MaxAge { max_age_ms: 10_000_000 });

        for (ts, price) in raw {
            w.push(ts, price);
        }

        let ts: Vec<u64> = w.samples().map(|s| s.ts_ms).collect();
        prop_assert!(ts.windows(2).all(|p| p[0] <= p[1]));
    }

    #[test]
    fn extremes_match_a_full_scan(
        capacity in 1usize..16,
        pushes in ticks(),
    ) {
        let mut w = SampleWindow::new(RetentionPolicy::MaxSamples { capacity });
        let mut now = 0u64;

        for (gap, price) in pushes {
            now += gap;
            w.push(now, price);

            prop_assert!(w.len() <= capacity);

            let prices = w.prices();
            let hi = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let lo = prices.iter().cloned().fold(f64::INFINITY, f64::min);
            prop_assert_eq!(w.max(), Some(hi));
            prop_assert_eq!(w.min(), Some(lo));
        }
    }

    #[test]
    fn path_noise_is_bounded(prices in prop::collection::vec(0.01f64..1_000.0, 0..32)) {
        let z = path_ratio(&prices, 4.0);
        prop_assert!((0.0..=1.0).contains(&z));
    }

    #[test]
    fn scoring_is_deterministic(prices in prop::collection::vec(0.01f64..1_000.0, 0..32)) {
        for strategy in [NoiseStrategy::default(), NoiseStrategy::RangeRatio] {
            prop_assert_eq!(score(&prices, strategy), score(&prices, strategy));
        }
    }
}
