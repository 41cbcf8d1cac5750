use conclave_decay::{decayed_rate, half_life_decay};
use proptest::prelude::*;

proptest! {
    #[test]
    fn decay_is_bounded(age in 0.0f64..10_000.0, half_life in 1.0f64..1_000.0) {
        let d = half_life_decay(age, half_life);
        prop_assert!(d > 0.0 || age / half_life > 1000.0);
        prop_assert!(d <= 1.0);
    }

    #[test]
    fn decay_strictly_decreasing_in_age(
        age in 0.0f64..2_000.0,
        step in 0.01f64..100.0,
        half_life in 30.0f64..900.0,
    ) {
        let earlier = half_life_decay(age, half_life);
        let later = half_life_decay(age + step, half_life);
        prop_assert!(later < earlier, "decay({}) = {} !< decay({}) = {}", age + step, later, age, earlier);
    }

    #[test]
    fn longer_half_life_decays_slower(age in 0.1f64..1_000.0, hl in 30.0f64..400.0, extra in 1.0f64..500.0) {
        prop_assert!(half_life_decay(age, hl + extra) > half_life_decay(age, hl));
    }

    #[test]
    fn decayed_rate_never_exceeds_base(base in 0.0f64..5.0, age in 0.0f64..1_000.0, hl in 30.0f64..900.0) {
        prop_assert!(decayed_rate(base, age, hl) <= base);
    }

    #[test]
    fn half_life_composes(hl in 30.0f64..900.0, a in 0.0f64..500.0, b in 0.0f64..500.0) {
        let combined = half_life_decay(a + b, hl);
        let product = half_life_decay(a, hl) * half_life_decay(b, hl);
        prop_assert!((combined - product).abs() < 1e-12);
    }
}
