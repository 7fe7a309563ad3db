use approx::assert_relative_eq;
use graph_rs::content::project_bar;
use graph_rs::core::{AxisId, ContentRange, Domain, DomainRules, LinearScale, compute_domain};
use proptest::prelude::*;

fn range(axis: AxisId, a: f64, b: f64) -> ContentRange {
    ContentRange::from_values(axis, [a, b]).expect("finite range")
}

proptest! {
    #[test]
    fn linear_scale_is_monotonic_and_invertible(
        lower in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        left in 0.0f64..0.5,
        right in 0.5f64..1.0,
    ) {
        let domain = Domain::new(lower, lower + span);
        let scale = LinearScale::new(domain, (40.0, 760.0)).expect("valid scale");
        let a = lower + left * span;
        let b = lower + right * span;

        prop_assert!(scale.map(a) <= scale.map(b));
        prop_assert!((scale.invert(scale.map(a)) - a).abs() <= 1e-6 * span.max(1.0));
    }

    #[test]
    fn inverted_pixel_range_flips_order(
        lower in -1_000.0f64..1_000.0,
        span in 0.01f64..1_000.0,
    ) {
        let scale = LinearScale::new(Domain::new(lower, lower + span), (240.0, 10.0))
            .expect("valid scale");
        prop_assert!(scale.map(lower) > scale.map(lower + span));
    }

    #[test]
    fn merged_domain_ignores_load_order(
        a in -500.0f64..500.0,
        b in -500.0f64..500.0,
        c in -500.0f64..500.0,
        d in -500.0f64..500.0,
    ) {
        let first = range(AxisId::Y, a, b);
        let second = range(AxisId::Y, c, d);
        let forward = compute_domain(&[first, second], AxisId::Y, DomainRules::numeric())
            .expect("domain");
        let backward = compute_domain(&[second, first], AxisId::Y, DomainRules::numeric())
            .expect("domain");
        prop_assert_eq!(forward, backward);
        prop_assert!(forward.lower_limit <= a.min(b).min(c).min(d) + 0.006);
        prop_assert!(forward.upper_limit >= a.max(b).max(c).max(d) - 0.006);
    }

    #[test]
    fn bars_never_leave_the_plot(
        value_px in -200.0f64..600.0,
        zero_px in -200.0f64..600.0,
    ) {
        let rect = project_bar(100.0, -5.0, 10.0, value_px, zero_px, (400.0, 10.0));
        prop_assert!(rect.y >= 10.0);
        prop_assert!(rect.y + rect.height <= 400.0 + 1e-9);
        prop_assert!(rect.height >= 0.0);
    }
}

#[test]
fn ranges_on_other_axes_do_not_contribute() {
    let domain = compute_domain(
        &[range(AxisId::Y, 10.0, 90.0), range(AxisId::Y2, -1000.0, 1000.0)],
        AxisId::Y,
        DomainRules::numeric(),
    )
    .expect("domain");
    assert_relative_eq!(domain.lower_limit, 6.0);
    assert_relative_eq!(domain.upper_limit, 94.0);
}
