//! Property tests for the projection engine over arbitrary inputs and flags.

use ea_algo::project;
use ea_core::{EnabledSet, ImpactModel, InputSet, MetricKey, Preset};
use proptest::prelude::*;

fn arb_inputs() -> impl Strategy<Value = InputSet> {
    (
        (-1e7f64..1e8, -1e6f64..1e7, -100.0f64..100.0, -50.0f64..500.0),
        (-36.0f64..36.0, -100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0),
        (-1e7f64..1e8, -100.0f64..100.0, -1e7f64..1e7, -100.0f64..100.0, -1e6f64..1e7),
    )
        .prop_map(|((p, ds, wr, reps), (cyc, ret, gm, exp), (arr, nps, cost, churn, cltv))| InputSet {
            pipeline: p,
            deal_size: ds,
            win_rate: wr,
            sales_reps: reps,
            sales_cycle: cyc,
            retention: ret,
            gross_margin: gm,
            expansion: exp,
            arr,
            nps,
            ea_cost: cost,
            churn,
            cltv,
        })
}

fn arb_enabled() -> impl Strategy<Value = EnabledSet> {
    proptest::collection::vec(any::<bool>(), 13).prop_map(|flags| {
        let mut en = EnabledSet::none();
        for (k, on) in MetricKey::INPUTS.iter().zip(flags) {
            en.set(*k, on).unwrap();
        }
        en
    })
}

fn arb_model() -> impl Strategy<Value = ImpactModel> {
    prop_oneof![
        Just(ImpactModel::from_preset(Preset::Standard)),
        Just(ImpactModel::from_preset(Preset::Conservative)),
    ]
}

proptest! {
    #[test]
    fn outputs_are_always_finite(inp in arb_inputs(), en in arb_enabled(), model in arb_model()) {
        let r = project(&inp, &en, &model);
        for m in [&r.current, &r.projected, &r.improvement] {
            for (k, v) in m.iter() {
                prop_assert!(v.is_finite(), "{k} = {v}");
            }
        }
        prop_assert!(r.roi.is_finite());
        prop_assert!(r.payback_months.is_finite());
        prop_assert!(r.net_present_value.is_finite());
        prop_assert!(r.total_annual_benefit.is_finite());
    }

    #[test]
    fn only_enabled_inputs_appear(inp in arb_inputs(), en in arb_enabled(), model in arb_model()) {
        let r = project(&inp, &en, &model);
        for k in MetricKey::INPUTS {
            prop_assert_eq!(r.current.contains(k), en.is_enabled(k));
            if !en.is_enabled(k) {
                prop_assert_eq!(r.improvement_of(k), 0.0);
            }
        }
        prop_assert_eq!(r.current.contains(MetricKey::Revenue), en.has_revenue_base());
    }

    #[test]
    fn clamps_hold(inp in arb_inputs(), model in arb_model()) {
        let r = project(&inp, &EnabledSet::all(), &model);
        prop_assert!(r.projected.get(MetricKey::Retention).unwrap() <= 95.0);
        prop_assert!(r.projected.get(MetricKey::Nps).unwrap() <= 80.0);
        prop_assert!(r.projected.get(MetricKey::GrossMargin).unwrap() <= 90.0);
        prop_assert!(r.projected.get(MetricKey::Churn).unwrap() >= 2.0);
    }

    #[test]
    fn improvement_sign_convention(inp in arb_inputs(), en in arb_enabled(), model in arb_model()) {
        let r = project(&inp, &en, &model);
        for k in en.keys() {
            let row = r.row(k).unwrap();
            let expected = if k.reduction_is_good() {
                row.current - row.projected
            } else {
                row.projected - row.current
            };
            prop_assert!((row.improvement - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
        }
    }

    #[test]
    fn revenue_identity(inp in arb_inputs(), en in arb_enabled(), model in arb_model()) {
        let r = project(&inp, &en, &model);
        if let Some(row) = r.row(MetricKey::Revenue) {
            let lhs = row.projected;
            let rhs = row.current + row.improvement;
            prop_assert!((lhs - rhs).abs() <= 1e-6 * (1.0 + lhs.abs()));
        }
    }

    #[test]
    fn pass_through_rows_are_unchanged(inp in arb_inputs(), model in arb_model()) {
        let r = project(&inp, &EnabledSet::all(), &model);
        for k in [MetricKey::Pipeline, MetricKey::SalesReps, MetricKey::EaCost] {
            prop_assert_eq!(r.current.get(k), r.projected.get(k));
            prop_assert_eq!(r.improvement_of(k), 0.0);
        }
    }

    #[test]
    fn arr_ignores_disabled_knock_ons(inp in arb_inputs(), model in arb_model()) {
        let en = EnabledSet::only(&[MetricKey::Arr]).unwrap();
        let r = project(&inp, &en, &model);
        let expected = inp.arr * (1.0 + model.uplifts.arr);
        let got = r.projected.get(MetricKey::Arr).unwrap();
        prop_assert!((got - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
    }

    #[test]
    fn zero_cost_means_zero_roi(mut inp in arb_inputs(), en in arb_enabled(), model in arb_model()) {
        inp.ea_cost = 0.0;
        let r = project(&inp, &en, &model);
        prop_assert_eq!(r.roi, 0.0);
        prop_assert_eq!(r.payback_months, 0.0);
    }

    #[test]
    fn negative_cost_means_zero_roi(
        mut inp in arb_inputs(),
        cost in -1e7f64..-1.0,
        en in arb_enabled(),
        model in arb_model(),
    ) {
        inp.ea_cost = cost;
        let r = project(&inp, &en, &model);
        prop_assert_eq!(r.roi, 0.0);
        prop_assert_eq!(r.investment_cost, cost);
        let b = r.total_annual_benefit;
        let q = cost / b;
        let expected = if b > 0.0 && q.is_finite() { q * 12.0 } else { 0.0 };
        prop_assert!((r.payback_months - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
        prop_assert!(r.payback_months <= 0.0);
    }
}
