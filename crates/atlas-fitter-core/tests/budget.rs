use atlas_fitter_core::{fit_areas, FitError, FitItem, FitOutput, FitterConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_items(count: usize, seed: u64) -> Vec<FitItem<String>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            FitItem::new(
                format!("r{}", i),
                rng.gen_range(20..80),
                rng.gen_range(20..80),
            )
        })
        .collect()
}

fn total_bin_area<K>(out: &FitOutput<K>) -> u64 {
    out.bins.iter().map(|b| b.size).sum()
}

#[test]
fn zero_budget_exhausts_immediately() {
    let cfg = FitterConfig {
        max_width: 256,
        max_height: 256,
        fit_calls_limit: 0,
        ..Default::default()
    };
    let items = vec![FitItem::new("a", 10, 10), FitItem::new("b", 10, 10)];
    match fit_areas(items, &cfg) {
        Err(FitError::BudgetExhausted { calls_limit }) => assert_eq!(calls_limit, 0),
        other => panic!("expected BudgetExhausted, got {:?}", other.map(|o| o.quality)),
    }
}

#[test]
fn starved_budget_never_reports_a_partial_layout() {
    // 32 areas but only 10 placement trials: a complete placement is
    // unreachable, and the engine must say so rather than hand back an
    // inconsistent layout.
    let cfg = FitterConfig {
        max_width: 256,
        max_height: 256,
        max_bin_size: 65_536,
        fit_calls_limit: 10,
        ..Default::default()
    };
    let items = random_items(32, 11);
    match fit_areas(items, &cfg) {
        Err(FitError::BudgetExhausted { .. }) => {}
        Ok(out) => {
            // If a layout is reported it must be complete and consistent.
            assert_eq!(out.areas.len(), 32);
            assert!(out.quality > 0.0 && out.quality <= 100.0);
        }
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn larger_budget_never_worsens_the_best() {
    let cfg_small = FitterConfig {
        max_width: 128,
        max_height: 128,
        fit_calls_limit: 300,
        ..Default::default()
    };
    let cfg_large = FitterConfig {
        fit_calls_limit: 30_000,
        ..cfg_small.clone()
    };
    let items: Vec<FitItem<&str>> = vec![
        FitItem::new("a", 60, 40),
        FitItem::new("b", 50, 50),
        FitItem::new("c", 40, 60),
        FitItem::new("d", 30, 30),
        FitItem::new("e", 20, 50),
        FitItem::new("f", 50, 20),
        FitItem::new("g", 25, 25),
        FitItem::new("h", 45, 35),
    ];

    let small = fit_areas(items.clone(), &cfg_small).expect("small budget still completes");
    let large = fit_areas(items, &cfg_large).expect("large budget completes");
    assert!(
        total_bin_area(&large) <= total_bin_area(&small),
        "more budget produced a worse layout: {} > {}",
        total_bin_area(&large),
        total_bin_area(&small)
    );
    assert!(large.quality >= small.quality - 1e-9);
}

#[test]
fn calls_used_stays_within_the_limit() {
    let cfg = FitterConfig {
        max_width: 256,
        max_height: 256,
        fit_calls_limit: 2_000,
        ..Default::default()
    };
    let out = fit_areas(random_items(12, 3), &cfg).expect("completes");
    assert!(out.fit_calls_used <= 2_000);
    assert!(out.fit_calls_used > 0);
}
