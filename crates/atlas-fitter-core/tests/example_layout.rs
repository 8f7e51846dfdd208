use atlas_fitter_core::{fit_areas, FitItem, FitOutput, FitterConfig};

fn disjoint(out: &FitOutput<&str>) -> bool {
    for i in 0..out.areas.len() {
        for j in (i + 1)..out.areas.len() {
            let a = &out.areas[i];
            let b = &out.areas[j];
            if a.bin != b.bin {
                continue;
            }
            let a_x2 = a.x + a.width;
            let a_y2 = a.y + a.height;
            let b_x2 = b.x + b.width;
            let b_y2 = b.y + b.height;
            let overlap = !(a.x >= b_x2 || b.x >= a_x2 || a.y >= b_y2 || b.y >= a_y2);
            if overlap {
                return false;
            }
        }
    }
    true
}

#[test]
fn canonical_four_area_layout() {
    let cfg = FitterConfig {
        max_width: 300,
        max_height: 300,
        fit_calls_limit: 10_000,
        ..Default::default()
    };
    let items = vec![
        FitItem::new("a", 50, 30),
        FitItem::new("b", 250, 60),
        FitItem::new("c", 30, 260),
        FitItem::new("d", 80, 80),
    ];
    let out = fit_areas(items, &cfg).expect("canonical layout fits");

    // Everything lands in one bin within the configured caps.
    assert_eq!(out.bins.len(), 1);
    assert!(out.bins[0].width <= 300);
    assert!(out.bins[0].height <= 300);
    assert!(out.bins[0].size <= 300 * 300);

    // Every input area survives with its dimensions intact.
    assert_eq!(out.areas.len(), 4);
    let mut keys: Vec<&str> = out.areas.iter().map(|a| a.key).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["a", "b", "c", "d"]);

    for a in &out.areas {
        let b = &out.bins[a.bin];
        assert!(a.x + a.width <= b.width, "area {} exceeds bin width", a.key);
        assert!(a.y + a.height <= b.height, "area {} exceeds bin height", a.key);
    }
    assert!(disjoint(&out), "placed areas overlap");

    // Conservation and quality bounds.
    let used: u64 = out
        .areas
        .iter()
        .map(|a| a.width as u64 * a.height as u64)
        .sum();
    let total: u64 = out.bins.iter().map(|b| b.size).sum();
    assert!(total >= used);
    assert!(out.quality > 0.0 && out.quality <= 100.0);
    assert!(out.fit_calls_used <= 10_000);
}

#[test]
fn output_is_sorted_by_bin_then_position() {
    let cfg = FitterConfig {
        max_width: 300,
        max_height: 300,
        fit_calls_limit: 10_000,
        ..Default::default()
    };
    let items = vec![
        FitItem::new("a", 50, 30),
        FitItem::new("b", 250, 60),
        FitItem::new("c", 30, 260),
        FitItem::new("d", 80, 80),
    ];
    let out = fit_areas(items, &cfg).expect("canonical layout fits");
    for w in out.areas.windows(2) {
        let prev = (w[0].bin, w[0].x, w[0].y);
        let next = (w[1].bin, w[1].x, w[1].y);
        assert!(prev <= next, "output order regressed: {:?} > {:?}", prev, next);
    }
}
