//! Fits four areas into a 300x300-capped bin and prints the layout.
//!
//! Run with: `cargo run --example fit_demo`

use atlas_fitter_core::prelude::*;

fn main() -> Result<()> {
    let items = vec![
        FitItem::new("area_0", 50, 30),
        FitItem::new("area_1", 250, 60),
        FitItem::new("area_2", 30, 260),
        FitItem::new("area_3", 80, 80),
    ];
    let cfg = FitterConfig {
        max_width: 300,
        max_height: 300,
        fit_calls_limit: 10_000,
        ..Default::default()
    };

    let out = fit_areas(items, &cfg)?;

    println!("fitting success");
    for a in &out.areas {
        println!(
            "{} w={:3} h={:3} bin={} x={:3} y={:3}",
            a.key, a.width, a.height, a.bin, a.x, a.y
        );
    }
    for (i, b) in out.bins.iter().enumerate() {
        println!("bin {} {}x{} ({} px²)", i, b.width, b.height, b.size);
    }
    println!("{}", out.stats().summary());
    println!("quality: {:.1}%", out.quality);
    Ok(())
}
