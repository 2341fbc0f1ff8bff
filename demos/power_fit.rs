//! Fit `x^2` on `[-4, 4]`, then take the `p = 1` identity shortcut and show
//! it costs exactly two segments with no search.
//!
//! Run with:
//! `cargo run --example power_fit`

use pwl_activations::{approximate, Activation};

fn main() {
    let square = Activation::Power { p: 2.0, scale: 1.0, shift: 0.0 };
    let segments = approximate(square, -4.0, 4.0, 0.01).expect("power fit should converge");
    println!("x^2 on [-4, 4], eps=0.01: {} segments", segments.len());
    for s in &segments {
        println!("  alpha={:+.6} slope={:+.6} intercept={:+.6}", s.alpha, s.slope, s.intercept);
    }

    let identity = Activation::Power { p: 1.0, scale: 1.0, shift: 0.0 };
    let segments = approximate(identity, -4.0, 4.0, 0.01).expect("identity shortcut never fails");
    println!("\nx^1 (identity shortcut): {} segments, no PivotSearch invoked", segments.len());
    for s in &segments {
        println!("  alpha={:+.6} slope={:+.6} intercept={:+.6}", s.alpha, s.slope, s.intercept);
    }
}
