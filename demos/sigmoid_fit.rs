//! Fit a sigmoid on `[-10, 10]` and print the resulting segments.
//!
//! Run with:
//! `cargo run --example sigmoid_fit`

use pwl_activations::{approximate, into_parallel_arrays, Activation};

fn main() {
    let (l, u, eps) = (-10.0, 10.0, 0.005);
    let segments = approximate(Activation::Sigmoid, l, u, eps).expect("sigmoid fit should converge");

    println!("sigmoid on [{l}, {u}], eps={eps}: {} segments", segments.len());
    for s in &segments {
        println!("  alpha={:+.6} slope={:+.6} intercept={:+.6}", s.alpha, s.slope, s.intercept);
    }

    let (m, b, alpha) = into_parallel_arrays(&segments);
    let mut max_err = 0.0_f64;
    for &x in &[-8.0, -3.0, -0.5, 0.0, 0.5, 3.0, 8.0] {
        let i = alpha[..alpha.len() - 1].iter().rposition(|&a| a <= x).unwrap_or(0);
        let approx = m[i] * x + b[i];
        let exact = 1.0 / (1.0 + (-x).exp());
        max_err = max_err.max((approx - exact).abs());
        println!("x={x:+.2}: approx={approx:.6}, exact={exact:.6}");
    }
    println!("max sampled error = {max_err:.6}");
}
