// small numeric helpers shared by the analysis pipeline

/// Evenly spaced values over [start, end], endpoints included.
/// A single-point "grid" collapses onto start.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    assert!(num_values > 0, "linspace needs at least one point");
    if num_values == 1 {
        return vec![start];
    }
    let step = (end - start) / (num_values - 1) as f64;
    (0..num_values).map(|i| start + step * i as f64).collect()
}

/// Euclidean norm of a 2-vector.
pub fn norm2(x: f64, y: f64) -> f64 {
    (x * x + y * y).sqrt()
}
