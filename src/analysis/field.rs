//! # Field Sampler Module
//!
//! Evaluates the vector field on a rectangular grid for quiver-style
//! rendering. Each node carries the raw (dx, dy) components and the Euclidean
//! magnitude; with normalization enabled the components are rescaled to unit
//! length while the magnitude stays raw for coloring. A node where the field
//! is exactly zero yields the zero vector, never NaN.
//!
//! Grid rows are evaluated in parallel with rayon; the lambdified field
//! closures are Send + Sync so no coordination is needed.

use crate::symbolic::symbolic_lambdify::Func2D;
use crate::symbolic::utils::{linspace, norm2};
use nalgebra::DMatrix;
use rayon::prelude::*;

/// Sampled vector field on a rectangular grid. Matrices are indexed
/// (row, col) = (y index, x index).
#[derive(Debug, Clone)]
pub struct FieldSample {
    pub x_coords: Vec<f64>,
    pub y_coords: Vec<f64>,
    pub dx: DMatrix<f64>,
    pub dy: DMatrix<f64>,
    /// raw Euclidean magnitude at each node, kept unmodified even when the
    /// direction components are normalized
    pub magnitude: DMatrix<f64>,
    pub normalized: bool,
}

pub struct FieldSampler {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// nodes per axis: (nx, ny)
    pub resolution: (usize, usize),
    /// rescale (dx, dy) to unit length for direction-only rendering
    pub normalize: bool,
}

impl FieldSampler {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        assert!(x_min <= x_max, "x_min must not exceed x_max");
        assert!(y_min <= y_max, "y_min must not exceed y_max");
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            resolution: (20, 20),
            normalize: true,
        }
    }

    pub fn with_resolution(mut self, nx: usize, ny: usize) -> Self {
        assert!(nx > 0 && ny > 0, "resolution must be positive");
        self.resolution = (nx, ny);
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Evaluates (f, g) and the magnitude at every grid node.
    pub fn sample(&self, f_fn: &Func2D, g_fn: &Func2D) -> FieldSample {
        let (nx, ny) = self.resolution;
        let x_coords = linspace(self.x_min, self.x_max, nx);
        let y_coords = linspace(self.y_min, self.y_max, ny);

        // one row of nodes per y value, rows evaluated in parallel
        let rows: Vec<Vec<(f64, f64, f64)>> = y_coords
            .par_iter()
            .map(|&y| {
                x_coords
                    .iter()
                    .map(|&x| {
                        let (u, v) = (f_fn(x, y), g_fn(x, y));
                        let mag = norm2(u, v);
                        if self.normalize {
                            if mag > 0.0 {
                                (u / mag, v / mag, mag)
                            } else {
                                // zero field at this node: keep the zero vector
                                (0.0, 0.0, mag)
                            }
                        } else {
                            (u, v, mag)
                        }
                    })
                    .collect()
            })
            .collect();

        let mut dx = DMatrix::zeros(ny, nx);
        let mut dy = DMatrix::zeros(ny, nx);
        let mut magnitude = DMatrix::zeros(ny, nx);
        for (i, row) in rows.iter().enumerate() {
            for (j, &(u, v, mag)) in row.iter().enumerate() {
                dx[(i, j)] = u;
                dy[(i, j)] = v;
                magnitude[(i, j)] = mag;
            }
        }
        FieldSample {
            x_coords,
            y_coords,
            dx,
            dy,
            magnitude,
            normalized: self.normalize,
        }
    }
}

//___________________________________TESTS____________________________________
