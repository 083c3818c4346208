//! # Symbolic Backend Module
//!
//! The analysis pipeline consumes symbolic computation as an injected
//! capability instead of reaching into a particular engine: every stage takes
//! a `&dyn SymbolicBackend`, so a different symbolic-math or linear-algebra
//! library can be swapped in without touching the pipeline structure.
//!
//! `ExprBackend` is the on-board implementation:
//! - differentiation via the crate's own symbolic engine;
//! - equilibrium solving with an exact affine fast path (2x2 linear algebra
//!   with rank/consistency analysis) and damped multi-start Newton-Raphson
//!   otherwise;
//! - closed-form eigen-decomposition of 2x2 matrices over complex numbers;
//! - lambdification through the symbolic engine.

use crate::analysis::errors::{AnalysisError, AnalysisResult};
use crate::global::{ROOT_MERGE_TOL, THRESHOLD};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::Func2D;
use crate::symbolic::utils::{linspace, norm2};
use itertools::iproduct;
use log::{info, warn};
use nalgebra::{Matrix2, Vector2};
use num_complex::Complex;
use std::collections::HashMap;

/// One eigenvalue of a 2x2 matrix together with its algebraic multiplicity and
/// the eigenvectors spanning its eigenspace.
///
/// `vectors` may be shorter than `multiplicity`: a repeated eigenvalue with a
/// one-dimensional eigenspace (defective matrix) carries a single vector and
/// is reported as such, never padded with a fabricated basis vector.
#[derive(Debug, Clone)]
pub struct EigenTriple {
    pub value: Complex<f64>,
    pub multiplicity: usize,
    pub vectors: Vec<Vector2<Complex<f64>>>,
}

/// Variable binding returned by the equilibrium solver: variable name -> value.
pub type Binding = HashMap<String, f64>;

/// The oracle capability consumed by the pipeline stages.
///
/// Eigen triples are reported in whatever order the backend produces them;
/// callers must not assume any sorting of eigenvalues.
pub trait SymbolicBackend {
    /// Partial derivative of `expr` with respect to `var`.
    fn differentiate(&self, expr: &Expr, var: &str) -> AnalysisResult<Expr>;

    /// Solves the simultaneous system `equations = 0` over `unknowns`.
    ///
    /// An empty result is a valid outcome (no equilibria). An infinite
    /// solution set raises `AnalysisError::DegenerateSystem`.
    fn solve_system(&self, equations: &[Expr], unknowns: &[&str])
    -> AnalysisResult<Vec<Binding>>;

    /// Eigenvalues (with algebraic multiplicity) and eigenvectors of a numeric
    /// 2x2 matrix.
    fn eigen_decompose(&self, matrix: &Matrix2<f64>) -> AnalysisResult<Vec<EigenTriple>>;

    /// Converts a symbolic expression of the two given variables into a
    /// numerically evaluable function.
    fn lambdify(&self, expr: &Expr, vars: (&str, &str)) -> AnalysisResult<Func2D>;
}

/// Backend implementation over the crate's own symbolic engine plus nalgebra.
pub struct ExprBackend {
    /// residual norm below which a Newton iterate counts as converged
    pub newton_tolerance: f64,
    /// max Newton iterations per start point
    pub newton_max_iterations: usize,
    /// damping factor applied to every Newton step
    pub damping_factor: f64,
    /// rectangular window seeded with Newton start points: (x_min, x_max, y_min, y_max)
    pub search_window: (f64, f64, f64, f64),
    /// Newton start points per axis (starts_per_axis^2 starts in total)
    pub starts_per_axis: usize,
    /// more distinct roots than this is taken as a non-finite solution set
    pub max_distinct_roots: usize,
}

impl Default for ExprBackend {
    fn default() -> Self {
        Self {
            newton_tolerance: 1e-12,
            newton_max_iterations: 50,
            damping_factor: 1.0,
            search_window: (-5.0, 5.0, -5.0, 5.0),
            starts_per_axis: 7,
            max_distinct_roots: 12,
        }
    }
}

impl ExprBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the Newton start grid to the given window (usually the
    /// portrait axes).
    pub fn set_search_window(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
        assert!(x_min < x_max, "x_min must be below x_max");
        assert!(y_min < y_max, "y_min must be below y_max");
        self.search_window = (x_min, x_max, y_min, y_max);
    }

    /// Exact solve of an affine 2x2 system A z + c = 0.
    ///
    /// The degenerate branch (singular A) distinguishes an inconsistent system
    /// (no solutions, empty result) from a consistent one (a whole line or the
    /// whole plane of solutions), which is raised as DegenerateSystem.
    fn solve_affine(
        &self,
        a: Matrix2<f64>,
        c: Vector2<f64>,
        unknowns: &[&str],
    ) -> AnalysisResult<Vec<Binding>> {
        let det = a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)];
        if det.abs() > THRESHOLD {
            let zx = (-c[0] * a[(1, 1)] + c[1] * a[(0, 1)]) / det;
            let zy = (-c[1] * a[(0, 0)] + c[0] * a[(1, 0)]) / det;
            return Ok(vec![binding(unknowns, zx, zy)]);
        }

        let row_zero = |i: usize| a[(i, 0)].abs() <= THRESHOLD && a[(i, 1)].abs() <= THRESHOLD;
        match (row_zero(0), row_zero(1)) {
            (true, true) => {
                if c[0].abs() <= THRESHOLD && c[1].abs() <= THRESHOLD {
                    Err(AnalysisError::DegenerateSystem(
                        "both equations vanish identically; every point is an equilibrium"
                            .to_string(),
                    ))
                } else {
                    Ok(vec![])
                }
            }
            (true, false) | (false, true) => {
                let zero_row = if row_zero(0) { 0 } else { 1 };
                if c[zero_row].abs() <= THRESHOLD {
                    Err(AnalysisError::DegenerateSystem(
                        "one equation vanishes identically; the solution set is a line"
                            .to_string(),
                    ))
                } else {
                    Ok(vec![])
                }
            }
            (false, false) => {
                // singular with two nonzero rows: the nullclines are parallel
                // lines; consistent iff the constant terms are proportional too
                let consistent = (a[(0, 0)] * c[1] - a[(1, 0)] * c[0]).abs() <= THRESHOLD
                    && (a[(0, 1)] * c[1] - a[(1, 1)] * c[0]).abs() <= THRESHOLD;
                if consistent {
                    Err(AnalysisError::DegenerateSystem(
                        "the two equations describe the same line of equilibria".to_string(),
                    ))
                } else {
                    Ok(vec![])
                }
            }
        }
    }

    /// Damped Newton-Raphson from a grid of start points, deduplicating the
    /// converged roots.
    fn solve_newton_multistart(
        &self,
        f_fn: &Func2D,
        g_fn: &Func2D,
        jac_fns: &[Func2D; 4],
        unknowns: &[&str],
    ) -> AnalysisResult<Vec<Binding>> {
        let (x_min, x_max, y_min, y_max) = self.search_window;
        let x_starts = linspace(x_min, x_max, self.starts_per_axis);
        let y_starts = linspace(y_min, y_max, self.starts_per_axis);

        let mut roots: Vec<(f64, f64)> = Vec::new();
        for (&x0, &y0) in iproduct!(x_starts.iter(), y_starts.iter()) {
            if let Some((rx, ry)) = self.newton_from(f_fn, g_fn, jac_fns, x0, y0) {
                let known = roots
                    .iter()
                    .any(|&(px, py)| norm2(px - rx, py - ry) < ROOT_MERGE_TOL);
                if !known {
                    roots.push((rx, ry));
                }
            }
        }
        if roots.len() > self.max_distinct_roots {
            warn!(
                "Newton multistart found {} distinct roots (cap {})",
                roots.len(),
                self.max_distinct_roots
            );
            return Err(AnalysisError::DegenerateSystem(
                "the root set does not appear to be finite".to_string(),
            ));
        }
        // deterministic output order; eigen ordering caveats do not apply here
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        info!("Newton multistart converged to {} distinct root(s)", roots.len());
        Ok(roots
            .into_iter()
            .map(|(rx, ry)| binding(unknowns, rx, ry))
            .collect())
    }

    /// One damped Newton run; returns the root if the iteration converges to
    /// the residual tolerance.
    fn newton_from(
        &self,
        f_fn: &Func2D,
        g_fn: &Func2D,
        jac_fns: &[Func2D; 4],
        x0: f64,
        y0: f64,
    ) -> Option<(f64, f64)> {
        let (mut x, mut y) = (x0, y0);
        for _ in 0..self.newton_max_iterations {
            let (fx, fy) = (f_fn(x, y), g_fn(x, y));
            if !fx.is_finite() || !fy.is_finite() {
                return None;
            }
            if norm2(fx, fy) < self.newton_tolerance {
                return Some((x, y));
            }
            let (j11, j12) = (jac_fns[0](x, y), jac_fns[1](x, y));
            let (j21, j22) = (jac_fns[2](x, y), jac_fns[3](x, y));
            let det = j11 * j22 - j12 * j21;
            if !det.is_finite() || det.abs() < 1e-14 {
                return None;
            }
            let dx = (fx * j22 - fy * j12) / det;
            let dy = (fy * j11 - fx * j21) / det;
            x -= self.damping_factor * dx;
            y -= self.damping_factor * dy;
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
        }
        let (fx, fy) = (f_fn(x, y), g_fn(x, y));
        if fx.is_finite() && fy.is_finite() && norm2(fx, fy) < self.newton_tolerance {
            Some((x, y))
        } else {
            None
        }
    }

    /// Eigenvector of a real 2x2 matrix for a (possibly complex) eigenvalue,
    /// from the rows of (A - lambda*I), normalized to unit length.
    fn eigenvector_for(a: &Matrix2<f64>, lambda: Complex<f64>) -> Vector2<Complex<f64>> {
        let (m11, m12) = (a[(0, 0)], a[(0, 1)]);
        let (m21, m22) = (a[(1, 0)], a[(1, 1)]);
        let v = if m12.abs() > THRESHOLD {
            Vector2::new(Complex::new(m12, 0.0), lambda - Complex::new(m11, 0.0))
        } else if m21.abs() > THRESHOLD {
            Vector2::new(lambda - Complex::new(m22, 0.0), Complex::new(m21, 0.0))
        } else if (lambda - Complex::new(m11, 0.0)).norm() <= THRESHOLD {
            Vector2::new(Complex::new(1.0, 0.0), Complex::new(0.0, 0.0))
        } else {
            Vector2::new(Complex::new(0.0, 0.0), Complex::new(1.0, 0.0))
        };
        let norm = (v[0].norm_sqr() + v[1].norm_sqr()).sqrt();
        if norm > 0.0 { v / Complex::new(norm, 0.0) } else { v }
    }
}

impl SymbolicBackend for ExprBackend {
    fn differentiate(&self, expr: &Expr, var: &str) -> AnalysisResult<Expr> {
        Ok(expr.diff(var).simplify_())
    }

    fn solve_system(
        &self,
        equations: &[Expr],
        unknowns: &[&str],
    ) -> AnalysisResult<Vec<Binding>> {
        if equations.len() != 2 || unknowns.len() != 2 {
            return Err(AnalysisError::Symbolic(format!(
                "expected a 2x2 system, got {} equation(s) over {} unknown(s)",
                equations.len(),
                unknowns.len()
            )));
        }
        for eq in equations {
            let extra: Vec<String> = eq
                .free_variables()
                .into_iter()
                .filter(|v| !unknowns.contains(&v.as_str()))
                .collect();
            if !extra.is_empty() {
                return Err(AnalysisError::Symbolic(format!(
                    "equation '{}' contains symbols {:?} besides the unknowns",
                    eq, extra
                )));
            }
        }

        let (vx, vy) = (unknowns[0], unknowns[1]);
        // partials of both equations; constant partials mean the system is affine
        let partials: Vec<Expr> = equations
            .iter()
            .flat_map(|eq| [eq.diff(vx).simplify_(), eq.diff(vy).simplify_()])
            .collect();
        let constants: Vec<Option<f64>> = partials.iter().map(|p| p.as_constant()).collect();
        if constants.iter().all(|c| c.is_some()) {
            let a = Matrix2::new(
                constants[0].unwrap(),
                constants[1].unwrap(),
                constants[2].unwrap(),
                constants[3].unwrap(),
            );
            let c = Vector2::new(
                equations[0].eval2d(vx, vy, 0.0, 0.0),
                equations[1].eval2d(vx, vy, 0.0, 0.0),
            );
            return self.solve_affine(a, c, unknowns);
        }

        let f_fn = equations[0].lambdify2d(vx, vy);
        let g_fn = equations[1].lambdify2d(vx, vy);
        let jac_fns: [Func2D; 4] = [
            partials[0].lambdify2d(vx, vy),
            partials[1].lambdify2d(vx, vy),
            partials[2].lambdify2d(vx, vy),
            partials[3].lambdify2d(vx, vy),
        ];
        self.solve_newton_multistart(&f_fn, &g_fn, &jac_fns, unknowns)
    }

    fn eigen_decompose(&self, matrix: &Matrix2<f64>) -> AnalysisResult<Vec<EigenTriple>> {
        let (a, b) = (matrix[(0, 0)], matrix[(0, 1)]);
        let (c, d) = (matrix[(1, 0)], matrix[(1, 1)]);
        if !(a.is_finite() && b.is_finite() && c.is_finite() && d.is_finite()) {
            return Err(AnalysisError::Symbolic(
                "matrix entries are not finite".to_string(),
            ));
        }
        let trace = a + d;
        let det = a * d - b * c;
        let disc = trace * trace - 4.0 * det;

        if disc.abs() <= THRESHOLD {
            // repeated real eigenvalue
            let lambda = Complex::new(trace / 2.0, 0.0);
            let scalar_matrix =
                b.abs() <= THRESHOLD && c.abs() <= THRESHOLD && (a - d).abs() <= THRESHOLD;
            let vectors = if scalar_matrix {
                vec![
                    Vector2::new(Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)),
                    Vector2::new(Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)),
                ]
            } else {
                // defective: the eigenspace is one-dimensional
                vec![Self::eigenvector_for(matrix, lambda)]
            };
            return Ok(vec![EigenTriple {
                value: lambda,
                multiplicity: 2,
                vectors,
            }]);
        }

        let make = |lambda: Complex<f64>| EigenTriple {
            value: lambda,
            multiplicity: 1,
            vectors: vec![Self::eigenvector_for(matrix, lambda)],
        };
        if disc > 0.0 {
            let root = disc.sqrt();
            let l1 = Complex::new((trace + root) / 2.0, 0.0);
            let l2 = Complex::new((trace - root) / 2.0, 0.0);
            Ok(vec![make(l1), make(l2)])
        } else {
            let beta = (-disc).sqrt() / 2.0;
            let l1 = Complex::new(trace / 2.0, beta);
            let l2 = l1.conj();
            Ok(vec![make(l1), make(l2)])
        }
    }

    fn lambdify(&self, expr: &Expr, vars: (&str, &str)) -> AnalysisResult<Func2D> {
        let extra: Vec<String> = expr
            .free_variables()
            .into_iter()
            .filter(|v| v != vars.0 && v != vars.1)
            .collect();
        if !extra.is_empty() {
            return Err(AnalysisError::Symbolic(format!(
                "expression '{}' contains symbols {:?} besides ({}, {})",
                expr, extra, vars.0, vars.1
            )));
        }
        Ok(expr.lambdify2d(vars.0, vars.1))
    }
}

fn binding(unknowns: &[&str], x: f64, y: f64) -> Binding {
    let mut map = HashMap::new();
    map.insert(unknowns[0].to_string(), x);
    map.insert(unknowns[1].to_string(), y);
    map
}

//___________________________________TESTS____________________________________
