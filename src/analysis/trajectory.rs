//! # Trajectory Integrator Module
//!
//! Fixed-step explicit integration of a single trajectory. The update rule is
//! a semi-implicit Euler variant and its evaluation order is a contract, not
//! an implementation detail:
//!
//! ```text
//! x[i+1] = x[i] + f(x[i], y[i]) * dt
//! y[i+1] = y[i] + g(x[i+1], y[i]) * dt      // the freshly updated x
//! ```
//!
//! No adaptive step, no error control, no divergence guard: non-finite values
//! (overflow to inf, NaN) propagate into later samples instead of halting the
//! integration. Callers inspect the output for non-finite samples if they
//! care.

use crate::symbolic::symbolic_lambdify::Func2D;

/// Ordered sequence of state samples; sample i+1 is derived from sample i
/// only.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// (x, y) pairs for plotting.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// True if every sample is finite.
    pub fn is_finite(&self) -> bool {
        self.points().all(|(x, y)| x.is_finite() && y.is_finite())
    }
}

pub struct TrajectoryIntegrator {
    pub x0: f64,
    pub y0: f64,
    pub dt: f64,
    pub steps: usize,
}

impl TrajectoryIntegrator {
    pub fn new(x0: f64, y0: f64, dt: f64, steps: usize) -> Self {
        assert!(dt > 0.0, "step size must be positive");
        assert!(steps > 0, "step count must be positive");
        Self { x0, y0, dt, steps }
    }

    /// Advances the trajectory `steps` times; the result has steps + 1
    /// samples, the first being the initial condition. Deterministic:
    /// identical inputs give bit-identical output.
    pub fn integrate(&self, f_fn: &Func2D, g_fn: &Func2D) -> Trajectory {
        let mut x = Vec::with_capacity(self.steps + 1);
        let mut y = Vec::with_capacity(self.steps + 1);
        x.push(self.x0);
        y.push(self.y0);
        for i in 0..self.steps {
            let x_next = x[i] + f_fn(x[i], y[i]) * self.dt;
            let y_next = y[i] + g_fn(x_next, y[i]) * self.dt;
            x.push(x_next);
            y.push(y_next);
        }
        Trajectory { x, y }
    }
}

//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;

    fn saddle_fns() -> (Func2D, Func2D) {
        let (x, y) = crate::symbols!(x, y);
        let f = x.clone() - y.clone();
        let g = Expr::Const(-2.0) * x.clone() + y.clone();
        (f.lambdify2d("x", "y"), g.lambdify2d("x", "y"))
    }

    #[test]
    fn test_single_step_uses_updated_x() {
        let (f_fn, g_fn) = saddle_fns();
        let integrator = TrajectoryIntegrator::new(0.5, 0.6, 0.1, 1);
        let traj = integrator.integrate(&f_fn, &g_fn);
        assert_eq!(traj.len(), 2);
        let x1 = 0.5 + (0.5 - 0.6) * 0.1;
        assert_eq!(traj.x[1], x1);
        // y update sees x[1], not x[0]
        assert_eq!(traj.y[1], 0.6 + (-2.0 * x1 + 0.6) * 0.1);
        assert_ne!(traj.y[1], 0.6 + (-2.0 * 0.5 + 0.6) * 0.1);
    }

    #[test]
    fn test_length_is_steps_plus_one() {
        let (f_fn, g_fn) = saddle_fns();
        let traj = TrajectoryIntegrator::new(0.1, 0.2, 0.05, 500).integrate(&f_fn, &g_fn);
        assert_eq!(traj.len(), 501);
        assert_eq!(traj.x[0], 0.1);
        assert_eq!(traj.y[0], 0.2);
    }

    #[test]
    fn test_determinism_bit_identical() {
        let (f_fn, g_fn) = saddle_fns();
        let integrator = TrajectoryIntegrator::new(0.5, 0.6, 0.1, 200);
        let a = integrator.integrate(&f_fn, &g_fn);
        let b = integrator.integrate(&f_fn, &g_fn);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nonfinite_values_propagate() {
        // dx/dt = x^2 blows up in finite time under a coarse step
        let x = Expr::Var("x".to_string());
        let f = x.clone().pow(Expr::Const(2.0));
        let g = Expr::Const(0.0);
        let f_fn = f.lambdify2d("x", "y");
        let g_fn = g.lambdify2d("x", "y");
        let traj = TrajectoryIntegrator::new(1e3, 0.0, 10.0, 200).integrate(&f_fn, &g_fn);
        // the integration ran to completion and the overflow is visible in the data
        assert_eq!(traj.len(), 201);
        assert!(!traj.is_finite());
        assert!(!traj.x.last().unwrap().is_finite());
    }

    #[test]
    #[should_panic(expected = "step size must be positive")]
    fn test_rejects_nonpositive_dt() {
        let _ = TrajectoryIntegrator::new(0.0, 0.0, 0.0, 10);
    }
}
