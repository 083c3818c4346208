//! # Phase Portrait API
//!
//! High-level orchestrator tying the pipeline stages together the way the
//! crate's solver APIs do: construct, adjust settings, run, read the results.
//!
//! ```text
//! EquilibriumFinder -> StabilityAnalyzer (per equilibrium)
//! Linearizer        -> symbolic jacobian + characteristic polynomial
//! TrajectoryIntegrator, FieldSampler    -> independent numerical stages
//! ```
//!
//! The stages are pure functions over the immutable vector field; the
//! renderer consumes the four artifacts read-only through
//! [`PortraitArtifacts`] and is never invoked by the pipeline itself.

use crate::analysis::backend::{ExprBackend, SymbolicBackend};
use crate::analysis::equilibrium::{Equilibrium, EquilibriumFinder};
use crate::analysis::errors::AnalysisResult;
use crate::analysis::field::{FieldSample, FieldSampler};
use crate::analysis::linearizer::{JacobianMatrix, Linearizer, VectorField};
use crate::analysis::stability::{EigenReport, StabilityAnalyzer};
use crate::analysis::trajectory::{Trajectory, TrajectoryIntegrator};
use crate::symbolic::symbolic_engine::Expr;
use log::info;

/// The read-only bundle handed to a renderer: equilibria markers, one eigen
/// report per equilibrium, the integrated trajectory and the sampled field.
pub struct PortraitArtifacts<'a> {
    pub equilibria: &'a [Equilibrium],
    pub reports: &'a [EigenReport],
    pub trajectory: Option<&'a Trajectory>,
    pub field_sample: Option<&'a FieldSample>,
    /// plot window (x_min, x_max, y_min, y_max)
    pub window: (f64, f64, f64, f64),
}

pub struct PhasePortrait {
    pub field: VectorField,
    pub backend: ExprBackend,
    // plot window
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub resolution: (usize, usize),
    pub normalize: bool,
    // trajectory settings: initial point, step size, step count
    trajectory_settings: Option<(f64, f64, f64, usize)>,
    // results
    pub jacobian: Option<JacobianMatrix>,
    pub charpoly: Option<(Expr, String)>,
    pub equilibria: Vec<Equilibrium>,
    pub reports: Vec<EigenReport>,
    pub trajectory: Option<Trajectory>,
    pub field_sample: Option<FieldSample>,
}

impl PhasePortrait {
    pub fn new(field: VectorField) -> Self {
        let mut backend = ExprBackend::new();
        backend.set_search_window(-2.0, 2.0, -2.0, 2.0);
        Self {
            field,
            backend,
            x_min: -2.0,
            x_max: 2.0,
            y_min: -2.0,
            y_max: 2.0,
            resolution: (20, 20),
            normalize: true,
            trajectory_settings: None,
            jacobian: None,
            charpoly: None,
            equilibria: Vec::new(),
            reports: Vec::new(),
            trajectory: None,
            field_sample: None,
        }
    }

    ////////////////////////////SETTERS///////////////////////////////////////

    /// Sets the plot window; the equilibrium search grid follows it.
    pub fn set_axes(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
        assert!(x_min < x_max, "x_min must be below x_max");
        assert!(y_min < y_max, "y_min must be below y_max");
        self.x_min = x_min;
        self.x_max = x_max;
        self.y_min = y_min;
        self.y_max = y_max;
        self.backend.set_search_window(x_min, x_max, y_min, y_max);
    }

    pub fn set_trajectory(&mut self, x0: f64, y0: f64, dt: f64, steps: usize) {
        assert!(dt > 0.0, "step size must be positive");
        assert!(steps > 0, "step count must be positive");
        self.trajectory_settings = Some((x0, y0, dt, steps));
    }

    pub fn set_resolution(&mut self, nx: usize, ny: usize) {
        assert!(nx > 0 && ny > 0, "resolution must be positive");
        self.resolution = (nx, ny);
    }

    pub fn set_normalize(&mut self, normalize: bool) {
        self.normalize = normalize;
    }

    ////////////////////////////PIPELINE STAGES///////////////////////////////

    /// Symbolic stage: jacobian, characteristic polynomial, equilibria and
    /// one eigen report per equilibrium.
    pub fn analyze(&mut self) -> AnalysisResult<()> {
        let jacobian = Linearizer::jacobian(&self.field, &self.backend)?;
        self.charpoly = Some(Linearizer::characteristic_polynomial(&jacobian));

        self.equilibria = EquilibriumFinder::new().find(&self.field, &self.backend)?;
        self.reports = self
            .equilibria
            .iter()
            .map(|eq| StabilityAnalyzer::analyze(&jacobian, eq, &self.backend))
            .collect::<AnalysisResult<Vec<_>>>()?;
        self.jacobian = Some(jacobian);
        info!(
            "analysis finished: {} equilibrium point(s)",
            self.equilibria.len()
        );
        Ok(())
    }

    /// Numerical stage: integrates one trajectory from the configured initial
    /// condition.
    pub fn integrate(&mut self) -> AnalysisResult<()> {
        let (x0, y0, dt, steps) = self
            .trajectory_settings
            .expect("call set_trajectory before integrate");
        let f_fn = self
            .backend
            .lambdify(&self.field.f, (&self.field.var_x, &self.field.var_y))?;
        let g_fn = self
            .backend
            .lambdify(&self.field.g, (&self.field.var_x, &self.field.var_y))?;
        let traj = TrajectoryIntegrator::new(x0, y0, dt, steps).integrate(&f_fn, &g_fn);
        self.trajectory = Some(traj);
        Ok(())
    }

    /// Numerical stage: samples the vector field over the plot window.
    pub fn sample_field(&mut self) -> AnalysisResult<()> {
        let f_fn = self
            .backend
            .lambdify(&self.field.f, (&self.field.var_x, &self.field.var_y))?;
        let g_fn = self
            .backend
            .lambdify(&self.field.g, (&self.field.var_x, &self.field.var_y))?;
        let sample = FieldSampler::new(self.x_min, self.x_max, self.y_min, self.y_max)
            .with_resolution(self.resolution.0, self.resolution.1)
            .with_normalize(self.normalize)
            .sample(&f_fn, &g_fn);
        self.field_sample = Some(sample);
        Ok(())
    }

    /// Runs every stage. The symbolic stage stops the pipeline on error; the
    /// numerical stages never fail (non-finite samples are data).
    pub fn run_all(&mut self) -> AnalysisResult<()> {
        self.analyze()?;
        if self.trajectory_settings.is_some() {
            self.integrate()?;
        }
        self.sample_field()?;
        Ok(())
    }

    /// The read-only artifact bundle for a renderer.
    pub fn artifacts(&self) -> PortraitArtifacts<'_> {
        PortraitArtifacts {
            equilibria: &self.equilibria,
            reports: &self.reports,
            trajectory: self.trajectory.as_ref(),
            field_sample: self.field_sample.as_ref(),
            window: (self.x_min, self.x_max, self.y_min, self.y_max),
        }
    }
}

//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stability::StabilityClass;
    use approx::assert_relative_eq;

    fn nonlinear_portrait() -> PhasePortrait {
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(
            x.clone() - y.clone(),
            Expr::Const(-2.0) * x.clone().pow(Expr::Const(2.0)) + y.clone(),
            "x",
            "y",
        );
        PhasePortrait::new(field)
    }

    #[test]
    fn test_run_all_produces_every_artifact() {
        let mut portrait = nonlinear_portrait();
        portrait.set_trajectory(0.5, 0.6, 0.1, 50);
        portrait.run_all().unwrap();

        let artifacts = portrait.artifacts();
        assert_eq!(artifacts.equilibria.len(), 2);
        assert_eq!(artifacts.reports.len(), 2);
        assert_eq!(artifacts.trajectory.unwrap().len(), 51);
        let sample = artifacts.field_sample.unwrap();
        assert_eq!(sample.dx.nrows(), 20);
        assert_eq!(sample.dx.ncols(), 20);
        assert!(portrait.jacobian.is_some());
        assert!(portrait.charpoly.is_some());
    }

    #[test]
    fn test_origin_report_matches_reference_system() {
        let mut portrait = nonlinear_portrait();
        portrait.analyze().unwrap();
        let origin_report = portrait
            .reports
            .iter()
            .find(|r| r.equilibrium.x.abs() < 1e-9)
            .unwrap();
        assert_relative_eq!(origin_report.jacobian[(0, 0)], 1.0);
        assert_relative_eq!(origin_report.jacobian[(1, 0)], 0.0, epsilon = 1e-9);
        assert_eq!(origin_report.multiplicity_sum(), 2);
        assert!(origin_report.is_defective());
        assert_eq!(origin_report.classify(), StabilityClass::DegenerateNode);
    }

    #[test]
    fn test_analysis_without_trajectory_settings() {
        let mut portrait = nonlinear_portrait();
        portrait.run_all().unwrap();
        assert!(portrait.trajectory.is_none());
        assert!(portrait.field_sample.is_some());
    }
}
