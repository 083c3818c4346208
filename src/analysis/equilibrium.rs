//! # Equilibrium Finder Module
//!
//! Solves f(x,y) = 0, g(x,y) = 0 simultaneously through the symbolic backend
//! and re-checks every candidate against both equations. An empty result is a
//! valid outcome (the field simply has no equilibria); an infinite solution
//! set surfaces as `DegenerateSystem` from the backend and is passed through
//! untouched.

use crate::analysis::backend::SymbolicBackend;
use crate::analysis::errors::AnalysisResult;
use crate::analysis::linearizer::VectorField;
use crate::global::RESIDUAL_TOL;
use log::{info, warn};

/// A state where both derivatives vanish simultaneously.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equilibrium {
    pub x: f64,
    pub y: f64,
}

pub struct EquilibriumFinder {
    /// residual tolerance for the independent self-check of each root
    pub residual_tolerance: f64,
}

impl Default for EquilibriumFinder {
    fn default() -> Self {
        Self {
            residual_tolerance: RESIDUAL_TOL,
        }
    }
}

impl EquilibriumFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all equilibria of the field. Roots failing the residual
    /// self-check on either equation are dropped with a warning, never
    /// silently kept.
    pub fn find(
        &self,
        field: &VectorField,
        backend: &dyn SymbolicBackend,
    ) -> AnalysisResult<Vec<Equilibrium>> {
        let [vx, vy] = field.variables();
        let bindings =
            backend.solve_system(&[field.f.clone(), field.g.clone()], &[vx, vy])?;

        let mut equilibria = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let (x, y) = (binding[vx], binding[vy]);
            let (res_f, res_g) = (
                field.f.eval2d(vx, vy, x, y),
                field.g.eval2d(vx, vy, x, y),
            );
            if res_f.abs() <= self.residual_tolerance && res_g.abs() <= self.residual_tolerance {
                equilibria.push(Equilibrium { x, y });
            } else {
                warn!(
                    "dropping equilibrium candidate ({}, {}): residuals f = {}, g = {}",
                    x, y, res_f, res_g
                );
            }
        }
        info!("found {} equilibrium point(s)", equilibria.len());
        Ok(equilibria)
    }
}

//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::backend::ExprBackend;
    use crate::analysis::errors::AnalysisError;
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;

    #[test]
    fn test_unique_equilibrium_at_origin() {
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(
            x.clone() - y.clone(),
            Expr::Const(-2.0) * x.clone() + y.clone(),
            "x",
            "y",
        );
        let finder = EquilibriumFinder::new();
        let eqs = finder.find(&field, &ExprBackend::new()).unwrap();
        assert_eq!(eqs.len(), 1);
        assert_relative_eq!(eqs[0].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(eqs[0].y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nonlinear_equilibria_satisfy_both_equations() {
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(
            x.clone() - y.clone(),
            Expr::Const(-2.0) * x.clone().pow(Expr::Const(2.0)) + y.clone(),
            "x",
            "y",
        );
        let finder = EquilibriumFinder::new();
        let eqs = finder.find(&field, &ExprBackend::new()).unwrap();
        assert_eq!(eqs.len(), 2);
        for eq in &eqs {
            assert!(field.f.eval2d("x", "y", eq.x, eq.y).abs() <= 1e-9);
            assert!(field.g.eval2d("x", "y", eq.x, eq.y).abs() <= 1e-9);
        }
    }

    #[test]
    fn test_no_equilibria_is_empty_not_error() {
        let (x, y) = crate::symbols!(x, y);
        // dx/dt never vanishes
        let field = VectorField::new(
            x.clone().pow(Expr::Const(2.0)) + Expr::Const(1.0),
            y.clone(),
            "x",
            "y",
        );
        let finder = EquilibriumFinder::new();
        let eqs = finder.find(&field, &ExprBackend::new()).unwrap();
        assert!(eqs.is_empty());
    }

    #[test]
    fn test_degenerate_system_raises() {
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(
            x.clone() - y.clone(),
            Expr::Const(2.0) * (x.clone() - y.clone()),
            "x",
            "y",
        );
        let finder = EquilibriumFinder::new();
        let err = finder.find(&field, &ExprBackend::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateSystem(_)));
    }
}
