//! # Stability Analyzer Module
//!
//! For each equilibrium: substitute its coordinates into the symbolic
//! Jacobian, evaluate to a numeric 2x2 matrix and eigen-decompose it through
//! the backend. The report keeps eigenvalues in backend emission order
//! (callers must not assume any sorting) and represents defective repeated
//! eigenvalues faithfully: the eigenvector list may be shorter than the
//! algebraic multiplicity.
//!
//! If substitution leaves free symbols in the matrix (an unresolved
//! parameter), the decomposition is aborted with `UnresolvedParameter`.

use crate::analysis::backend::{EigenTriple, SymbolicBackend};
use crate::analysis::equilibrium::Equilibrium;
use crate::analysis::errors::{AnalysisError, AnalysisResult};
use crate::analysis::linearizer::JacobianMatrix;
use crate::global::THRESHOLD;
use log::info;
use nalgebra::Matrix2;
use std::collections::HashMap;

/// Local stability classification of an equilibrium under linearization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilityClass {
    StableNode,
    UnstableNode,
    Saddle,
    StableSpiral,
    UnstableSpiral,
    Center,
    /// repeated eigenvalue (star or defective node)
    DegenerateNode,
    /// at least one eigenvalue with zero real part and no rotation; the
    /// linearization does not decide stability
    NonHyperbolic,
}

/// Eigen-decomposition of the Jacobian evaluated at one equilibrium.
#[derive(Debug, Clone)]
pub struct EigenReport {
    pub equilibrium: Equilibrium,
    pub jacobian: Matrix2<f64>,
    /// triples in backend emission order - no canonical sorting
    pub eigen: Vec<EigenTriple>,
}

impl EigenReport {
    /// Sum of algebraic multiplicities; always 2 for a planar system.
    pub fn multiplicity_sum(&self) -> usize {
        self.eigen.iter().map(|t| t.multiplicity).sum()
    }

    /// True if some eigenvalue has fewer eigenvectors than its algebraic
    /// multiplicity.
    pub fn is_defective(&self) -> bool {
        self.eigen.iter().any(|t| t.vectors.len() < t.multiplicity)
    }

    /// Classifies the equilibrium from the eigenvalue pattern.
    pub fn classify(&self) -> StabilityClass {
        let values: Vec<_> = self
            .eigen
            .iter()
            .flat_map(|t| std::iter::repeat_n(t.value, t.multiplicity))
            .collect();
        debug_assert_eq!(values.len(), 2);
        let (l1, l2) = (values[0], values[1]);

        if l1.im.abs() > THRESHOLD {
            // complex conjugate pair
            return if l1.re > THRESHOLD {
                StabilityClass::UnstableSpiral
            } else if l1.re < -THRESHOLD {
                StabilityClass::StableSpiral
            } else {
                StabilityClass::Center
            };
        }
        let (r1, r2) = (l1.re, l2.re);
        if (r1 - r2).abs() <= THRESHOLD {
            return StabilityClass::DegenerateNode;
        }
        if r1.abs() <= THRESHOLD || r2.abs() <= THRESHOLD {
            return StabilityClass::NonHyperbolic;
        }
        if r1 > 0.0 && r2 > 0.0 {
            StabilityClass::UnstableNode
        } else if r1 < 0.0 && r2 < 0.0 {
            StabilityClass::StableNode
        } else {
            StabilityClass::Saddle
        }
    }
}

pub struct StabilityAnalyzer;

impl StabilityAnalyzer {
    /// Evaluates the symbolic Jacobian at the equilibrium and decomposes it.
    pub fn analyze(
        jacobian: &JacobianMatrix,
        equilibrium: &Equilibrium,
        backend: &dyn SymbolicBackend,
    ) -> AnalysisResult<EigenReport> {
        let matrix = Self::substitute(jacobian, equilibrium)?;
        let eigen = backend.eigen_decompose(&matrix)?;
        let report = EigenReport {
            equilibrium: *equilibrium,
            jacobian: matrix,
            eigen,
        };
        info!(
            "equilibrium ({}, {}) classified as {:?}",
            equilibrium.x,
            equilibrium.y,
            report.classify()
        );
        Ok(report)
    }

    /// Substitutes the equilibrium coordinates into every Jacobian entry.
    /// Entries still containing symbols afterwards abort the analysis.
    fn substitute(
        jacobian: &JacobianMatrix,
        equilibrium: &Equilibrium,
    ) -> AnalysisResult<Matrix2<f64>> {
        let mut values = HashMap::new();
        values.insert(jacobian.var_x.clone(), equilibrium.x);
        values.insert(jacobian.var_y.clone(), equilibrium.y);

        let mut numeric = [[0.0; 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                let entry = jacobian.entries[i][j]
                    .set_variable_from_map(&values)
                    .simplify_();
                let leftover = entry.free_variables();
                if !leftover.is_empty() {
                    return Err(AnalysisError::UnresolvedParameter(leftover));
                }
                numeric[i][j] = entry.eval_expression(&values);
            }
        }
        Ok(Matrix2::new(
            numeric[0][0],
            numeric[0][1],
            numeric[1][0],
            numeric[1][1],
        ))
    }
}

//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::backend::ExprBackend;
    use crate::analysis::linearizer::{Linearizer, VectorField};
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;

    fn analyze_origin(field: &VectorField) -> AnalysisResult<EigenReport> {
        let backend = ExprBackend::new();
        let jac = Linearizer::jacobian(field, &backend)?;
        StabilityAnalyzer::analyze(&jac, &Equilibrium { x: 0.0, y: 0.0 }, &backend)
    }

    #[test]
    fn test_saddle_at_origin() {
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(
            x.clone() - y.clone(),
            Expr::Const(-2.0) * x.clone() + y.clone(),
            "x",
            "y",
        );
        let report = analyze_origin(&field).unwrap();
        assert_eq!(report.multiplicity_sum(), 2);
        assert_eq!(report.classify(), StabilityClass::Saddle);
        assert!(!report.is_defective());
        assert_relative_eq!(report.eigen[0].value.re, 1.0 + 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(report.eigen[1].value.re, 1.0 - 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_defective_repeated_eigenvalue() {
        // f = x - y, g = -2x^2 + y: jacobian at the origin is [[1,-1],[0,1]]
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(
            x.clone() - y.clone(),
            Expr::Const(-2.0) * x.clone().pow(Expr::Const(2.0)) + y.clone(),
            "x",
            "y",
        );
        let report = analyze_origin(&field).unwrap();
        assert_relative_eq!(report.jacobian[(1, 0)], 0.0);
        assert_relative_eq!(report.jacobian[(0, 1)], -1.0);
        assert_eq!(report.multiplicity_sum(), 2);
        assert_eq!(report.eigen.len(), 1);
        assert_eq!(report.eigen[0].multiplicity, 2);
        assert_relative_eq!(report.eigen[0].value.re, 1.0);
        assert!(report.is_defective());
        assert_eq!(report.classify(), StabilityClass::DegenerateNode);
    }

    #[test]
    fn test_center_classification() {
        // dx/dt = y, dy/dt = -x: eigenvalues +/- i
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(y.clone(), -x.clone(), "x", "y");
        let report = analyze_origin(&field).unwrap();
        assert_eq!(report.classify(), StabilityClass::Center);
    }

    #[test]
    fn test_stable_spiral_classification() {
        // dx/dt = -x + y, dy/dt = -x - y: eigenvalues -1 +/- i
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(
            -x.clone() + y.clone(),
            -x.clone() - y.clone(),
            "x",
            "y",
        );
        let report = analyze_origin(&field).unwrap();
        assert_eq!(report.classify(), StabilityClass::StableSpiral);
    }

    #[test]
    fn test_stable_node_classification() {
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(
            Expr::Const(-1.0) * x.clone(),
            Expr::Const(-3.0) * y.clone(),
            "x",
            "y",
        );
        let report = analyze_origin(&field).unwrap();
        assert_eq!(report.classify(), StabilityClass::StableNode);
    }

    #[test]
    fn test_unresolved_parameter_aborts() {
        // dx/dt = mu*x carries the free parameter mu into the jacobian
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(Expr::Var("mu".to_string()) * x.clone(), y.clone(), "x", "y");
        let err = analyze_origin(&field).unwrap_err();
        match err {
            AnalysisError::UnresolvedParameter(symbols) => {
                assert_eq!(symbols, vec!["mu".to_string()])
            }
            other => panic!("expected UnresolvedParameter, got {:?}", other),
        }
    }
}
