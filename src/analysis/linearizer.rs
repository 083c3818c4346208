//! # Linearizer Module
//!
//! Builds the symbolic Jacobian of a planar vector field and its
//! characteristic polynomial. For a linear system dX/dt = A X the Jacobian is
//! the A matrix itself, independent of the evaluation point; for a nonlinear
//! field it is the local linearization evaluated later at each equilibrium by
//! the stability analyzer.

use crate::analysis::backend::SymbolicBackend;
use crate::analysis::errors::AnalysisResult;
use crate::symbolic::symbolic_engine::Expr;

/// A planar autonomous vector field dx/dt = f(x,y), dy/dt = g(x,y).
/// Immutable once constructed.
#[derive(Debug, Clone)]
pub struct VectorField {
    pub f: Expr,
    pub g: Expr,
    pub var_x: String,
    pub var_y: String,
}

impl VectorField {
    pub fn new(f: Expr, g: Expr, var_x: &str, var_y: &str) -> Self {
        assert!(
            var_x != var_y,
            "the two state variables must have distinct names"
        );
        Self {
            f,
            g,
            var_x: var_x.to_string(),
            var_y: var_y.to_string(),
        }
    }

    pub fn components(&self) -> [&Expr; 2] {
        [&self.f, &self.g]
    }

    pub fn variables(&self) -> [&str; 2] {
        [&self.var_x, &self.var_y]
    }
}

/// 2x2 matrix of symbolic expressions; entry [i][j] is the partial derivative
/// of component i with respect to variable j (row order = component order,
/// column order = variable order).
#[derive(Debug, Clone)]
pub struct JacobianMatrix {
    pub entries: [[Expr; 2]; 2],
    pub var_x: String,
    pub var_y: String,
}

impl JacobianMatrix {
    /// human readable form, row by row
    pub fn readable(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .map(|row| row.iter().map(|e| e.to_string()).collect())
            .collect()
    }
}

pub struct Linearizer;

impl Linearizer {
    /// Differentiates each field component with respect to each state
    /// variable through the backend, preserving component/variable order.
    pub fn jacobian(
        field: &VectorField,
        backend: &dyn SymbolicBackend,
    ) -> AnalysisResult<JacobianMatrix> {
        let [f, g] = field.components();
        let [vx, vy] = field.variables();
        let entries = [
            [backend.differentiate(f, vx)?, backend.differentiate(f, vy)?],
            [backend.differentiate(g, vx)?, backend.differentiate(g, vy)?],
        ];
        Ok(JacobianMatrix {
            entries,
            var_x: field.var_x.clone(),
            var_y: field.var_y.clone(),
        })
    }

    /// Characteristic polynomial det(A - lambda*I) as a symbolic expression in
    /// a fresh eigenvalue variable. The variable is named "lamda" (suffixed
    /// with underscores until it collides with neither state variable).
    pub fn characteristic_polynomial(matrix: &JacobianMatrix) -> (Expr, String) {
        let mut name = "lamda".to_string();
        while name == matrix.var_x || name == matrix.var_y {
            name.push('_');
        }
        let lamda = Expr::Var(name.clone());
        let [[a, b], [c, d]] = &matrix.entries;
        let poly = (a.clone() - lamda.clone()) * (d.clone() - lamda.clone())
            - b.clone() * c.clone();
        (poly.simplify_(), name)
    }
}

//___________________________________TESTS____________________________________
