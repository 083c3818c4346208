//! # Simplification Module
//!
//! Algebraic cleanup of expression trees: constant folding plus the usual
//! identities (x + 0 = x, x * 1 = x, 0 * x = 0, x^1 = x, x^0 = 1). The
//! differentiation rules generate a lot of Const(0)/Const(1) scaffolding;
//! running `simplify_` afterwards keeps jacobian entries readable and makes
//! constant-entry detection (the affine fast path of the solver) reliable.
//!
//! The pass is applied bottom-up and repeated until the tree stops changing.

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// Applies constant folding and identity rules recursively until a fixed
    /// point is reached.
    pub fn simplify_(&self) -> Expr {
        let mut current = self.clone();
        loop {
            let next = current.simplify_once();
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn simplify_once(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let l = lhs.simplify_once();
                let r = rhs.simplify_once();
                match (l.as_constant(), r.as_constant()) {
                    (Some(a), Some(b)) => Expr::Const(a + b),
                    (Some(0.0), _) => r,
                    (_, Some(0.0)) => l,
                    _ => Expr::Add(l.boxed(), r.boxed()),
                }
            }
            Expr::Sub(lhs, rhs) => {
                let l = lhs.simplify_once();
                let r = rhs.simplify_once();
                match (l.as_constant(), r.as_constant()) {
                    (Some(a), Some(b)) => Expr::Const(a - b),
                    (_, Some(0.0)) => l,
                    _ => Expr::Sub(l.boxed(), r.boxed()),
                }
            }
            Expr::Mul(lhs, rhs) => {
                let l = lhs.simplify_once();
                let r = rhs.simplify_once();
                match (l.as_constant(), r.as_constant()) {
                    (Some(a), Some(b)) => Expr::Const(a * b),
                    (Some(0.0), _) | (_, Some(0.0)) => Expr::Const(0.0),
                    (Some(1.0), _) => r,
                    (_, Some(1.0)) => l,
                    _ => Expr::Mul(l.boxed(), r.boxed()),
                }
            }
            Expr::Div(lhs, rhs) => {
                let l = lhs.simplify_once();
                let r = rhs.simplify_once();
                match (l.as_constant(), r.as_constant()) {
                    (Some(a), Some(b)) if b != 0.0 => Expr::Const(a / b),
                    (Some(0.0), Some(b)) if b != 0.0 => Expr::Const(0.0),
                    (_, Some(1.0)) => l,
                    _ => Expr::Div(l.boxed(), r.boxed()),
                }
            }
            Expr::Pow(base, exp) => {
                let b = base.simplify_once();
                let e = exp.simplify_once();
                match (b.as_constant(), e.as_constant()) {
                    (Some(bv), Some(ev)) => Expr::Const(bv.powf(ev)),
                    (_, Some(1.0)) => b,
                    (_, Some(0.0)) => Expr::Const(1.0),
                    _ => Expr::Pow(b.boxed(), e.boxed()),
                }
            }
            Expr::Exp(expr) => {
                let inner = expr.simplify_once();
                match inner.as_constant() {
                    Some(v) => Expr::Const(v.exp()),
                    None => Expr::Exp(inner.boxed()),
                }
            }
            Expr::Ln(expr) => {
                let inner = expr.simplify_once();
                match inner.as_constant() {
                    Some(v) if v > 0.0 => Expr::Const(v.ln()),
                    _ => Expr::Ln(inner.boxed()),
                }
            }
            Expr::sin(expr) => {
                let inner = expr.simplify_once();
                match inner.as_constant() {
                    Some(v) => Expr::Const(v.sin()),
                    None => Expr::sin(inner.boxed()),
                }
            }
            Expr::cos(expr) => {
                let inner = expr.simplify_once();
                match inner.as_constant() {
                    Some(v) => Expr::Const(v.cos()),
                    None => Expr::cos(inner.boxed()),
                }
            }
        }
    }
}

//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_folding() {
        let expr = Expr::Const(2.0) + Expr::Const(3.0) * Expr::Const(4.0);
        assert_eq!(expr.simplify_(), Expr::Const(14.0));
    }

    #[test]
    fn test_identity_rules() {
        let x = Expr::Var("x".to_string());
        assert_eq!((x.clone() + Expr::Const(0.0)).simplify_(), x.clone());
        assert_eq!((x.clone() * Expr::Const(1.0)).simplify_(), x.clone());
        assert_eq!(
            (x.clone() * Expr::Const(0.0)).simplify_(),
            Expr::Const(0.0)
        );
        assert_eq!(x.clone().pow(Expr::Const(1.0)).simplify_(), x.clone());
        assert_eq!(
            x.clone().pow(Expr::Const(0.0)).simplify_(),
            Expr::Const(1.0)
        );
    }

    #[test]
    fn test_derivative_of_linear_field_folds_to_constant() {
        // d/dx (x - y) simplifies all the way down to 1
        let (x, y) = crate::symbols!(x, y);
        let f = x.clone() - y.clone();
        assert_eq!(f.diff("x").simplify_(), Expr::Const(1.0));
        assert_eq!(f.diff("y").simplify_(), Expr::Const(-1.0));
    }

    #[test]
    fn test_nonconstant_tree_survives() {
        // d/dx -2*x^2 stays symbolic (it depends on x)
        let x = Expr::Var("x".to_string());
        let g = Expr::Const(-2.0) * x.clone().pow(Expr::Const(2.0));
        let dg = g.diff("x").simplify_();
        assert!(dg.as_constant().is_none());
        assert!(dg.contains_variable("x"));
    }
}
