//! # Symbolic Differentiation Module
//!
//! Extends `Expr` with analytical differentiation and direct numerical
//! evaluation. Differentiation implements the standard calculus rules
//! (power rule, product rule, quotient rule, chain rule) by exhaustive
//! pattern matching on the expression tree; the result is a new tree that
//! can be simplified, substituted or lambdified like any other.

use crate::symbolic::symbolic_engine::Expr;
use std::collections::HashMap;

impl Expr {
    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// For multivariable expressions this is the partial derivative.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x"); // 2*x^1*1
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            // product rule: f'*g + f*g'
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            // quotient rule: (f'*g - g'*f) / g^2
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Mul(rhs.clone(), rhs.clone())),
            ),
            // d/dx u^v for constant v: v * u^(v-1) * u'
            // variable exponents go through the exp/ln identity
            Expr::Pow(base, exp) => {
                if exp.contains_variable(var) {
                    // u^v = exp(v*ln(u))
                    let rewritten = Expr::Exp(Box::new(Expr::Mul(
                        exp.clone(),
                        Box::new(Expr::Ln(base.clone())),
                    )));
                    rewritten.diff(var)
                } else {
                    Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                            )),
                        )),
                        Box::new(base.diff(var)),
                    )
                }
            }
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
        }
    }

    /// Evaluates the expression at the given variable values without creating
    /// a closure. Use lambdify for repeated evaluation, eval_expression for
    /// one-time use.
    ///
    /// Unbound variables evaluate to NaN so that the caller can detect them;
    /// the analysis pipeline checks free_variables() beforehand.
    pub fn eval_expression(&self, values: &HashMap<String, f64>) -> f64 {
        match self {
            Expr::Var(name) => values.get(name).copied().unwrap_or(f64::NAN),
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval_expression(values) + rhs.eval_expression(values),
            Expr::Sub(lhs, rhs) => lhs.eval_expression(values) - rhs.eval_expression(values),
            Expr::Mul(lhs, rhs) => lhs.eval_expression(values) * rhs.eval_expression(values),
            Expr::Div(lhs, rhs) => lhs.eval_expression(values) / rhs.eval_expression(values),
            Expr::Pow(base, exp) => base
                .eval_expression(values)
                .powf(exp.eval_expression(values)),
            Expr::Exp(expr) => expr.eval_expression(values).exp(),
            Expr::Ln(expr) => expr.eval_expression(values).ln(),
            Expr::sin(expr) => expr.eval_expression(values).sin(),
            Expr::cos(expr) => expr.eval_expression(values).cos(),
        }
    }

    /// Evaluates an expression of the two given variables at a point.
    pub fn eval2d(&self, var_x: &str, var_y: &str, x: f64, y: f64) -> f64 {
        let mut values = HashMap::new();
        values.insert(var_x.to_string(), x);
        values.insert(var_y.to_string(), y);
        self.eval_expression(&values)
    }
}

//___________________________________TESTS____________________________________
