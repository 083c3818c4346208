#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// # Symbolic engine
/// a module that
/// 1) represents a vector field right-hand side as a symbolic expression
/// 2) computes analytical derivatives of symbolic expressions
/// 3) turns a symbolic expression into a Rust function (lambdification)
///# Example#
/// ```
/// use RustedPhasePlane::symbolic::symbolic_engine::Expr;
/// use RustedPhasePlane::symbols;
/// let (x, y) = symbols!(x, y);
/// // f = x - y
/// let f = x.clone() - y.clone();
/// // differentiate with respect to x and y
/// let df_dx = f.diff("x").simplify_();
/// let df_dy = f.diff("y").simplify_();
/// println!("df_dx = {}, df_dy = {}", df_dx, df_dy);
/// // convert symbolic expression to a Rust function and evaluate it
/// let f_fn = f.lambdify2d("x", "y");
/// assert_eq!(f_fn(2.0, 0.5), 1.5);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
/// analytical differentiation and direct evaluation of expressions
pub mod symbolic_diff;
/// turns a symbolic expression into a Rust closure
pub mod symbolic_lambdify;
/// constant folding and algebraic identity rules
pub mod symbolic_simplify;
/// the collection of small numeric utility functions (linspace etc)
pub mod utils;
