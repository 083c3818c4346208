//! # Lambdification Module
//!
//! Converting symbolic expressions to executable Rust closures. The closures
//! mirror the expression tree (one nested closure per node), so there is no
//! runtime parsing or interpretation; this is the bridge between the symbolic
//! stages of the pipeline and the purely numerical ones (trajectory
//! integration, field sampling).

use crate::symbolic::symbolic_engine::Expr;

/// A lambdified planar scalar field: (x, y) -> f(x, y).
pub type Func2D = Box<dyn Fn(f64, f64) -> f64 + Send + Sync>;

impl Expr {
    /// Converts the expression into a closure over a slice of argument values,
    /// with variables resolved by position in `vars`.
    ///
    /// Panics if the expression contains a variable not listed in `vars`;
    /// callers that cannot guarantee this check `free_variables()` first.
    pub fn lambdify(&self, vars: &[&str]) -> Box<dyn Fn(&[f64]) -> f64 + Send + Sync> {
        match self {
            Expr::Var(name) => {
                let index = vars
                    .iter()
                    .position(|&v| v == name)
                    .unwrap_or_else(|| panic!("unknown variable '{}' in lambdify", name));
                Box::new(move |args| args[index])
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) + rf(args))
            }
            Expr::Sub(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) - rf(args))
            }
            Expr::Mul(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) * rf(args))
            }
            Expr::Div(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) / rf(args))
            }
            Expr::Pow(base, exp) => {
                let bf = base.lambdify(vars);
                let ef = exp.lambdify(vars);
                Box::new(move |args| bf(args).powf(ef(args)))
            }
            Expr::Exp(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).exp())
            }
            Expr::Ln(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).ln())
            }
            Expr::sin(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).sin())
            }
            Expr::cos(expr) => {
                let f = expr.lambdify(vars);
                Box::new(move |args| f(args).cos())
            }
        }
    }

    /// Converts an expression of two variables into a (f64, f64) -> f64 closure.
    ///
    /// This is the form consumed by the trajectory integrator and the field
    /// sampler.
    pub fn lambdify2d(&self, var_x: &str, var_y: &str) -> Func2D {
        let compiled = self.lambdify(&[var_x, var_y]);
        Box::new(move |x, y| compiled(&[x, y]))
    }
}

//___________________________________TESTS____________________________________
