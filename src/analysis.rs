//! # Phase-Plane Analysis
//!
//! Pipeline for planar autonomous systems dx/dt = f(x, y), dy/dt = g(x, y):
//! symbolic linearization, equilibrium finding, eigenvalue stability
//! classification, trajectory integration and vector field sampling. The
//! symbolic heavy lifting is delegated to a [`backend::SymbolicBackend`]
//! implementation; [`backend::ExprBackend`] wires it to the crate's own
//! expression engine.
//!
//! Typical usage goes through [`portrait::PhasePortrait`]:
//! ```
//! use RustedPhasePlane::analysis::linearizer::VectorField;
//! use RustedPhasePlane::analysis::portrait::PhasePortrait;
//! use RustedPhasePlane::symbolic::symbolic_engine::Expr;
//!
//! let (x, y) = RustedPhasePlane::symbols!(x, y);
//! let field = VectorField::new(
//!     x.clone() - y.clone(),
//!     Expr::Const(-2.0) * x.clone().pow(Expr::Const(2.0)) + y.clone(),
//!     "x",
//!     "y",
//! );
//! let mut portrait = PhasePortrait::new(field);
//! portrait.set_trajectory(0.5, 0.6, 0.1, 50);
//! portrait.run_all().unwrap();
//! let artifacts = portrait.artifacts();
//! assert_eq!(artifacts.equilibria.len(), 2);
//! ```

/// backend trait and the expression-engine implementation of it
pub mod backend;
/// equilibrium search with residual self-check
pub mod equilibrium;
/// error enum shared by every pipeline stage
pub mod errors;
/// vector field sampling on a rectangular grid
pub mod field;
/// symbolic jacobian and characteristic polynomial
pub mod linearizer;
/// high-level pipeline orchestrator
pub mod portrait;
/// eigenvalue classification of equilibria
pub mod stability;
/// fixed-step trajectory integration
pub mod trajectory;

mod analysis_tests;
