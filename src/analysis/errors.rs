//! Error taxonomy of the analysis pipeline.
//!
//! Symbolic-stage failures stop the pipeline and propagate to the caller;
//! they are never retried or downgraded. Non-finite values produced by the
//! purely numerical stages (trajectory integration, field sampling) are data,
//! not errors, and flow into the outputs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// the symbolic backend cannot differentiate/solve/lambdify the expression
    #[error("symbolic backend error: {0}")]
    Symbolic(String),

    /// the equilibrium system has infinitely many solutions; raised explicitly
    /// instead of truncating or guessing a parametrization
    #[error("degenerate equilibrium system: {0}")]
    DegenerateSystem(String),

    /// substituting an equilibrium into the jacobian left free symbols, so a
    /// numeric eigen-decomposition is not possible
    #[error("jacobian contains unresolved symbols after substitution: {0:?}")]
    UnresolvedParameter(Vec<String>),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
