/// numeric thresholds shared across the crate
///
/// THRESHOLD is the scale below which a computed quantity (determinant,
/// discriminant, vector magnitude) is treated as exactly zero.
pub const THRESHOLD: f64 = 1e-9;

/// residual tolerance for accepting an equilibrium candidate
pub const RESIDUAL_TOL: f64 = 1e-9;

/// two roots closer than this are considered the same equilibrium
pub const ROOT_MERGE_TOL: f64 = 1e-6;
