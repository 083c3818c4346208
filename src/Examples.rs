//! examples of usage of RustedPhasePlane
/// phase portrait pipeline examples
pub mod phase_examples;
