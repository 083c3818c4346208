//! different utility modules used throughout the project
/// tiny module to set up terminal logging
pub mod logger;
/// tiny module to render phase portraits and save trajectories
pub mod plots;
