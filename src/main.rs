#![allow(non_snake_case)]
pub mod Examples;
pub mod Utils;
pub mod analysis;
pub mod global;
pub mod symbolic;

use crate::Examples::phase_examples::phase_examples;
use crate::Utils::logger::init_logging;

fn main() {
    init_logging(Some("info".to_string()));
    let example = 1;
    phase_examples(example);
}
