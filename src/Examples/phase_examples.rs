// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Utils::plots::{plot_phase_portrait, save_trajectory_to_csv};
use crate::analysis::linearizer::VectorField;
use crate::analysis::portrait::PhasePortrait;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbols;

#[allow(dead_code)]
pub fn phase_examples(example: usize) {
    match example {
        0 => {
            // LINEAR SADDLE
            // dx/dt = x - y, dy/dt = -2x + y
            let (x, y) = symbols!(x, y);
            let field = VectorField::new(
                x.clone() - y.clone(),
                Expr::Const(-2.0) * x.clone() + y.clone(),
                "x",
                "y",
            );
            let mut portrait = PhasePortrait::new(field);
            // window, field grid and one trajectory from (0.5, 0.6)
            portrait.set_axes(-2.0, 2.0, -2.0, 2.0);
            portrait.set_resolution(20, 20);
            portrait.set_trajectory(0.5, 0.6, 0.1, 500);
            portrait.run_all().unwrap();

            let (_, charpoly_str) = portrait.charpoly.as_ref().unwrap();
            println!("jacobian: {:?}", portrait.jacobian.as_ref().unwrap().readable());
            println!("characteristic polynomial: {}", charpoly_str);
            for report in &portrait.reports {
                println!(
                    "equilibrium ({}, {}): {:?}, eigenvalues {:?}",
                    report.equilibrium.x,
                    report.equilibrium.y,
                    report.classify(),
                    report.eigen.iter().map(|t| t.value).collect::<Vec<_>>()
                );
            }
            plot_phase_portrait("saddle_portrait.png", &portrait.artifacts());
            save_trajectory_to_csv("saddle_trajectory.csv", portrait.trajectory.as_ref().unwrap())
                .unwrap();
        }
        1 => {
            // NONLINEAR VARIANT
            // dx/dt = x - y, dy/dt = -2x^2 + y: two equilibria, a defective
            // node at the origin and a second point at (0.5, 0.5)
            let (x, y) = symbols!(x, y);
            let field = VectorField::new(
                x.clone() - y.clone(),
                Expr::Const(-2.0) * x.clone().pow(Expr::Const(2.0)) + y.clone(),
                "x",
                "y",
            );
            let mut portrait = PhasePortrait::new(field);
            portrait.set_trajectory(0.5, 0.6, 0.1, 500);
            portrait.run_all().unwrap();

            for report in &portrait.reports {
                println!(
                    "equilibrium ({}, {}): {:?}, defective: {}",
                    report.equilibrium.x,
                    report.equilibrium.y,
                    report.classify(),
                    report.is_defective()
                );
            }
            plot_phase_portrait("nonlinear_portrait.png", &portrait.artifacts());
        }
        2 => {
            // HARMONIC OSCILLATOR
            // dx/dt = y, dy/dt = -x: a center, closed orbits
            let (x, y) = symbols!(x, y);
            let field = VectorField::new(y.clone(), -x.clone(), "x", "y");
            let mut portrait = PhasePortrait::new(field);
            portrait.set_normalize(false);
            portrait.set_trajectory(1.0, 0.0, 0.01, 1000);
            portrait.run_all().unwrap();
            println!(
                "origin classified as {:?}",
                portrait.reports[0].classify()
            );
            plot_phase_portrait("center_portrait.png", &portrait.artifacts());
        }
        _ => {
            println!("example not found");
        }
    }
}
