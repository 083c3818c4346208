use crate::analysis::field::FieldSample;
use crate::analysis::portrait::PortraitArtifacts;
use crate::analysis::trajectory::Trajectory;
use nalgebra::DMatrix;
use std::path::Path;

/// Grid nodes where a field component is exactly zero, plus midpoints of grid
/// edges where it changes sign. Component sign is preserved by normalization,
/// so the scan works on raw and normalized samples alike.
fn sign_change_points(
    component: &DMatrix<f64>,
    x_coords: &[f64],
    y_coords: &[f64],
) -> Vec<(f64, f64)> {
    let (ny, nx) = (component.nrows(), component.ncols());
    let mut points = Vec::new();
    for i in 0..ny {
        for j in 0..nx {
            let v = component[(i, j)];
            // a nullcline through the node itself produces no strict sign
            // change on either adjacent edge
            if v == 0.0 {
                points.push((x_coords[j], y_coords[i]));
                continue;
            }
            if j + 1 < nx && v * component[(i, j + 1)] < 0.0 {
                points.push((0.5 * (x_coords[j] + x_coords[j + 1]), y_coords[i]));
            }
            if i + 1 < ny && v * component[(i + 1, j)] < 0.0 {
                points.push((x_coords[j], 0.5 * (y_coords[i] + y_coords[i + 1])));
            }
        }
    }
    points
}

/// Approximate nullcline locations extracted from a field sample:
/// (f-nullcline points, g-nullcline points).
pub fn nullcline_points(sample: &FieldSample) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    (
        sign_change_points(&sample.dx, &sample.x_coords, &sample.y_coords),
        sign_change_points(&sample.dy, &sample.x_coords, &sample.y_coords),
    )
}

/// Renders the phase portrait to a PNG: quiver segments colored by raw field
/// magnitude, nullcline points, the trajectory in black and equilibria as red
/// circles.
pub fn plot_phase_portrait(filename: &str, artifacts: &PortraitArtifacts) {
    use plotters::prelude::*;
    let (x_min, x_max, y_min, y_max) = artifacts.window;
    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).unwrap();

    let mut chart = ChartBuilder::on(&root_area)
        .caption("phase portrait", ("sans-serif", 50))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .unwrap();

    chart.configure_mesh().x_desc("x").y_desc("y").draw().unwrap();

    if let Some(sample) = artifacts.field_sample {
        let (ny, nx) = (sample.dy.nrows(), sample.dx.ncols());
        // arrow length: a fraction of the grid spacing
        let scale = 0.4 * (x_max - x_min) / nx.max(1) as f64;
        let max_mag = sample.magnitude.iter().cloned().fold(0.0_f64, f64::max);
        for i in 0..ny {
            for j in 0..nx {
                let (x, y) = (sample.x_coords[j], sample.y_coords[i]);
                let (u, v) = (sample.dx[(i, j)], sample.dy[(i, j)]);
                if !u.is_finite() || !v.is_finite() {
                    continue;
                }
                let frac = if max_mag > 0.0 {
                    sample.magnitude[(i, j)] / max_mag
                } else {
                    0.0
                };
                let color = HSLColor(0.66 * (1.0 - frac), 0.8, 0.4);
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        vec![(x, y), (x + u * scale, y + v * scale)],
                        &color,
                    )))
                    .unwrap();
            }
        }

        let (f_null, g_null) = nullcline_points(sample);
        chart
            .draw_series(
                f_null
                    .into_iter()
                    .map(|(x, y)| Circle::new((x, y), 2, GREEN.filled())),
            )
            .unwrap()
            .label("f = 0")
            .legend(|(x, y)| Circle::new((x + 10, y), 3, GREEN.filled()));
        chart
            .draw_series(
                g_null
                    .into_iter()
                    .map(|(x, y)| Circle::new((x, y), 2, MAGENTA.filled())),
            )
            .unwrap()
            .label("g = 0")
            .legend(|(x, y)| Circle::new((x + 10, y), 3, MAGENTA.filled()));
    }

    if let Some(traj) = artifacts.trajectory {
        let series: Vec<(f64, f64)> = traj
            .points()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        chart
            .draw_series(LineSeries::new(series, &BLACK))
            .unwrap()
            .label("trajectory")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));
    }

    chart
        .draw_series(
            artifacts
                .equilibria
                .iter()
                .map(|eq| Circle::new((eq.x, eq.y), 5, RED.filled())),
        )
        .unwrap()
        .label("equilibrium")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .unwrap();
    root_area.present().unwrap();
}

/// Writes the trajectory as a three-column CSV (step, x, y).
pub fn save_trajectory_to_csv<P: AsRef<Path>>(
    path: P,
    trajectory: &Trajectory,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["step", "x", "y"])?;
    for (i, (x, y)) in trajectory.points().enumerate() {
        wtr.write_record(&[i.to_string(), x.to_string(), y.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::linearizer::VectorField;
    use crate::analysis::portrait::PhasePortrait;
    use crate::symbolic::symbolic_engine::Expr;

    fn solved_portrait() -> PhasePortrait {
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(
            x.clone() - y.clone(),
            Expr::Const(-2.0) * x.clone() + y.clone(),
            "x",
            "y",
        );
        let mut portrait = PhasePortrait::new(field);
        portrait.set_trajectory(0.5, 0.6, 0.1, 50);
        portrait.run_all().unwrap();
        portrait
    }

    #[test]
    fn test_nullcline_points_straddle_the_lines() {
        let portrait = solved_portrait();
        let sample = portrait.field_sample.as_ref().unwrap();
        let (f_null, g_null) = nullcline_points(sample);
        // f = x - y vanishes on y = x, g = -2x + y on y = 2x
        assert!(!f_null.is_empty());
        assert!(!g_null.is_empty());
        for (x, y) in &f_null {
            assert!((x - y).abs() < 0.5, "({}, {}) far from y = x", x, y);
        }
        for (x, y) in &g_null {
            assert!((y - 2.0 * x).abs() < 0.5, "({}, {}) far from y = 2x", x, y);
        }
    }

    #[test]
    fn test_nullcline_through_grid_nodes_is_detected() {
        // on a symmetric grid the f = x - y nullcline passes exactly through
        // every diagonal node, so no adjacent product is strictly negative
        let portrait = solved_portrait();
        let sample = portrait.field_sample.as_ref().unwrap();
        let (f_null, _) = nullcline_points(sample);
        for (&x, &y) in sample.x_coords.iter().zip(sample.y_coords.iter()) {
            if x == y {
                assert!(
                    f_null.contains(&(x, y)),
                    "diagonal node ({}, {}) missing from the f-nullcline",
                    x,
                    y
                );
            }
        }
        assert!(!f_null.is_empty());
    }

    #[test]
    fn test_plot_phase_portrait_writes_png() {
        let portrait = solved_portrait();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portrait.png");
        plot_phase_portrait(path.to_str().unwrap(), &portrait.artifacts());
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_save_trajectory_to_csv() {
        let portrait = solved_portrait();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.csv");
        save_trajectory_to_csv(&path, portrait.trajectory.as_ref().unwrap()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), "step,x,y");
        assert_eq!(lines.count(), 51);
        assert!(content.contains("0,0.5,0.6"));
    }
}
