//! End-to-end tests of the analysis pipeline on the reference systems:
//! the linear saddle f = x - y, g = -2x + y and its nonlinear variant
//! g = -2x^2 + y, plus the numerical-stage spot checks.

#[cfg(test)]
mod scenario_tests {
    use crate::analysis::backend::{ExprBackend, SymbolicBackend};
    use crate::analysis::field::FieldSampler;
    use crate::analysis::linearizer::VectorField;
    use crate::analysis::portrait::PhasePortrait;
    use crate::analysis::stability::StabilityClass;
    use crate::analysis::trajectory::TrajectoryIntegrator;
    use crate::symbolic::symbolic_engine::Expr;
    use crate::symbolic::utils::norm2;
    use approx::assert_relative_eq;

    fn linear_saddle() -> VectorField {
        let (x, y) = crate::symbols!(x, y);
        VectorField::new(
            x.clone() - y.clone(),
            Expr::Const(-2.0) * x.clone() + y.clone(),
            "x",
            "y",
        )
    }

    #[test]
    fn linear_saddle_full_analysis() {
        let mut portrait = PhasePortrait::new(linear_saddle());
        portrait.analyze().unwrap();

        // unique equilibrium at the origin
        assert_eq!(portrait.equilibria.len(), 1);
        assert_relative_eq!(portrait.equilibria[0].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(portrait.equilibria[0].y, 0.0, epsilon = 1e-9);

        // jacobian equals the A matrix
        let jac = portrait.jacobian.as_ref().unwrap();
        assert_eq!(jac.entries[0][0].as_constant(), Some(1.0));
        assert_eq!(jac.entries[0][1].as_constant(), Some(-1.0));
        assert_eq!(jac.entries[1][0].as_constant(), Some(-2.0));
        assert_eq!(jac.entries[1][1].as_constant(), Some(1.0));

        // eigenvalues 1 +/- sqrt(2), each with multiplicity 1: a saddle
        let report = &portrait.reports[0];
        assert_eq!(report.multiplicity_sum(), 2);
        assert_eq!(report.eigen.len(), 2);
        for triple in &report.eigen {
            assert_eq!(triple.multiplicity, 1);
            assert_eq!(triple.vectors.len(), 1);
        }
        let mut res: Vec<f64> = report.eigen.iter().map(|t| t.value.re).collect();
        res.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(res[0], 1.0 - 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(res[1], 1.0 + 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(report.classify(), StabilityClass::Saddle);
    }

    #[test]
    fn nonlinear_variant_defective_origin() {
        let (x, y) = crate::symbols!(x, y);
        let field = VectorField::new(
            x.clone() - y.clone(),
            Expr::Const(-2.0) * x.clone().pow(Expr::Const(2.0)) + y.clone(),
            "x",
            "y",
        );
        let mut portrait = PhasePortrait::new(field);
        portrait.analyze().unwrap();

        // equilibria include the origin
        let origin = portrait
            .equilibria
            .iter()
            .find(|eq| norm2(eq.x, eq.y) < 1e-9)
            .expect("origin equilibrium");
        let report = portrait
            .reports
            .iter()
            .find(|r| r.equilibrium == *origin)
            .unwrap();

        // dg/dx = -4x vanishes at the origin, so the jacobian there is [[1,-1],[0,1]]
        assert_relative_eq!(report.jacobian[(0, 0)], 1.0);
        assert_relative_eq!(report.jacobian[(0, 1)], -1.0);
        // the Newton root sits within 1e-12 of the origin, so dg/dx = -4x is
        // tiny but not exactly zero
        assert_relative_eq!(report.jacobian[(1, 0)], 0.0, epsilon = 1e-9);
        assert_relative_eq!(report.jacobian[(1, 1)], 1.0);

        // eigenvalue 1 with multiplicity 2 and a single eigenvector direction
        assert_eq!(report.eigen.len(), 1);
        assert_eq!(report.eigen[0].multiplicity, 2);
        assert_relative_eq!(report.eigen[0].value.re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(report.eigen[0].value.im, 0.0);
        assert_eq!(report.eigen[0].vectors.len(), 1);
        assert!(report.is_defective());
    }

    #[test]
    fn one_integration_step_of_the_linear_saddle() {
        let backend = ExprBackend::new();
        let field = linear_saddle();
        let f_fn = backend.lambdify(&field.f, ("x", "y")).unwrap();
        let g_fn = backend.lambdify(&field.g, ("x", "y")).unwrap();

        let traj = TrajectoryIntegrator::new(0.5, 0.6, 0.1, 1).integrate(&f_fn, &g_fn);
        let x1 = 0.5 + (0.5 - 0.6) * 0.1;
        assert_relative_eq!(traj.x[1], 0.49, epsilon = 1e-15);
        assert_eq!(traj.x[1], x1);
        // the y update couples to the freshly updated x
        assert_eq!(traj.y[1], 0.6 + (-2.0 * x1 + 0.6) * 0.1);
        assert_relative_eq!(traj.y[1], 0.562, epsilon = 1e-15);
    }

    #[test]
    fn field_sampler_zero_and_nonzero_nodes() {
        let backend = ExprBackend::new();
        let field = linear_saddle();
        let f_fn = backend.lambdify(&field.f, ("x", "y")).unwrap();
        let g_fn = backend.lambdify(&field.g, ("x", "y")).unwrap();

        // single node grid centered on the equilibrium
        let at_zero = FieldSampler::new(0.0, 0.0, 0.0, 0.0)
            .with_resolution(1, 1)
            .sample(&f_fn, &g_fn);
        assert_relative_eq!(at_zero.magnitude[(0, 0)], 0.0);
        assert_relative_eq!(at_zero.dx[(0, 0)], 0.0);
        assert_relative_eq!(at_zero.dy[(0, 0)], 0.0);

        // single node grid away from it
        let off_zero = FieldSampler::new(1.0, 1.0, 0.0, 0.0)
            .with_resolution(1, 1)
            .sample(&f_fn, &g_fn);
        assert!(off_zero.magnitude[(0, 0)] > 0.0);
        assert_relative_eq!(
            norm2(off_zero.dx[(0, 0)], off_zero.dy[(0, 0)]),
            1.0,
            epsilon = 1e-12
        );
    }
}
