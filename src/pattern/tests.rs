// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::*;
use ndarray::array;

use super::*;
use crate::{config::FarfieldConfig, geometry::Points};

const WAVELENGTH: f64 = 0.03;

fn small_grid() -> AngularGrid {
    AngularGrid::new(vec![-90.0, 0.0, 90.0, 180.0], vec![-45.0, 0.0, 45.0]).unwrap()
}

fn solve(
    solver: PointSourceSolver,
    positions: Array2<f64>,
    excitations: &[Excitation],
    grid: &AngularGrid,
    config: FarfieldConfig,
) -> ElementPatternSet {
    let sources = Points::with_common_normal(positions, [1.0, 0.0, 0.0]).unwrap();
    solver.solve(&sources, excitations, grid, &config).unwrap()
}

#[test]
fn pattern_set_shapes_are_checked() {
    let grid = small_grid();
    let good = ElementPatternSet::new(Array3::zeros((2, 3, 4)), Array3::zeros((2, 3, 4)), &grid);
    assert!(good.is_ok());
    let good = good.unwrap();
    assert_eq!(good.num_elements(), 2);
    assert_eq!(good.grid_shape(), (3, 4));

    let result = ElementPatternSet::new(Array3::zeros((2, 3, 4)), Array3::zeros((2, 4, 3)), &grid);
    assert_eq!(
        result,
        Err(PatternError::ShapeMismatch {
            what: "Ephi",
            expected: vec![2, 3, 4],
            got: vec![2, 4, 3]
        })
    );

    let result = ElementPatternSet::new(Array3::zeros((2, 3, 3)), Array3::zeros((2, 3, 3)), &grid);
    assert!(matches!(
        result,
        Err(PatternError::ShapeMismatch { what: "Etheta", .. })
    ));

    let result = FarfieldPattern::new(Array2::zeros((3, 4)), Array2::zeros((4, 3)), &grid);
    assert!(matches!(
        result,
        Err(PatternError::ShapeMismatch { what: "Ephi", .. })
    ));
}

#[test]
fn combine_is_a_weighted_sum() {
    let grid = AngularGrid::new(vec![0.0, 10.0], vec![0.0, 10.0]).unwrap();
    let e_theta = array![
        [[c64::new(1.0, 0.0), c64::new(2.0, 0.0)], [c64::new(0.0, 1.0), c64::new(0.0, 0.0)]],
        [[c64::new(1.0, 0.0), c64::new(0.0, -1.0)], [c64::new(3.0, 0.0), c64::new(1.0, 1.0)]]
    ];
    let e_phi = e_theta.mapv(|e| e * 2.0);
    let set = ElementPatternSet::new(e_theta, e_phi, &grid).unwrap();

    let weights = array![c64::new(1.0, 0.0), c64::new(0.0, 1.0)];
    let pattern = set.combine(weights.view()).unwrap();
    let expected = array![
        [c64::new(1.0, 1.0), c64::new(3.0, 0.0)],
        [c64::new(0.0, 4.0), c64::new(-1.0, 1.0)]
    ];
    assert_abs_diff_eq!(pattern.e_theta(), expected.view());
    assert_abs_diff_eq!(pattern.e_phi(), expected.mapv(|e| e * 2.0).view());

    let result = set.combine(array![c64::new(1.0, 0.0)].view());
    assert_eq!(
        result,
        Err(PatternError::WeightCount {
            expected: 2,
            got: 1
        })
    );
}

#[test]
fn single_elements_can_be_extracted() {
    let grid = AngularGrid::new(vec![0.0, 10.0], vec![0.0, 10.0]).unwrap();
    let e_theta =
        Array3::from_shape_fn((3, 2, 2), |(i, j, k)| c64::new(i as f64, (j * 2 + k) as f64));
    let set = ElementPatternSet::new(e_theta.clone(), Array3::zeros((3, 2, 2)), &grid).unwrap();

    let element = set.element(1).unwrap();
    assert_eq!(element.e_theta(), e_theta.index_axis(Axis(0), 1));
    let (theta, phi) = set.samples_at(1, 0);
    assert_eq!(theta, array![c64::new(0.0, 2.0), c64::new(1.0, 2.0), c64::new(2.0, 2.0)]);
    assert_eq!(phi, Array1::<c64>::zeros(3));

    assert_eq!(
        set.element(3),
        Err(PatternError::ElementIndex {
            index: 3,
            num_elements: 3
        })
    );
}

#[test]
fn point_source_phase_follows_position() {
    let grid = small_grid();
    let config = FarfieldConfig::new(WAVELENGTH, 20.0).unwrap();
    let set = solve(
        PointSourceSolver::new(),
        array![[WAVELENGTH / 4.0, 0.0, 0.0]],
        &[Excitation::unit([0.0, 0.0, 1.0])],
        &grid,
        config,
    );
    assert_eq!(set.num_elements(), 1);

    // Boresight: a quarter wavelength ahead of the origin.
    assert_abs_diff_eq!(set.e_theta()[[0, 1, 1]], c64::new(0.0, 1.0), epsilon = 1e-12);
    // Along +y, the source is no closer than the origin.
    assert_abs_diff_eq!(set.e_theta()[[0, 1, 2]], c64::new(1.0, 0.0), epsilon = 1e-12);
    // Behind, a quarter wavelength further away.
    assert_abs_diff_eq!(set.e_theta()[[0, 1, 3]], c64::new(0.0, -1.0), epsilon = 1e-12);
    // Unprojected sources are isotropic and only radiate Etheta.
    for e in set.e_theta() {
        assert_abs_diff_eq!(e.norm(), 1.0, epsilon = 1e-12);
    }
    for e in set.e_phi() {
        assert_eq!(*e, c64::new(0.0, 0.0));
    }
}

#[test]
fn projected_vertical_current_has_no_ephi() {
    let grid = AngularGrid::full_sphere(19, 19).unwrap();
    let amplitude = c64::from_polar(2.0, 0.3);
    let config = FarfieldConfig::new(WAVELENGTH, 20.0)
        .unwrap()
        .with_project_vectors(true);
    let set = solve(
        PointSourceSolver::new(),
        array![[0.0, 0.0, 0.0]],
        &[Excitation::new(amplitude, [0.0, 0.0, 1.0])],
        &grid,
        config,
    );

    for ((i_el, i_az), azel) in grid.directions() {
        let expected = -amplitude * azel.el.cos();
        assert_abs_diff_eq!(set.e_theta()[[0, i_el, i_az]], expected, epsilon = 1e-12);
        assert_abs_diff_eq!(set.e_phi()[[0, i_el, i_az]].norm(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn projected_horizontal_current_splits_polarisations() {
    let grid = small_grid();
    let config = FarfieldConfig::new(WAVELENGTH, 20.0)
        .unwrap()
        .with_project_vectors(true);
    let set = solve(
        PointSourceSolver::new(),
        array![[0.0, 0.0, 0.0]],
        &[Excitation::unit([0.0, 1.0, 0.0])],
        &grid,
        config,
    );
    // At boresight, a y-directed current is entirely in phi.
    assert_abs_diff_eq!(set.e_theta()[[0, 1, 1]].norm(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(set.e_phi()[[0, 1, 1]], c64::new(1.0, 0.0), epsilon = 1e-12);
    // Looking along +y, it doesn't radiate at all.
    assert_abs_diff_eq!(set.e_theta()[[0, 1, 2]].norm(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(set.e_phi()[[0, 1, 2]].norm(), 0.0, epsilon = 1e-12);
}

#[test]
fn combined_mode_collapses_elements() {
    let grid = small_grid();
    let positions = array![[0.0, 0.0, 0.0], [0.0, WAVELENGTH / 2.0, 0.0]];
    let excitations = [Excitation::unit([0.0, 0.0, 1.0]); 2];
    let config = FarfieldConfig::new(WAVELENGTH, 20.0).unwrap();

    let elements = solve(
        PointSourceSolver::new(),
        positions.clone(),
        &excitations,
        &grid,
        config,
    );
    let combined = solve(
        PointSourceSolver::new(),
        positions,
        &excitations,
        &grid,
        config.with_elements_mode(false),
    );
    assert_eq!(elements.num_elements(), 2);
    assert_eq!(combined.num_elements(), 1);
    assert_abs_diff_eq!(
        combined.e_theta().index_axis(Axis(0), 0),
        elements.e_theta().sum_axis(Axis(0)),
        epsilon = 1e-12
    );

    // Half a wavelength apart along y, the two cancel along +y.
    assert_abs_diff_eq!(combined.e_theta()[[0, 1, 2]].norm(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(combined.e_theta()[[0, 1, 1]].norm(), 2.0, epsilon = 1e-12);
}

#[test]
fn front_hemisphere_only_blocks_the_back() {
    let grid = small_grid();
    let config = FarfieldConfig::new(WAVELENGTH, 20.0).unwrap();
    let set = solve(
        PointSourceSolver::new().front_hemisphere_only(),
        array![[0.0, 0.0, 0.0]],
        &[Excitation::unit([0.0, 0.0, 1.0])],
        &grid,
        config,
    );
    for i_el in 0..3 {
        assert_eq!(set.e_theta()[[0, i_el, 3]], c64::new(0.0, 0.0));
        assert_abs_diff_eq!(set.e_theta()[[0, i_el, 1]].norm(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn excitations_must_match_sources() {
    let grid = small_grid();
    let config = FarfieldConfig::new(WAVELENGTH, 20.0).unwrap();
    let sources = Points::with_common_normal(array![[0.0, 0.0, 0.0]], [1.0, 0.0, 0.0]).unwrap();
    let result = PointSourceSolver::new().solve(
        &sources,
        &[Excitation::unit([0.0, 0.0, 1.0]); 2],
        &grid,
        &config,
    );
    assert_eq!(
        result,
        Err(PatternError::ExcitationCount {
            expected: 1,
            got: 2
        })
    );
}

#[test]
fn isotropic_directivity_is_flat() {
    let grid = AngularGrid::full_sphere(37, 19).unwrap();
    let pattern = FarfieldPattern::new(
        Array2::from_elem(grid.shape(), c64::new(0.0, 1.0)),
        Array2::zeros(grid.shape()),
        &grid,
    )
    .unwrap();

    assert_abs_diff_eq!(pattern.total_power(&grid).unwrap(), grid.solid_angle(), epsilon = 1e-12);
    let expected = 4.0 * PI / grid.solid_angle();
    let directivity = pattern.directivity(&grid).unwrap();
    for &d in directivity.iter() {
        assert_abs_diff_eq!(d, expected, epsilon = 1e-12);
    }
    // A full-sphere grid integrates close to 4 pi, so this is close to 1.
    assert_abs_diff_eq!(expected, 1.0, epsilon = 0.05);
}

#[test]
fn directivity_components_add_up() {
    // No duplicated azimuth seam, so the quadrature is close to exact.
    let grid = AngularGrid::linspace((-180.0, 170.0), 36, (-90.0, 90.0), 37).unwrap();
    let config = FarfieldConfig::new(WAVELENGTH, 20.0)
        .unwrap()
        .with_project_vectors(true);
    let set = solve(
        PointSourceSolver::new(),
        array![[0.0, 0.0, 0.0]],
        &[Excitation::unit([0.0, 0.6, 0.8])],
        &grid,
        config,
    );
    let pattern = set.element(0).unwrap();
    let [d_theta, d_phi, d_total] = pattern.directivity_components(&grid).unwrap();
    assert_abs_diff_eq!(&d_theta + &d_phi, d_total, epsilon = 1e-12);
    assert!(d_theta.iter().any(|&d| d > 0.1));
    assert!(d_phi.iter().any(|&d| d > 0.1));

    // A short dipole has a directivity of 1.5.
    let peak = d_total.iter().cloned().fold(0.0, f64::max);
    assert_abs_diff_eq!(peak, 1.5, epsilon = 0.1);
}

#[test]
fn silent_patterns_have_no_directivity() {
    let grid = small_grid();
    let pattern =
        FarfieldPattern::new(Array2::zeros(grid.shape()), Array2::zeros(grid.shape()), &grid)
            .unwrap();
    assert_eq!(pattern.total_power(&grid).unwrap(), 0.0);
    let directivity = pattern.directivity(&grid).unwrap();
    assert!(directivity.iter().all(|&d| d == 0.0));
}

#[test]
fn patterns_must_match_the_grid() {
    let grid = small_grid();
    let other = AngularGrid::full_sphere(5, 5).unwrap();
    let pattern =
        FarfieldPattern::new(Array2::zeros(grid.shape()), Array2::zeros(grid.shape()), &grid)
            .unwrap();
    assert!(matches!(
        pattern.total_power(&other),
        Err(PatternError::ShapeMismatch { .. })
    ));
    assert!(pattern.directivity(&other).is_err());
}

#[test]
fn non_finite_patterns_are_rejected() {
    let grid = small_grid();
    let mut e_theta = Array3::zeros((1, 3, 4));
    e_theta[[0, 1, 2]] = c64::new(f64::NAN, 0.0);
    let result = ElementPatternSet::new(e_theta, Array3::zeros((1, 3, 4)), &grid);
    assert_eq!(
        result,
        Err(PatternError::NonFinite {
            what: "Etheta",
            index: vec![0, 1, 2]
        })
    );

    let mut e_phi = Array3::zeros((2, 3, 4));
    e_phi[[1, 2, 0]] = c64::new(0.0, f64::INFINITY);
    let result = ElementPatternSet::new(Array3::zeros((2, 3, 4)), e_phi, &grid);
    assert_eq!(
        result,
        Err(PatternError::NonFinite {
            what: "Ephi",
            index: vec![1, 2, 0]
        })
    );

    let mut e_theta = Array2::zeros(grid.shape());
    e_theta[[2, 3]] = c64::new(f64::NAN, f64::NAN);
    let result = FarfieldPattern::new(e_theta, Array2::zeros(grid.shape()), &grid);
    assert_eq!(
        result,
        Err(PatternError::NonFinite {
            what: "Etheta",
            index: vec![2, 3]
        })
    );
}

#[test]
fn non_finite_weights_are_rejected() {
    let grid = small_grid();
    let set =
        ElementPatternSet::new(Array3::zeros((2, 3, 4)), Array3::zeros((2, 3, 4)), &grid).unwrap();
    let result = set.combine(array![c64::new(1.0, 0.0), c64::new(f64::NAN, 0.0)].view());
    assert_eq!(
        result,
        Err(PatternError::NonFinite {
            what: "weights",
            index: vec![1]
        })
    );
}

#[test]
fn empty_arrays_are_rejected() {
    let grid = small_grid();
    let result = ElementPatternSet::new(Array3::zeros((0, 3, 4)), Array3::zeros((0, 3, 4)), &grid);
    assert_eq!(result, Err(PatternError::NoElements));

    let config = FarfieldConfig::new(WAVELENGTH, 20.0).unwrap();
    let sources = Points::new(Array2::zeros((0, 3)), Array2::zeros((0, 3))).unwrap();
    let result = PointSourceSolver::new().solve(&sources, &[], &grid, &config);
    assert_eq!(result, Err(PatternError::NoElements));
}

#[test]
fn non_finite_excitations_are_rejected() {
    let grid = small_grid();
    let config = FarfieldConfig::new(WAVELENGTH, 20.0).unwrap();
    let positions = array![[0.0, 0.0, 0.0], [0.0, 0.015, 0.0]];
    let sources = Points::with_common_normal(positions, [1.0, 0.0, 0.0]).unwrap();
    let excitations = [
        Excitation::unit([0.0, 0.0, 1.0]),
        Excitation::new(c64::new(f64::NAN, 0.0), [0.0, 0.0, 1.0]),
    ];
    let result = PointSourceSolver::new().solve(&sources, &excitations, &grid, &config);
    assert_eq!(
        result,
        Err(PatternError::NonFinite {
            what: "excitations",
            index: vec![1]
        })
    );

    let excitations = [Excitation::unit([f64::INFINITY, 0.0, 1.0]); 2];
    let result = PointSourceSolver::new().solve(&sources, &excitations, &grid, &config);
    assert!(matches!(
        result,
        Err(PatternError::NonFinite {
            what: "excitations",
            ..
        })
    ));
}
