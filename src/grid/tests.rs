// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests for angular grids.

use std::f64::consts::PI;

use approx::*;

use super::*;

#[test]
fn full_sphere_endpoints() {
    let grid = AngularGrid::full_sphere(37, 19).unwrap();
    assert_eq!(grid.shape(), (19, 37));
    assert_eq!(grid.len(), 19 * 37);
    assert_eq!(grid.azimuths_deg()[0], -180.0);
    assert_eq!(grid.azimuths_deg()[36], 180.0);
    assert_eq!(grid.elevations_deg()[0], -90.0);
    assert_eq!(grid.elevations_deg()[18], 90.0);
    assert_abs_diff_eq!(grid.az_step_rad(), 10.0_f64.to_radians(), epsilon = 1e-12);
    assert_abs_diff_eq!(grid.el_step_rad(), 10.0_f64.to_radians(), epsilon = 1e-12);
    assert!(grid.covers_full_sphere());
}

#[test]
fn degenerate_axes_are_rejected() {
    let result = AngularGrid::full_sphere(1, 10);
    assert_eq!(
        result,
        Err(GridError::Degenerate {
            axis: GridAxis::Azimuth,
            got: 1
        })
    );

    let result = AngularGrid::new(vec![0.0, 10.0], vec![]);
    assert_eq!(
        result,
        Err(GridError::Degenerate {
            axis: GridAxis::Elevation,
            got: 0
        })
    );
}

#[test]
fn non_monotonic_axes_are_rejected() {
    let result = AngularGrid::new(vec![0.0, 10.0, 5.0], vec![0.0, 10.0]);
    assert!(matches!(
        result,
        Err(GridError::NonMonotonic {
            axis: GridAxis::Azimuth,
            index: 2
        })
    ));

    let result = AngularGrid::new(vec![0.0, 10.0], vec![10.0, 0.0]);
    assert!(matches!(
        result,
        Err(GridError::NonMonotonic {
            axis: GridAxis::Elevation,
            ..
        })
    ));
}

#[test]
fn non_uniform_axes_are_rejected() {
    let result = AngularGrid::new(vec![0.0, 10.0, 30.0], vec![0.0, 10.0]);
    assert!(matches!(
        result,
        Err(GridError::NonUniform {
            axis: GridAxis::Azimuth,
            ..
        })
    ));
}

#[test]
fn non_finite_and_out_of_range() {
    let result = AngularGrid::new(vec![0.0, f64::NAN], vec![0.0, 10.0]);
    assert!(matches!(result, Err(GridError::NonFinite { index: 1, .. })));

    let result = AngularGrid::new(vec![0.0, 10.0], vec![80.0, 100.0]);
    assert_eq!(result, Err(GridError::ElevationOutOfRange(100.0)));
}

#[test]
fn periodic_grid_solid_angle_is_close_to_4pi() {
    // Azimuths without a duplicated seam at +-180.
    let az = (0..36).map(|i| -180.0 + 10.0 * i as f64).collect();
    let el = (0..37).map(|i| -90.0 + 5.0 * i as f64).collect();
    let grid = AngularGrid::new(az, el).unwrap();
    assert!(grid.covers_full_sphere());
    assert_relative_eq!(grid.solid_angle(), 4.0 * PI, max_relative = 1e-3);
}

#[test]
fn hemisphere_is_not_full_sphere() {
    let grid = AngularGrid::linspace((-180.0, 180.0), 37, (0.0, 90.0), 10).unwrap();
    assert!(!grid.covers_full_sphere());
}

#[test]
fn weights_follow_cos_elevation() {
    let grid = AngularGrid::full_sphere(37, 37).unwrap();
    let weights = grid.solid_angle_weights();
    let d_omega = grid.az_step_rad() * grid.el_step_rad();
    assert_eq!(weights.dim(), grid.shape());
    // The poles contribute nothing; the equator contributes the most.
    assert_abs_diff_eq!(weights[[0, 0]], 0.0, epsilon = 1e-18);
    assert_abs_diff_eq!(weights[[36, 5]], 0.0, epsilon = 1e-18);
    assert_abs_diff_eq!(weights[[18, 5]], d_omega, epsilon = 1e-15);
    assert_abs_diff_eq!(
        weights[[24, 0]],
        30.0_f64.to_radians().cos() * d_omega,
        epsilon = 1e-15
    );
}

#[test]
fn directions_are_elevation_major() {
    let grid = AngularGrid::full_sphere(5, 3).unwrap();
    let dirs: Vec<_> = grid.directions().collect();
    assert_eq!(dirs.len(), 15);
    assert_eq!(dirs[0].0, (0, 0));
    assert_eq!(dirs[1].0, (0, 1));
    assert_eq!(dirs[5].0, (1, 0));
    let ((i_el, i_az), azel) = dirs[6];
    assert_eq!(azel, grid.direction(i_el, i_az));
    assert_abs_diff_eq!(azel.az, -PI / 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(azel.el, 0.0, epsilon = 1e-12);
}

#[test]
fn closest_index_wraps_azimuth() {
    let grid = AngularGrid::full_sphere(37, 37).unwrap();
    assert_eq!(grid.closest_index(AzEl::from_degrees(0.0, 0.0)), (18, 18));
    assert_eq!(grid.closest_index(AzEl::from_degrees(21.0, -44.0)), (9, 20));
    // 356 degrees is -4 degrees.
    let (_, i_az) = grid.closest_index(AzEl::from_degrees(356.0, 0.0));
    assert_eq!(grid.azimuths_deg()[i_az], 0.0);
}
