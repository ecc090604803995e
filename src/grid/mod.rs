// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The azimuth/elevation sampling that patterns and maps are defined on.

mod error;
#[cfg(test)]
mod tests;

pub use error::GridError;

use ndarray::prelude::*;

use crate::{constants::GRID_SPACING_TOL, direction::AzEl};

/// Which axis of an [`AngularGrid`] we're talking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    Azimuth,
    Elevation,
}

impl std::fmt::Display for GridAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                GridAxis::Azimuth => "azimuth",
                GridAxis::Elevation => "elevation",
            }
        )
    }
}

/// A uniformly-spaced grid of azimuths and elevations \[degrees\].
///
/// Arrays defined on the grid have the shape `(num_el, num_az)`; elevation is
/// the slow axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AngularGrid {
    az_deg: Vec<f64>,
    el_deg: Vec<f64>,
    az_step_deg: f64,
    el_step_deg: f64,
}

impl AngularGrid {
    /// Create a new [`AngularGrid`]. Both axes must have at least two samples
    /// and be strictly increasing with a uniform step, and elevations must lie
    /// within -90..=90 degrees.
    pub fn new(az_deg: Vec<f64>, el_deg: Vec<f64>) -> Result<AngularGrid, GridError> {
        let az_step_deg = validate_axis(&az_deg, GridAxis::Azimuth)?;
        let el_step_deg = validate_axis(&el_deg, GridAxis::Elevation)?;
        if let Some(&el) = el_deg.iter().find(|el| el.abs() > 90.0 + GRID_SPACING_TOL) {
            return Err(GridError::ElevationOutOfRange(el));
        }

        Ok(AngularGrid {
            az_deg,
            el_deg,
            az_step_deg,
            el_step_deg,
        })
    }

    /// Create a new [`AngularGrid`] from inclusive ranges. Like numpy's
    /// `linspace`, both the start and stop values are sampled.
    pub fn linspace(
        az_range_deg: (f64, f64),
        num_az: usize,
        el_range_deg: (f64, f64),
        num_el: usize,
    ) -> Result<AngularGrid, GridError> {
        let az = linspace(az_range_deg, num_az, GridAxis::Azimuth)?;
        let el = linspace(el_range_deg, num_el, GridAxis::Elevation)?;
        AngularGrid::new(az, el)
    }

    /// A grid covering the whole sphere: azimuths from -180 to 180 degrees
    /// and elevations from -90 to 90 degrees, endpoints included.
    pub fn full_sphere(num_az: usize, num_el: usize) -> Result<AngularGrid, GridError> {
        AngularGrid::linspace((-180.0, 180.0), num_az, (-90.0, 90.0), num_el)
    }

    pub fn azimuths_deg(&self) -> &[f64] {
        &self.az_deg
    }

    pub fn elevations_deg(&self) -> &[f64] {
        &self.el_deg
    }

    pub fn num_az(&self) -> usize {
        self.az_deg.len()
    }

    pub fn num_el(&self) -> usize {
        self.el_deg.len()
    }

    /// The shape of arrays on this grid, `(num_el, num_az)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_el(), self.num_az())
    }

    /// The total number of directions on this grid.
    pub fn len(&self) -> usize {
        self.num_el() * self.num_az()
    }

    /// A grid always has at least 4 directions, but clippy wants this.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn az_step_rad(&self) -> f64 {
        self.az_step_deg.to_radians()
    }

    pub fn el_step_rad(&self) -> f64 {
        self.el_step_deg.to_radians()
    }

    /// Get the direction at grid indices `(i_el, i_az)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn direction(&self, i_el: usize, i_az: usize) -> AzEl {
        AzEl::from_degrees(self.az_deg[i_az], self.el_deg[i_el])
    }

    /// Iterate over every direction on the grid, elevation-major, alongside
    /// its `(i_el, i_az)` indices.
    pub fn directions(&self) -> impl Iterator<Item = ((usize, usize), AzEl)> + '_ {
        self.el_deg.iter().enumerate().flat_map(move |(i_el, &el)| {
            self.az_deg
                .iter()
                .enumerate()
                .map(move |(i_az, &az)| ((i_el, i_az), AzEl::from_degrees(az, el)))
        })
    }

    /// Find the grid indices `(i_el, i_az)` of the sample closest to the given
    /// direction along each axis. Azimuths are compared modulo 360 degrees.
    pub fn closest_index(&self, direction: AzEl) -> (usize, usize) {
        let el_deg = direction.el.to_degrees();
        let az_deg = direction.az.to_degrees();
        let i_el = argmin_by(&self.el_deg, |el| (el - el_deg).abs());
        let i_az = argmin_by(&self.az_deg, |az| {
            let d = (az - az_deg).rem_euclid(360.0);
            d.min(360.0 - d)
        });
        (i_el, i_az)
    }

    /// The solid angle represented by each grid sample,
    /// `cos(el) * d_el * d_az` \[steradians\]. This is the quadrature used for
    /// every integral over the sphere in this crate.
    pub fn solid_angle_weights(&self) -> Array2<f64> {
        let d_omega = self.el_step_rad() * self.az_step_rad();
        let mut weights = Array2::zeros(self.shape());
        for (mut row, &el) in weights.outer_iter_mut().zip(self.el_deg.iter()) {
            // cos is clamped so that the poles never contribute negative
            // weight through rounding.
            row.fill(el.to_radians().cos().max(0.0) * d_omega);
        }
        weights
    }

    /// The total solid angle covered by this grid \[steradians\].
    pub fn solid_angle(&self) -> f64 {
        self.solid_angle_weights().sum()
    }

    /// Does this grid sample the whole sphere? Each sample is taken to
    /// represent half a step either side of it.
    pub fn covers_full_sphere(&self) -> bool {
        let tol = 1e-6;
        let az_span = self.az_deg[self.num_az() - 1] - self.az_deg[0] + self.az_step_deg;
        let el_min = self.el_deg[0] - 0.5 * self.el_step_deg;
        let el_max = self.el_deg[self.num_el() - 1] + 0.5 * self.el_step_deg;
        az_span >= 360.0 - tol && el_min <= -90.0 + tol && el_max >= 90.0 - tol
    }
}

/// Check an axis and return its step.
fn validate_axis(values: &[f64], axis: GridAxis) -> Result<f64, GridError> {
    if values.len() < 2 {
        return Err(GridError::Degenerate {
            axis,
            got: values.len(),
        });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(GridError::NonFinite { axis, index });
    }

    if let Some(i) = values.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(GridError::NonMonotonic { axis, index: i + 1 });
    }

    let step = (values[values.len() - 1] - values[0]) / (values.len() - 1) as f64;
    for (i, pair) in values.windows(2).enumerate() {
        let diff = pair[1] - pair[0];
        if (diff - step).abs() > GRID_SPACING_TOL * step.abs().max(1.0) {
            return Err(GridError::NonUniform {
                axis,
                index: i + 1,
                expected: step,
                got: diff,
            });
        }
    }
    Ok(step)
}

fn linspace((start, stop): (f64, f64), num: usize, axis: GridAxis) -> Result<Vec<f64>, GridError> {
    if num < 2 {
        return Err(GridError::Degenerate { axis, got: num });
    }
    let step = (stop - start) / (num - 1) as f64;
    let mut values: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
    // Pin the endpoint so that it is exactly what was asked for.
    values[num - 1] = stop;
    Ok(values)
}

fn argmin_by<F: Fn(f64) -> f64>(values: &[f64], f: F) -> usize {
    values
        .iter()
        .map(|&v| f(v))
        .enumerate()
        .fold((0, f64::INFINITY), |(best_i, best), (i, d)| {
            if d < best {
                (i, d)
            } else {
                (best_i, best)
            }
        })
        .0
}
