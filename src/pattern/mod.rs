// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Far-field patterns: the per-element patterns produced by a far-field
//! solver, and combined patterns produced by weighting and summing them.

mod error;
mod solver;
#[cfg(test)]
mod tests;

pub use error::PatternError;
pub use solver::{Excitation, FarfieldSolver, PointSourceSolver};

use std::f64::consts::PI;

use ndarray::{prelude::*, Zip};

use crate::{c64, grid::AngularGrid};

/// Complex far-field samples (Etheta, Ephi) for every element of an array.
/// Both arrays have the shape `(num_elements, num_el, num_az)` and are
/// aligned with an [`AngularGrid`].
///
/// This is read-only once created, so it can be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementPatternSet {
    e_theta: Array3<c64>,
    e_phi: Array3<c64>,
}

impl ElementPatternSet {
    /// Create a new [`ElementPatternSet`], checking that both arrays have the
    /// same shape, that shape agrees with `grid`, there is at least one
    /// element and every sample is finite.
    pub fn new(
        e_theta: Array3<c64>,
        e_phi: Array3<c64>,
        grid: &AngularGrid,
    ) -> Result<ElementPatternSet, PatternError> {
        let (num_el, num_az) = grid.shape();
        let expected = [e_theta.dim().0, num_el, num_az];
        check_shape("Etheta", e_theta.shape(), &expected)?;
        check_shape("Ephi", e_phi.shape(), &expected)?;
        if expected[0] == 0 {
            return Err(PatternError::NoElements);
        }
        check_finite("Etheta", e_theta.iter(), e_theta.shape())?;
        check_finite("Ephi", e_phi.iter(), e_phi.shape())?;
        Ok(ElementPatternSet { e_theta, e_phi })
    }

    pub fn num_elements(&self) -> usize {
        self.e_theta.dim().0
    }

    /// The grid shape `(num_el, num_az)` of these patterns.
    pub fn grid_shape(&self) -> (usize, usize) {
        let (_, num_el, num_az) = self.e_theta.dim();
        (num_el, num_az)
    }

    pub fn e_theta(&self) -> ArrayView3<c64> {
        self.e_theta.view()
    }

    pub fn e_phi(&self) -> ArrayView3<c64> {
        self.e_phi.view()
    }

    /// Get the pattern of a single element.
    pub fn element(&self, index: usize) -> Result<FarfieldPattern, PatternError> {
        if index >= self.num_elements() {
            return Err(PatternError::ElementIndex {
                index,
                num_elements: self.num_elements(),
            });
        }
        Ok(FarfieldPattern {
            e_theta: self.e_theta.index_axis(Axis(0), index).to_owned(),
            e_phi: self.e_phi.index_axis(Axis(0), index).to_owned(),
        })
    }

    /// The (Etheta, Ephi) samples of every element at one grid direction.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn samples_at(&self, i_el: usize, i_az: usize) -> (ArrayView1<c64>, ArrayView1<c64>) {
        (
            self.e_theta.slice(s![.., i_el, i_az]),
            self.e_phi.slice(s![.., i_el, i_az]),
        )
    }

    /// Coherently combine the elements with complex weights:
    /// `E(el, az) = sum_i w_i E_i(el, az)` for both polarisations. This is
    /// done at every grid direction, so the result is the full realised
    /// pattern for this choice of weights.
    pub fn combine(&self, weights: ArrayView1<c64>) -> Result<FarfieldPattern, PatternError> {
        if weights.len() != self.num_elements() {
            return Err(PatternError::WeightCount {
                expected: self.num_elements(),
                got: weights.len(),
            });
        }
        check_finite("weights", weights.iter(), weights.shape())?;

        let shape = self.grid_shape();
        let mut e_theta = Array2::zeros(shape);
        let mut e_phi = Array2::zeros(shape);
        for ((&w, theta_i), phi_i) in weights
            .iter()
            .zip(self.e_theta.outer_iter())
            .zip(self.e_phi.outer_iter())
        {
            Zip::from(&mut e_theta)
                .and(&theta_i)
                .for_each(|total, &e| *total += w * e);
            Zip::from(&mut e_phi)
                .and(&phi_i)
                .for_each(|total, &e| *total += w * e);
        }
        Ok(FarfieldPattern { e_theta, e_phi })
    }

    /// Sum all elements with unit weights into a single-element set.
    pub fn collapse(&self) -> ElementPatternSet {
        ElementPatternSet {
            e_theta: self.e_theta.sum_axis(Axis(0)).insert_axis(Axis(0)),
            e_phi: self.e_phi.sum_axis(Axis(0)).insert_axis(Axis(0)),
        }
    }
}

/// A single complex far-field pattern (Etheta, Ephi) over an
/// [`AngularGrid`], both with shape `(num_el, num_az)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FarfieldPattern {
    e_theta: Array2<c64>,
    e_phi: Array2<c64>,
}

impl FarfieldPattern {
    pub fn new(
        e_theta: Array2<c64>,
        e_phi: Array2<c64>,
        grid: &AngularGrid,
    ) -> Result<FarfieldPattern, PatternError> {
        let (num_el, num_az) = grid.shape();
        check_shape("Etheta", e_theta.shape(), &[num_el, num_az])?;
        check_shape("Ephi", e_phi.shape(), &[num_el, num_az])?;
        check_finite("Etheta", e_theta.iter(), e_theta.shape())?;
        check_finite("Ephi", e_phi.iter(), e_phi.shape())?;
        Ok(FarfieldPattern { e_theta, e_phi })
    }

    pub fn e_theta(&self) -> ArrayView2<c64> {
        self.e_theta.view()
    }

    pub fn e_phi(&self) -> ArrayView2<c64> {
        self.e_phi.view()
    }

    /// The radiation intensity `|Etheta|^2 + |Ephi|^2` at every direction (up
    /// to a constant factor, which cancels in directivity).
    pub fn intensity(&self) -> Array2<f64> {
        Zip::from(&self.e_theta)
            .and(&self.e_phi)
            .map_collect(|t, p| t.norm_sqr() + p.norm_sqr())
    }

    /// The total radiated power, integrated over `grid`.
    pub fn total_power(&self, grid: &AngularGrid) -> Result<f64, PatternError> {
        self.check_grid(grid)?;
        Ok(self.power_with_weights(grid.solid_angle_weights().view()))
    }

    /// The directivity of each polarisation and the total directivity at
    /// every direction of `grid`, in the order (theta, phi, total). A pattern
    /// that radiates no power has zero directivity everywhere.
    pub fn directivity_components(
        &self,
        grid: &AngularGrid,
    ) -> Result<[Array2<f64>; 3], PatternError> {
        self.check_grid(grid)?;
        let p_total = self.power_with_weights(grid.solid_angle_weights().view());
        let scale = directivity_scale(p_total);
        let d_theta = self.e_theta.mapv(|e| scale * e.norm_sqr());
        let d_phi = self.e_phi.mapv(|e| scale * e.norm_sqr());
        let d_total = &d_theta + &d_phi;
        Ok([d_theta, d_phi, d_total])
    }

    /// The total directivity at every direction of `grid`.
    pub fn directivity(&self, grid: &AngularGrid) -> Result<Array2<f64>, PatternError> {
        let [_, _, d_total] = self.directivity_components(grid)?;
        Ok(d_total)
    }

    /// Sum the intensity with the given quadrature weights. The weights must
    /// have the same shape as this pattern.
    pub(crate) fn power_with_weights(&self, weights: ArrayView2<f64>) -> f64 {
        Zip::from(&self.e_theta)
            .and(&self.e_phi)
            .and(&weights)
            .fold(0.0, |acc, t, p, &w| acc + (t.norm_sqr() + p.norm_sqr()) * w)
    }

    /// The (theta, phi, total) directivity at a single direction, given the
    /// pattern's total power.
    pub(crate) fn directivity_at(&self, p_total: f64, i_el: usize, i_az: usize) -> [f64; 3] {
        let scale = directivity_scale(p_total);
        let d_theta = scale * self.e_theta[[i_el, i_az]].norm_sqr();
        let d_phi = scale * self.e_phi[[i_el, i_az]].norm_sqr();
        [d_theta, d_phi, d_theta + d_phi]
    }

    fn check_grid(&self, grid: &AngularGrid) -> Result<(), PatternError> {
        let (num_el, num_az) = grid.shape();
        check_shape("pattern", self.e_theta.shape(), &[num_el, num_az])
    }
}

/// `4 pi / P_total`, or zero if nothing is radiated.
fn directivity_scale(p_total: f64) -> f64 {
    if p_total > 0.0 {
        4.0 * PI / p_total
    } else {
        0.0
    }
}

fn check_shape(what: &'static str, got: &[usize], expected: &[usize]) -> Result<(), PatternError> {
    if got != expected {
        return Err(PatternError::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            got: got.to_vec(),
        });
    }
    Ok(())
}

/// Find the first non-finite sample (in logical order) and report its index
/// within `shape`.
fn check_finite<'a, I>(
    what: &'static str,
    mut samples: I,
    shape: &[usize],
) -> Result<(), PatternError>
where
    I: Iterator<Item = &'a c64>,
{
    match samples.position(|e| !e.is_finite()) {
        None => Ok(()),
        Some(mut flat) => {
            let mut index = vec![0; shape.len()];
            for (i, &len) in index.iter_mut().zip(shape.iter()).rev() {
                *i = flat % len;
                flat /= len;
            }
            Err(PatternError::NonFinite { what, index })
        }
    }
}
