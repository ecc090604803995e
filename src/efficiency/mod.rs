// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Steering efficiency: how much of the sphere an array can usefully steer
//! to, as the integral of achieved directivity relative to an isotropic
//! radiator.


use log::warn;
use ndarray::{prelude::*, Zip};
use thiserror::Error;

use crate::{
    constants::FULL_SPHERE_SR,
    directivity::DirectivityMap,
    geometry::{max_aperture_directivity, GeometryError},
    grid::AngularGrid,
    types::Component,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EfficiencyError {
    #[error("The shape of the {what} slice ({got:?}) doesn't match the grid ({expected:?})")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Quantisation index {index} is out of range; the map has {num_quantisations}")]
    QuantisationIndex {
        index: usize,
        num_quantisations: usize,
    },

    #[error("The reference solid angle must be positive and finite (got {0} steradians)")]
    InvalidReferenceSolidAngle(f64),
}

/// Steering efficiencies \[percent\].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringEfficiency {
    pub theta: f64,
    pub phi: f64,
    pub total: f64,
    /// Did the integration cover the whole sphere? If not, the efficiencies
    /// are under-counted; they are not renormalised.
    pub full_sphere: bool,
}

/// Integrates directivity maps into [`SteeringEfficiency`]s using the same
/// quadrature that produced the map.
#[derive(Debug, Clone, Copy)]
pub struct SteeringEfficiencyEvaluator<'a> {
    grid: &'a AngularGrid,
    reference_solid_angle: f64,
}

impl<'a> SteeringEfficiencyEvaluator<'a> {
    /// Create a new [`SteeringEfficiencyEvaluator`] with a full-sphere (4 pi)
    /// reference.
    pub fn new(grid: &'a AngularGrid) -> SteeringEfficiencyEvaluator<'a> {
        SteeringEfficiencyEvaluator {
            grid,
            reference_solid_angle: FULL_SPHERE_SR,
        }
    }

    pub fn with_reference_solid_angle(
        self,
        reference_solid_angle: f64,
    ) -> Result<SteeringEfficiencyEvaluator<'a>, EfficiencyError> {
        if !(reference_solid_angle > 0.0 && reference_solid_angle.is_finite()) {
            return Err(EfficiencyError::InvalidReferenceSolidAngle(
                reference_solid_angle,
            ));
        }
        Ok(SteeringEfficiencyEvaluator {
            reference_solid_angle,
            ..self
        })
    }

    pub fn reference_solid_angle(&self) -> f64 {
        self.reference_solid_angle
    }

    /// Evaluate one quantisation of a map.
    pub fn evaluate(
        &self,
        map: &DirectivityMap,
        quantisation_index: usize,
    ) -> Result<SteeringEfficiency, EfficiencyError> {
        let num_quantisations = map.quantisations().len();
        let (d_theta, d_phi) = match (
            map.slice(Component::Theta, quantisation_index),
            map.slice(Component::Phi, quantisation_index),
        ) {
            (Some(t), Some(p)) => (t, p),
            _ => {
                return Err(EfficiencyError::QuantisationIndex {
                    index: quantisation_index,
                    num_quantisations,
                })
            }
        };
        self.evaluate_slices(d_theta, d_phi)
    }

    /// Evaluate every quantisation of a map, in map order.
    pub fn evaluate_all(
        &self,
        map: &DirectivityMap,
    ) -> Result<Vec<SteeringEfficiency>, EfficiencyError> {
        (0..map.quantisations().len())
            .map(|i| self.evaluate(map, i))
            .collect()
    }

    /// Evaluate theta and phi directivity slices, each `(num_el, num_az)`.
    /// The total efficiency is the sum of the two.
    pub fn evaluate_slices(
        &self,
        d_theta: ArrayView2<f64>,
        d_phi: ArrayView2<f64>,
    ) -> Result<SteeringEfficiency, EfficiencyError> {
        let expected = self.grid.shape();
        for (what, got) in [("theta", d_theta.dim()), ("phi", d_phi.dim())] {
            if got != expected {
                return Err(EfficiencyError::ShapeMismatch {
                    what,
                    expected,
                    got,
                });
            }
        }

        let full_sphere = self.grid.covers_full_sphere();
        if !full_sphere {
            warn!(
                "The grid doesn't cover the full sphere; steering efficiencies will be under-counted"
            );
        }

        let weights = self.grid.solid_angle_weights();
        let p_theta = integrate(d_theta, weights.view());
        let p_phi = integrate(d_phi, weights.view());
        let to_percent = 100.0 / self.reference_solid_angle;
        Ok(SteeringEfficiency {
            theta: p_theta * to_percent,
            phi: p_phi * to_percent,
            total: (p_theta + p_phi) * to_percent,
            full_sphere,
        })
    }
}

/// `sum(values * weights)`
fn integrate(values: ArrayView2<f64>, weights: ArrayView2<f64>) -> f64 {
    Zip::from(&values)
        .and(&weights)
        .fold(0.0, |acc, &v, &w| acc + v * w)
}

/// The peak achieved directivity as a percentage of the best directivity an
/// aperture of this area could achieve (`4 pi A / lambda^2`).
pub fn steering_efficiency_product(
    peak_directivity: f64,
    aperture_area_m2: f64,
    wavelength_m: f64,
) -> Result<f64, GeometryError> {
    let max_directivity = max_aperture_directivity(aperture_area_m2, wavelength_m)?;
    Ok(100.0 * peak_directivity / max_directivity)
}
