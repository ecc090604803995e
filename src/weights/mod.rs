// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Open-loop phase weights for steering an array, optionally quantised to
//! the resolution of real phase shifters.

mod error;

pub use error::WeightError;

use std::f64::consts::TAU;

use ndarray::prelude::*;
use serde::Deserialize;

use crate::{
    c64,
    constants::MAX_EFFECTIVE_BITS,
    direction::{spherical_to_cartesian, LookDirection},
    grid::AngularGrid,
    pattern::ElementPatternSet,
};

/// The phase resolution of the array's phase shifters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantisation {
    /// Ideal phase shifters with unlimited resolution.
    Continuous,
    /// Phase shifters with this many bits, i.e. `2^bits` phase states
    /// spread uniformly over `[0, 2 pi)`. Must be at least 1.
    Bits(u32),
}

impl Quantisation {
    /// Create a new [`Quantisation::Bits`], rejecting 0 bits.
    pub fn bits(bits: u32) -> Result<Quantisation, WeightError> {
        if bits == 0 {
            return Err(WeightError::InvalidQuantisationDepth);
        }
        Ok(Quantisation::Bits(bits))
    }

    /// Check that this quantisation is usable.
    pub fn validate(self) -> Result<Quantisation, WeightError> {
        match self {
            Quantisation::Bits(0) => Err(WeightError::InvalidQuantisationDepth),
            q => Ok(q),
        }
    }

    /// The number of discrete phase states, or `None` if continuous.
    pub fn num_states(self) -> Option<f64> {
        match self {
            Quantisation::Continuous => None,
            Quantisation::Bits(bits) => Some(2.0_f64.powi(bits.min(MAX_EFFECTIVE_BITS) as i32)),
        }
    }
}

impl std::fmt::Display for Quantisation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantisation::Continuous => write!(f, "continuous"),
            Quantisation::Bits(bits) => write!(f, "{bits}-bit"),
        }
    }
}

/// How phase weights are chosen for a steering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    /// Cancel the geometric delay of a plane wave from the steering
    /// direction across the element positions.
    #[default]
    Wavefront,

    /// Equal gain combining: cancel the phase of each element's own
    /// far-field pattern at the steering direction, using whichever
    /// polarisation is stronger for that element.
    EqualGain,
}

/// Round a phase \[radians\] to the nearest available phase state. The result
/// is in `[0, 2 pi)` for quantised phases; continuous phases are returned
/// unchanged.
pub fn quantise_phase(phase: f64, quantisation: Quantisation) -> Result<f64, WeightError> {
    let num_states = match quantisation.validate()?.num_states() {
        None => return Ok(phase),
        Some(n) => n,
    };
    let step = TAU / num_states;
    let state = (phase.rem_euclid(TAU) / step).round();
    // Rounding up to the 2^bits state wraps back to 0.
    if state >= num_states {
        Ok(0.0)
    } else {
        Ok(state * step)
    }
}

/// The ideal (continuous) phase of each element when steering towards
/// `direction`: `-(2 pi / lambda) (p_i . u)`.
///
/// `positions` must have the shape `(N, 3)` \[metres\].
pub fn ideal_phases<D: LookDirection>(
    positions: ArrayView2<f64>,
    direction: D,
    wavelength_m: f64,
) -> Result<Array1<f64>, WeightError> {
    check_positions(positions)?;
    check_wavelength(wavelength_m)?;
    let u = spherical_to_cartesian(direction.get_az(), direction.get_el());
    let u = ArrayView1::from(&u);
    let multiplier = -TAU / wavelength_m;
    Ok(positions.dot(&u) * multiplier)
}

/// Unit-magnitude weights steering towards `direction`, quantised as
/// requested.
pub fn wavefront_weights<D: LookDirection>(
    positions: ArrayView2<f64>,
    direction: D,
    wavelength_m: f64,
    quantisation: Quantisation,
) -> Result<Array1<c64>, WeightError> {
    let phases = ideal_phases(positions, direction, wavelength_m)?;
    phases_to_weights(phases.view(), quantisation)
}

/// Equal-gain-combining weights for the grid direction `(i_el, i_az)`. Each
/// weight cancels the phase of its element's dominant polarisation there.
/// Elements with no field at that direction get a phase of zero.
pub fn egc_weights(
    patterns: &ElementPatternSet,
    i_el: usize,
    i_az: usize,
    quantisation: Quantisation,
) -> Result<Array1<c64>, WeightError> {
    let (num_el, num_az) = patterns.grid_shape();
    if i_el >= num_el || i_az >= num_az {
        return Err(WeightError::SteeringIndex {
            i_el,
            i_az,
            num_el,
            num_az,
        });
    }
    let (e_theta, e_phi) = patterns.samples_at(i_el, i_az);
    let phases: Array1<f64> = e_theta
        .iter()
        .zip(e_phi.iter())
        .map(|(t, p)| {
            let dominant = if t.norm_sqr() >= p.norm_sqr() { t } else { p };
            if dominant.norm_sqr() > 0.0 {
                -dominant.arg()
            } else {
                0.0
            }
        })
        .collect();
    phases_to_weights(phases.view(), quantisation)
}

fn phases_to_weights(
    phases: ArrayView1<f64>,
    quantisation: Quantisation,
) -> Result<Array1<c64>, WeightError> {
    let quantisation = quantisation.validate()?;
    phases
        .iter()
        .map(|&phase| quantise_phase(phase, quantisation).map(c64::cis))
        .collect()
}

/// Produces phase weights for an array, for any steering direction on a grid
/// and any quantisation.
///
/// The synthesiser only borrows its inputs, so one can be shared between
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct PhaseWeightSynthesizer<'a> {
    positions: ArrayView2<'a, f64>,
    patterns: &'a ElementPatternSet,
    wavelength_m: f64,
    scheme: WeightScheme,
}

impl<'a> PhaseWeightSynthesizer<'a> {
    /// Create a new [`PhaseWeightSynthesizer`]. `positions` must be `(N, 3)`
    /// with N matching the number of element patterns.
    pub fn new(
        positions: ArrayView2<'a, f64>,
        patterns: &'a ElementPatternSet,
        wavelength_m: f64,
        scheme: WeightScheme,
    ) -> Result<PhaseWeightSynthesizer<'a>, WeightError> {
        check_positions(positions)?;
        check_wavelength(wavelength_m)?;
        if positions.nrows() != patterns.num_elements() {
            return Err(WeightError::ElementCountMismatch {
                positions: positions.nrows(),
                patterns: patterns.num_elements(),
            });
        }
        Ok(PhaseWeightSynthesizer {
            positions,
            patterns,
            wavelength_m,
            scheme,
        })
    }

    pub fn scheme(&self) -> WeightScheme {
        self.scheme
    }

    pub fn num_elements(&self) -> usize {
        self.positions.nrows()
    }

    /// Weights steering towards the grid direction `(i_el, i_az)`.
    pub fn weights(
        &self,
        grid: &AngularGrid,
        i_el: usize,
        i_az: usize,
        quantisation: Quantisation,
    ) -> Result<Array1<c64>, WeightError> {
        let (num_el, num_az) = grid.shape();
        if i_el >= num_el || i_az >= num_az {
            return Err(WeightError::SteeringIndex {
                i_el,
                i_az,
                num_el,
                num_az,
            });
        }
        match self.scheme {
            WeightScheme::Wavefront => wavefront_weights(
                self.positions,
                grid.direction(i_el, i_az),
                self.wavelength_m,
                quantisation,
            ),
            WeightScheme::EqualGain => egc_weights(self.patterns, i_el, i_az, quantisation),
        }
    }
}

fn check_positions(positions: ArrayView2<f64>) -> Result<(), WeightError> {
    if positions.ncols() != 3 {
        return Err(WeightError::PositionColumns(positions.ncols()));
    }
    Ok(())
}

fn check_wavelength(wavelength_m: f64) -> Result<(), WeightError> {
    if wavelength_m > 0.0 && wavelength_m.is_finite() {
        Ok(())
    } else {
        Err(WeightError::InvalidWavelength(wavelength_m))
    }
}
