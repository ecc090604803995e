// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps of achievable directivity: for every steering direction and every
//! phase quantisation, how much directivity the array realises towards the
//! direction it was steered to.

mod error;

pub use error::DirectivityError;

use log::debug;
use ndarray::prelude::*;
use rayon::prelude::*;

use crate::{
    c64,
    direction::AzEl,
    grid::AngularGrid,
    pattern::{ElementPatternSet, FarfieldPattern, PatternError},
    types::Component,
    weights::{PhaseWeightSynthesizer, Quantisation, WeightScheme},
};

/// Which directions of the grid to steer to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SteeringSelection {
    /// Every direction on the grid.
    #[default]
    FullGrid,

    /// Only these directions, each snapped to the closest grid direction.
    Directions(Vec<AzEl>),
}

/// The result of a directivity-mapping run.
///
/// The underlying array is indexed `[i_el, i_az, component, i_quantisation]`,
/// where `component` follows [`Component::index`]. Each value is the
/// directivity (linear, not dB) achieved *towards* `(i_el, i_az)` when the
/// array is steered there. Directions that weren't steered to hold zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectivityMap {
    data: Array4<f64>,
    quantisations: Vec<Quantisation>,
}

/// The largest directivity in a map slice and where it was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub directivity: f64,
    pub i_el: usize,
    pub i_az: usize,
}

impl DirectivityMap {
    /// Wrap an existing array as a [`DirectivityMap`]. The array must have
    /// the shape `(num_el, num_az, 3, quantisations.len())`.
    pub fn new(
        data: Array4<f64>,
        quantisations: Vec<Quantisation>,
    ) -> Result<DirectivityMap, DirectivityError> {
        let (_, _, num_components, num_q) = data.dim();
        if num_components != Component::ALL.len() || num_q != quantisations.len() {
            return Err(DirectivityError::MapShape {
                got: data.shape().to_vec(),
                num_quantisations: quantisations.len(),
            });
        }
        Ok(DirectivityMap {
            data,
            quantisations,
        })
    }

    pub fn view(&self) -> ArrayView4<f64> {
        self.data.view()
    }

    pub fn into_array(self) -> Array4<f64> {
        self.data
    }

    /// The quantisations along the last axis, in order.
    pub fn quantisations(&self) -> &[Quantisation] {
        &self.quantisations
    }

    /// Find where a quantisation is stored along the last axis.
    pub fn quantisation_index(&self, quantisation: Quantisation) -> Option<usize> {
        self.quantisations.iter().position(|&q| q == quantisation)
    }

    /// `(num_el, num_az)`
    pub fn grid_shape(&self) -> (usize, usize) {
        let (num_el, num_az, _, _) = self.data.dim();
        (num_el, num_az)
    }

    /// A 2D `(num_el, num_az)` slice of one component for one quantisation.
    pub fn slice(
        &self,
        component: Component,
        quantisation_index: usize,
    ) -> Option<ArrayView2<f64>> {
        if quantisation_index >= self.quantisations.len() {
            return None;
        }
        Some(self.data.slice(s![.., .., component.index(), quantisation_index]))
    }

    /// The largest total directivity for one quantisation.
    pub fn peak(&self, quantisation_index: usize) -> Option<Peak> {
        let slice = self.slice(Component::Total, quantisation_index)?;
        slice
            .indexed_iter()
            .fold(None, |best: Option<Peak>, ((i_el, i_az), &directivity)| match best {
                Some(b) if b.directivity >= directivity => Some(b),
                _ => Some(Peak {
                    directivity,
                    i_el,
                    i_az,
                }),
            })
    }
}

/// Builds [`DirectivityMap`]s from element patterns.
///
/// Every (steering direction, quantisation) pair is independent; pairs are
/// computed in parallel with rayon. The number of threads can be controlled by
/// setting `RAYON_NUM_THREADS`.
#[derive(Debug, Clone)]
pub struct DirectivityMapBuilder<'a> {
    grid: &'a AngularGrid,
    patterns: &'a ElementPatternSet,
    synthesiser: PhaseWeightSynthesizer<'a>,
    steering: SteeringSelection,
}

impl<'a> DirectivityMapBuilder<'a> {
    /// Create a new [`DirectivityMapBuilder`]. `positions` are the `(N, 3)`
    /// element positions \[metres\] matching the N element patterns, which
    /// must be defined on `grid`.
    pub fn new(
        grid: &'a AngularGrid,
        patterns: &'a ElementPatternSet,
        positions: ArrayView2<'a, f64>,
        wavelength_m: f64,
        scheme: WeightScheme,
    ) -> Result<DirectivityMapBuilder<'a>, DirectivityError> {
        let (num_el, num_az) = grid.shape();
        let (p_el, p_az) = patterns.grid_shape();
        if (p_el, p_az) != (num_el, num_az) {
            return Err(PatternError::ShapeMismatch {
                what: "element patterns",
                expected: vec![patterns.num_elements(), num_el, num_az],
                got: vec![patterns.num_elements(), p_el, p_az],
            }
            .into());
        }
        let synthesiser = PhaseWeightSynthesizer::new(positions, patterns, wavelength_m, scheme)?;
        Ok(DirectivityMapBuilder {
            grid,
            patterns,
            synthesiser,
            steering: SteeringSelection::FullGrid,
        })
    }

    /// Only steer to some directions.
    pub fn with_steering(mut self, steering: SteeringSelection) -> DirectivityMapBuilder<'a> {
        self.steering = steering;
        self
    }

    /// The phase weights used to steer to grid direction `(i_el, i_az)`.
    pub fn weights(
        &self,
        i_el: usize,
        i_az: usize,
        quantisation: Quantisation,
    ) -> Result<Array1<c64>, DirectivityError> {
        Ok(self
            .synthesiser
            .weights(self.grid, i_el, i_az, quantisation)?)
    }

    /// The full pattern realised by the array when steered to grid direction
    /// `(i_el, i_az)`.
    pub fn steer(
        &self,
        i_el: usize,
        i_az: usize,
        quantisation: Quantisation,
    ) -> Result<FarfieldPattern, DirectivityError> {
        let weights = self.weights(i_el, i_az, quantisation)?;
        Ok(self.patterns.combine(weights.view())?)
    }

    /// Steer to every selected direction for every quantisation and record
    /// the directivity achieved towards each.
    ///
    /// Every quantisation is checked before any work is done, so this either
    /// returns a complete map or an error.
    pub fn build(
        &self,
        quantisations: &[Quantisation],
    ) -> Result<DirectivityMap, DirectivityError> {
        if quantisations.is_empty() {
            return Err(DirectivityError::NoQuantisations);
        }
        for q in quantisations {
            q.validate()?;
        }

        let selected = self.selected();
        let num_selected = selected.iter().filter(|&&s| s).count();
        debug!(
            "Mapping directivity for {} elements over {} steering directions and {} quantisations ({:?} weights)",
            self.patterns.num_elements(),
            num_selected,
            quantisations.len(),
            self.synthesiser.scheme()
        );

        let solid_angle_weights = self.grid.solid_angle_weights();
        let (num_el, num_az) = self.grid.shape();
        let mut data = Array4::zeros((
            num_el,
            num_az,
            Component::ALL.len(),
            quantisations.len(),
        ));
        data.outer_iter_mut()
            .into_par_iter()
            .enumerate()
            .try_for_each(|(i_el, mut row)| {
                for (i_az, mut cell) in row.outer_iter_mut().enumerate() {
                    if !selected[[i_el, i_az]] {
                        continue;
                    }
                    for (i_q, &q) in quantisations.iter().enumerate() {
                        let pattern = self.steer(i_el, i_az, q)?;
                        let p_total = pattern.power_with_weights(solid_angle_weights.view());
                        if !p_total.is_finite() {
                            return Err(DirectivityError::NonFinitePower { i_el, i_az });
                        }
                        if p_total <= 0.0 {
                            debug!(
                                "Steering to ({i_el}, {i_az}) with {q} phases radiates no power"
                            );
                            continue;
                        }
                        let directivity = pattern.directivity_at(p_total, i_el, i_az);
                        cell.column_mut(i_q).assign(&ArrayView1::from(&directivity));
                    }
                }
                Ok::<(), DirectivityError>(())
            })?;

        Ok(DirectivityMap {
            data,
            quantisations: quantisations.to_vec(),
        })
    }

    /// Which grid directions will be steered to.
    fn selected(&self) -> Array2<bool> {
        match &self.steering {
            SteeringSelection::FullGrid => Array2::from_elem(self.grid.shape(), true),
            SteeringSelection::Directions(directions) => {
                let mut selected = Array2::from_elem(self.grid.shape(), false);
                for &direction in directions {
                    selected[self.grid.closest_index(direction)] = true;
                }
                selected
            }
        }
    }
}
