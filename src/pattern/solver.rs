// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The boundary between beamforming analysis and far-field solvers.
//!
//! Real solvers (ray-traced occlusion, physical optics, ...) live outside
//! this crate and only need to implement [`FarfieldSolver`]. The
//! [`PointSourceSolver`] here models free-space point sources, which is
//! enough for analysing idealised arrays.

use std::f64::consts::TAU;

use log::{debug, warn};
use ndarray::prelude::*;
use rayon::prelude::*;

use super::{ElementPatternSet, PatternError};
use crate::{
    c64, config::FarfieldConfig, direction::theta_phi_unit_vectors, geometry::Points,
    grid::AngularGrid, types::dot,
};

/// The excitation of a single source point: a complex amplitude and the
/// direction of the current it drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Excitation {
    pub amplitude: c64,
    pub polarisation: [f64; 3],
}

impl Excitation {
    pub fn new(amplitude: c64, polarisation: [f64; 3]) -> Excitation {
        Excitation {
            amplitude,
            polarisation,
        }
    }

    /// A unit-amplitude, zero-phase excitation.
    pub fn unit(polarisation: [f64; 3]) -> Excitation {
        Excitation::new(c64::new(1.0, 0.0), polarisation)
    }
}

/// Something that can turn source points and their excitations into
/// far-field patterns on an [`AngularGrid`].
///
/// When `config.elements_mode()` is true, implementors return one pattern
/// per source point; otherwise a single combined pattern.
pub trait FarfieldSolver {
    fn solve(
        &self,
        sources: &Points,
        excitations: &[Excitation],
        grid: &AngularGrid,
        config: &FarfieldConfig,
    ) -> Result<ElementPatternSet, PatternError>;
}

/// Free-space point sources without any occlusion.
///
/// Source `i` at position `p_i` contributes `a_i exp(j k p_i . u)` in
/// direction `u`. With `project_vectors` set, that field is projected onto
/// the theta-hat and phi-hat unit vectors via the excitation's polarisation;
/// otherwise the source is an isotropic scalar radiator in Etheta.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointSourceSolver {
    front_hemisphere_only: bool,
}

impl PointSourceSolver {
    pub fn new() -> PointSourceSolver {
        PointSourceSolver::default()
    }

    /// Only radiate into the half-space that each point's normal faces. This
    /// is a crude stand-in for a ground plane behind each element.
    pub fn front_hemisphere_only(mut self) -> PointSourceSolver {
        self.front_hemisphere_only = true;
        self
    }
}

impl FarfieldSolver for PointSourceSolver {
    fn solve(
        &self,
        sources: &Points,
        excitations: &[Excitation],
        grid: &AngularGrid,
        config: &FarfieldConfig,
    ) -> Result<ElementPatternSet, PatternError> {
        if sources.is_empty() {
            return Err(PatternError::NoElements);
        }
        if excitations.len() != sources.len() {
            return Err(PatternError::ExcitationCount {
                expected: sources.len(),
                got: excitations.len(),
            });
        }
        if let Some(i) = excitations.iter().position(|e| {
            !e.amplitude.is_finite() || e.polarisation.iter().any(|p| !p.is_finite())
        }) {
            return Err(PatternError::NonFinite {
                what: "excitations",
                index: vec![i],
            });
        }

        let wavelength_m = config.wavelength_m();
        if let Ok(fraunhofer) = sources.fraunhofer_distance(wavelength_m) {
            if config.farfield_distance_m() < fraunhofer {
                warn!(
                    "Far-field distance {} m is inside the Fraunhofer distance {} m of the sources; patterns may be inaccurate",
                    config.farfield_distance_m(),
                    fraunhofer
                );
            }
        }
        debug!(
            "Solving point-source patterns for {} sources over {} directions",
            sources.len(),
            grid.len()
        );

        // Direction-dependent quantities are shared by every source.
        let bases: Vec<([f64; 3], [f64; 3], [f64; 3])> = grid
            .directions()
            .map(|(_, azel)| {
                let (theta_hat, phi_hat) = theta_phi_unit_vectors(azel.az, azel.el);
                (azel.to_unit_vector(), theta_hat, phi_hat)
            })
            .collect();

        let k = TAU / wavelength_m;
        let (num_el, num_az) = grid.shape();
        let mut e_theta = Array3::zeros((sources.len(), num_el, num_az));
        let mut e_phi = Array3::zeros((sources.len(), num_el, num_az));
        e_theta
            .outer_iter_mut()
            .into_par_iter()
            .zip(e_phi.outer_iter_mut().into_par_iter())
            .zip(excitations.par_iter())
            .enumerate()
            .for_each(|(i, ((mut theta_i, mut phi_i), excitation))| {
                let p = sources.positions();
                let n = sources.normals();
                let position = [p[[i, 0]], p[[i, 1]], p[[i, 2]]];
                let normal = [n[[i, 0]], n[[i, 1]], n[[i, 2]]];

                for ((theta, phi), (r_hat, theta_hat, phi_hat)) in theta_i
                    .iter_mut()
                    .zip(phi_i.iter_mut())
                    .zip(bases.iter())
                {
                    if self.front_hemisphere_only && dot(r_hat, &normal) < 0.0 {
                        continue;
                    }
                    let field = excitation.amplitude * c64::cis(k * dot(&position, r_hat));
                    if config.project_vectors() {
                        *theta = field * dot(&excitation.polarisation, theta_hat);
                        *phi = field * dot(&excitation.polarisation, phi_hat);
                    } else {
                        *theta = field;
                    }
                }
            });

        let set = ElementPatternSet { e_theta, e_phi };
        if config.elements_mode() {
            Ok(set)
        } else {
            Ok(set.collapse())
        }
    }
}
