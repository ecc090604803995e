// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Open-loop beamforming analysis for antenna arrays.

Given per-element far-field patterns on an azimuth/elevation grid, this crate
synthesises (optionally quantised) phase weights for every steering
direction, combines the elements into realised array patterns, maps the
directivity achieved towards each steering direction, and integrates those
maps into steering efficiencies.

```
use arraybeam::{
    config::FarfieldConfig,
    directivity::DirectivityMapBuilder,
    efficiency::SteeringEfficiencyEvaluator,
    geometry::Points,
    grid::AngularGrid,
    pattern::{Excitation, FarfieldSolver, PointSourceSolver},
    weights::{Quantisation, WeightScheme},
};
use ndarray::array;

let wavelength = 0.03;
let grid = AngularGrid::full_sphere(19, 19).unwrap();
let sources = Points::with_common_normal(
    array![[0.0, -wavelength / 4.0, 0.0], [0.0, wavelength / 4.0, 0.0]],
    [1.0, 0.0, 0.0],
)
.unwrap();
let excitations = [Excitation::unit([0.0, 0.0, 1.0]); 2];
let config = FarfieldConfig::new(wavelength, 20.0).unwrap();
let patterns = PointSourceSolver::new()
    .solve(&sources, &excitations, &grid, &config)
    .unwrap();

let builder = DirectivityMapBuilder::new(
    &grid,
    &patterns,
    sources.positions(),
    wavelength,
    WeightScheme::Wavefront,
)
.unwrap();
let map = builder
    .build(&[Quantisation::Bits(2), Quantisation::Bits(8)])
    .unwrap();
let efficiencies = SteeringEfficiencyEvaluator::new(&grid)
    .evaluate_all(&map)
    .unwrap();
assert_eq!(efficiencies.len(), 2);
```
 */

pub mod config;
mod constants;
mod direction;
pub mod directivity;
pub mod efficiency;
pub mod errors;
pub mod geometry;
pub mod grid;
pub mod pattern;
pub mod plot;
pub(crate) mod types;
pub mod weights;

pub use constants::{DEFAULT_QUANTISATION_BITS, FULL_SPHERE_SR, VEL_C};
pub use direction::{spherical_to_cartesian, AzEl, LookDirection};
pub use errors::ArrayBeamError;
pub use types::Component;

// Re-exports.
pub use ndarray;
pub use num_complex::Complex64 as c64;
