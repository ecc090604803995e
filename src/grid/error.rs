// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with angular grids.

use thiserror::Error;

use super::GridAxis;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("The {axis} axis has {got} samples; at least 2 are needed to define a grid spacing")]
    Degenerate { axis: GridAxis, got: usize },

    #[error("The {axis} axis contains a non-finite value at index {index}")]
    NonFinite { axis: GridAxis, index: usize },

    #[error("The {axis} axis is not strictly increasing at index {index}")]
    NonMonotonic { axis: GridAxis, index: usize },

    #[error("The {axis} axis is not uniformly spaced (expected a step of {expected} degrees, got {got} at index {index})")]
    NonUniform {
        axis: GridAxis,
        index: usize,
        expected: f64,
        got: f64,
    },

    #[error("Elevation {0} degrees is outside of -90..=90")]
    ElevationOutOfRange(f64),
}
