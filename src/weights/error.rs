// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with phase-weight synthesis.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightError {
    #[error("A phase quantisation depth of 0 bits was given; at least 1 bit is needed")]
    InvalidQuantisationDepth,

    #[error("Element positions must have 3 columns (got {0})")]
    PositionColumns(usize),

    #[error("Got {positions} element positions but {patterns} element patterns; these must match 1:1")]
    ElementCountMismatch { positions: usize, patterns: usize },

    #[error("The wavelength must be positive and finite (got {0} metres)")]
    InvalidWavelength(f64),

    #[error("Steering index ({i_el}, {i_az}) is outside of the {num_el}x{num_az} grid")]
    SteeringIndex {
        i_el: usize,
        i_az: usize,
        num_el: usize,
        num_az: usize,
    },
}
