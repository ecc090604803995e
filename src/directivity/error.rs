// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with directivity mapping.

use thiserror::Error;

use crate::{pattern::PatternError, weights::WeightError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectivityError {
    #[error("No quantisations were given; there's nothing to map")]
    NoQuantisations,

    #[error("A directivity map must have the shape (num_el, num_az, 3, num_quantisations); got {got:?} for {num_quantisations} quantisations")]
    MapShape {
        got: Vec<usize>,
        num_quantisations: usize,
    },

    #[error("The pattern steered to ({i_el}, {i_az}) has a non-finite total power")]
    NonFinitePower { i_el: usize, i_az: usize },

    #[error(transparent)]
    Weights(#[from] WeightError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}
