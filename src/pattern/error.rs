// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with far-field patterns.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error("The shape of {what} ({got:?}) doesn't match the expected shape {expected:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("{what} contains a NaN or infinite value at index {index:?}")]
    NonFinite {
        what: &'static str,
        index: Vec<usize>,
    },

    #[error("An element pattern set needs at least one element")]
    NoElements,

    #[error("Got {got} weights for {expected} elements")]
    WeightCount { expected: usize, got: usize },

    #[error("Got {got} excitations for {expected} source points")]
    ExcitationCount { expected: usize, got: usize },

    #[error("Element index {index} is out of range; there are {num_elements} elements")]
    ElementIndex { index: usize, num_elements: usize },
}
