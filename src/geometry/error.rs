// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with array geometry.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Expected {what} to have 3 columns, but it has {got}")]
    NotThreeColumns { what: &'static str, got: usize },

    #[error("Got {positions} positions but {normals} normals; these must match 1:1")]
    CountMismatch { positions: usize, normals: usize },

    #[error("The {what} at row {index} contains a NaN or infinite value")]
    NonFinite { what: &'static str, index: usize },

    #[error("The normal at row {index} has length {length}, but normals must be unit length")]
    NonUnitNormal { index: usize, length: f64 },

    #[error("Triangle {triangle} refers to vertex {vertex}, but there are only {num_vertices} vertices")]
    VertexIndexOutOfBounds {
        triangle: usize,
        vertex: usize,
        num_vertices: usize,
    },

    #[error("The wavelength must be positive and finite (got {0} metres)")]
    InvalidWavelength(f64),
}
