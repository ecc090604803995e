// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with all aspects of arraybeam.
 */

use thiserror::Error;

use crate::{
    config::ConfigError, directivity::DirectivityError, efficiency::EfficiencyError,
    geometry::GeometryError, grid::GridError, pattern::PatternError, plot::RenderError,
    weights::WeightError,
};

/// Any error this crate can produce. Every module's own error converts into
/// this, so callers running a whole pipeline can use `?` throughout.
#[derive(Error, Debug)]
pub enum ArrayBeamError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Weights(#[from] WeightError),

    #[error(transparent)]
    Directivity(#[from] DirectivityError),

    #[error(transparent)]
    Efficiency(#[from] EfficiencyError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
