// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::{grid::GridError, weights::WeightError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Couldn't parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("The wavelength must be positive and finite (got {0} metres)")]
    InvalidWavelength(f64),

    #[error("The far-field distance must be positive and finite (got {0} metres)")]
    InvalidFarfieldDistance(f64),

    #[error("The reference solid angle must be positive and finite (got {0} steradians)")]
    InvalidReferenceSolidAngle(f64),

    #[error("No quantisation depths were given and continuous phases weren't requested; there's nothing to do")]
    NoQuantisations,

    #[error(transparent)]
    Quantisation(#[from] WeightError),

    #[error("Bad grid: {0}")]
    Grid(#[from] GridError),
}
