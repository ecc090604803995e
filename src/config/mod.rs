// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Configuration: the immutable [`FarfieldConfig`] handed to far-field
//! solvers, and [`BeamformingConfig`], which describes a whole analysis run
//! and can be read from TOML.
//!
//! ```toml
//! wavelength_m = 0.03
//! farfield_distance_m = 20.0
//! quantisation_bits = [2, 4, 6, 8]
//! weight_scheme = "wavefront"
//!
//! [grid]
//! num_az = 37
//! num_el = 37
//! ```

mod error;

pub use error::ConfigError;

use std::path::Path;

use serde::Deserialize;

use crate::{
    constants::{DEFAULT_QUANTISATION_BITS, FULL_SPHERE_SR, VEL_C},
    direction::AzEl,
    directivity::SteeringSelection,
    grid::AngularGrid,
    weights::{Quantisation, WeightScheme},
};

/// Settings for a far-field solve. Cheap to copy; pass it by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarfieldConfig {
    wavelength_m: f64,
    farfield_distance_m: f64,
    project_vectors: bool,
    elements_mode: bool,
}

impl FarfieldConfig {
    /// Create a new [`FarfieldConfig`]. By default, source excitations are
    /// not projected onto the far-field basis and one pattern is produced per
    /// element.
    pub fn new(wavelength_m: f64, farfield_distance_m: f64) -> Result<FarfieldConfig, ConfigError> {
        if !(wavelength_m > 0.0 && wavelength_m.is_finite()) {
            return Err(ConfigError::InvalidWavelength(wavelength_m));
        }
        if !(farfield_distance_m > 0.0 && farfield_distance_m.is_finite()) {
            return Err(ConfigError::InvalidFarfieldDistance(farfield_distance_m));
        }
        Ok(FarfieldConfig {
            wavelength_m,
            farfield_distance_m,
            project_vectors: false,
            elements_mode: true,
        })
    }

    /// Create a new [`FarfieldConfig`] from a frequency \[Hz\] rather than a
    /// wavelength.
    pub fn from_frequency(
        freq_hz: f64,
        farfield_distance_m: f64,
    ) -> Result<FarfieldConfig, ConfigError> {
        FarfieldConfig::new(VEL_C / freq_hz, farfield_distance_m)
    }

    pub fn with_project_vectors(self, project_vectors: bool) -> FarfieldConfig {
        FarfieldConfig {
            project_vectors,
            ..self
        }
    }

    pub fn with_elements_mode(self, elements_mode: bool) -> FarfieldConfig {
        FarfieldConfig {
            elements_mode,
            ..self
        }
    }

    /// The wavelength of interest \[metres\].
    pub fn wavelength_m(&self) -> f64 {
        self.wavelength_m
    }

    /// The distance at which far fields are evaluated \[metres\].
    pub fn farfield_distance_m(&self) -> f64 {
        self.farfield_distance_m
    }

    /// Should source currents be projected onto the theta/phi basis?
    pub fn project_vectors(&self) -> bool {
        self.project_vectors
    }

    /// Should a pattern be produced per element (rather than one combined
    /// pattern)?
    pub fn elements_mode(&self) -> bool {
        self.elements_mode
    }
}

/// Everything needed for a directivity-mapping run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BeamformingConfig {
    /// \[metres\]
    pub wavelength_m: f64,

    /// \[metres\]
    #[serde(default = "default_farfield_distance")]
    pub farfield_distance_m: f64,

    #[serde(default)]
    pub project_vectors: bool,

    #[serde(default = "default_true")]
    pub elements_mode: bool,

    /// Phase-shifter bit depths to evaluate. `quantization_bits` is also
    /// accepted.
    #[serde(default = "default_quantisation_bits", alias = "quantization_bits")]
    pub quantisation_bits: Vec<u32>,

    /// Also evaluate ideal, unquantised phases (after all of the bit depths).
    #[serde(default)]
    pub include_continuous: bool,

    #[serde(default)]
    pub weight_scheme: WeightScheme,

    /// \[steradians\]
    #[serde(default = "default_reference_solid_angle")]
    pub reference_solid_angle: f64,

    /// Steering directions as `[azimuth, elevation]` pairs \[degrees\]. Each
    /// is snapped to the closest grid direction. If absent, every grid
    /// direction is steered to.
    #[serde(default)]
    pub steering: Option<Vec<[f64; 2]>>,

    #[serde(default)]
    pub grid: GridConfig,
}

/// The angular grid, given as inclusive ranges \[degrees\].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_num_points")]
    pub num_az: usize,

    #[serde(default = "default_num_points")]
    pub num_el: usize,

    #[serde(default = "default_az_range")]
    pub az_range_deg: [f64; 2],

    #[serde(default = "default_el_range")]
    pub el_range_deg: [f64; 2],
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            num_az: default_num_points(),
            num_el: default_num_points(),
            az_range_deg: default_az_range(),
            el_range_deg: default_el_range(),
        }
    }
}

fn default_farfield_distance() -> f64 {
    20.0
}

fn default_true() -> bool {
    true
}

fn default_quantisation_bits() -> Vec<u32> {
    DEFAULT_QUANTISATION_BITS.to_vec()
}

fn default_reference_solid_angle() -> f64 {
    FULL_SPHERE_SR
}

fn default_num_points() -> usize {
    37
}

fn default_az_range() -> [f64; 2] {
    [-180.0, 180.0]
}

fn default_el_range() -> [f64; 2] {
    [-90.0, 90.0]
}

impl BeamformingConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml_str(s: &str) -> Result<BeamformingConfig, ConfigError> {
        let config: BeamformingConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<BeamformingConfig, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        BeamformingConfig::from_toml_str(&contents)
    }

    /// Check every setting, so that nothing fails half-way through a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.farfield()?;
        self.quantisations()?;
        self.grid()?;
        if !(self.reference_solid_angle > 0.0 && self.reference_solid_angle.is_finite()) {
            return Err(ConfigError::InvalidReferenceSolidAngle(self.reference_solid_angle));
        }
        Ok(())
    }

    pub fn farfield(&self) -> Result<FarfieldConfig, ConfigError> {
        let farfield = FarfieldConfig::new(self.wavelength_m, self.farfield_distance_m)?
            .with_project_vectors(self.project_vectors)
            .with_elements_mode(self.elements_mode);
        Ok(farfield)
    }

    /// The quantisations to evaluate, in map order: the bit depths as given,
    /// then continuous phases if requested.
    pub fn quantisations(&self) -> Result<Vec<Quantisation>, ConfigError> {
        let mut quantisations = self
            .quantisation_bits
            .iter()
            .map(|&bits| Quantisation::bits(bits))
            .collect::<Result<Vec<_>, _>>()?;
        if self.include_continuous {
            quantisations.push(Quantisation::Continuous);
        }
        if quantisations.is_empty() {
            return Err(ConfigError::NoQuantisations);
        }
        Ok(quantisations)
    }

    pub fn grid(&self) -> Result<AngularGrid, ConfigError> {
        let g = &self.grid;
        Ok(AngularGrid::linspace(
            (g.az_range_deg[0], g.az_range_deg[1]),
            g.num_az,
            (g.el_range_deg[0], g.el_range_deg[1]),
            g.num_el,
        )?)
    }

    pub fn steering_selection(&self) -> SteeringSelection {
        match &self.steering {
            None => SteeringSelection::FullGrid,
            Some(directions) => SteeringSelection::Directions(
                directions
                    .iter()
                    .map(|&[az, el]| AzEl::from_degrees(az, el))
                    .collect(),
            ),
        }
    }
}
