// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plotting 2D angular maps.
//!
//! Plotting itself belongs to whoever consumes the maps; anything that can
//! draw a `(num_el, num_az)` array implements [`PatternRenderer`]. With the
//! `plot` feature, [`SvgHeatmap`] draws maps as SVG heatmaps with plotters.

use ndarray::prelude::*;
use thiserror::Error;

use crate::grid::AngularGrid;

/// Values at or below zero are clamped to this many dB when log scaling.
const DB_FLOOR: f64 = -300.0;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Can't render a {got:?} map on a {expected:?} grid")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Plotting backend error: {0}")]
    Backend(String),
}

/// How map values are scaled before they are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternScale {
    /// As is.
    Linear,
    /// `10 log10(x)`, for power-like quantities such as directivity (dBi).
    #[default]
    Power,
    /// `20 log10(x)`, for field amplitudes.
    Amplitude,
}

impl PatternScale {
    pub fn apply(self, value: f64) -> f64 {
        let db = |factor: f64| {
            if value > 0.0 {
                (factor * value.log10()).max(DB_FLOOR)
            } else {
                DB_FLOOR
            }
        };
        match self {
            PatternScale::Linear => value,
            PatternScale::Power => db(10.0),
            PatternScale::Amplitude => db(20.0),
        }
    }

    pub fn apply_map(self, values: ArrayView2<f64>) -> Array2<f64> {
        values.mapv(|v| self.apply(v))
    }
}

/// Linear directivity to dBi.
pub fn to_dbi(values: ArrayView2<f64>) -> Array2<f64> {
    PatternScale::Power.apply_map(values)
}

/// Something that can draw a `(num_el, num_az)` map defined on an
/// [`AngularGrid`].
pub trait PatternRenderer {
    fn render(
        &self,
        values: ArrayView2<f64>,
        grid: &AngularGrid,
        scale: PatternScale,
    ) -> Result<(), RenderError>;
}

pub(crate) fn check_map_shape(
    values: ArrayView2<f64>,
    grid: &AngularGrid,
) -> Result<(), RenderError> {
    if values.dim() != grid.shape() {
        return Err(RenderError::ShapeMismatch {
            expected: grid.shape(),
            got: values.dim(),
        });
    }
    Ok(())
}

#[cfg(feature = "plot")]
pub use svg::SvgHeatmap;

#[cfg(feature = "plot")]
mod svg {
    use std::path::PathBuf;

    use ndarray::prelude::*;
    use plotters::{drawing::DrawingAreaErrorKind, prelude::*};

    use super::{check_map_shape, PatternRenderer, PatternScale, RenderError};
    use crate::grid::AngularGrid;

    /// Draws maps as azimuth/elevation heatmaps into an SVG file.
    #[derive(Debug, Clone)]
    pub struct SvgHeatmap {
        path: PathBuf,
        size: (u32, u32),
        /// When log scaling, values more than this many dB below the peak
        /// share the lowest colour.
        dynamic_range_db: f64,
    }

    impl SvgHeatmap {
        pub fn new<P: Into<PathBuf>>(path: P) -> SvgHeatmap {
            SvgHeatmap {
                path: path.into(),
                size: (1024, 512),
                dynamic_range_db: 40.0,
            }
        }

        pub fn with_size(self, width: u32, height: u32) -> SvgHeatmap {
            SvgHeatmap {
                size: (width, height),
                ..self
            }
        }

        pub fn with_dynamic_range_db(self, dynamic_range_db: f64) -> SvgHeatmap {
            SvgHeatmap {
                dynamic_range_db,
                ..self
            }
        }
    }

    fn backend<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
        RenderError::Backend(e.to_string())
    }

    impl PatternRenderer for SvgHeatmap {
        fn render(
            &self,
            values: ArrayView2<f64>,
            grid: &AngularGrid,
            scale: PatternScale,
        ) -> Result<(), RenderError> {
            check_map_shape(values, grid)?;
            let scaled = scale.apply_map(values);
            let max = scaled.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
            let min = match scale {
                PatternScale::Linear => scaled.fold(f64::INFINITY, |m, &v| m.min(v)),
                _ => max - self.dynamic_range_db,
            };
            let span = (max - min).max(f64::EPSILON);

            let az = grid.azimuths_deg();
            let el = grid.elevations_deg();
            let half_az = 0.5 * grid.az_step_rad().to_degrees();
            let half_el = 0.5 * grid.el_step_rad().to_degrees();

            let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(backend)?;
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .build_cartesian_2d(
                    (az[0] - half_az)..(az[az.len() - 1] + half_az),
                    (el[0] - half_el)..(el[el.len() - 1] + half_el),
                )
                .map_err(backend)?;
            chart
                .draw_series(scaled.indexed_iter().map(|((i_el, i_az), &v)| {
                    let t = ((v - min) / span).clamp(0.0, 1.0);
                    // Blue (low) through to red (high).
                    let colour = HSLColor(0.66 * (1.0 - t), 0.9, 0.5);
                    Rectangle::new(
                        [
                            (az[i_az] - half_az, el[i_el] - half_el),
                            (az[i_az] + half_az, el[i_el] + half_el),
                        ],
                        colour.filled(),
                    )
                }))
                .map_err(backend)?;
            root.present().map_err(backend)?;
            Ok(())
        }
    }
}
