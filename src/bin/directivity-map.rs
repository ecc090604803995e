// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! This program maps the directivity of a planar array of point sources over
//! every steering direction and phase quantisation given in a TOML config,
//! then prints the steering efficiency and peak directivity of each
//! quantisation.
//!
//! The config is a [`BeamformingConfig`] plus an `[array]` table:
//!
//! ```toml
//! wavelength_m = 0.03
//! quantisation_bits = [1, 2, 3, 4]
//!
//! [array]
//! rows = 4
//! cols = 4
//! spacing_wavelengths = 0.5
//! ```
//!
//! Set `RUST_LOG=debug` for progress messages. With the `plot` feature, a
//! second argument names an SVG file to draw the first quantisation's map
//! into.

use log::info;
use ndarray::Array2;
use serde::Deserialize;

use arraybeam::{
    config::BeamformingConfig,
    directivity::DirectivityMapBuilder,
    efficiency::{steering_efficiency_product, SteeringEfficiencyEvaluator},
    geometry::Points,
    pattern::{Excitation, FarfieldSolver, PointSourceSolver},
    ArrayBeamError, Component,
};

#[derive(Debug, Deserialize)]
struct DemoConfig {
    #[serde(flatten)]
    beamforming: BeamformingConfig,

    #[serde(default)]
    array: ArrayConfig,
}

/// A rectangular array in the y-z plane, facing +x.
#[derive(Debug, Deserialize)]
struct ArrayConfig {
    rows: usize,
    cols: usize,
    spacing_wavelengths: f64,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        ArrayConfig {
            rows: 4,
            cols: 4,
            spacing_wavelengths: 0.5,
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(config_file) = args.next() else {
        eprintln!("Usage: directivity-map <config.toml> [map.svg]");
        std::process::exit(1);
    };
    let svg_file = args.next();

    if let Err(e) = run(&config_file, svg_file.as_deref()) {
        eprintln!("directivity-map failed: {e}");
        std::process::exit(1);
    }
}

fn run(config_file: &str, svg_file: Option<&str>) -> Result<(), ArrayBeamError> {
    let DemoConfig { beamforming, array } = read_config(config_file)?;
    beamforming.validate()?;

    let wavelength = beamforming.wavelength_m;
    let spacing = array.spacing_wavelengths * wavelength;
    let positions = Array2::from_shape_fn((array.rows * array.cols, 3), |(i, j)| match j {
        1 => (i % array.cols) as f64 * spacing,
        2 => (i / array.cols) as f64 * spacing,
        _ => 0.0,
    });
    let sources = Points::with_common_normal(positions, [1.0, 0.0, 0.0])?;
    info!(
        "{}x{} array ({} elements), electrical size ka = {:.2}",
        array.rows,
        array.cols,
        sources.len(),
        sources.electrical_size(wavelength)?
    );

    let grid = beamforming.grid()?;
    let excitations = vec![Excitation::unit([0.0, 0.0, 1.0]); sources.len()];
    let patterns = PointSourceSolver::new().front_hemisphere_only().solve(
        &sources,
        &excitations,
        &grid,
        &beamforming.farfield()?,
    )?;

    let quantisations = beamforming.quantisations()?;
    let map = DirectivityMapBuilder::new(
        &grid,
        &patterns,
        sources.positions(),
        wavelength,
        beamforming.weight_scheme,
    )?
    .with_steering(beamforming.steering_selection())
    .build(&quantisations)?;

    let evaluator = SteeringEfficiencyEvaluator::new(&grid)
        .with_reference_solid_angle(beamforming.reference_solid_angle)?;
    let aperture_area = (array.rows * array.cols) as f64 * spacing * spacing;
    println!("quantisation  theta (%)  phi (%)  total (%)  peak (dBi)  peak/aperture (%)");
    for (i_q, (q, efficiency)) in quantisations
        .iter()
        .zip(evaluator.evaluate_all(&map)?)
        .enumerate()
    {
        let peak = map.peak(i_q).map(|p| p.directivity).unwrap_or(0.0);
        println!(
            "{:>12}  {:>9.2}  {:>7.2}  {:>9.2}  {:>10.2}  {:>17.2}",
            q.to_string(),
            efficiency.theta,
            efficiency.phi,
            efficiency.total,
            arraybeam::plot::PatternScale::Power.apply(peak),
            steering_efficiency_product(peak, aperture_area, wavelength)?
        );
    }

    if let Some(svg_file) = svg_file {
        render(&map, &grid, svg_file)?;
    }
    Ok(())
}

fn read_config(config_file: &str) -> Result<DemoConfig, ArrayBeamError> {
    let contents = std::fs::read_to_string(config_file).map_err(|source| {
        arraybeam::config::ConfigError::Io {
            path: config_file.into(),
            source,
        }
    })?;
    let config = toml::from_str(&contents).map_err(arraybeam::config::ConfigError::from)?;
    Ok(config)
}

#[cfg(feature = "plot")]
fn render(
    map: &arraybeam::directivity::DirectivityMap,
    grid: &arraybeam::grid::AngularGrid,
    svg_file: &str,
) -> Result<(), ArrayBeamError> {
    use arraybeam::plot::{PatternRenderer, PatternScale, SvgHeatmap};

    if let Some(total) = map.slice(Component::Total, 0) {
        info!("Drawing the {} map into {svg_file}", map.quantisations()[0]);
        SvgHeatmap::new(svg_file).render(total, grid, PatternScale::Power)?;
    }
    Ok(())
}

#[cfg(not(feature = "plot"))]
fn render(
    map: &arraybeam::directivity::DirectivityMap,
    _grid: &arraybeam::grid::AngularGrid,
    svg_file: &str,
) -> Result<(), ArrayBeamError> {
    // Without plotting, summarise the map in dBi instead.
    if let Some(total) = map.slice(Component::Total, 0) {
        let dbi = arraybeam::plot::to_dbi(total);
        let max = dbi.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        log::warn!(
            "Not drawing {svg_file}; arraybeam was built without the 'plot' feature (peak {max:.2} dBi)"
        );
    }
    Ok(())
}
