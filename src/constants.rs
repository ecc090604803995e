// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.
 */

use std::f64::consts::PI;

/// Speed of light in a vacuum \[metres/second\].
pub const VEL_C: f64 = 299_792_458.0;

/// The solid angle subtended by a full sphere \[steradians\]. This is the
/// reference solid angle of an isotropic radiator.
pub const FULL_SPHERE_SR: f64 = 4.0 * PI;

/// Phase-shifter bit depths evaluated when none are specified.
pub const DEFAULT_QUANTISATION_BITS: [u32; 4] = [2, 4, 6, 8];

/// Relative tolerance used when checking that grid spacing is uniform.
pub(crate) const GRID_SPACING_TOL: f64 = 1e-6;

/// Absolute tolerance used when checking that normals have unit length.
pub(crate) const UNIT_NORMAL_TOL: f64 = 1e-6;

/// Beyond this many bits, the phase states are finer than the precision of an
/// `f64` phase, so quantisation does nothing.
pub(crate) const MAX_EFFECTIVE_BITS: u32 = 52;
