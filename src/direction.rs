// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Directions in the array's local frame.
//!
//! Elevation is measured from the x-y plane towards +z, and azimuth is
//! measured in the x-y plane from +x towards +y. Every part of the crate that
//! turns an (azimuth, elevation) pair into a Cartesian direction goes through
//! [`spherical_to_cartesian`].

use std::f64::consts::FRAC_PI_2;

/// An (azimuth, elevation) pair, both in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AzEl {
    pub az: f64,
    pub el: f64,
}

impl AzEl {
    pub fn from_radians(az: f64, el: f64) -> AzEl {
        AzEl { az, el }
    }

    pub fn from_degrees(az_deg: f64, el_deg: f64) -> AzEl {
        AzEl {
            az: az_deg.to_radians(),
            el: el_deg.to_radians(),
        }
    }

    /// The polar angle (theta) of this direction, measured from +z.
    pub fn theta(self) -> f64 {
        FRAC_PI_2 - self.el
    }

    /// The unit vector pointing along this direction.
    pub fn to_unit_vector(self) -> [f64; 3] {
        spherical_to_cartesian(self.az, self.el)
    }
}

/// A trait that describes something that can be used as a look (or steering)
/// direction.
pub trait LookDirection: Copy {
    /// Get the azimuth of this direction \[radians\].
    fn get_az(&self) -> f64;
    /// Get the elevation of this direction \[radians\].
    fn get_el(&self) -> f64;
}

impl<D: LookDirection> LookDirection for &D {
    fn get_az(&self) -> f64 {
        (*self).get_az()
    }

    fn get_el(&self) -> f64 {
        (*self).get_el()
    }
}

impl LookDirection for AzEl {
    fn get_az(&self) -> f64 {
        self.az
    }

    fn get_el(&self) -> f64 {
        self.el
    }
}

/// We assume that a tuple of floats is (azimuth, elevation), both in radians.
impl LookDirection for (f64, f64) {
    fn get_az(&self) -> f64 {
        self.0
    }

    fn get_el(&self) -> f64 {
        self.1
    }
}

/// Convert an (azimuth, elevation) pair \[radians\] into a Cartesian unit
/// vector.
pub fn spherical_to_cartesian(az_rad: f64, el_rad: f64) -> [f64; 3] {
    let (s_az, c_az) = az_rad.sin_cos();
    let (s_el, c_el) = el_rad.sin_cos();
    [c_el * c_az, c_el * s_az, s_el]
}

/// The theta-hat and phi-hat unit vectors at a direction. Used to project
/// Cartesian field vectors onto the (Etheta, Ephi) basis.
pub(crate) fn theta_phi_unit_vectors(az_rad: f64, el_rad: f64) -> ([f64; 3], [f64; 3]) {
    let (s_az, c_az) = az_rad.sin_cos();
    let (s_el, c_el) = el_rad.sin_cos();
    // With theta = pi/2 - el, cos(theta) = sin(el) and sin(theta) = cos(el).
    let theta_hat = [s_el * c_az, s_el * s_az, -c_el];
    let phi_hat = [-s_az, c_az, 0.0];
    (theta_hat, phi_hat)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use approx::*;

    use super::*;
    use crate::types::dot;

    #[test]
    fn boresight_is_plus_x() {
        let v = spherical_to_cartesian(0.0, 0.0);
        assert_abs_diff_eq!(v[0], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v[1], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v[2], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn azimuth_rotates_towards_plus_y() {
        let v = AzEl::from_degrees(90.0, 0.0).to_unit_vector();
        assert_abs_diff_eq!(v[0], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v[1], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v[2], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn positive_elevation_is_plus_z() {
        let v = spherical_to_cartesian(1.234, FRAC_PI_2);
        assert_abs_diff_eq!(v[2], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v[0].hypot(v[1]), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn unit_vectors_are_orthonormal() {
        for (az, el) in [(0.3, 0.2), (-2.5, -1.1), (FRAC_PI_4, FRAC_PI_4)] {
            let r = spherical_to_cartesian(az, el);
            let (t, p) = theta_phi_unit_vectors(az, el);
            assert_abs_diff_eq!(dot(&r, &r), 1.0, epsilon = 1e-14);
            assert_abs_diff_eq!(dot(&t, &t), 1.0, epsilon = 1e-14);
            assert_abs_diff_eq!(dot(&p, &p), 1.0, epsilon = 1e-14);
            assert_abs_diff_eq!(dot(&r, &t), 0.0, epsilon = 1e-14);
            assert_abs_diff_eq!(dot(&r, &p), 0.0, epsilon = 1e-14);
            assert_abs_diff_eq!(dot(&t, &p), 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn tuples_and_azels_agree() {
        let azel = AzEl::from_radians(0.4, 0.7);
        let tuple = (0.4, 0.7);
        assert_eq!(azel.get_az(), tuple.get_az());
        assert_eq!(azel.get_el(), tuple.get_el());
        assert_abs_diff_eq!(azel.theta(), FRAC_PI_2 - 0.7);
    }
}
