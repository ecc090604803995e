// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generic types.

/// The directivity components held by a
/// [`DirectivityMap`](crate::directivity::DirectivityMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Directivity of the theta-polarised field.
    Theta,
    /// Directivity of the phi-polarised field.
    Phi,
    /// Total directivity (theta + phi).
    Total,
}

impl Component {
    /// All components in the order they are stored.
    pub const ALL: [Component; 3] = [Component::Theta, Component::Phi, Component::Total];

    /// The index of this component along a map's component axis.
    pub fn index(self) -> usize {
        match self {
            Component::Theta => 0,
            Component::Phi => 1,
            Component::Total => 2,
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Component::Theta => "theta",
                Component::Phi => "phi",
                Component::Total => "total",
            }
        )
    }
}

pub(crate) fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
