// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Minimal owned geometry: antenna element locations with their normals, and
//! triangle meshes for aperture bookkeeping.
//!
//! Mesh generation and loading happen elsewhere; these types only hold and
//! validate what they are given.

mod error;

pub use error::GeometryError;

use std::f64::consts::{PI, TAU};

use ndarray::prelude::*;

use crate::constants::UNIT_NORMAL_TOL;

/// A set of 3D points and their unit normals \[metres\]. Each row of the
/// arrays is one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Points {
    positions: Array2<f64>,
    normals: Array2<f64>,
}

impl Points {
    /// Create a new [`Points`]. Both arrays must be `(N, 3)`, finite, and
    /// every normal must be unit length.
    pub fn new(positions: Array2<f64>, normals: Array2<f64>) -> Result<Points, GeometryError> {
        check_three_columns(positions.view(), "positions")?;
        check_three_columns(normals.view(), "normals")?;
        if positions.nrows() != normals.nrows() {
            return Err(GeometryError::CountMismatch {
                positions: positions.nrows(),
                normals: normals.nrows(),
            });
        }
        check_finite(positions.view(), "position")?;
        check_finite(normals.view(), "normal")?;
        for (index, normal) in normals.outer_iter().enumerate() {
            let length = normal.dot(&normal).sqrt();
            if (length - 1.0).abs() > UNIT_NORMAL_TOL {
                return Err(GeometryError::NonUnitNormal { index, length });
            }
        }

        Ok(Points { positions, normals })
    }

    /// Create a new [`Points`] where every point shares the same normal.
    /// The normal is normalised here.
    pub fn with_common_normal(
        positions: Array2<f64>,
        normal: [f64; 3],
    ) -> Result<Points, GeometryError> {
        let length = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        if !length.is_finite() || length == 0.0 {
            return Err(GeometryError::NonUnitNormal { index: 0, length });
        }
        let unit = [normal[0] / length, normal[1] / length, normal[2] / length];
        let normals = Array2::from_shape_fn((positions.nrows(), 3), |(_, j)| unit[j]);
        Points::new(positions, normals)
    }

    pub fn len(&self) -> usize {
        self.positions.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element positions, shape `(N, 3)`.
    pub fn positions(&self) -> ArrayView2<f64> {
        self.positions.view()
    }

    /// Unit normals, shape `(N, 3)`.
    pub fn normals(&self) -> ArrayView2<f64> {
        self.normals.view()
    }

    /// Get a single point and its normal.
    pub fn get(&self, index: usize) -> Option<([f64; 3], [f64; 3])> {
        if index >= self.len() {
            return None;
        }
        let p = self.positions.row(index);
        let n = self.normals.row(index);
        Some(([p[0], p[1], p[2]], [n[0], n[1], n[2]]))
    }

    /// Shift every point by `offset`. Normals are unchanged.
    pub fn translate(&mut self, offset: [f64; 3]) {
        for mut row in self.positions.outer_iter_mut() {
            row[0] += offset[0];
            row[1] += offset[1];
            row[2] += offset[2];
        }
    }

    /// The axis-aligned bounding box `(min, max)` of the points, or `None`
    /// if there are no points.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        if self.is_empty() {
            return None;
        }
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for row in self.positions.outer_iter() {
            for j in 0..3 {
                min[j] = min[j].min(row[j]);
                max[j] = max[j].max(row[j]);
            }
        }
        Some((min, max))
    }

    /// The size of the bounding box along each axis \[metres\].
    pub fn extent(&self) -> [f64; 3] {
        match self.bounds() {
            Some((min, max)) => [max[0] - min[0], max[1] - min[1], max[2] - min[2]],
            None => [0.0; 3],
        }
    }

    /// The electrical size (ka) of the points' bounding box at a wavelength.
    pub fn electrical_size(&self, wavelength_m: f64) -> Result<f64, GeometryError> {
        electrical_size(self.extent(), wavelength_m)
    }

    /// The Fraunhofer distance `2 D^2 / lambda` of the points, where D is the
    /// bounding-box diagonal. Fields closer than this are not in the far
    /// field.
    pub fn fraunhofer_distance(&self, wavelength_m: f64) -> Result<f64, GeometryError> {
        check_wavelength(wavelength_m)?;
        let [x, y, z] = self.extent();
        Ok(2.0 * (x * x + y * y + z * z) / wavelength_m)
    }
}

/// The electrical size `k * a` of a structure, where `a` is the radius of the
/// sphere enclosing a box of the given extent \[metres\].
pub fn electrical_size(extent: [f64; 3], wavelength_m: f64) -> Result<f64, GeometryError> {
    check_wavelength(wavelength_m)?;
    let k = TAU / wavelength_m;
    let [x, y, z] = extent;
    let a = 0.5 * (x * x + y * y + z * z).sqrt();
    Ok(k * a)
}

/// The directivity of a uniformly illuminated aperture of the given area,
/// `4 pi A / lambda^2`. This is the best any steering can do and the
/// denominator of the steering efficiency product.
pub fn max_aperture_directivity(area_m2: f64, wavelength_m: f64) -> Result<f64, GeometryError> {
    check_wavelength(wavelength_m)?;
    Ok(4.0 * PI * area_m2 / (wavelength_m * wavelength_m))
}

/// A triangulated surface: vertices `(V, 3)` \[metres\] and triangles `(T, 3)`
/// of vertex indices.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    vertices: Array2<f64>,
    triangles: Array2<usize>,
}

impl TriangleMesh {
    pub fn new(
        vertices: Array2<f64>,
        triangles: Array2<usize>,
    ) -> Result<TriangleMesh, GeometryError> {
        check_three_columns(vertices.view(), "vertices")?;
        if triangles.ncols() != 3 {
            return Err(GeometryError::NotThreeColumns {
                what: "triangles",
                got: triangles.ncols(),
            });
        }
        check_finite(vertices.view(), "vertex")?;
        let num_vertices = vertices.nrows();
        for (triangle, tri) in triangles.outer_iter().enumerate() {
            if let Some(&vertex) = tri.iter().find(|&&v| v >= num_vertices) {
                return Err(GeometryError::VertexIndexOutOfBounds {
                    triangle,
                    vertex,
                    num_vertices,
                });
            }
        }

        Ok(TriangleMesh {
            vertices,
            triangles,
        })
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.nrows()
    }

    pub fn vertices(&self) -> ArrayView2<f64> {
        self.vertices.view()
    }

    pub fn triangles(&self) -> ArrayView2<usize> {
        self.triangles.view()
    }

    /// The area of every triangle \[metres^2\].
    pub fn areas(&self) -> Array1<f64> {
        self.triangles
            .outer_iter()
            .map(|tri| {
                let [a, b, c] = self.corners(tri);
                let ab = sub(b, a);
                let ac = sub(c, a);
                let u = cross(ab, ac);
                0.5 * (u[0] * u[0] + u[1] * u[1] + u[2] * u[2]).sqrt()
            })
            .collect()
    }

    /// The centroid of every triangle, shape `(T, 3)`.
    pub fn centroids(&self) -> Array2<f64> {
        let mut centroids = Array2::zeros((self.num_triangles(), 3));
        for (mut out, tri) in centroids.outer_iter_mut().zip(self.triangles.outer_iter()) {
            let [a, b, c] = self.corners(tri);
            for j in 0..3 {
                out[j] = (a[j] + b[j] + c[j]) / 3.0;
            }
        }
        centroids
    }

    /// The summed area of all triangles \[metres^2\].
    pub fn surface_area(&self) -> f64 {
        self.areas().sum()
    }

    fn corners(&self, tri: ArrayView1<usize>) -> [[f64; 3]; 3] {
        let get = |i: usize| {
            let v = self.vertices.row(tri[i]);
            [v[0], v[1], v[2]]
        };
        [get(0), get(1), get(2)]
    }
}

fn check_three_columns(a: ArrayView2<f64>, what: &'static str) -> Result<(), GeometryError> {
    if a.ncols() != 3 {
        return Err(GeometryError::NotThreeColumns {
            what,
            got: a.ncols(),
        });
    }
    Ok(())
}

fn check_finite(a: ArrayView2<f64>, what: &'static str) -> Result<(), GeometryError> {
    match a
        .outer_iter()
        .position(|row| row.iter().any(|v| !v.is_finite()))
    {
        Some(index) => Err(GeometryError::NonFinite { what, index }),
        None => Ok(()),
    }
}

fn check_wavelength(wavelength_m: f64) -> Result<(), GeometryError> {
    if wavelength_m > 0.0 && wavelength_m.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::InvalidWavelength(wavelength_m))
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
