//! Scanner-space triangle mesh.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};
use crate::{Aabb, Triangle};

/// An intraoral scan: scanner-space vertices plus triangle faces.
///
/// Vertex indices are the stable identity used by the classifier's label
/// array. Faces are validated at construction, so every face index addresses
/// an existing vertex.
///
/// A mesh without faces is a point cloud. Surface queries fall back to the
/// nearest vertex in that case.
///
/// # Example
///
/// ```
/// use dental_types::{Point3, ScanMesh};
///
/// let mesh = ScanMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// )
/// .unwrap();
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// assert!(ScanMesh::from_parts(vec![Point3::origin()], vec![[0, 0, 1]]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanMesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[u32; 3]>,
}

impl ScanMesh {
    /// An empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Build a mesh, checking every face index against the vertex count.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::FaceIndexOutOfBounds`] for the first face that
    /// references a missing vertex.
    pub fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> TypesResult<Self> {
        let vertex_count = vertices.len();
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(TypesError::FaceIndexOutOfBounds {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(Self { vertices, faces })
    }

    /// A mesh with vertices only.
    #[must_use]
    pub const fn point_cloud(vertices: Vec<Point3<f64>>) -> Self {
        Self {
            vertices,
            faces: Vec::new(),
        }
    }

    /// Vertex positions, indexed by vertex id.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Faces as vertex index triples.
    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True if the mesh has no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True if the mesh has vertices but no faces.
    #[inline]
    #[must_use]
    pub fn is_point_cloud(&self) -> bool {
        !self.vertices.is_empty() && self.faces.is_empty()
    }

    /// Resolve a face to its triangle.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [a, b, c] = *self.faces.get(face_index)?;
        Some(Triangle::new(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ))
    }

    /// Iterate over all faces as triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|&[a, b, c]| {
            Triangle::new(
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            )
        })
    }

    /// Bounding box of the vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter())
    }
}
