//! Single mesh snapshot of a sequence

use crate::point::*;
use serde::{Deserialize, Serialize};

/// One frame of a mesh sequence: vertex positions and triangle indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<Face>,
}

impl Frame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a frame from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the frame is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// True when both frames have the same connectivity, so one can be shown
    /// by moving the vertices of the other.
    pub fn same_topology(&self, other: &Frame) -> bool {
        self.vertices.len() == other.vertices.len() && self.faces == other.faces
    }

    /// First face index pointing past the vertex array, as
    /// `(face position, vertex index)`
    pub fn first_invalid_index(&self) -> Option<(usize, usize)> {
        let n = self.vertices.len();
        self.faces.iter().enumerate().find_map(|(face, indices)| {
            indices.iter().find(|&&i| i >= n).map(|&i| (face, i))
        })
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f32) -> Frame {
        Frame::from_vertices_and_faces(
            vec![
                Point3f::new(offset, 0.0, 0.0),
                Point3f::new(offset + 1.0, 0.0, 0.0),
                Point3f::new(offset, 1.0, 2.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn test_counts_and_empty() {
        let frame = triangle(0.0);
        assert_eq!(frame.vertex_count(), 3);
        assert_eq!(frame.face_count(), 1);
        assert!(!frame.is_empty());
        assert!(Frame::default().is_empty());
    }

    #[test]
    fn test_same_topology_ignores_positions() {
        assert!(triangle(0.0).same_topology(&triangle(5.0)));

        let mut flipped = triangle(0.0);
        flipped.faces[0] = [0, 2, 1];
        assert!(!triangle(0.0).same_topology(&flipped));

        let mut extra_vertex = triangle(0.0);
        extra_vertex.vertices.push(Point3f::new(9.0, 9.0, 9.0));
        assert!(!triangle(0.0).same_topology(&extra_vertex));
    }

    #[test]
    fn test_first_invalid_index() {
        let mut frame = triangle(0.0);
        assert_eq!(frame.first_invalid_index(), None);
        frame.faces.push([0, 1, 3]);
        frame.faces.push([7, 1, 2]);
        assert_eq!(frame.first_invalid_index(), Some((1, 3)));
    }
}
