//! ASCII STL reading and writing.
//!
//! The solver consumes boundary surfaces as STL; the control loop only
//! ever needs the ASCII flavor, written whole-file each cycle.

use crate::error::{GeometryError, GeometryResult};
use crate::mesh::TriMesh;
use nalgebra::Vector3;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Serialize a mesh as ASCII STL text.
pub fn to_ascii_stl(mesh: &TriMesh, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "solid {name}");
    for &face in &mesh.faces {
        let n = mesh.facet_normal(face);
        let _ = writeln!(out, "  facet normal {} {} {}", n.x, n.y, n.z);
        let _ = writeln!(out, "    outer loop");
        for idx in face {
            let v = mesh.vertices[idx];
            let _ = writeln!(out, "      vertex {} {} {}", v.x, v.y, v.z);
        }
        let _ = writeln!(out, "    endloop");
        let _ = writeln!(out, "  endfacet");
    }
    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Write a mesh as ASCII STL, creating parent directories as needed.
pub fn write_ascii_stl(mesh: &TriMesh, name: &str, path: &Path) -> GeometryResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_ascii_stl(mesh, name))?;
    Ok(())
}

/// Parse ASCII STL text into a triangle-soup mesh (three vertices per
/// face, no deduplication).
pub fn parse_ascii_stl(content: &str) -> GeometryResult<TriMesh> {
    let mut vertices: Vec<Vector3<f64>> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        let Some(rest) = trimmed.strip_prefix("vertex") else {
            continue;
        };
        let mut coords = [0.0_f64; 3];
        let mut tokens = rest.split_whitespace();
        for coord in &mut coords {
            let token = tokens.next().ok_or_else(|| GeometryError::StlParse {
                what: format!("vertex line has fewer than 3 coordinates: {line:?}"),
            })?;
            *coord = token.parse().map_err(|_| GeometryError::StlParse {
                what: format!("unparsable coordinate {token:?}"),
            })?;
        }
        vertices.push(Vector3::new(coords[0], coords[1], coords[2]));
    }

    if vertices.is_empty() {
        return Err(GeometryError::StlParse {
            what: "no vertices found".to_string(),
        });
    }
    if vertices.len() % 3 != 0 {
        return Err(GeometryError::StlParse {
            what: format!("vertex count {} is not a multiple of 3", vertices.len()),
        });
    }

    let faces = (0..vertices.len() / 3)
        .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
        .collect();
    TriMesh::new(vertices, faces)
}

/// Read a mesh from an ASCII STL file.
pub fn load_ascii_stl(path: &Path) -> GeometryResult<TriMesh> {
    let content = fs::read_to_string(path)?;
    parse_ascii_stl(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_mesh_parses_back() {
        let mesh = TriMesh::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();

        let text = to_ascii_stl(&mesh, "fin1");
        assert!(text.starts_with("solid fin1"));
        assert!(text.trim_end().ends_with("endsolid fin1"));

        let parsed = parse_ascii_stl(&text).unwrap();
        assert_eq!(parsed.faces.len(), 1);
        assert_eq!(parsed.vertices[1], Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn truncated_file_is_an_error() {
        let text = "solid broken\n  facet normal 0 0 1\n    outer loop\n      vertex 0 0 0\n";
        let err = parse_ascii_stl(text).unwrap_err();
        assert!(matches!(err, GeometryError::StlParse { .. }));
    }

    #[test]
    fn empty_solid_is_an_error() {
        assert!(parse_ascii_stl("solid nothing\nendsolid nothing\n").is_err());
    }

    #[test]
    fn binary_garbage_is_an_error() {
        assert!(parse_ascii_stl("vertex not numbers here\n").is_err());
    }
}
