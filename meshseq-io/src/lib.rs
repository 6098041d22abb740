//! I/O operations for mesh sequences
//!
//! Frames are read from and written to OBJ files. [`DiskStorage`] is the
//! file-system implementation of [`meshseq_core::MeshStorage`] the viewer
//! hands to its session.

pub mod obj;
pub mod storage;
pub mod error;

pub use error::*;
pub use self::obj::{ObjReader, ObjWriter};
pub use storage::DiskStorage;

use meshseq_core::{Frame, Result};
use std::path::Path;

/// Trait for reading frames from files
pub trait MeshReader {
    fn read_frame<P: AsRef<Path>>(path: P) -> Result<Frame>;
}

/// Trait for writing frames to files
pub trait MeshWriter {
    fn write_frame<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<()>;
}

/// Auto-detect format and read a frame
pub fn read_frame<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("obj") => ObjReader::read_frame(path),
        _ => Err(IoError::InvalidFormat {
            format: format!("{:?}", path.extension()),
        }
        .into()),
    }
}

/// Auto-detect format and write a frame
pub fn write_frame<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<()> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("obj") => ObjWriter::write_frame(frame, path),
        _ => Err(IoError::InvalidFormat {
            format: format!("{:?}", path.extension()),
        }
        .into()),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshseq_core::Point3f;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("meshseq_io_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_obj_roundtrip_through_dispatch() {
        let path = temp_path("roundtrip.obj");
        let frame = Frame::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        );

        write_frame(&frame, &path).unwrap();
        let loaded = read_frame(&path).unwrap();
        assert_eq!(loaded, frame);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = read_frame("mesh0.stl");
        assert!(matches!(result, Err(meshseq_core::Error::UnsupportedFormat(_))));

        let result = write_frame(&Frame::new(), "mesh0.ply");
        assert!(matches!(result, Err(meshseq_core::Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = read_frame(temp_path("does_not_exist.obj"));
        assert!(matches!(result, Err(meshseq_core::Error::Io(_))));
    }
}
