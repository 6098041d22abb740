//! Integration tests for loading and exporting sequences on disk
//!
//! These tests drive a `Session` against `DiskStorage`, so the naming rules,
//! the OBJ codec and the exporters are exercised together.

use meshseq_core::{Error, Frame, MeshStorage, Point3f, Session, SessionConfig};
use meshseq_io::{read_frame, write_frame, DiskStorage};
use std::fs;
use std::path::{Path, PathBuf};

/// Fresh scratch folder for one test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("meshseq_it_{}_{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// A tetrahedron lifted by `height`
fn tetra(height: f32) -> Frame {
    Frame::from_vertices_and_faces(
        vec![
            Point3f::new(0.0, 0.0, height),
            Point3f::new(1.0, 0.0, height),
            Point3f::new(0.0, 1.0, height),
            Point3f::new(0.0, 0.0, height + 1.0),
        ],
        vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
    )
}

fn write_sequence(dir: &Path, prefix: &str, start: u32, frames: &[Frame]) {
    for (i, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("{}{}.obj", prefix, start as usize + i));
        write_frame(frame, path).unwrap();
    }
}

#[test]
fn test_load_from_any_member() {
    let dir = scratch_dir("any_member");
    let frames: Vec<Frame> = (0..5).map(|i| tetra(i as f32)).collect();
    write_sequence(&dir, "mesh", 0, &frames);

    let storage = DiskStorage::new();
    for member in ["mesh0.obj", "mesh3.obj", "mesh4.obj"] {
        let mut session = Session::default();
        let count = session.load(&dir.join(member), &storage).unwrap();
        assert_eq!(count, 5);
        assert_eq!(session.current_frame(), 0);
        assert!(session.sequence().unwrap().is_same_mesh());
        assert_eq!(session.sequence().unwrap().frames(), frames.as_slice());
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_start_id_and_gap() {
    let dir = scratch_dir("start_id");
    let frames: Vec<Frame> = (0..3).map(|i| tetra(i as f32)).collect();
    write_sequence(&dir, "body_", 10, &frames);
    write_frame(&tetra(9.0), dir.join("body_14.obj")).unwrap();

    let storage = DiskStorage::new();
    let mut session = Session::new(SessionConfig {
        start_id: 10,
        ..SessionConfig::default()
    });
    assert_eq!(session.load(&dir.join("body_11.obj"), &storage).unwrap(), 3);

    session.set_start_id(14);
    assert_eq!(session.load(&dir.join("body_11.obj"), &storage).unwrap(), 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_no_frames_found() {
    let dir = scratch_dir("no_frames");
    write_sequence(&dir, "mesh", 1, &[tetra(0.0)]);

    let mut session = Session::default();
    let err = session.load(&dir.join("mesh1.obj"), &DiskStorage::new()).unwrap_err();
    assert!(matches!(err, Error::NoFramesFound { .. }));
    assert!(err.is_fatal());
    assert!(!session.is_loaded());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_broken_frame_fails_load() {
    let dir = scratch_dir("broken");
    write_sequence(&dir, "mesh", 0, &[tetra(0.0)]);
    fs::write(dir.join("mesh1.obj"), "v 0 0 0\nf 1 2 x\n").unwrap();

    let mut session = Session::default();
    let err = session.load(&dir.join("mesh0.obj"), &DiskStorage::new()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(!session.is_loaded());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_topology_change_detected() {
    let dir = scratch_dir("topology");
    let mut second = tetra(1.0);
    second.faces.swap(0, 1);
    write_sequence(&dir, "mesh", 0, &[tetra(0.0), second]);

    let mut session = Session::default();
    session.load(&dir.join("mesh0.obj"), &DiskStorage::new()).unwrap();
    assert!(!session.sequence().unwrap().is_same_mesh());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_export_meshes_roundtrip() {
    let dir = scratch_dir("export");
    let frames: Vec<Frame> = (0..4).map(|i| tetra(i as f32 * 0.5)).collect();
    write_sequence(&dir, "mesh", 0, &frames);

    let storage = DiskStorage::new();
    let mut session = Session::default();
    session.load(&dir.join("mesh2.obj"), &storage).unwrap();

    let folder = session.export_meshes(&storage).unwrap();
    assert_eq!(folder, dir.join("meshSequence"));

    let mut written: Vec<String> = fs::read_dir(&folder)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, vec!["mesh_0.obj", "mesh_1.obj", "mesh_2.obj", "mesh_3.obj"]);

    for (i, original) in frames.iter().enumerate() {
        let reread = read_frame(folder.join(format!("mesh_{i}.obj"))).unwrap();
        assert_eq!(reread.vertex_count(), original.vertex_count());
        assert_eq!(reread.face_count(), original.face_count());
    }

    // Exporting twice reuses the folder
    session.export_meshes(&storage).unwrap();
    assert!(storage.exists(&folder.join("mesh_3.obj")));

    let _ = fs::remove_dir_all(&dir);
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_folder_loads_and_exports() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let base = scratch_dir("non_utf8");
    let dir = base.join(OsStr::from_bytes(b"run_\xff_dir"));
    fs::create_dir_all(&dir).unwrap();
    write_sequence(&dir, "mesh", 0, &[tetra(0.0), tetra(1.0)]);

    let storage = DiskStorage::new();
    let mut session = Session::default();
    assert_eq!(session.load(&dir.join("mesh1.obj"), &storage).unwrap(), 2);

    let folder = session.export_meshes(&storage).unwrap();
    assert_eq!(folder, dir.join("meshSequence"));
    assert!(storage.exists(&folder.join("mesh_1.obj")));

    let _ = fs::remove_dir_all(&base);
}
