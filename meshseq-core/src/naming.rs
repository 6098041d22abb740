//! Numbered frame file naming
//!
//! A sequence is a set of files named `<prefix><index>.obj` living in one
//! folder, where the prefix is every leading non-digit character of the file
//! name and the indices are contiguous from a start id.

use crate::traits::MeshStorage;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Extension of every frame file
pub const FRAME_EXTENSION: &str = "obj";

/// Folder, prefix and start index shared by all files of a sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePattern {
    folder: PathBuf,
    prefix: OsString,
    start_id: u32,
}

impl SequencePattern {
    /// Derive the pattern from the path of any one frame file.
    ///
    /// Backslashes are treated as separators when the path is valid UTF-8.
    /// Other paths are split as they are, byte for byte.
    pub fn from_frame_path<P: AsRef<Path>>(path: P, start_id: u32) -> Self {
        let path = path.as_ref();
        let normalized = match path.to_str() {
            Some(text) => PathBuf::from(normalize_separators(text)),
            None => path.to_path_buf(),
        };

        let folder = normalized.parent().map(Path::to_path_buf).unwrap_or_default();
        let prefix = normalized
            .file_name()
            .map(leading_non_digits)
            .unwrap_or_default();

        Self {
            folder,
            prefix,
            start_id,
        }
    }

    /// Folder holding the frames; empty for a bare file name
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Folder as a path, `.` when the frames are in the working directory
    pub fn folder_path(&self) -> PathBuf {
        if self.folder.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            self.folder.clone()
        }
    }

    pub fn prefix(&self) -> &OsStr {
        &self.prefix
    }

    pub fn start_id(&self) -> u32 {
        self.start_id
    }

    /// Path of the frame at position `index` (not file number) in the sequence
    pub fn frame_path(&self, index: usize) -> PathBuf {
        let number = u64::from(self.start_id) + index as u64;
        self.file_in_folder(&format!("{}.{}", number, FRAME_EXTENSION))
    }

    /// Count consecutive existing frame files starting at the start id
    pub fn count_frames<S: MeshStorage + ?Sized>(&self, storage: &S) -> usize {
        let mut count = 0;
        while storage.exists(&self.frame_path(count)) {
            count += 1;
        }
        count
    }

    fn file_in_folder(&self, suffix: &str) -> PathBuf {
        let mut name = self.prefix.clone();
        name.push(suffix);
        self.folder.join(name)
    }
}

impl fmt::Display for SequencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = self.file_in_folder(&format!("<{}..>.{}", self.start_id, FRAME_EXTENSION));
        write!(f, "{}", pattern.display())
    }
}

/// Replace Windows separators with `/`
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Every character of `name` before its first ASCII digit
fn leading_non_digits(name: &OsStr) -> OsString {
    match name.to_str() {
        Some(text) => text.chars().take_while(|c| !c.is_ascii_digit()).collect::<String>().into(),
        None => leading_non_digit_bytes(name),
    }
}

#[cfg(unix)]
fn leading_non_digit_bytes(name: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};
    let bytes = name.as_bytes().iter().copied().take_while(|b| !b.is_ascii_digit()).collect();
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn leading_non_digit_bytes(name: &OsStr) -> OsString {
    name.to_string_lossy()
        .chars()
        .take_while(|c| !c.is_ascii_digit())
        .collect::<String>()
        .into()
}

/// Numbered output file `<dir>/<stem><index>.<extension>`
pub fn numbered_output(dir: &Path, stem: &str, index: usize, extension: &str) -> PathBuf {
    dir.join(format!("{stem}{index}.{extension}"))
}
