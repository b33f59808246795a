//! FileSystem trait definition

use anyhow::Result;
use std::path::Path;

/// Metadata about a project entry
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub file_type: FileType,
}

/// Type of file system entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Symlink,
}

impl FileMetadata {
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    pub fn len(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Abstraction over the student project tree so checks can run against a mock
pub trait FileSystem {
    /// Check if a path exists (file, directory or anything else)
    fn exists(&self, path: &Path) -> bool;

    /// Check if the current process may open the path for reading
    fn is_readable(&self, path: &Path) -> bool;

    /// Get file/directory metadata
    fn metadata(&self, path: &Path) -> Result<FileMetadata>;

    /// Read file contents as text. Invalid UTF-8 is replaced, not rejected.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Read a file, degrading to an empty string when it is missing or unreadable
    fn read_or_empty(&self, path: &Path) -> String {
        self.read_to_string(path).unwrap_or_default()
    }
}
