// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace and a fluent builder so
// each integration test can set up an isolated set of files without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code, clippy::expect_used)]

use std::path::{Path, PathBuf};

use devtools::config::ConfigDocument;

/// An isolated scratch directory backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct TestWorkspace {
    /// Temporary directory holding the test files.
    pub root: tempfile::TempDir,
}

impl TestWorkspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path to the workspace root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `relative` inside the workspace.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Workspace-relative directory as the string form backups expect.
    pub fn dir_string(&self, relative: &str) -> String {
        self.path(relative)
            .to_str()
            .expect("temp paths are UTF-8")
            .to_string()
    }
}

/// Fluent builder for [`TestWorkspace`].
pub struct WorkspaceBuilder {
    ws: TestWorkspace,
}

impl WorkspaceBuilder {
    /// Begin building a new, empty workspace.
    pub fn new() -> Self {
        Self {
            ws: TestWorkspace::new(),
        }
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn with_file(self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        let path = self.ws.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create file parent");
        }
        std::fs::write(&path, content).expect("write test file");
        self
    }

    /// Finish building and return the workspace.
    pub fn build(self) -> TestWorkspace {
        self.ws
    }
}

/// A small document exercising several sections and options.
pub fn sample_document() -> ConfigDocument {
    let mut doc = ConfigDocument::new();
    doc.set("database", "host", "db.internal");
    doc.set("database", "port", "5432");
    doc.set("database", "password", "s3cr#t;x");
    doc.set("paths", "data", "/var/lib/app");
    doc.set("paths", "spaces", "a value with spaces");
    doc.set("empty values", "unset", "");
    doc
}
