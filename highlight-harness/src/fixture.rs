//! Fixture materialization

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::HarnessPaths;
use crate::error::{HarnessError, Result};
use crate::frames::Frame;
use crate::partition::{Category, FileExistence};

/// Writes (or deliberately omits) the input file for a frame
#[derive(Debug, Clone)]
pub struct FixtureBuilder {
    paths: HarnessPaths,
}

impl FixtureBuilder {
    pub fn new(paths: HarnessPaths) -> Self {
        Self { paths }
    }

    /// Path the tool will be given for `frame`, without creating anything
    pub fn path_for(&self, frame: &Frame) -> &Path {
        match frame.file_existence {
            FileExistence::Exists => &self.paths.fixture,
            FileExistence::Missing => &self.paths.missing_fixture,
        }
    }

    /// Materialize the fixture for `frame` and return the path the tool
    /// should be given.
    ///
    /// A missing file creates nothing and returns the configured
    /// missing-fixture path, which must not exist. Removing stale fixture
    /// files is the caller's job; the missing-fixture path is never deleted.
    pub fn build(&self, frame: &Frame) -> Result<PathBuf> {
        let path = self.path_for(frame).to_path_buf();
        match frame.file_existence {
            FileExistence::Exists => {
                fs::write(&path, frame.file_content.body())?;
                tracing::debug!("Wrote {} fixture to {}", frame.file_content.as_str(), path.display());
            }
            FileExistence::Missing => {
                if fs::symlink_metadata(&path).is_ok() {
                    return Err(HarnessError::config(format!(
                        "missing-fixture path {} exists",
                        path.display()
                    )));
                }
            }
        }
        Ok(path)
    }
}
