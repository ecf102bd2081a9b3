//! Content manifest

use std::collections::BTreeMap;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

/// File name of the manifest inside a content directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// The parts of `manifest.json` needed to build a bundle.
///
/// Unknown fields are preserved by the server, which reads the manifest from
/// inside the bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: Option<u32>,

    #[serde(default)]
    pub metadata: serde_json::Value,

    /// Files to bundle, keyed by path relative to the manifest
    #[serde(default)]
    pub files: BTreeMap<String, serde_json::Value>,
}

impl Manifest {
    /// Relative paths of the files to bundle, manifest excluded.
    ///
    /// Paths that are absolute or climb out of the content directory are
    /// rejected.
    pub fn bundle_files(&self) -> Result<Vec<String>, String> {
        let mut files = Vec::with_capacity(self.files.len());
        for name in self.files.keys() {
            let path = Path::new(name);
            let escapes = path.components().any(|c| {
                matches!(
                    c,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            });
            if name.is_empty() || escapes {
                return Err(format!("manifest lists a file outside the bundle: {:?}", name));
            }
            if name != MANIFEST_FILE {
                files.push(name.clone());
            }
        }
        Ok(files)
    }
}
