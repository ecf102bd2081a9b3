//! Bundle archives
//!
//! A bundle is a gzipped tarball holding `manifest.json` and every file the
//! manifest lists. Archives are built deterministically so that unchanged
//! content produces an identical archive and hash.

use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::errors::ApiError;
use crate::filesys::file::File;
use crate::models::manifest::{Manifest, MANIFEST_FILE};
use crate::utils::sha256_hash;

/// A built bundle archive
#[derive(Debug, Clone)]
pub struct Bundle {
    pub bytes: Vec<u8>,
    pub sha256: String,
    pub file_count: usize,
}

/// Build the bundle for the manifest at `manifest_path`
pub async fn build_bundle(manifest_path: &Path) -> Result<Bundle, ApiError> {
    let manifest: Manifest = File::new(manifest_path).read_json().await.map_err(|e| {
        ApiError::BundleError(format!("unable to read {}: {}", manifest_path.display(), e))
    })?;
    let files = manifest.bundle_files().map_err(ApiError::BundleError)?;
    let file_count = files.len() + 1;

    let dir = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let manifest_path: PathBuf = manifest_path.to_path_buf();

    let bytes = tokio::task::spawn_blocking(move || archive(&dir, &manifest_path, &files))
        .await
        .map_err(|e| ApiError::BundleError(format!("bundling task failed: {}", e)))??;

    let sha256 = sha256_hash(&bytes);
    debug!("bundled {} files, {} bytes, sha256={}", file_count, bytes.len(), sha256);

    Ok(Bundle {
        bytes,
        sha256,
        file_count,
    })
}

fn archive(dir: &Path, manifest_path: &Path, files: &[String]) -> Result<Vec<u8>, ApiError> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    builder.mode(tar::HeaderMode::Deterministic);

    builder.append_path_with_name(manifest_path, MANIFEST_FILE)?;
    for name in files {
        let path = dir.join(name);
        if !path.is_file() {
            return Err(ApiError::BundleError(format!(
                "{} is listed in the manifest but is not a file",
                path.display()
            )));
        }
        builder.append_path_with_name(&path, name)?;
    }

    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}
