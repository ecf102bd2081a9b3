//! Application identities
//!
//! An identity is the path a deployed application is addressed under on the
//! server, always of the form `/segment/.../`.

use std::path::{Component, Path, PathBuf};

use crate::errors::DirectoryError;

/// Derive an identity from a content directory.
///
/// The path is resolved lexically against `base_dir` and its final component
/// is turned into a slug. Fails when no usable component remains, e.g. for
/// the filesystem root or a name made only of punctuation.
pub fn resolve_app_identifier(path: &str, base_dir: &Path) -> Result<String, DirectoryError> {
    if path.trim().is_empty() {
        return Err(DirectoryError::IdentityResolution(
            "empty directory path".to_string(),
        ));
    }

    let resolved = normalize_path(&base_dir.join(path));
    let name = resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let slug = slugify(&name);
    if slug.is_empty() {
        return Err(DirectoryError::IdentityResolution(format!(
            "dir {:?} (resolved to {:?}) does not map to an application path",
            path, resolved
        )));
    }

    Ok(format!("/{}/", slug))
}

/// Normalize an identity to `/a/b/` form, dropping empty segments
pub fn normalize_identity(identity: &str) -> String {
    let segments: Vec<&str> = identity.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Prefix an identity with a namespace. An empty namespace leaves the
/// identity unchanged.
pub fn apply_namespace(namespace: Option<&str>, identity: &str) -> String {
    match namespace.map(|ns| ns.trim_matches('/')).filter(|ns| !ns.is_empty()) {
        Some(ns) => normalize_identity(&format!("/{}/{}", ns, identity)),
        None => normalize_identity(identity),
    }
}

/// Content names allow `[A-Za-z0-9_-]`, 3 to 64 characters
pub fn content_name(identity: &str) -> String {
    let mut name = identity
        .split('/')
        .filter(|s| !s.is_empty())
        .map(slugify)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if name.len() < 3 {
        name = format!("{}-content", if name.is_empty() { "app" } else { name.as_str() });
    }
    name.truncate(64);
    name
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
