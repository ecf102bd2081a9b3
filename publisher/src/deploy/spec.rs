//! Directory specifications
//!
//! Each entry of the directory list is either a bare path or
//! `<path>:<identity>`, where the identity names the target application
//! explicitly instead of deriving it from the path.

use tracing::warn;

/// Separator between the path and the explicit identity
pub const SEPARATOR: char = ':';

/// A parsed directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySpec {
    pub path: String,
    pub explicit_identity: Option<String>,
}

impl DirectorySpec {
    /// Parse a raw entry. Never fails; a malformed entry with extra segments
    /// keeps the first two and logs a warning naming what was dropped.
    pub fn parse(raw: &str) -> Self {
        let (spec, discarded) = Self::split(raw);
        if let Some(discarded) = discarded {
            warn!(
                "discarding trailing value {:?} from dir {:?}",
                discarded, raw
            );
        }
        spec
    }

    fn split(raw: &str) -> (Self, Option<String>) {
        let parts: Vec<&str> = raw.split(SEPARATOR).collect();
        match parts.as_slice() {
            [path, identity, rest @ ..] if !path.is_empty() && !identity.is_empty() => {
                let spec = Self {
                    path: path.to_string(),
                    explicit_identity: Some(identity.to_string()),
                };
                let discarded = (!rest.is_empty()).then(|| rest.join(SEPARATOR.to_string().as_str()));
                (spec, discarded)
            }
            _ => (
                Self {
                    path: raw.to_string(),
                    explicit_identity: None,
                },
                None,
            ),
        }
    }
}
