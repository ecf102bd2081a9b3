//! Content environment file

use connect_api::models::EnvironmentVariable;
use tracing::warn;

/// File, inside a content directory, listing the variables to set
pub const ENV_FILE: &str = ".env";

/// Parse environment file contents.
///
/// Accepts `NAME=VALUE` lines (optionally prefixed with `export`), with
/// surrounding single or double quotes stripped from the value. A bare `NAME`
/// takes its value from `lookup`; names that `lookup` cannot resolve are
/// skipped. Blank lines and `#` comments are ignored. Later assignments of the
/// same name replace earlier ones.
pub fn parse_env_file<F>(contents: &str, lookup: F) -> Vec<EnvironmentVariable>
where
    F: Fn(&str) -> Option<String>,
{
    let mut vars: Vec<EnvironmentVariable> = Vec::new();

    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);

        let (name, value) = match line.split_once('=') {
            Some((name, value)) => (name.trim(), Some(unquote(value.trim()).to_string())),
            None => (line, None),
        };

        if !is_valid_name(name) {
            warn!("skipping invalid environment variable name {:?} on line {}", name, lineno + 1);
            continue;
        }

        let value = match value.or_else(|| lookup(name)) {
            Some(value) => value,
            None => {
                warn!("environment variable {} is not set, skipping", name);
                continue;
            }
        };

        vars.retain(|v| v.name != name);
        vars.push(EnvironmentVariable {
            name: name.to_string(),
            value: Some(value),
        });
    }

    vars
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
