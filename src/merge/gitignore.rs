//! Version-control ignore file maintenance.

use std::path::Path;

use anyhow::Result;

use crate::util::fs::{read_to_string, write_string};

/// Ensure `line` is present in the `.gitignore` inside `dir`.
///
/// When missing, `line` is appended preceded by `# comment`. Returns whether
/// the file changed; adding a line that is already present is a no-op.
pub fn ensure_line(dir: &Path, line: &str, comment: &str) -> Result<bool> {
    let path = dir.join(".gitignore");
    let mut contents = if path.exists() {
        read_to_string(&path)?
    } else {
        String::new()
    };

    if contents.lines().any(|l| l.trim() == line) {
        return Ok(false);
    }

    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    if !contents.is_empty() {
        contents.push('\n');
    }
    contents.push_str(&format!("# {}\n{}\n", comment, line));

    write_string(&path, &contents)?;
    tracing::debug!("added `{}` to {}", line, path.display());
    Ok(true)
}
