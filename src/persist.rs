//! Writing INI lines back to disk.
//!
//! The rendered text is always the full file: one line per entry, a trailing
//! newline, parent directories created as needed.

use std::path::Path;

use tracing::debug;

use crate::error::BindError;

/// Pure function: join lines into file content.
pub fn render(lines: &[String]) -> String {
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    content
}

/// Write `lines` to `path`, replacing any existing file.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<(), BindError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| BindError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, render(lines)).map_err(|e| BindError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), lines = lines.len(), "wrote ini file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn render_adds_trailing_newline() {
        assert_eq!(render(&lines(&["[A]", "x = 1"])), "[A]\nx = 1\n");
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.ini");
        write_lines(&path, &lines(&["[A]", "x = 1"])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[A]\nx = 1\n");
    }

    #[test]
    fn write_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.ini");
        fs::write(&path, "[Old]\ny = 2\n").unwrap();
        write_lines(&path, &lines(&["[A]", "x = 1"])).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("Old"));
        assert!(content.contains("x = 1"));
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("dir").join("app.ini");
        write_lines(&path, &lines(&["x = 1"])).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_into_file_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let err = write_lines(&blocker.join("app.ini"), &lines(&["x = 1"])).unwrap_err();
        assert!(matches!(err, BindError::Io { .. }));
    }
}
