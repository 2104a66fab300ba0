//! Loading program text from disk and reducing it to instruction symbols.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ir::is_instruction;

/// File extensions accepted for Brainfuck scripts.
pub const EXTENSIONS: [&str; 2] = ["b", "bf"];

/// Errors raised while locating or reading a program file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Input error: cannot open {} (no such file)", path.display())]
    NotFound { path: PathBuf },

    #[error("Input error: incorrect filetype for {} (must be .b or .bf)", path.display())]
    WrongExtension { path: PathBuf },

    #[error("Input error: failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Keep only Brainfuck instruction characters.
pub fn bf_only(s: &str) -> String {
    s.chars().filter(|&c| is_instruction(c)).collect()
}

/// Byte-level variant of [`bf_only`]; everything that is not one of the
/// eight ASCII symbols is dropped, so the input need not be UTF-8.
pub fn bf_only_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .filter(|&c| is_instruction(c))
        .collect()
}

/// Check that `path` names an existing `.b`/`.bf` file and return its
/// instruction symbols.
pub fn load_program(path: &Path) -> Result<String, SourceError> {
    if !path.is_file() {
        return Err(SourceError::NotFound { path: path.to_path_buf() });
    }

    let has_bf_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext));
    if !has_bf_extension {
        return Err(SourceError::WrongExtension { path: path.to_path_buf() });
    }

    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let code = bf_only_bytes(&bytes);
    debug!(path = %path.display(), bytes = bytes.len(), symbols = code.len(), "program loaded");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn script(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
        let mut tf = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("tempfile");
        tf.write_all(content).unwrap();
        tf
    }

    #[test]
    fn filters_comments_and_whitespace() {
        assert_eq!(bf_only("add two: ++ then\nprint ."), "++.");
    }

    #[test]
    fn byte_filter_ignores_non_utf8() {
        assert_eq!(bf_only_bytes(&[b'+', 0xFF, b'[', 0xC3, b']']), "+[]");
    }

    #[test]
    fn loads_bf_file() {
        let tf = script(".bf", b"+ + comment > .\n");
        assert_eq!(load_program(tf.path()).unwrap(), "++>.");
    }

    #[test]
    fn loads_b_file() {
        let tf = script(".b", b"[-]");
        assert_eq!(load_program(tf.path()).unwrap(), "[-]");
    }

    #[test]
    fn rejects_other_extensions() {
        let tf = script(".txt", b"+");
        let err = load_program(tf.path()).unwrap_err();
        assert!(matches!(err, SourceError::WrongExtension { .. }));
        assert!(err.to_string().contains("must be .b or .bf"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bf");
        let err = load_program(&path).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn directory_is_not_a_program() {
        let dir = tempfile::Builder::new().suffix(".bf").tempdir().unwrap();
        let err = load_program(dir.path()).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }
}
