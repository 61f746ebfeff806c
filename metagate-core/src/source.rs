// Line source abstraction
//
// A line source is the boundary between "where the text lives" and the
// scanner. The parser opens it at the start of every pass and drops the
// reader when the pass ends, including early termination on a rule failure.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// LineSource trait - anything that can be opened as a buffered line reader
pub trait LineSource {
    /// Open a fresh reader positioned at the first line
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>>;

    /// Get source name for error messages and tracing
    fn name(&self) -> &str;
}

/// Buffered reader over a file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for FileSource {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory text, e.g. stdin already read into a string
#[derive(Debug, Clone)]
pub struct TextSource {
    text: String,
    name: String,
}

impl TextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: "<memory>".to_string(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl LineSource for TextSource {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(Cursor::new(self.text.as_bytes())))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn read_all(source: &dyn LineSource) -> Vec<String> {
        source
            .open()
            .unwrap()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_text_source_reopens_from_start() {
        let source = TextSource::new("a=1\n\nbody\n").named("inline");
        assert_eq!(source.name(), "inline");
        assert_eq!(read_all(&source), vec!["a=1", "", "body"]);
        assert_eq!(read_all(&source), vec!["a=1", "", "body"]);
    }

    #[test]
    fn test_file_source_reads_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "k=v\r\n\r\nrow").unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.path(), file.path());
        // CRLF terminators are stripped along with LF
        assert_eq!(read_all(&source), vec!["k=v", "", "row"]);
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/metagate/input.dat");
        let err = source.open().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
