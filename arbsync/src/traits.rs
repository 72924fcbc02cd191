//! Traits for reading and writing the JSON files arbsync works with.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, ErrorKind, Write},
    path::Path,
};

use crate::error::Error;

/// A value that lives in one JSON file (an ARB map, a history snapshot, a
/// translation cache).
///
/// Reading attaches the path to not-found and parse failures. Writing goes to
/// a temporary file in the destination directory which is then renamed over
/// the target, so a crash never leaves a half-written file behind.
///
/// # Example
///
/// ```rust,no_run
/// use arbsync::{History, traits::Parser};
/// let history = History::read_from("l10n/.arbsync_history.json")?;
/// history.write_to("l10n/.arbsync_history.json")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            Error::Json(inner) => Error::parse_error(path, inner.to_string()),
            Error::InvalidDocument(message) => Error::parse_error(path, message),
            other => other,
        })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path, replacing any previous content atomically.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.to_writer(&mut writer)?;
            writer.flush()?;
        }
        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}
