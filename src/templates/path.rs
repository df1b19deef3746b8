//! Location of a resolved template source.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::ResourceStore;

/// A template found either on the filesystem or among the bundled resources.
///
/// Values are produced fresh by every lookup and never cached; the backing
/// source is only touched when the template is opened.
#[derive(Clone)]
pub enum TemplatePath {
    /// Template file on the filesystem
    File(PathBuf),
    /// Template bundled with the tool
    Resource {
        id: String,
        store: Arc<dyn ResourceStore>,
    },
}

impl TemplatePath {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn resource(id: impl Into<String>, store: Arc<dyn ResourceStore>) -> Self {
        Self::Resource {
            id: id.into(),
            store,
        }
    }

    /// Open the template as a byte stream.
    ///
    /// Fails with `NotFound` if the file or resource vanished after lookup.
    pub fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        match self {
            Self::File(path) => Ok(Box::new(File::open(path)?)),
            Self::Resource { id, store } => {
                let data = store.load(id).ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("Bundled template not found: {id}"),
                    )
                })?;
                Ok(Box::new(Cursor::new(data)))
            }
        }
    }

    /// Open the template as a buffered reader for UTF-8 text
    pub fn reader(&self) -> io::Result<BufReader<Box<dyn Read + Send>>> {
        Ok(BufReader::new(self.open()?))
    }

    /// Read the whole template as UTF-8 text
    pub fn read_to_string(&self) -> io::Result<String> {
        let mut content = String::new();
        self.reader()?.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Read the whole template, replacing invalid UTF-8 sequences
    pub fn read_to_string_lossy(&self) -> io::Result<String> {
        let mut content = Vec::new();
        self.open()?.read_to_end(&mut content)?;
        Ok(String::from_utf8_lossy(&content).into_owned())
    }

    /// Path or resource identifier, for diagnostics
    pub fn path(&self) -> Cow<'_, str> {
        match self {
            Self::File(path) => path.to_string_lossy(),
            Self::Resource { id, .. } => Cow::Borrowed(id),
        }
    }

    /// Extension of the matched file name, without the leading period.
    ///
    /// Dot files such as `.gitignore` report their whole name as extension.
    pub fn extension(&self) -> Option<String> {
        match self {
            Self::File(path) => file_extension(&path.to_string_lossy()).map(str::to_string),
            Self::Resource { id, .. } => file_extension(id).map(str::to_string),
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource { .. })
    }

    /// Filesystem location, if any
    pub fn as_file(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Resource { .. } => None,
        }
    }
}

impl fmt::Debug for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Resource { id, .. } => f.debug_struct("Resource").field("id", id).finish(),
        }
    }
}

impl fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn file_extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    file_name
        .rfind('.')
        .map(|idx| &file_name[idx + 1..])
        .filter(|ext| !ext.is_empty())
}
