//! Module sources: what gets parsed, under which name.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A named piece of Inox code.
pub trait ChunkSource: fmt::Debug + Send + Sync {
    /// Name used in error positions.
    fn name(&self) -> &str;

    /// Name shown to users, defaults to [`ChunkSource::name`].
    fn user_friendly_name(&self) -> &str {
        self.name()
    }

    fn code(&self) -> &str;

    /// Location of the resource the code was loaded from.
    ///
    /// Only sources with a resource location are eligible for the parse cache.
    fn resource(&self) -> Option<&str> {
        None
    }
}

/// Code that does not come from a file (REPL input, tests, generated code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemorySource {
    pub name: String,
    pub code: String,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

impl ChunkSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &str {
        &self.code
    }
}

/// Code loaded from a file or another addressable resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub user_friendly_name: String,
    /// Path or URL of the resource.
    pub resource: String,
    /// Directory containing the resource.
    pub resource_dir: PathBuf,
    pub code: String,
}

impl SourceFile {
    /// Read a module from the filesystem.
    ///
    /// ## Errors
    /// - [`crate::Error::Io`] if the file cannot be read as UTF-8 text.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let code = fs::read_to_string(path)?;
        let resource = path.to_string_lossy().into_owned();
        let user_friendly_name = path
            .file_name()
            .map_or_else(|| resource.clone(), |name| name.to_string_lossy().into_owned());

        Ok(Self {
            name: resource.clone(),
            user_friendly_name,
            resource_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            resource,
            code,
        })
    }
}

impl ChunkSource for SourceFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn user_friendly_name(&self) -> &str {
        &self.user_friendly_name
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn resource(&self) -> Option<&str> {
        Some(&self.resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_in_memory_source_names() {
        let source = InMemorySource::new("repl", "print 1");
        assert_eq!(source.name(), "repl");
        assert_eq!(source.user_friendly_name(), "repl");
        assert_eq!(source.resource(), None);
    }

    #[test]
    fn test_read_source_file() {
        let path = std::env::temp_dir().join(format!("inox_source_{}.ix", std::process::id()));
        fs::write(&path, "manifest {}").unwrap();

        let source = SourceFile::read(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(source.code(), "manifest {}");
        assert_eq!(source.resource(), Some(path.to_string_lossy().as_ref()));
        assert!(source.user_friendly_name().starts_with("inox_source_"));
        assert_eq!(source.resource_dir, std::env::temp_dir());
    }

    #[test]
    fn test_read_missing_file() {
        let result = SourceFile::read("/definitely/not/here.ix");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
