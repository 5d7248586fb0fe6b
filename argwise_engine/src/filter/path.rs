use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::FilterError;
use crate::filter::ValueFilter;
use crate::model::Value;

/// Whether the path must (not) exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    /// The path must exist.
    MustExist,
    /// The path must not exist.
    MustNotExist,
    /// Either way.
    Irrelevant,
}

/// The type of an existing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Either.
    Irrelevant,
}

/// Required access to an existing path.
///
/// For directories, `execute` means the directory can be traversed/listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Access {
    /// The path must be readable.
    pub read: bool,
    /// The path must not be read-only.
    pub write: bool,
    /// The file must be executable, or the directory listable.
    pub execute: bool,
}

impl Access {
    /// No access required.
    pub fn none() -> Self {
        Self::default()
    }

    /// Require read access.
    pub fn read(mut self) -> Self {
        self.read = true;
        self
    }

    /// Require write access.
    pub fn write(mut self) -> Self {
        self.write = true;
        self
    }

    /// Require execute (or, for directories, traverse) access.
    pub fn execute(mut self) -> Self {
        self.execute = true;
        self
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            flag(self.read, 'r'),
            flag(self.write, 'w'),
            flag(self.execute, 'x')
        )
    }
}

/// A custom check replacing all built-in path checks.
pub type PathPredicate = Arc<dyn Fn(&Path) -> Result<(), String> + Send + Sync>;

/// Accepts paths satisfying existence, type, access and extension constraints (all must hold).
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::{Existence, PathFilter, PathKind, ValueFilter};
///
/// let filter = PathFilter::new()
///     .existence(Existence::MustExist)
///     .kind(PathKind::Directory);
/// assert!(filter.parse(".").is_ok());
/// assert!(filter.parse("./definitely/not/here").is_err());
/// ```
#[derive(Clone)]
pub struct PathFilter {
    existence: Existence,
    kind: PathKind,
    access: Access,
    extension: Option<String>,
    predicate: Option<PathPredicate>,
}

impl std::fmt::Debug for PathFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathFilter")
            .field("existence", &self.existence)
            .field("kind", &self.kind)
            .field("access", &self.access)
            .field("extension", &self.extension)
            .field("predicate", &self.predicate.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PathFilter {
    /// A path filter that accepts anything.
    pub fn new() -> Self {
        Self {
            existence: Existence::Irrelevant,
            kind: PathKind::Irrelevant,
            access: Access::none(),
            extension: None,
            predicate: None,
        }
    }

    /// Set the existence requirement.
    pub fn existence(mut self, existence: Existence) -> Self {
        self.existence = existence;
        self
    }

    /// Required path type; only checked when the path exists.
    pub fn kind(mut self, kind: PathKind) -> Self {
        self.kind = kind;
        self
    }

    /// Required access; only checked when the path exists.
    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Required (case insensitive) name suffix, such as `.toml`.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension.replace(extension.into());
        self
    }

    /// Replace every built-in check with `predicate`.
    pub fn predicate(
        mut self,
        predicate: impl Fn(&Path) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.predicate.replace(Arc::new(predicate));
        self
    }

    /// The built-in constraints: existence, kind, access and extension.
    pub fn constraints(&self) -> (Existence, PathKind, Access, Option<&str>) {
        (
            self.existence,
            self.kind,
            self.access,
            self.extension.as_deref(),
        )
    }

    fn check(&self, path: &Path) -> Result<(), String> {
        let metadata = fs::metadata(path).ok();

        match (self.existence, &metadata) {
            (Existence::MustExist, None) => return Err("does not exist".to_string()),
            (Existence::MustNotExist, Some(_)) => return Err("already exists".to_string()),
            _ => {}
        }

        if let Some(metadata) = &metadata {
            match self.kind {
                PathKind::File if !metadata.is_file() => {
                    return Err("is not a file".to_string())
                }
                PathKind::Directory if !metadata.is_dir() => {
                    return Err("is not a directory".to_string())
                }
                _ => {}
            }

            let granted = granted_access(path, metadata);

            if (self.access.read && !granted.read)
                || (self.access.write && !granted.write)
                || (self.access.execute && !granted.execute)
            {
                return Err(format!(
                    "does not grant access '{}' (has '{granted}')",
                    self.access
                ));
            }
        }

        if let Some(extension) = &self.extension {
            let name = path.to_string_lossy().to_lowercase();

            if !name.ends_with(&extension.to_lowercase()) {
                return Err(format!("does not end with '{extension}'"));
            }
        }

        Ok(())
    }
}

fn granted_access(path: &Path, metadata: &fs::Metadata) -> Access {
    if metadata.is_dir() {
        let listable = fs::read_dir(path).is_ok();
        Access {
            read: listable,
            write: !metadata.permissions().readonly(),
            execute: listable,
        }
    } else {
        Access {
            read: fs::File::open(path).is_ok(),
            write: !metadata.permissions().readonly(),
            execute: is_executable(metadata),
        }
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}

impl ValueFilter for PathFilter {
    fn parse(&self, raw: &str) -> Result<Value, FilterError> {
        let path = PathBuf::from(raw);
        let result = match &self.predicate {
            Some(predicate) => predicate(&path),
            None => self.check(&path),
        };

        result
            .map(|()| Value::Path(path))
            .map_err(|reason| FilterError::new(format!("'{raw}' {reason}.")))
    }

    fn describe(&self) -> String {
        if self.predicate.is_some() {
            return "custom path".to_string();
        }

        let mut parts = Vec::default();

        match self.existence {
            Existence::MustExist => parts.push("existing".to_string()),
            Existence::MustNotExist => parts.push("non-existing".to_string()),
            Existence::Irrelevant => {}
        }

        parts.push(
            match self.kind {
                PathKind::File => "file",
                PathKind::Directory => "directory",
                PathKind::Irrelevant => "path",
            }
            .to_string(),
        );

        if self.access != Access::none() {
            parts.push(format!("({})", self.access));
        }

        if let Some(extension) = &self.extension {
            parts.push(format!("ending with '{extension}'"));
        }

        parts.join(" ")
    }
}
