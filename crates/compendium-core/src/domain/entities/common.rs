use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A location inside the project, relative to the project root.
///
/// Never absolute and never contains a `..` component, so joining it onto
/// the project root cannot leave the project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// For literal paths.
    ///
    /// # Panics
    /// If `path` is absolute or climbs out with `..`; see [`Self::try_new`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        assert!(
            !path.is_absolute() && !escapes_root(&path),
            "not a project-relative path: {}",
            path.display()
        );
        Self(path)
    }

    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() || escapes_root(&path) {
            Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            })
        } else {
            Ok(Self(path))
        }
    }

    /// Build a path from semantic segments, e.g. `["studies", "pilot", "code"]`.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        Self(segments.into_iter().fold(PathBuf::new(), |acc, s| acc.join(s)))
    }

    /// Append a caller-supplied segment such as a study name.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, DomainError> {
        let segment = segment.as_ref();
        if segment.is_absolute() || escapes_root(segment) {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: segment.display().to_string(),
            });
        }
        Ok(Self(self.0.join(segment)))
    }

    /// Join a segment that is known at compile time to be relative.
    pub(crate) fn child(&self, segment: &str) -> Self {
        Self(self.0.join(segment))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Forward-slash form, identical on every platform.
    ///
    /// This is the form written into generated artifacts.
    pub fn to_portable(&self) -> String {
        self.0
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }

    pub fn extension(&self) -> Option<&str> {
        self.0.extension().and_then(|e| e.to_str())
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

fn escapes_root(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_portable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_join_without_separator_literals() {
        let path = RelativePath::from_segments(["studies", "pilot", "code"]);
        assert_eq!(path.to_portable(), "studies/pilot/code");
        assert_eq!(path.as_path(), Path::new("studies").join("pilot").join("code"));
    }

    #[test]
    fn try_new_rejects_absolute_and_parent_segments() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
        assert!(RelativePath::try_new("../outside").is_err());
        assert!(RelativePath::try_new("studies/pilot").is_ok());
    }

    #[test]
    fn join_keeps_relative_invariant() {
        let base = RelativePath::from("studies");
        assert!(base.join("pilot").is_ok());
        assert!(base.join("/abs").is_err());
        assert!(base.join("..").is_err());
    }

    #[test]
    fn display_is_portable() {
        let path = RelativePath::from_segments(["literature", "_references.bib"]);
        assert_eq!(path.to_string(), "literature/_references.bib");
        assert_eq!(path.extension(), Some("bib"));
        assert_eq!(path.file_name(), Some("_references.bib"));
    }
}
