use crate::error::AppError;
use std::path::Path;

/// Ordered list of image paths to ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    /// One path per line; lines are trimmed and blank lines skipped.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { entries }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        log::info!("Reading manifest {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| AppError::InvalidManifest {
            path: path.display().to_string(),
            source,
        })?;
        let manifest = Self::parse(&text);
        log::debug!("Manifest lists {} entries", manifest.len());
        Ok(manifest)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Manifest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_lines_and_skips_blanks() {
        let manifest = Manifest::parse("  a.jpg  \n\n\t\nsub/b.jpg\r\n   \nc.jpg");
        assert_eq!(manifest.entries(), ["a.jpg", "sub/b.jpg", "c.jpg"]);
    }

    #[test]
    fn empty_text_gives_empty_manifest() {
        assert!(Manifest::parse("\n \n").is_empty());
    }

    #[test]
    fn missing_file_is_invalid_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::from_file(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, AppError::InvalidManifest { .. }));
    }

    #[test]
    fn reads_manifest_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index");
        std::fs::write(&path, "one.jpg\ntwo.jpg\n").unwrap();
        assert_eq!(Manifest::from_file(&path).unwrap().len(), 2);
    }
}
