use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use bag_config_application::{ApplicationError, ResourceFetcher};

/// Serves site-style locators (`/models/a.glb`) from a local directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve_path(&self, locator: &str) -> Result<PathBuf, ApplicationError> {
        let relative = locator.trim().trim_start_matches('/');
        if relative.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "locator must not be empty".to_string(),
            ));
        }
        let relative_path = Path::new(relative);
        if relative_path
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir))
        {
            return Err(ApplicationError::InvalidInput(format!(
                "locator escapes the asset root: {locator}"
            )));
        }
        Ok(self.root.join(relative_path))
    }
}

impl ResourceFetcher for FsFetcher {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, ApplicationError> {
        let path = self.resolve_path(locator)?;
        std::fs::read(&path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => ApplicationError::NotFound(path.display().to_string()),
            _ => ApplicationError::Io(format!("{}: {error}", path.display())),
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_locators_relative_to_root() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("models")).expect("mkdir");
        std::fs::write(dir.path().join("models/templates.json"), b"[]").expect("write");

        let fetcher = FsFetcher::new(dir.path());
        let bytes = fetcher.fetch("/models/templates.json").expect("fetch");
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let fetcher = FsFetcher::new(dir.path());
        assert!(matches!(
            fetcher.fetch("/models/nope.glb"),
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[test]
    fn rejects_parent_components() {
        let fetcher = FsFetcher::new("public");
        assert!(matches!(
            fetcher.fetch("/../secret.txt"),
            Err(ApplicationError::InvalidInput(_))
        ));
        assert!(matches!(
            fetcher.fetch("/"),
            Err(ApplicationError::InvalidInput(_))
        ));
    }
}
