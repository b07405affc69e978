use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::Error;
use crate::sites::{Site, SiteList};

const DIR_NAME: &str = "checker-site";
const DATA_FILE: &str = "data.json";
const RESPONSE_FILE: &str = "response.json";
const CONFIG_FILE: &str = "config.toml";

/// The directory holding the site list, the last result, and optional settings.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `CHECKER_SITE_DIR` if set, otherwise `checker-site` under the home directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HomeDirUnavailable`] when neither is available.
    pub fn locate() -> Result<Self, Error> {
        if let Ok(dir) = dotenvy::var("CHECKER_SITE_DIR") {
            return Ok(Self::new(dir));
        }

        dirs::home_dir()
            .map(|home| Self::new(home.join(DIR_NAME)))
            .ok_or(Error::HomeDirUnavailable)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    pub fn response_path(&self) -> PathBuf {
        self.root.join(RESPONSE_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Creates whatever is missing. Existing files are left as they are.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a file cannot be created.
    pub fn ensure(&self) -> Result<(), Error> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
            info!("Created workspace at {}", self.root.display());
        }

        let data_path = self.data_path();
        if !data_path.exists() {
            let example = SiteList::new(vec![Site::new("site example", "https://www.rust-lang.org")]);
            fs::write(&data_path, serde_json::to_string_pretty(&example)?)?;
            info!("Wrote example site list to {}", data_path.display());
        }

        let response_path = self.response_path();
        if !response_path.exists() {
            fs::File::create(&response_path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_creates_directory_and_files() {
        let temp = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(temp.path().join(DIR_NAME));

        workspace.ensure().expect("Failed to bootstrap workspace");

        assert!(workspace.root().is_dir());
        assert!(workspace.response_path().is_file());
        assert_eq!(fs::read_to_string(workspace.response_path()).unwrap(), "");

        let example = SiteList::load(workspace.data_path()).expect("Default data should load");
        assert_eq!(example.len(), 1);
        assert_eq!(example.sites[0].name, "site example");
        assert!(!workspace.config_path().exists());
    }

    #[test]
    fn test_ensure_keeps_existing_files() {
        let temp = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(temp.path());
        let data = r#"{ "sites": [ { "name": "mine", "url": "https://example.org" } ] }"#;
        fs::write(workspace.data_path(), data).unwrap();
        fs::write(workspace.response_path(), "{}").unwrap();

        workspace.ensure().unwrap();

        assert_eq!(fs::read_to_string(workspace.data_path()).unwrap(), data);
        assert_eq!(fs::read_to_string(workspace.response_path()).unwrap(), "{}");
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(temp.path().join("nested").join(DIR_NAME));

        workspace.ensure().unwrap();
        let first = fs::read_to_string(workspace.data_path()).unwrap();
        workspace.ensure().unwrap();

        assert_eq!(fs::read_to_string(workspace.data_path()).unwrap(), first);
    }

    #[test]
    fn test_paths_live_under_root() {
        let workspace = Workspace::new("/tmp/somewhere");
        assert_eq!(workspace.data_path(), Path::new("/tmp/somewhere/data.json"));
        assert_eq!(workspace.response_path(), Path::new("/tmp/somewhere/response.json"));
        assert_eq!(workspace.config_path(), Path::new("/tmp/somewhere/config.toml"));
    }
}
