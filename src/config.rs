//config.rs

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;

use crate::error::{NovelError, Result};

/// Process wide settings: where the cohort files live, where track files are
/// published and which genome browser renders them.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// GTEx sample table (tissue, gender, id, source, path)
    pub reference_file: PathBuf,
    /// Folder holding `<ccle_id>.bw`
    pub ccle_bigwig_root: PathBuf,
    /// Folder holding `<gtex_id>.bw`
    pub gtex_bigwig_root: PathBuf,
    /// Folder holding `<ccle_id>.plus.bg` / `<ccle_id>.minus.bg`
    pub bedgraph_root: PathBuf,
    /// Local folder served by the web server
    pub web_root: PathBuf,
    /// Public url of `web_root`, with trailing slash
    pub public_url: String,
    /// Genome browser track page
    pub browser_endpoint: String,
    /// Base the hard-copy links on the browser page are relative to
    pub hardcopy_base: String,
    pub genome: String,
    /// Bases shown on either side of a site
    pub window: u64,
    /// Position of the hard-copy link, counted from the last anchor
    pub anchor_offset: usize,
    /// Open staged bigWig files and skip the ones that fail
    pub check_bigwig: bool,
    pub timeout_secs: u64,
    /// Attempts per request when the browser answers 429
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_file: PathBuf::from("/projects/dmacmillanprj2/polya/gtex/gtex_tissue_sample_ids"),
            ccle_bigwig_root: PathBuf::from("/projects/btl/polya/ccle_bigwigs"),
            gtex_bigwig_root: PathBuf::from("/projects/btl/polya/gtex_bigwigs"),
            bedgraph_root: PathBuf::from("/projects/dmacmillanprj2/polya/ccle/filteredKleats/kleats_plus_added"),
            web_root: PathBuf::from("/gsc/www/bcgsc.ca/downloads/dmacmillan"),
            public_url: "http://bcgsc.ca/downloads/dmacmillan/".to_string(),
            browser_endpoint: "http://genome.ucsc.edu/cgi-bin/hgTracks".to_string(),
            hardcopy_base: "http://genome.ucsc.edu/cgi-bin/".to_string(),
            genome: "hg19".to_string(),
            window: 2000,
            anchor_offset: 7,
            check_bigwig: true,
            timeout_secs: 120,
            max_attempts: 3,
        }
    }
}

impl Config {
    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| NovelError::io(path, e))?;
        let config: Config = toml::from_str(&text).map_err(|source| NovelError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.normalized())
    }

    /// `config.toml` in the user's config directory, if there is one.
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("ca", "bcgsc", "novel-pas")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .filter(|path| path.is_file())
    }

    /// The explicit file if given, else the user config file, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                info!("Reading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => match Self::user_config_path() {
                Some(path) => {
                    info!("Reading configuration from {}", path.display());
                    Self::from_file(&path)
                }
                None => {
                    debug!("No configuration file found - using built-in defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Urls are joined by plain concatenation, so make sure the bases end in '/'.
    pub fn normalized(mut self) -> Self {
        for url in [&mut self.public_url, &mut self.hardcopy_base] {
            if !url.ends_with('/') {
                url.push('/');
            }
        }
        if self.anchor_offset == 0 {
            self.anchor_offset = 1;
        }
        if self.max_attempts == 0 {
            self.max_attempts = 1;
        }
        self
    }

    /// Url of a file published in `web_root`.
    pub fn public_file_url(&self, name: &str) -> String {
        format!("{}{}", self.public_url, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "web_root = \"/tmp/web\"").unwrap();
        writeln!(file, "public_url = \"http://example.org/tracks\"").unwrap();
        writeln!(file, "window = 500").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.web_root, PathBuf::from("/tmp/web"));
        assert_eq!(config.public_url, "http://example.org/tracks/");
        assert_eq!(config.window, 500);
        assert_eq!(config.genome, "hg19");
        assert_eq!(config.anchor_offset, 7);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "webroot = \"/tmp/web\"").unwrap();
        assert!(matches!(Config::from_file(file.path()), Err(NovelError::Config { .. })));
    }
}
