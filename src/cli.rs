// src/cli.rs
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::filter::Predicate;

/// Find novel polyadenylation sites shared by several samples of one tissue
/// and render them in the UCSC genome browser.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    /// The data.compareNovel file output by compareNovel
    pub data: PathBuf,

    /// GTEx sample table (tissue, gender, id, source, path); overrides the config file
    #[arg(short = 'g', long)]
    pub gtex_data: Option<PathBuf>,

    /// Name for the run summary (<outdir>/<name>.tsv)
    #[arg(short = 'n', long, default_value = "result")]
    pub name: String,

    /// Path to write the images to (created if missing) [default: current directory]
    #[arg(short = 'o', long)]
    pub outdir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Exclude records where FIELD OP VALUE holds, e.g. med_diff:lt:80 (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "FIELD:OP:VALUE")]
    pub exclude: Vec<Predicate>,

    /// Folder served by the web server; overrides the config file
    #[arg(long)]
    pub web_root: Option<PathBuf>,

    /// Public url of the web root; overrides the config file
    #[arg(long)]
    pub public_url: Option<String>,

    /// Bases shown on either side of a site
    #[arg(short = 'w', long)]
    pub window: Option<u64>,

    /// Seed for the track colours
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only write the track files, do not contact the genome browser
    #[arg(long, default_value_t = false)]
    pub tracks_only: bool,

    /// The data file has no header line
    #[arg(long, default_value_t = false)]
    pub no_header: bool,

    /// Debug output
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Apply the command line overrides on top of a loaded configuration.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(path) = &self.gtex_data {
            config.reference_file = path.clone();
        }
        if let Some(path) = &self.web_root {
            config.web_root = path.clone();
        }
        if let Some(url) = &self.public_url {
            config.public_url = url.clone();
        }
        if let Some(window) = self.window {
            config.window = window;
        }
        config.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "novel-sites",
            "data.compareNovel",
            "-g",
            "gtex.tsv",
            "--public-url",
            "http://host/x",
            "-x",
            "score:lt:10",
            "-x",
            "med_diff:lt:80",
        ]);
        assert_eq!(cli.exclude.len(), 2);
        assert_eq!(cli.name, "result");

        let config = cli.apply(Config::default());
        assert_eq!(config.reference_file, PathBuf::from("gtex.tsv"));
        assert_eq!(config.public_url, "http://host/x/");
        assert_eq!(config.window, 2000);
    }

    #[test]
    fn test_bad_filter_is_rejected() {
        assert!(Cli::try_parse_from(["novel-sites", "data", "-x", "score:about:10"]).is_err());
    }
}
