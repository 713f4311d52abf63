//tracks.rs

use std::fmt;
use std::fs;
use std::path::PathBuf;

use bigtools::BigWigRead;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::records::ComparisonRecord;
use crate::site_groups::NovelSite;

/// Feature tracks the browser packs for every site.
const PACKED_TRACKS: [&str; 4] = ["knownGene", "refGene", "acembly", "ensGene"];

/// Which cohort a bigWig belongs to; decides where the coverage file is read from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cohort {
    Ccle,
    Gtex,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "plus"),
            Strand::Minus => write!(f, "minus"),
        }
    }
}

impl Strand {
    pub fn symbol(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

/// Builds the custom track text uploaded to the genome browser.
pub struct TrackBuilder<'a> {
    config: &'a Config,
    rng: StdRng,
}

impl<'a> TrackBuilder<'a> {
    /// A builder with random track colours, or reproducible ones for a given seed.
    pub fn new(config: &'a Config, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    /// Browser settings centering the view on `pos`.
    pub fn browser_block(&self, chrom: &str, pos: u64) -> String {
        let start = pos.saturating_sub(self.config.window);
        let end = pos + self.config.window;
        let mut browser = format!("browser position {}:{}-{}\n", chrom, start, end);
        browser.push_str("browser hide all\n");
        for track in PACKED_TRACKS {
            browser.push_str(&format!("browser pack {}\n", track));
        }
        browser
    }

    fn random_colour(&mut self) -> String {
        let r: u8 = self.rng.random();
        let g: u8 = self.rng.random();
        let b: u8 = self.rng.random();
        format!("{},{},{}", r, g, b)
    }

    /// Copy `<id>.bw` of a cohort into the web root unless it is already there.
    /// Returns `None` if the file can not be made available.
    fn stage_bigwig(&self, cohort: Cohort, id: &str, chrom: &str) -> Option<PathBuf> {
        let file_name = format!("{}.bw", id);
        let target = self.config.web_root.join(&file_name);

        if !target.is_file() {
            let root = match cohort {
                Cohort::Ccle => &self.config.ccle_bigwig_root,
                Cohort::Gtex => &self.config.gtex_bigwig_root,
            };
            let source = root.join(&file_name);
            debug!("Copying bigwig track for {} from {}", id, source.display());
            if let Err(e) = fs::copy(&source, &target) {
                warn!("No bigwig track for {} ({}): {}", id, source.display(), e);
                return None;
            }
        }

        if self.config.check_bigwig {
            match BigWigRead::open_file(target.as_path()) {
                Ok(bw) => {
                    if !bw.chroms().iter().any(|c| c.name == chrom) {
                        debug!("{} has no coverage on {}", file_name, chrom);
                    }
                }
                Err(e) => {
                    warn!("Skipping unreadable bigwig {}: {:?}", target.display(), e);
                    return None;
                }
            }
        }

        Some(target)
    }

    /// One bigWig track line per sample that has a coverage file.
    pub fn bigwig_tracks(&mut self, cohort: Cohort, ids: &[&str], chrom: &str) -> String {
        let mut result = String::new();
        for &id in ids {
            if self.stage_bigwig(cohort, id, chrom).is_none() {
                continue;
            }
            let colour = self.random_colour();
            let big_data_url = self.config.public_file_url(&format!("{}.bw", id));
            result.push_str(&format!(
                "track type=bigWig name=\"{}\" description=\"genomecov bigwig track for {}\" color=\"{}\" visibility=full bigDataUrl={}\n",
                id, id, colour, big_data_url
            ));
        }
        result
    }

    /// Precomputed cleavage site bedGraph of a sample, without its own track line.
    pub fn bedgraph_track(&self, id: &str, strand: Strand) -> Option<String> {
        let path = self.config.bedgraph_root.join(format!("{}.{}.bg", id, strand));
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No {} strand bedGraph for {} ({}): {}", strand, id, path.display(), e);
                return None;
            }
        };
        let data: String = content.lines().skip(1).map(|line| format!("{}\n", line)).collect();
        Some(format!(
            "track type=bedGraph name={}_novel_site description=\"Cleavage Sites for {} transcripts in {}\" color=\"0,0,255\" visibility=full\n{}",
            id,
            strand.symbol(),
            id,
            data
        ))
    }

    /// Point annotation of the site itself.
    pub fn novel_track(&self, record: &ComparisonRecord) -> String {
        let mut result = format!(
            "track name=\"Novel Site\" description=\"Novel site {}\" color=\"255,50,50\" visibility=full\n",
            record.cleavage_site
        );
        result.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            record.chromosome,
            record.cleavage_site.saturating_sub(1),
            record.cleavage_site,
            record.score
        ));
        result
    }

    /// The complete custom track text for one site.
    pub fn assemble(&mut self, site: &NovelSite, contrast: Option<&str>, reference_id: &str) -> String {
        let rep = &site.representative;
        let chrom = rep.chromosome.as_str();

        let mut samples = vec![rep.sample_id.as_str()];
        if let Some(other) = contrast {
            samples.push(other);
        }

        let mut text = self.browser_block(chrom, rep.cleavage_site);
        text.push_str(&self.bigwig_tracks(Cohort::Ccle, &samples, chrom));
        for strand in [Strand::Plus, Strand::Minus] {
            if let Some(track) = self.bedgraph_track(&rep.sample_id, strand) {
                text.push_str(&track);
            }
        }
        text.push_str(&self.novel_track(rep));
        text.push_str(&self.bigwig_tracks(Cohort::Gtex, &[reference_id], chrom));
        text
    }
}
