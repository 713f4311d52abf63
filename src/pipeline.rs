//pipeline.rs

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Serialize;

use crate::browser::ImageRenderer;
use crate::config::Config;
use crate::error::{NovelError, Result};
use crate::filter::{filter_records, Predicate};
use crate::records::{ComparisonRecord, ReferenceSample};
use crate::reference_matcher::{find_contrasting_sample, find_reference, RefPredicate};
use crate::site_groups::{group_records, remove_same_sample_groups, select_novel_sites, NovelSite, SiteGroups};
use crate::tissue_map::{ccle_to_gtex, is_ccle_tissue};
use crate::tracks::TrackBuilder;

/// Column names of the run summary, in `SiteReport` field order.
pub const SUMMARY_COLUMNS: [&str; 8] = [
    "site",
    "gene",
    "tissue",
    "n_samples",
    "sample_id",
    "reference_id",
    "contrast_id",
    "output",
];

/// Outcome for one rendered site; one row of the run summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteReport {
    pub site: String,
    pub gene: String,
    pub tissue: String,
    pub n_samples: usize,
    pub sample_id: String,
    pub reference_id: String,
    pub contrast_id: Option<String>,
    pub output: PathBuf,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    predicates: Vec<Predicate>,
    seed: Option<u64>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, predicates: Vec<Predicate>, seed: Option<u64>) -> Self {
        Self { config, predicates, seed }
    }

    /// Filter, group and dedupe the records and pick the novel sites.
    pub fn candidate_sites(&self, records: Vec<ComparisonRecord>) -> (SiteGroups, Vec<NovelSite>) {
        let total = records.len();
        let records = filter_records(records, &self.predicates);
        if records.len() != total {
            info!("{} of {} records pass the filters", records.len(), total);
        }

        let groups = group_records(records);
        let n_groups = groups.len();
        let groups = remove_same_sample_groups(groups);
        info!(
            "{} cleavage sites, {} after removing repeated single-sample sites",
            n_groups,
            groups.len()
        );

        let sites = select_novel_sites(&groups);
        info!("{} novel sites supported by several samples of one tissue", sites.len());
        (groups, sites)
    }

    /// Track text for one site, or `None` if no reference sample matches its tissue.
    pub fn site_tracks(
        &self,
        builder: &mut TrackBuilder,
        site: &NovelSite,
        groups: &SiteGroups,
        references: &[ReferenceSample],
    ) -> Option<(String, String, Option<String>)> {
        if !is_ccle_tissue(&site.tissue) {
            warn!("{} is not a known CCLE tissue", site.tissue);
        }
        let reference = match find_reference(references, &[RefPredicate::tissue_eq(&site.tissue)]) {
            Some(reference) => reference,
            None => {
                warn!(
                    "No gtex could be found for {} ({})",
                    site.key,
                    ccle_to_gtex(&site.tissue).unwrap_or(site.tissue.as_str())
                );
                return None;
            }
        };

        let contrast = find_contrasting_sample(site, groups);
        if contrast.is_none() {
            warn!("No sample from another tissue to contrast {} with", site.key);
        }

        let text = builder.assemble(site, contrast, &reference.id);
        Some((text, reference.id.clone(), contrast.map(str::to_string)))
    }

    /// Render every novel site. Sites without a reference sample are skipped;
    /// any other failure ends the run.
    pub fn run<R: ImageRenderer + ?Sized>(
        &self,
        records: Vec<ComparisonRecord>,
        references: &[ReferenceSample],
        renderer: &R,
    ) -> Result<Vec<SiteReport>> {
        let (groups, sites) = self.candidate_sites(records);
        let mut builder = TrackBuilder::new(self.config, self.seed);
        let mut reports = Vec::with_capacity(sites.len());

        let pb = ProgressBar::new(sites.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{bar:40}] {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for site in &sites {
            pb.set_message(site.key.to_string());
            info!("Novel site {} ({} samples, {})", site.key, site.n_samples, site.tissue);

            if let Some((text, reference_id, contrast_id)) =
                self.site_tracks(&mut builder, site, &groups, references)
            {
                let rep = &site.representative;
                let name = format!("{}_{}_{}", rep.sample_id, rep.chromosome, rep.cleavage_site);
                let output = renderer.render(&name, &text)?;
                pb.suspend(|| println!("{}", output.display()));

                reports.push(SiteReport {
                    site: site.key.to_string(),
                    gene: rep.gene.clone(),
                    tissue: site.tissue.clone(),
                    n_samples: site.n_samples,
                    sample_id: rep.sample_id.clone(),
                    reference_id,
                    contrast_id,
                    output,
                });
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!("Rendered {} of {} novel sites", reports.len(), sites.len());
        Ok(reports)
    }
}

/// Write the run summary as a tab separated table. The header is written even
/// when no site was rendered.
pub fn write_summary(path: &Path, reports: &[SiteReport]) -> Result<()> {
    let to_error = |source: csv::Error| NovelError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(to_error)?;
    writer.write_record(SUMMARY_COLUMNS).map_err(to_error)?;
    for report in reports {
        writer.serialize(report).map_err(to_error)?;
    }
    writer.flush().map_err(|e| NovelError::io(path, e))?;
    Ok(())
}
