#![allow(dead_code)]

use std::fs;
use std::path::Path;

use novel_pas::records::{ComparisonRecord, ReferenceSample};

pub fn record(chr: &str, pos: u64, sample: &str, tissue: &str) -> ComparisonRecord {
    ComparisonRecord {
        chromosome: chr.to_string(),
        gene: format!("GENE{}", pos),
        tissue: tissue.to_string(),
        distance: 150.0,
        pas: "AATAAA".to_string(),
        sample_id: sample.to_string(),
        cell_line: format!("{}_LINE", sample),
        cleavage_site: pos,
        score: 20.0,
        median_left: 40.0,
        median_right: 5.0,
        median_diff: 35.0,
        utr3_attr: "utr3".to_string(),
    }
}

pub fn reference(tissue: &str, id: &str) -> ReferenceSample {
    ReferenceSample {
        tissue: tissue.to_string(),
        gender: "female".to_string(),
        id: id.to_string(),
        source: "gtex".to_string(),
        path: format!("/data/{}.bam", id).into(),
    }
}

/// Write a compareNovel table with header for the given records.
pub fn write_compare_novel(path: &Path, records: &[ComparisonRecord]) {
    let mut text = String::from(
        "CHROM\tGENE\tTISSUE\tDIST_FROM_ANNOT\tPAS\tID\tCELL_LINE\tCLEAVAGE_SITE_CENTROID\tSCORE\tMEDIAN_LEFT\tMEDIAN_RIGHT\tMED_DIFF\tCLOSEST_UTR3_ATTR\n",
    );
    for r in records {
        text.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            r.chromosome,
            r.gene,
            r.tissue,
            r.distance,
            r.pas,
            r.sample_id,
            r.cell_line,
            r.cleavage_site,
            r.score,
            r.median_left,
            r.median_right,
            r.median_diff,
            r.utr3_attr
        ));
    }
    fs::write(path, text).unwrap();
}

pub fn write_references(path: &Path, samples: &[ReferenceSample]) {
    let text: String = samples
        .iter()
        .map(|s| format!("{}\t{}\t{}\t{}\t{}\n", s.tissue, s.gender, s.id, s.source, s.path.display()))
        .collect();
    fs::write(path, text).unwrap();
}
