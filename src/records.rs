//records.rs

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::StringRecord;
use flate2::read::MultiGzDecoder;
use log::debug;

use crate::error::{NovelError, Result};

/// Column names of a compareNovel table, in file order.
pub const COMPARISON_COLUMNS: [&str; 13] = [
    "CHROM",
    "GENE",
    "TISSUE",
    "DIST_FROM_ANNOT",
    "PAS",
    "ID",
    "CELL_LINE",
    "CLEAVAGE_SITE_CENTROID",
    "SCORE",
    "MEDIAN_LEFT",
    "MEDIAN_RIGHT",
    "MED_DIFF",
    "CLOSEST_UTR3_ATTR",
];

/// Column names of the reference sample table. The file itself has no header.
pub const REFERENCE_COLUMNS: [&str; 5] = ["TISSUE", "GENDER", "ID", "SOURCE", "PATH"];

/// One row of a compareNovel table: a cleavage site observed in one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    pub chromosome: String,
    pub gene: String,
    pub tissue: String,
    pub distance: f64,
    pub pas: String,
    pub sample_id: String,
    pub cell_line: String,
    pub cleavage_site: u64,
    pub score: f64,
    pub median_left: f64,
    pub median_right: f64,
    pub median_diff: f64,
    pub utr3_attr: String,
}

impl ComparisonRecord {
    pub fn site_key(&self) -> SiteKey {
        SiteKey {
            chr: self.chromosome.clone(),
            pos: self.cleavage_site,
        }
    }
}

/// One sample of a reference cohort (GTEx-like).
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSample {
    pub tissue: String,
    pub gender: String,
    pub id: String,
    pub source: String,
    pub path: PathBuf,
}

/// Genomic coordinate a group of comparison records shares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteKey {
    pub chr: String,
    pub pos: u64,
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.chr, self.pos)
    }
}

/// Open a tab separated table, decompressing `.gz` files on the fly.
fn open_table(path: &Path, has_header: bool) -> Result<csv::Reader<Box<dyn Read>>> {
    let file = File::open(path).map_err(|e| NovelError::io(path, e))?;
    let input: Box<dyn Read> = if path.extension().map_or(false, |ext| ext == "gz") {
        Box::new(MultiGzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_header)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(input))
}

/// A single row together with where it came from, so that parse failures
/// can name the file, line and column.
struct Row<'a> {
    path: &'a Path,
    line: u64,
    record: &'a StringRecord,
    columns: &'a [&'static str],
}

impl<'a> Row<'a> {
    fn new(path: &'a Path, record: &'a StringRecord, columns: &'a [&'static str]) -> Result<Self> {
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != columns.len() {
            return Err(NovelError::Arity {
                path: path.to_path_buf(),
                line,
                expected: columns.len(),
                found: record.len(),
            });
        }
        Ok(Self { path, line, record, columns })
    }

    fn text(&self, idx: usize) -> String {
        self.record[idx].to_string()
    }

    fn number<T: FromStr>(&self, idx: usize) -> Result<T> {
        let value = &self.record[idx];
        value.parse::<T>().map_err(|_| NovelError::Column {
            path: self.path.to_path_buf(),
            line: self.line,
            column: self.columns[idx],
            value: value.to_string(),
        })
    }
}

/// Read a compareNovel table. `has_header` skips the first line.
pub fn read_comparison_records(path: &Path, has_header: bool) -> Result<Vec<ComparisonRecord>> {
    let mut reader = open_table(path, has_header)?;
    let mut records = Vec::new();

    for result in reader.records() {
        let raw = result.map_err(|source| NovelError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row = Row::new(path, &raw, &COMPARISON_COLUMNS)?;

        records.push(ComparisonRecord {
            chromosome: row.text(0),
            gene: row.text(1),
            tissue: row.text(2),
            distance: row.number(3)?,
            pas: row.text(4),
            sample_id: row.text(5),
            cell_line: row.text(6),
            cleavage_site: row.number(7)?,
            score: row.number(8)?,
            median_left: row.number(9)?,
            median_right: row.number(10)?,
            median_diff: row.number(11)?,
            utr3_attr: row.text(12),
        });
    }

    debug!("Read {} comparison records from {}", records.len(), path.display());
    Ok(records)
}

/// Read the reference sample table (no header line).
pub fn read_reference_samples(path: &Path) -> Result<Vec<ReferenceSample>> {
    let mut reader = open_table(path, false)?;
    let mut samples = Vec::new();

    for result in reader.records() {
        let raw = result.map_err(|source| NovelError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row = Row::new(path, &raw, &REFERENCE_COLUMNS)?;

        samples.push(ReferenceSample {
            tissue: row.text(0),
            gender: row.text(1),
            id: row.text(2),
            source: row.text(3),
            path: PathBuf::from(row.text(4)),
        });
    }

    debug!("Read {} reference samples from {}", samples.len(), path.display());
    Ok(samples)
}
