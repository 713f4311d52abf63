//site_groups.rs

use std::collections::{HashMap, HashSet};

use crate::records::{ComparisonRecord, SiteKey};

/// Comparison records grouped by cleavage site.
/// Keys keep the order in which they were first seen, and records keep
/// their input order inside a group.
#[derive(Debug, Default, Clone)]
pub struct SiteGroups {
    groups: Vec<(SiteKey, Vec<ComparisonRecord>)>,
    index: HashMap<SiteKey, usize>,
}

impl SiteGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ComparisonRecord) {
        let key = record.site_key();
        match self.index.get(&key) {
            Some(&idx) => self.groups[idx].1.push(record),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![record]));
            }
        }
    }

    pub fn get(&self, key: &SiteKey) -> Option<&[ComparisonRecord]> {
        self.index.get(key).map(|&idx| self.groups[idx].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SiteKey, &[ComparisonRecord])> {
        self.groups.iter().map(|(key, records)| (key, records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All records in group order.
    pub fn flatten(&self) -> Vec<ComparisonRecord> {
        self.groups.iter().flat_map(|(_, records)| records.iter().cloned()).collect()
    }

    fn insert_group(&mut self, key: SiteKey, records: Vec<ComparisonRecord>) {
        self.index.insert(key.clone(), self.groups.len());
        self.groups.push((key, records));
    }
}

/// A coordinate supported by several samples of one tissue.
#[derive(Debug, Clone, PartialEq)]
pub struct NovelSite {
    pub key: SiteKey,
    pub representative: ComparisonRecord,
    pub n_samples: usize,
    pub tissue: String,
}

/// Group records by their cleavage site coordinate.
pub fn group_records(records: Vec<ComparisonRecord>) -> SiteGroups {
    let mut groups = SiteGroups::new();
    for record in records {
        groups.push(record);
    }
    groups
}

fn distinct<'a>(records: &'a [ComparisonRecord], field: impl Fn(&'a ComparisonRecord) -> &'a str) -> usize {
    records.iter().map(field).collect::<HashSet<&str>>().len()
}

/// Drop groups that report several sites which all come from one sample.
pub fn remove_same_sample_groups(groups: SiteGroups) -> SiteGroups {
    let mut kept = SiteGroups::new();
    for (key, records) in groups.groups {
        let n_sites = records.len();
        let n_samples = distinct(&records, |r| r.sample_id.as_str());
        if n_sites > 1 && n_samples == 1 {
            continue;
        }
        kept.insert_group(key, records);
    }
    kept
}

/// Pick the groups with more than one record and exactly one tissue.
/// The first record of a group represents it downstream.
pub fn select_novel_sites(groups: &SiteGroups) -> Vec<NovelSite> {
    groups
        .iter()
        .filter_map(|(key, records)| {
            let n_samples = records.len();
            let n_tissues = distinct(records, |r| r.tissue.as_str());
            if n_samples > 1 && n_tissues == 1 {
                let representative = records[0].clone();
                Some(NovelSite {
                    key: key.clone(),
                    tissue: representative.tissue.clone(),
                    representative,
                    n_samples,
                })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(chr: &str, pos: u64, sample: &str) -> ComparisonRecord {
        ComparisonRecord {
            chromosome: chr.to_string(),
            gene: "G".to_string(),
            tissue: "lung".to_string(),
            distance: 0.0,
            pas: "None".to_string(),
            sample_id: sample.to_string(),
            cell_line: "X".to_string(),
            cleavage_site: pos,
            score: 1.0,
            median_left: 0.0,
            median_right: 0.0,
            median_diff: 0.0,
            utr3_attr: "utr".to_string(),
        }
    }

    #[test]
    fn test_same_position_other_chromosome_is_own_group() {
        let groups = group_records(vec![rec("chr1", 10, "A"), rec("chr2", 10, "B")]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_group_keeps_encounter_order() {
        let groups = group_records(vec![
            rec("chr1", 30, "A"),
            rec("chr1", 10, "B"),
            rec("chr1", 30, "C"),
        ]);
        let keys: Vec<u64> = groups.iter().map(|(k, _)| k.pos).collect();
        assert_eq!(keys, vec![30, 10]);
        let ids: Vec<&str> = groups
            .get(&SiteKey { chr: "chr1".to_string(), pos: 30 })
            .unwrap()
            .iter()
            .map(|r| r.sample_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "C"]);
    }
}
