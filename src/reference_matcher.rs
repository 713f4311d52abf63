//reference_matcher.rs

use log::debug;

use crate::filter::Comparison;
use crate::records::ReferenceSample;
use crate::site_groups::{NovelSite, SiteGroups};
use crate::tissue_map::{gtex_to_ccle, is_gtex_tissue};

/// Reference sample columns a lookup can test.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RefField {
    /// Compared in CCLE vocabulary: the sample's GTEx tissue is translated first.
    Tissue,
    Gender,
    Id,
    Source,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RefPredicate {
    pub field: RefField,
    pub op: Comparison,
    pub value: String,
}

impl RefPredicate {
    pub fn new(field: RefField, op: Comparison, value: &str) -> Self {
        Self {
            field,
            op,
            value: value.to_string(),
        }
    }

    /// Reference samples of the tissue matching a CCLE tissue name.
    pub fn tissue_eq(ccle_tissue: &str) -> Self {
        Self::new(RefField::Tissue, Comparison::Eq, ccle_tissue)
    }

    /// `None` means the predicate can not be evaluated for this sample.
    fn evaluate(&self, sample: &ReferenceSample) -> Option<bool> {
        let left = match self.field {
            RefField::Tissue => match gtex_to_ccle(&sample.tissue) {
                Some(ccle) => ccle,
                None => {
                    if is_gtex_tissue(&sample.tissue) {
                        debug!("GTEx tissue {} has no CCLE counterpart - skipping {}", sample.tissue, sample.id);
                    } else {
                        debug!("Unknown GTEx tissue {} - skipping {}", sample.tissue, sample.id);
                    }
                    return None;
                }
            },
            RefField::Gender => sample.gender.as_str(),
            RefField::Id => sample.id.as_str(),
            RefField::Source => sample.source.as_str(),
        };
        Some(self.op.holds(left, self.value.as_str()))
    }
}

/// First reference sample for which every predicate holds.
pub fn find_reference<'a>(
    samples: &'a [ReferenceSample],
    predicates: &[RefPredicate],
) -> Option<&'a ReferenceSample> {
    samples.iter().find(|sample| {
        predicates
            .iter()
            .all(|p| p.evaluate(sample).unwrap_or(false))
    })
}

/// Sample id of the first record outside the site's own group whose tissue
/// differs from the site's tissue.
pub fn find_contrasting_sample<'a>(site: &NovelSite, groups: &'a SiteGroups) -> Option<&'a str> {
    groups
        .iter()
        .filter(|(key, _)| **key != site.key)
        .flat_map(|(_, records)| records.iter())
        .find(|record| record.tissue != site.tissue)
        .map(|record| record.sample_id.as_str())
}
