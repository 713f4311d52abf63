//tissue_map.rs
//
// GTEx and CCLE name their tissues independently. This is the hand curated
// correspondence between both vocabularies.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// GTEx tissue -> CCLE tissue; `None` where CCLE has no counterpart.
pub const GTEX_TO_CCLE: [(&str, Option<&str>); 16] = [
    ("Bladder", None),
    ("Brain", Some("central_nervous_system")),
    ("Breast", Some("breast")),
    ("Colon", Some("large_intestine")),
    ("Esophagus", Some("oesophagus")),
    ("Kidney", Some("kidney")),
    ("Liver", Some("liver")),
    ("Lung", Some("lung")),
    ("Ovary", Some("ovary")),
    ("Pancreas", Some("pancreas")),
    ("Prostate", Some("prostate")),
    ("Skin", Some("skin")),
    ("Stomach", Some("stomach")),
    ("Thyroid", Some("thyroid")),
    ("Uterus", None),
    ("Whole", None),
];

/// All CCLE tissue names seen in the cohort.
pub const CCLE_TISSUES: [&str; 24] = [
    "autonomic_ganglia",
    "biliary_tract",
    "bone",
    "breast",
    "central_nervous_system",
    "endometrium",
    "haematopoietic_and_lymphoid_tissue",
    "kidney",
    "large_intestine",
    "liver",
    "lung",
    "oesophagus",
    "ovary",
    "pancreas",
    "pleura",
    "prostate",
    "salivary_gland",
    "skin",
    "small_intestine",
    "soft_tissue",
    "stomach",
    "thyroid",
    "upper_aerodigestive_tract",
    "urinary_tract",
];

lazy_static! {
    static ref GTEX_INDEX: HashMap<&'static str, Option<&'static str>> =
        GTEX_TO_CCLE.iter().copied().collect();
    static ref CCLE_INDEX: HashMap<&'static str, &'static str> = GTEX_TO_CCLE
        .iter()
        .filter_map(|&(gtex, ccle)| ccle.map(|c| (c, gtex)))
        .collect();
}

/// CCLE name of a GTEx tissue. `None` for unknown or unmapped tissues.
pub fn gtex_to_ccle(gtex: &str) -> Option<&'static str> {
    GTEX_INDEX.get(gtex).copied().flatten()
}

/// GTEx name of a CCLE tissue, if GTEx has that tissue.
pub fn ccle_to_gtex(ccle: &str) -> Option<&'static str> {
    CCLE_INDEX.get(ccle).copied()
}

pub fn is_gtex_tissue(name: &str) -> bool {
    GTEX_INDEX.contains_key(name)
}

pub fn is_ccle_tissue(name: &str) -> bool {
    CCLE_TISSUES.contains(&name)
}
