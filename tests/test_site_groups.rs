mod common;

use common::record;
use novel_pas::filter::{filter_records, Comparison, FilterField, Predicate};
use novel_pas::records::SiteKey;
use novel_pas::site_groups::{group_records, remove_same_sample_groups, select_novel_sites};

fn key(chr: &str, pos: u64) -> SiteKey {
    SiteKey { chr: chr.to_string(), pos }
}

#[test]
fn test_grouping_then_flatten_keeps_every_record() {
    let records = vec![
        record("chr1", 100, "A", "lung"),
        record("chr1", 200, "B", "lung"),
        record("chr1", 100, "C", "lung"),
        record("chr2", 100, "D", "skin"),
        record("chr1", 200, "B", "lung"),
    ];
    let groups = group_records(records.clone());
    assert_eq!(groups.len(), 3);

    let mut flat = groups.flatten();
    let mut expected = records;
    let order = |a: &novel_pas::records::ComparisonRecord, b: &novel_pas::records::ComparisonRecord| {
        (a.chromosome.as_str(), a.cleavage_site, a.sample_id.as_str())
            .cmp(&(b.chromosome.as_str(), b.cleavage_site, b.sample_id.as_str()))
    };
    flat.sort_by(order);
    expected.sort_by(order);
    assert_eq!(flat, expected);
}

#[test]
fn test_multi_sample_groups_survive_dedupe() {
    let groups = group_records(vec![
        record("chr1", 100, "A", "lung"),
        record("chr1", 100, "B", "lung"),
        record("chr1", 100, "B", "lung"),
        record("chr1", 300, "C", "lung"),
    ]);
    let kept = remove_same_sample_groups(groups);
    assert_eq!(kept.len(), 2);
    assert_eq!(kept.get(&key("chr1", 100)).unwrap().len(), 3);
    assert_eq!(kept.get(&key("chr1", 300)).unwrap().len(), 1);
}

#[test]
fn test_single_sample_duplicates_are_dropped() {
    let groups = group_records(vec![
        record("chr1", 100, "A", "lung"),
        record("chr1", 100, "A", "lung"),
        record("chr1", 500, "B", "lung"),
        record("chr1", 500, "C", "lung"),
    ]);
    let kept = remove_same_sample_groups(groups);
    assert!(kept.get(&key("chr1", 100)).is_none());

    let sites = select_novel_sites(&kept);
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].key, key("chr1", 500));
}

#[test]
fn test_three_records_two_samples_one_tissue_is_novel() {
    let groups = remove_same_sample_groups(group_records(vec![
        record("chr3", 4000, "S1", "kidney"),
        record("chr3", 4000, "S2", "kidney"),
        record("chr3", 4000, "S1", "kidney"),
    ]));
    let sites = select_novel_sites(&groups);
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].n_samples, 3);
    assert_eq!(sites[0].tissue, "kidney");
    assert_eq!(sites[0].representative.sample_id, "S1");
}

#[test]
fn test_mixed_tissues_and_singletons_are_not_novel() {
    let groups = remove_same_sample_groups(group_records(vec![
        record("chr1", 100, "A", "lung"),
        record("chr1", 100, "B", "skin"),
        record("chr1", 200, "C", "lung"),
    ]));
    assert!(select_novel_sites(&groups).is_empty());
}

#[test]
fn test_score_filter_keeps_boundary() {
    let mut low = record("chr1", 1, "A", "lung");
    low.score = 9.5;
    let mut edge = record("chr1", 2, "B", "lung");
    edge.score = 10.0;
    let mut high = record("chr1", 3, "C", "lung");
    high.score = 42.0;

    let kept = filter_records(
        vec![low, edge, high],
        &[Predicate::new(FilterField::Score, Comparison::Lt, 10.0)],
    );
    let ids: Vec<&str> = kept.iter().map(|r| r.sample_id.as_str()).collect();
    assert_eq!(ids, vec!["B", "C"]);
}

#[test]
fn test_any_predicate_excludes() {
    let mut a = record("chr1", 1, "A", "lung");
    a.median_diff = 90.0;
    let mut b = record("chr1", 2, "B", "lung");
    b.median_diff = 10.0;
    let mut c = record("chr1", 3, "C", "lung");
    c.median_diff = 90.0;
    c.score = 1.0;

    let predicates: Vec<Predicate> = ["med_diff:lt:80", "score:le:1"]
        .iter()
        .map(|p| p.parse().unwrap())
        .collect();
    let kept = filter_records(vec![a, b, c], &predicates);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].sample_id, "A");
}
