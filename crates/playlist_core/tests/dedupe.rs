use std::collections::HashSet;

use playlist_core::{dedupe, dedupe_with_summary, Record};
use pretty_assertions::assert_eq;

fn rec(title: &str, id: &str) -> Record {
    Record::new("08:00", "Artist", title, id, "")
}

#[test]
fn first_occurrence_wins_and_order_is_kept() {
    let input = vec![
        rec("a", "1"),
        rec("b", "2"),
        rec("a again", "1"),
        rec("c", "3"),
        rec("b again", "2"),
    ];
    let unique = dedupe(&input);
    assert_eq!(unique, vec![rec("a", "1"), rec("b", "2"), rec("c", "3")]);
}

#[test]
fn records_without_external_id_never_survive() {
    let input = vec![rec("x", ""), rec("y", "9"), rec("x", ""), rec("z", "")];
    let (unique, summary) = dedupe_with_summary(&input);
    assert_eq!(unique, vec![rec("y", "9")]);
    assert_eq!(summary.kept, 1);
    assert_eq!(summary.missing_id, 3);
    assert_eq!(summary.duplicates, 0);
}

#[test]
fn output_ids_are_unique_non_empty_and_bounded_by_input() {
    let ids = ["a", "", "b", "a", "c", "", "b", "d", "a"];
    let input: Vec<Record> = ids.iter().map(|id| rec("t", id)).collect();
    let unique = dedupe(&input);

    assert!(unique.len() <= input.len());
    let mut seen = HashSet::new();
    for record in &unique {
        assert!(!record.external_id.is_empty());
        assert!(seen.insert(record.external_id.clone()));
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn empty_input_gives_empty_output() {
    assert!(dedupe(&[]).is_empty());
}

#[test]
fn blank_external_ids_count_as_missing() {
    let input = vec![rec("x", "   "), rec("y", "7"), rec("z", "\t")];
    let (unique, summary) = dedupe_with_summary(&input);
    assert_eq!(unique, vec![rec("y", "7")]);
    assert_eq!(summary.missing_id, 2);
}
