use std::path::{Path, PathBuf};

use playlist_core::{default_output_path, OutputMode, RecordSelection};
use pretty_assertions::assert_eq;

#[test]
fn default_output_is_named_after_channel() {
    assert_eq!(default_output_path("1live"), PathBuf::from("1live_playlist.csv"));
}

#[test]
fn unique_only_writes_unique_records_to_the_given_path() {
    let targets = OutputMode::UniqueOnly.targets(Path::new("out/list.csv"));
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].path, PathBuf::from("out/list.csv"));
    assert_eq!(targets[0].selection, RecordSelection::Unique);
}

#[test]
fn save_both_derives_suffixed_file_names() {
    let targets = OutputMode::Both.targets(Path::new("out/list.csv"));
    let paths: Vec<_> = targets.iter().map(|t| t.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("out/list_all.csv"),
            PathBuf::from("out/list_unique.csv"),
        ]
    );

    let targets = OutputMode::Both.targets(Path::new("export"));
    assert_eq!(targets[0].path, PathBuf::from("export_all.csv"));
    assert_eq!(targets[1].path, PathBuf::from("export_unique.csv"));
}

#[test]
fn flags_map_to_modes_and_download_selection() {
    assert_eq!(OutputMode::from_flags(false, false), OutputMode::All);
    assert_eq!(OutputMode::from_flags(true, false), OutputMode::UniqueOnly);
    assert_eq!(OutputMode::from_flags(false, true), OutputMode::Both);
    assert_eq!(OutputMode::All.download_selection(), RecordSelection::All);
    assert_eq!(OutputMode::Both.download_selection(), RecordSelection::Unique);
}
