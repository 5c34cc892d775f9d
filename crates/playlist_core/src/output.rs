use std::path::{Path, PathBuf};

/// Which records a saved file (or a download batch) receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSelection {
    All,
    Unique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Every harvested record, duplicates included.
    #[default]
    All,
    /// Deduplicated records only.
    UniqueOnly,
    /// Two files: `{stem}_all.csv` and `{stem}_unique.csv`.
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub selection: RecordSelection,
}

impl OutputMode {
    pub fn from_flags(unique_only: bool, save_both: bool) -> Self {
        if save_both {
            OutputMode::Both
        } else if unique_only {
            OutputMode::UniqueOnly
        } else {
            OutputMode::All
        }
    }

    /// Files to write for this mode, given the user's output path.
    pub fn targets(self, output: &Path) -> Vec<OutputTarget> {
        match self {
            OutputMode::All => vec![OutputTarget {
                path: output.to_path_buf(),
                selection: RecordSelection::All,
            }],
            OutputMode::UniqueOnly => vec![OutputTarget {
                path: output.to_path_buf(),
                selection: RecordSelection::Unique,
            }],
            OutputMode::Both => vec![
                OutputTarget {
                    path: suffixed_path(output, "_all"),
                    selection: RecordSelection::All,
                },
                OutputTarget {
                    path: suffixed_path(output, "_unique"),
                    selection: RecordSelection::Unique,
                },
            ],
        }
    }

    /// Downloads follow what gets saved: unique records unless every record is kept.
    pub fn download_selection(self) -> RecordSelection {
        match self {
            OutputMode::All => RecordSelection::All,
            OutputMode::UniqueOnly | OutputMode::Both => RecordSelection::Unique,
        }
    }
}

/// `{channel}_playlist.csv` in the working directory.
pub fn default_output_path(channel: &str) -> PathBuf {
    PathBuf::from(format!("{channel}_playlist.csv"))
}

fn suffixed_path(output: &Path, suffix: &str) -> PathBuf {
    let is_csv = output
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let file_name = match (is_csv, output.file_stem(), output.file_name()) {
        (true, Some(stem), _) => format!("{}{suffix}.csv", stem.to_string_lossy()),
        (_, _, Some(name)) => format!("{}{suffix}.csv", name.to_string_lossy()),
        _ => format!("playlist{suffix}.csv"),
    };
    output.with_file_name(file_name)
}
