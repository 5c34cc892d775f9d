use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use lofty::read_from_path;
use lofty::tag::Tag;
use thiserror::Error;

/// Tags written into a finished download.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackTags {
    pub artist: String,
    pub title: String,
    /// Album-style field; the radio channel the track was heard on.
    pub album: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to read tags from {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("failed to write tags to {path}: {message}")]
    Write { path: PathBuf, message: String },
}

pub trait MetadataTagger: Send + Sync {
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<(), TagError>;
}

/// `lofty`-backed tagger; writes the file's primary tag (ID3v2 for mp3).
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagger;

impl MetadataTagger for LoftyTagger {
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<(), TagError> {
        let mut tagged_file = read_from_path(path).map_err(|error| TagError::Read {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| TagError::Write {
                path: path.to_path_buf(),
                message: format!("no writable tag available for {tag_type:?}"),
            })?;

        if !tags.artist.trim().is_empty() {
            tag.set_artist(tags.artist.trim().to_string());
        }
        if !tags.title.trim().is_empty() {
            tag.set_title(tags.title.trim().to_string());
        }
        if let Some(album) = tags.album.as_deref().filter(|a| !a.trim().is_empty()) {
            tag.set_album(album.trim().to_string());
        }
        if let Some(comment) = tags.comment.as_deref() {
            tag.set_comment(comment.to_string());
        }

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .map_err(|error| TagError::Write {
                path: path.to_path_buf(),
                message: error.to_string(),
            })
    }
}
