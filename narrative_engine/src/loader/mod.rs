//! Story loader - turns a directory of TOML story files into a [`Story`].
//!
//! Loading is the one place where malformed content is fatal: a story without
//! events, without a `story_start` event, or with an event lacking an id is
//! rejected. Other stories are unaffected.

mod document;
mod validation;

pub use validation::*;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use story_rules::{Player, Story, StoryMetadata};

use document::{StoryDocument, StoryFile};

/// Id of the event every story must define; it is force-executed at game start.
pub const START_EVENT_ID: &str = "story_start";

const UNTITLED: &str = "Untitled Story";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid story file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no events found for story '{story_id}'")]
    NoEvents { story_id: String },

    #[error("could not find 'story_start' event for story '{story_id}'")]
    MissingStartEvent { story_id: String },

    #[error("event {index} in {} has no id", .path.display())]
    MissingEventId { path: PathBuf, index: usize },
}

/// Load `<stories_root>/<story_id>/*.toml` into a story and its starting player.
pub fn load_story(stories_root: impl AsRef<Path>, story_id: &str) -> Result<(Story, Player), LoadError> {
    let dir = stories_root.as_ref().join(story_id);
    let files = read_story_files(&dir)?;
    assemble_story(story_id, files)
}

/// Read and parse every TOML file in `dir`, in file-name order.
pub(crate) fn read_story_files(dir: &Path) -> Result<Vec<(PathBuf, StoryFile)>, LoadError> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let source = fs::read_to_string(&path).map_err(io_error(&path))?;
            let file = toml::from_str(&source).map_err(|source| LoadError::Parse {
                path: path.clone(),
                source,
            })?;
            Ok((path, file))
        })
        .collect()
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LoadError {
    let path = path.to_path_buf();
    move |source| LoadError::Io { path, source }
}

pub(crate) fn assemble_story(
    story_id: &str,
    files: Vec<(PathBuf, StoryFile)>,
) -> Result<(Story, Player), LoadError> {
    let mut story_document: Option<StoryDocument> = None;
    let mut documents = Vec::new();

    for (path, file) in files {
        if let Some(document) = file.story {
            if story_document.is_none() {
                story_document = Some(document);
            } else {
                tracing::warn!(path = %path.display(), "Ignoring additional [story] table");
            }
        }

        for (index, event) in file.events.into_iter().enumerate() {
            match event.id.clone() {
                Some(id) => documents.push((id, event)),
                None => return Err(LoadError::MissingEventId { path, index }),
            }
        }
    }

    if documents.is_empty() {
        return Err(LoadError::NoEvents {
            story_id: story_id.to_string(),
        });
    }

    let start = documents
        .iter()
        .find(|(id, _)| id == START_EVENT_ID)
        .map(|(_, document)| document)
        .ok_or_else(|| LoadError::MissingStartEvent {
            story_id: story_id.to_string(),
        })?;

    let from_story = story_document.as_ref();
    let title = from_story
        .and_then(|story| story.title.clone())
        .or_else(|| start.title.clone())
        .or_else(|| start.name.clone())
        .unwrap_or_else(|| UNTITLED.to_string());
    let player = Player {
        stats: from_story
            .and_then(|story| story.initial_player_stats.clone())
            .or_else(|| start.initial_player_stats.clone())
            .unwrap_or_default(),
        inventory: from_story
            .and_then(|story| story.initial_inventory.clone())
            .or_else(|| start.initial_inventory.clone())
            .unwrap_or_default(),
    };

    let metadata = story_document
        .map(StoryDocument::into_metadata)
        .unwrap_or_default();
    let events = documents
        .into_iter()
        .map(|(id, document)| document.into_event(id))
        .collect();

    let story = Story {
        id: story_id.to_string(),
        title,
        events,
        metadata,
    };
    tracing::info!(story_id = %story.id, events = story.events.len(), "Story loaded");

    Ok((story, player))
}

/// Summary of a story for menus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub difficulty: String,
    pub tags: Vec<String>,
    pub content_warnings: Vec<String>,
    pub total_turns_estimate: u32,
    pub version: String,
}

impl StoryInfo {
    pub fn from_story(story: &Story) -> Self {
        let StoryMetadata {
            description,
            author,
            version,
            difficulty,
            tags,
            content_warnings,
            total_turns_estimate,
            ..
        } = story.metadata.clone();

        Self {
            id: story.id.clone(),
            title: story.title.clone(),
            description,
            author,
            difficulty,
            tags,
            content_warnings,
            total_turns_estimate,
            version,
        }
    }
}

/// List every loadable story under `stories_root`, sorted by title.
///
/// Directories that fail to load are skipped.
pub fn discover_stories(stories_root: impl AsRef<Path>) -> Vec<StoryInfo> {
    let stories_root = stories_root.as_ref();
    let entries = match fs::read_dir(stories_root) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(path = %stories_root.display(), error = %error, "Cannot read stories directory");
            return Vec::new();
        }
    };

    let mut stories: Vec<StoryInfo> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let story_id = entry.file_name().to_string_lossy().into_owned();
            match load_story(stories_root, &story_id) {
                Ok((story, _)) => Some(StoryInfo::from_story(&story)),
                Err(error) => {
                    tracing::warn!(story_id = %story_id, error = %error, "Skipping story");
                    None
                }
            }
        })
        .collect();

    stories.sort_by(|a, b| a.title.cmp(&b.title));
    stories
}
