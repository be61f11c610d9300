//! Story validation for authoring tools.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use story_rules::{decode_actions, Action, Condition};

use super::document::StoryFile;
use super::{assemble_story, read_story_files};

/// Problems found in a story. Errors prevent loading; warnings do not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate `<stories_root>/<story_id>` without starting a game.
pub fn validate_story(stories_root: impl AsRef<Path>, story_id: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    let files = match read_story_files(&stories_root.as_ref().join(story_id)) {
        Ok(files) => files,
        Err(error) => {
            report.errors.push(error.to_string());
            return report;
        }
    };

    check_story_table(&files, &mut report);
    check_events(&files, &mut report);

    if let Err(error) = assemble_story(story_id, files) {
        report.errors.push(error.to_string());
    }

    report
}

fn check_story_table(files: &[(PathBuf, StoryFile)], report: &mut ValidationReport) {
    let story = files.iter().find_map(|(_, file)| file.story.as_ref());

    if story.and_then(|story| story.title.as_ref()).is_none() {
        report
            .errors
            .push("Missing required field in story metadata: title".to_string());
    }
    if story.and_then(|story| story.starting_location.as_ref()).is_none() {
        report.warnings.push(
            "Missing starting_location in story metadata, defaulting to 'start'".to_string(),
        );
    }
}

fn check_events(files: &[(PathBuf, StoryFile)], report: &mut ValidationReport) {
    let mut seen = HashSet::new();

    for (path, file) in files {
        for event in &file.events {
            let Some(id) = event.id.as_deref() else {
                // Reported by assemble_story.
                continue;
            };
            let label = format!("Event '{}' ({})", id, path.display());

            if !seen.insert(id.to_string()) {
                report
                    .warnings
                    .push(format!("{} duplicates an earlier event id", label));
            }

            match &event.trigger {
                None => report.warnings.push(format!("{} missing 'trigger' field", label)),
                Some(trigger) => {
                    for condition in &trigger.conditions {
                        if let Condition::Unknown { kind } = condition {
                            report.warnings.push(format!(
                                "{} has an unrecognized condition: {}",
                                label,
                                kind.as_deref().unwrap_or("<missing type>")
                            ));
                        }
                    }
                }
            }

            match &event.actions {
                None => report.warnings.push(format!("{} missing 'actions' field", label)),
                Some(actions) => {
                    for action in decode_actions(actions.clone()) {
                        if let Action::Unknown { kind } = action {
                            report.warnings.push(format!(
                                "{} has an unrecognized action: {}",
                                label,
                                kind.as_deref().unwrap_or("<missing type>")
                            ));
                        }
                    }
                }
            }
        }
    }
}
