//! Loading story directories from disk and playing them through a session.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use narrative_engine::{
    discover_stories, load_story, validate_story, ChoiceOption, EngineConfig, LoadError,
    NarrativeGenerator, StorySession,
};
use story_rules::StatValue;
use tempfile::TempDir;

const CRYPT_STORY: &str = r#"
[story]
title = "Whispers of the Salted Crypt"
author = "A. Writer"
difficulty = "hard"
starting_location = "crypt_entrance"
initial_inventory = ["lantern"]

[story.initial_player_stats]
courage = 3

[[events]]
id = "story_start"
name = "Beginning"
trigger = { mode = "MANUAL" }

[[events.actions]]
type = "override_narrative"
text = "Cold air spills from the stairwell."
"#;

const CRYPT_EVENTS: &str = r#"
[[events]]
id = "altar"
name = "Altar"
options = { once = true }

[events.trigger]
mode = "and"
conditions = [
    { type = "location", value = "crypt_entrance" },
    { type = "player_action_keyword", keywords = ["altar"] },
]

[[events.actions]]
type = "update_stat"
stat = "courage"
change_by = -1

[[events.actions]]
type = "summon_ghost"

[[events.actions]]
type = "inject_narrative"
text = "Something stirs behind the altar."
position = "PRE"
"#;

fn write_story(root: &Path, story_id: &str, files: &[(&str, &str)]) {
    let dir = root.join(story_id);
    fs::create_dir_all(&dir).unwrap();
    for (name, contents) in files {
        fs::write(dir.join(name), contents).unwrap();
    }
}

fn stories_root() -> TempDir {
    let root = TempDir::new().unwrap();
    write_story(root.path(), "crypt", &[("00_story.toml", CRYPT_STORY), ("10_events.toml", CRYPT_EVENTS)]);
    write_story(
        root.path(),
        "garden",
        &[("story.toml", "[[events]]\nid = \"story_start\"\nname = \"A Quiet Garden\"\n")],
    );
    write_story(root.path(), "broken", &[("story.toml", "[[events]]\nid = \"door\"\n")]);
    root
}

struct EchoGenerator;

impl NarrativeGenerator for EchoGenerator {
    fn continue_story(&mut self, _narrative: &str, player_choice: &str, _instructions: &[String]) -> String {
        format!("You {player_choice}.")
    }

    fn suggest_choices(&mut self, _narrative: &str) -> Vec<String> {
        vec!["touch the altar".to_string()]
    }
}

#[test]
fn test_load_story_from_several_files() {
    let root = stories_root();

    let (story, player) = load_story(root.path(), "crypt").unwrap();

    assert_eq!(story.id, "crypt");
    assert_eq!(story.title, "Whispers of the Salted Crypt");
    assert_eq!(story.metadata.starting_location, "crypt_entrance");
    assert_eq!(story.metadata.author, "A. Writer");
    let ids: Vec<_> = story.events.iter().map(|event| event.id.as_str()).collect();
    assert_eq!(ids, vec!["story_start", "altar"]);
    assert!(player.has_item("lantern"));
}

#[test]
fn test_missing_start_event() {
    let root = stories_root();
    assert!(matches!(
        load_story(root.path(), "broken"),
        Err(LoadError::MissingStartEvent { .. })
    ));
    assert!(matches!(load_story(root.path(), "nowhere"), Err(LoadError::Io { .. })));
}

#[test]
fn test_discover_skips_broken_stories() {
    let root = stories_root();

    let stories = discover_stories(root.path());

    let titles: Vec<_> = stories.iter().map(|info| info.title.as_str()).collect();
    assert_eq!(titles, vec!["A Quiet Garden", "Whispers of the Salted Crypt"]);
    assert_eq!(stories[1].difficulty, "hard");
}

#[test]
fn test_validation_flags_unknown_action() {
    let root = stories_root();

    let report = validate_story(root.path(), "crypt");

    assert!(report.is_valid());
    assert!(report.warnings.iter().any(|warning| warning.contains("summon_ghost")));
}

#[test]
fn test_play_loaded_story() {
    let root = stories_root();
    let (story, player) = load_story(root.path(), "crypt").unwrap();
    let mut session = StorySession::new(Arc::new(story), player, EchoGenerator, &EngineConfig::default());
    assert_eq!(session.narrative(), "Cold air spills from the stairwell.");

    let prompt = session.begin_turn().unwrap();
    assert_eq!(prompt.choices, vec![ChoiceOption::Suggested("touch the altar".to_string())]);
    let outcome = session.choose(0).unwrap();

    assert_eq!(outcome.narrative, "You touch the altar.");
    assert_eq!(outcome.injected_pre, vec!["Something stirs behind the altar.".to_string()]);
    assert_eq!(session.state().stat("courage"), Some(&StatValue::Int(2)));
    assert!(session.registry().has_fired("altar"));
}
