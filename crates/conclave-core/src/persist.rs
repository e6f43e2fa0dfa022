// ABOUTME: Thin file-based persistence for blackboards so a caller can save and
// ABOUTME: resume a conversation. One pretty-printed JSON file per saved session.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::blackboard::Blackboard;

const SAVE_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

fn save_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{SAVE_EXTENSION}"))
}

/// Save a blackboard under `dir/<name>.json`, creating the directory if needed.
pub fn save_blackboard(dir: &Path, name: &str, blackboard: &Blackboard) -> Result<PathBuf, PersistError> {
    fs::create_dir_all(dir)?;
    let path = save_path(dir, name);
    let json = serde_json::to_string_pretty(blackboard)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Load a blackboard previously written by [`save_blackboard`].
pub fn load_blackboard(dir: &Path, name: &str) -> Result<Blackboard, PersistError> {
    let json = fs::read_to_string(save_path(dir, name))?;
    Ok(serde_json::from_str(&json)?)
}

/// List the names of saved blackboards in `dir`, sorted. A missing directory
/// is just an empty list.
pub fn list_saved(dir: &Path) -> Result<Vec<String>, PersistError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(SAVE_EXTENSION))
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::FunctionCall;
    use crate::message::Message;

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();

        let mut board = Blackboard::new_function_call();
        board.add_message(Message::user("Add a sheep"));
        board
            .as_function_call_mut()
            .unwrap()
            .add_generated_functions(vec![FunctionCall::new("AddCreature")]);

        let path = save_blackboard(dir.path(), "session1", &board).unwrap();
        assert!(path.exists());

        let loaded = load_blackboard(dir.path(), "session1").unwrap();
        assert_eq!(board, loaded);
    }

    #[test]
    fn list_saved_returns_sorted_names() {
        let dir = tempfile::TempDir::new().unwrap();
        let board = Blackboard::new_graphql();

        save_blackboard(dir.path(), "beta", &board).unwrap();
        save_blackboard(dir.path(), "alpha", &board).unwrap();
        // Non-JSON files are ignored.
        std::fs::write(dir.path().join("notes.txt"), "not a save").unwrap();

        let names = list_saved(dir.path()).unwrap();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn list_saved_missing_dir_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(list_saved(&missing).unwrap().is_empty());
    }

    #[test]
    fn load_missing_save_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load_blackboard(dir.path(), "ghost");
        assert!(matches!(result, Err(PersistError::Io(_))));
    }
}
