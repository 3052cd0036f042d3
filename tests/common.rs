#![allow(dead_code)]
use std::env;
use std::fs;
use std::path::PathBuf;

use ticktrack::config::Config;

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_ticktrack.sqlite", name));
    fs::remove_file(&path).ok();
    path
}

/// Config pointing at a test database, with the stock defaults
pub fn test_config(db_path: &PathBuf) -> Config {
    Config {
        database: db_path.to_string_lossy().to_string(),
        blank_description: "No Description".to_string(),
        default_due_minutes: 5,
    }
}
