use log::{debug, info};

use election_core::*;
use snafu::{prelude::*, IntoError, Snafu};

use std::fs;
use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;

use crate::args::Args;

mod io_file;
mod panels;
mod prompt;

pub use crate::tracker::io_file::*;
pub use crate::tracker::panels::main_menu;
pub use crate::tracker::prompt::Prompter;

#[derive(Debug, Snafu)]
pub enum TrackerError {
    #[snafu(display("Error reading {path}: {source}"))]
    ReadingData {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing {path}: {source}"))]
    WritingData {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Malformed data in {path}: {source}"))]
    ParsingData { source: DecodeError, path: String },
    #[snafu(display("Error encoding the election for {path}: {source}"))]
    EncodingData { source: csv::Error, path: String },
    #[snafu(display("Error keeping a copy of {path}: {source}"))]
    CopyingData {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening settings file {path}: {source}"))]
    OpeningSettings {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing settings file {path}: {source}"))]
    ParsingSettings {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Console unavailable: {source}"))]
    Console { source: std::io::Error },
    #[snafu(display("Error building the summary: {source}"))]
    Summary { source: serde_json::Error },
}

pub type TrackerResult<T> = Result<T, TrackerError>;

pub mod settings {
    use crate::tracker::*;

    /// Settings read from the optional JSON file passed with `--config`.
    #[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
    pub struct TrackerSettings {
        #[serde(rename = "dataFile")]
        pub data_file: Option<String>,
    }

    pub fn read_settings(path: &str) -> TrackerResult<TrackerSettings> {
        let contents = fs::read_to_string(path).context(OpeningSettingsSnafu { path })?;
        debug!("read settings: {:?}", contents);
        let settings: TrackerSettings =
            serde_json::from_str(contents.as_str()).context(ParsingSettingsSnafu { path })?;
        Ok(settings)
    }
}

use crate::tracker::settings::*;

/// The data file to use: the command line first, then the settings file, then the default.
pub fn resolve_data_path(args: &Args) -> TrackerResult<String> {
    if let Some(p) = args.data.clone() {
        return Ok(p);
    }
    let from_settings = match &args.config {
        Some(config_path) => read_settings(config_path)?.data_file,
        None => None,
    };
    Ok(from_settings.unwrap_or_else(|| DEFAULT_DATA_FILE.to_string()))
}

pub fn build_summary_js(store: &ElectionStore) -> JSValue {
    let results: Vec<JSValue> = store
        .results()
        .unwrap_or_default()
        .iter()
        .map(|t| json!({"id": t.id, "name": t.name, "votes": t.votes}))
        .collect();
    json!({
        "electionStarted": store.election_started(),
        "students": store.num_students(),
        "voted": store.voted_count(),
        "results": results
    })
}

pub fn print_summary(data_path: &str) -> TrackerResult<()> {
    let store = match load_store(data_path)? {
        Some(LoadedStore { error: Some(e), .. }) => return Err(e),
        Some(LoadedStore { store, .. }) => store,
        None => ElectionStore::new(),
    };
    let js = build_summary_js(&store);
    let pretty_js = serde_json::to_string_pretty(&js).context(SummarySnafu {})?;
    println!("{}", pretty_js);
    Ok(())
}

/// Runs one interactive session against the data file at `data_path`.
///
/// The saved election is loaded first. If the file is malformed, the session
/// continues with the records read before the bad line. The election is saved
/// back when the user exits or the input ends. A file that could not be loaded
/// is copied aside before being replaced.
pub fn run_session<R: BufRead, W: Write>(
    data_path: &str,
    prompter: &mut Prompter<R, W>,
) -> TrackerResult<()> {
    let (mut store, load_failed) = match load_store(data_path) {
        Ok(Some(LoadedStore { store, error: None })) => {
            prompter.say("Election data loaded successfully.")?;
            (store, false)
        }
        Ok(Some(LoadedStore {
            store,
            error: Some(e),
        })) => {
            prompter.say(&format!("Error loading election data: {}", e))?;
            (store, true)
        }
        Ok(None) => (ElectionStore::new(), false),
        Err(e) => {
            prompter.say(&format!("Error loading election data: {}", e))?;
            (ElectionStore::new(), true)
        }
    };

    main_menu(&mut store, prompter)?;

    if load_failed {
        match keep_copy(data_path) {
            Ok(copy_path) => prompter.say(&format!(
                "The previous election data was kept in {}.",
                copy_path
            ))?,
            Err(e) => {
                info!("copy failed: {:?}", e);
                return prompter.say(&format!("Error saving election data: {}", e));
            }
        }
    }

    match save_store(data_path, &store) {
        Ok(()) => prompter.say("Election data saved successfully."),
        Err(e) => {
            info!("save failed: {:?}", e);
            prompter.say(&format!("Error saving election data: {}", e))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::path::PathBuf;

    /// A file path in the temporary directory, unique to this process and test.
    pub fn temp_path(name: &str) -> String {
        let p: PathBuf = std::env::temp_dir().join(format!(
            "election-tracker-{}-{}.txt",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&p);
        p.as_path().display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::temp_path;
    use super::*;
    use std::io::Cursor;

    fn session(data_path: &str, input: &str) -> String {
        let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        run_session(data_path, &mut prompter).unwrap();
        String::from_utf8(prompter.into_output()).unwrap()
    }

    fn args(data: Option<&str>, config: Option<&str>) -> Args {
        Args {
            data: data.map(|s| s.to_string()),
            config: config.map(|s| s.to_string()),
            summary: false,
            verbose: false,
        }
    }

    #[test]
    fn full_election() {
        let path = temp_path("full_election");
        let script = [
            // Admin: start with 2 students, add Alice and Bob, check the results.
            "2", "admin", "1234", "1", "2", "2", "Alice", "2", "Bob", "3", "4",
            // Two students vote.
            "1", "S001", "1", "1", "S002", "2",
            // S001 tries again.
            "1", "S001",
            // Results and exit.
            "2", "admin", "1234", "3", "4", "3",
        ]
        .join("\n");
        let out = session(&path, &script);

        assert!(out.contains("Election has been successfully started!"));
        assert!(out.contains("Alice: 0 votes\nBob: 0 votes"));
        assert_eq!(out.matches("Your vote has been successfully cast!").count(), 2);
        assert!(out.contains("You have already voted. Access denied."));
        assert!(out.contains("Alice: 1 votes\nBob: 1 votes"));
        assert!(out.ends_with("Election data saved successfully.\n"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "true\n2\nS001,true\nS002,true\n2\nC1,Alice,1\nC2,Bob,1\n"
        );

        // The next session picks up where the last one stopped.
        let out = session(&path, "1\nS002\n");
        assert!(out.starts_with("Election data loaded successfully."));
        assert!(out.contains("You have already voted. Access denied."));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_keeps_earlier_records() {
        let path = temp_path("malformed_session");
        let copy_path = format!("{}.bak", path);
        let _ = fs::remove_file(&copy_path);

        // An accepted name with a comma makes the next load stop at its line.
        let script = [
            "2", "admin", "1234", "1", "2", "2", "Doe, Jane", "2", "Bob", "4",
            "1", "S001", "2", "1", "S002", "2", "3",
        ]
        .join("\n");
        session(&path, &script);
        let saved = "true\n2\nS001,true\nS002,true\n2\nC1,Doe, Jane,0\nC2,Bob,2\n";
        assert_eq!(fs::read_to_string(&path).unwrap(), saved);

        let out = session(&path, "1\nS001\n3\n");
        assert!(out.starts_with("Error loading election data: Malformed data in"));
        assert!(out.contains("line 6"));
        // The students read before the bad line are still there.
        assert!(out.contains("You have already voted. Access denied."));
        assert!(out.contains(&format!("The previous election data was kept in {}.", copy_path)));
        assert!(out.ends_with("Election data saved successfully.\n"));
        assert_eq!(fs::read_to_string(&copy_path).unwrap(), saved);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "true\n2\nS001,true\nS002,true\n0\n"
        );

        // A clean file is not copied again.
        let _ = fs::remove_file(&copy_path);
        session(&path, "3\n");
        assert!(fs::metadata(&copy_path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unreadable_file_is_left_alone() {
        let dir = std::env::temp_dir().join(format!("election-tracker-dir-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        // A directory cannot be read, copied or written as a file.
        let path = dir.as_path().display().to_string();
        let out = session(&path, "3\n");
        assert!(out.contains("Error loading election data: Error reading"));
        assert!(out.contains("Error saving election data: Error keeping a copy of"));
        assert!(!out.contains("Election data saved successfully."));
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn summary_json() {
        let mut store = ElectionStore::new();
        assert_eq!(
            build_summary_js(&store),
            json!({"electionStarted": false, "students": 0, "voted": 0, "results": []})
        );
        store.add_candidate("Alice");
        store.add_candidate("Bob");
        store.provision_students(3);
        store.record_vote("S003", 2).unwrap();
        assert_eq!(
            build_summary_js(&store),
            json!({
                "electionStarted": true,
                "students": 3,
                "voted": 1,
                "results": [
                    {"id": "C1", "name": "Alice", "votes": 0},
                    {"id": "C2", "name": "Bob", "votes": 1}
                ]
            })
        );
    }

    #[test]
    fn data_path_resolution() {
        assert_eq!(resolve_data_path(&args(None, None)).unwrap(), DEFAULT_DATA_FILE);
        assert_eq!(
            resolve_data_path(&args(Some("a.txt"), None)).unwrap(),
            "a.txt"
        );

        let config_path = temp_path("settings");
        fs::write(&config_path, r#"{"dataFile": "from_settings.txt"}"#).unwrap();
        assert_eq!(
            resolve_data_path(&args(None, Some(&config_path))).unwrap(),
            "from_settings.txt"
        );
        assert_eq!(
            resolve_data_path(&args(Some("a.txt"), Some(&config_path))).unwrap(),
            "a.txt"
        );

        fs::write(&config_path, "{}").unwrap();
        assert_eq!(
            resolve_data_path(&args(None, Some(&config_path))).unwrap(),
            DEFAULT_DATA_FILE
        );

        fs::write(&config_path, "not json").unwrap();
        assert!(matches!(
            resolve_data_path(&args(None, Some(&config_path))),
            Err(TrackerError::ParsingSettings { .. })
        ));
        let _ = fs::remove_file(&config_path);

        assert!(matches!(
            resolve_data_path(&args(None, Some(&config_path))),
            Err(TrackerError::OpeningSettings { .. })
        ));
    }
}
