// Reading and writing the election data file.

use std::io::ErrorKind;

use crate::tracker::*;

pub const DEFAULT_DATA_FILE: &str = "election_data.txt";

/// The content of a data file.
#[derive(Debug)]
pub struct LoadedStore {
    pub store: ElectionStore,
    /// Set when the file is malformed. `store` then holds the records read
    /// before the bad line.
    pub error: Option<TrackerError>,
}

/// Loads the election saved at `path`.
///
/// Returns `None` if there is no file yet.
pub fn load_store(path: &str) -> TrackerResult<Option<LoadedStore>> {
    info!("Attempting to read election data {:?}", path);
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No election data at {:?}, starting a new election", path);
            return Ok(None);
        }
        Err(e) => return Err(e).context(ReadingDataSnafu { path }),
    };
    let (store, decode_error) = codec::decode_partial(&contents);
    debug!(
        "Read election data: started: {} students: {} candidates: {}",
        store.election_started(),
        store.num_students(),
        store.candidates().len()
    );
    Ok(Some(LoadedStore {
        store,
        error: decode_error.map(|e| ParsingDataSnafu { path }.into_error(e)),
    }))
}

/// Writes the election to `path`, replacing any previous content.
pub fn save_store(path: &str, store: &ElectionStore) -> TrackerResult<()> {
    info!("Writing election data to {:?}", path);
    let data = codec::encode(store).context(EncodingDataSnafu { path })?;
    fs::write(path, data).context(WritingDataSnafu { path })
}

/// Copies the file at `path` next to it, with a `.bak` extension added.
/// Returns the path of the copy.
pub fn keep_copy(path: &str) -> TrackerResult<String> {
    let copy_path = format!("{}.bak", path);
    info!("Copying {:?} to {:?}", path, copy_path);
    fs::copy(path, &copy_path).context(CopyingDataSnafu { path })?;
    Ok(copy_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::test_util::temp_path;

    #[test]
    fn missing_file_is_not_an_error() {
        let path = temp_path("missing");
        assert!(load_store(&path).unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save_then_load");
        let mut store = ElectionStore::new();
        store.add_candidate("Alice");
        store.add_candidate("Bob");
        store.provision_students(12);
        store.record_vote("S010", 2).unwrap();
        save_store(&path, &store).unwrap();
        let loaded = load_store(&path).unwrap().unwrap();
        assert!(loaded.error.is_none());
        assert_eq!(loaded.store, store);

        // Saving again overwrites the previous content.
        save_store(&path, &ElectionStore::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "false\n0\n0\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file() {
        let path = temp_path("malformed");
        fs::write(&path, "true\n2\nS001,true\nS002\n0\n").unwrap();
        let loaded = load_store(&path).unwrap().unwrap();
        match loaded.error {
            Some(TrackerError::ParsingData { source, .. }) => assert_eq!(
                source,
                DecodeError::MissingField {
                    line: 4,
                    what: "the voting status"
                }
            ),
            x => panic!("unexpected error {:?}", x),
        }
        // The record before the bad line is kept.
        assert!(loaded.store.election_started());
        assert!(loaded.store.find_student("S001").unwrap().has_voted);
        assert!(loaded.store.find_student("S002").is_none());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn copy_next_to_the_file() {
        let path = temp_path("copied");
        fs::write(&path, "some content\n").unwrap();
        let copy_path = keep_copy(&path).unwrap();
        assert_eq!(copy_path, format!("{}.bak", path));
        assert_eq!(fs::read_to_string(&copy_path).unwrap(), "some content\n");
        let _ = fs::remove_file(&path);
        let _ = fs::remove_file(&copy_path);

        assert!(matches!(
            keep_copy(&path),
            Err(TrackerError::CopyingData { .. })
        ));
    }
}
