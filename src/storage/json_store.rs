//! Primary plan store: one JSON document per user in a directory

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{PlanStore, StorageError};
use crate::plan::{PlanRecord, UserId};

/// Stores each user's latest plan as `<root>/<user_id>.json`
#[derive(Debug, Clone)]
pub struct JsonDirectoryStore {
    root: PathBuf,
}

impl JsonDirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, user_id: &UserId) -> Result<PathBuf, StorageError> {
        let id = user_id.as_str();
        let usable = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\'])
            && !id.contains('\0');
        if !usable {
            return Err(StorageError::InvalidUserId(id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }
}

impl PlanStore for JsonDirectoryStore {
    fn load(&self, user_id: &UserId) -> Result<Option<PlanRecord>, StorageError> {
        let path = self.path_for(user_id)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(record))
    }

    fn save(&self, record: &PlanRecord) -> Result<(), StorageError> {
        let path = self.path_for(&record.user_id)?;
        fs::create_dir_all(&self.root)?;

        // Each save gets its own temp file in the same directory, then replaces
        // the plan in one rename. Concurrent saves never share a file.
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, record)?;
            writer.flush()?;
        }
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }
}
