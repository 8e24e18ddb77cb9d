//! Filesystem-backed subject store.
//!
//! Subjects are stored under the store root:
//! ```text
//! <root>/subjects/<subjectId>/
//! ├── subject.json       # Status, files, preview URL
//! └── messages.jsonl     # Append-only message log
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use forge_domain::{ChatMessage, Subject};

use crate::error::{PersistenceError, PersistenceResult};
use crate::store::{SubjectPatch, SubjectStore};

/// Persistence manager keeping each subject in its own directory.
#[derive(Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The store root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn subject_dir(&self, id: &str) -> PathBuf {
        self.root.join("subjects").join(id)
    }

    fn subject_file(&self, id: &str) -> PathBuf {
        self.subject_dir(id).join("subject.json")
    }

    fn messages_file(&self, id: &str) -> PathBuf {
        self.subject_dir(id).join("messages.jsonl")
    }

    fn load_subject(&self, id: &str) -> PersistenceResult<Subject> {
        let path = self.subject_file(id);
        if !path.exists() {
            return Err(PersistenceError::NotFound(id.to_string()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_subject(&self, subject: &Subject) -> PersistenceResult<()> {
        let dir = self.subject_dir(&subject.id);
        fs::create_dir_all(&dir)?;
        // Write to a temp file first so readers never see a torn subject.json
        let tmp = dir.join("subject.json.tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(serde_json::to_string_pretty(subject)?.as_bytes())?;
        file.sync_all()?;
        fs::rename(tmp, self.subject_file(&subject.id))?;
        Ok(())
    }
}

#[async_trait]
impl SubjectStore for FsStore {
    async fn get_subject(&self, id: &str) -> PersistenceResult<Subject> {
        self.load_subject(id)
    }

    async fn update_subject(&self, id: &str, patch: SubjectPatch) -> PersistenceResult<Subject> {
        let mut subject = match self.load_subject(id) {
            Ok(subject) => subject,
            Err(PersistenceError::NotFound(_)) => Subject::new(id),
            Err(e) => return Err(e),
        };

        if let Some(status) = patch.status {
            subject.status = status;
        }
        if let Some(files) = patch.files {
            subject.files = files;
        }
        if let Some(url) = patch.preview_url {
            subject.preview_url = Some(url);
        }
        subject.touch();

        self.write_subject(&subject)?;
        debug!(subject_id = %id, status = ?subject.status, "subject updated");
        Ok(subject)
    }

    async fn append_message(
        &self,
        subject_id: &str,
        message: ChatMessage,
    ) -> PersistenceResult<()> {
        fs::create_dir_all(self.subject_dir(subject_id))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.messages_file(subject_id))?;
        writeln!(file, "{}", serde_json::to_string(&message)?)?;
        Ok(())
    }

    async fn messages(&self, subject_id: &str) -> PersistenceResult<Vec<ChatMessage>> {
        let path = self.messages_file(subject_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(path)?);
        let mut messages = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            messages.push(serde_json::from_str(&line)?);
        }
        Ok(messages)
    }
}
