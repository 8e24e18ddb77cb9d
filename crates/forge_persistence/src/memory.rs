//! In-memory subject store for tests and embedders.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use forge_domain::{ChatMessage, Subject};

use crate::error::{PersistenceError, PersistenceResult};
use crate::store::{SubjectPatch, SubjectStore};

#[derive(Default)]
struct Inner {
    subjects: HashMap<String, Subject>,
    messages: HashMap<String, Vec<ChatMessage>>,
}

/// Process-local store with the same semantics as [`crate::FsStore`].
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a subject, used by tests to model pre-existing state
    pub fn insert_subject(&self, subject: Subject) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.subjects.insert(subject.id.clone(), subject);
    }
}

#[async_trait]
impl SubjectStore for MemStore {
    async fn get_subject(&self, id: &str) -> PersistenceResult<Subject> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .subjects
            .get(id)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))
    }

    async fn update_subject(&self, id: &str, patch: SubjectPatch) -> PersistenceResult<Subject> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        let subject = inner
            .subjects
            .entry(id.to_string())
            .or_insert_with(|| Subject::new(id));

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
        Ok(subject.clone())
    }

    async fn append_message(
        &self,
        subject_id: &str,
        message: ChatMessage,
    ) -> PersistenceResult<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner
            .messages
            .entry(subject_id.to_string())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn messages(&self, subject_id: &str) -> PersistenceResult<Vec<ChatMessage>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner.messages.get(subject_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_domain::SubjectStatus;

    #[tokio::test]
    async fn test_patch_only_touches_populated_fields() {
        let store = MemStore::new();
        store
            .update_subject(
                "proj-1",
                SubjectPatch::status(SubjectStatus::Ready)
                    .with_files(vec![forge_domain::FileArtifact::file("a.txt", "a")]),
            )
            .await
            .unwrap();

        // A later status-only patch must leave the files alone
        let subject = store
            .update_subject("proj-1", SubjectPatch::status(SubjectStatus::Error))
            .await
            .unwrap();
        assert_eq!(subject.status, SubjectStatus::Error);
        assert_eq!(subject.files.len(), 1);
    }
}
