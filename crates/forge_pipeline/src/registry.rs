//! At-most-one-active-job-per-subject admission gate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::debug;

/// Cooperative cancellation flag for one job.
///
/// The pipeline observes the flag at its suspension points (the provider
/// calls) and maps cancellation to a terminal error with a distinct cause.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

struct JobEntry {
    cancel: CancelToken,
    // Held so the rest of the system has a single handle to the running task
    handle: Option<JoinHandle<()>>,
}

/// Registry of in-flight jobs, keyed by subject id.
///
/// This is the sole concurrency gate: it does not queue or merge concurrent
/// requests. The critical section is limited to the map mutation and is
/// never held across I/O.
#[derive(Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<String, JobEntry>>,
}

impl JobRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically admit a job for `subject_id`.
    ///
    /// Returns the job's cancellation token when admitted; `None` means a
    /// job is already registered and the caller must not start a second
    /// pipeline for this subject.
    pub fn try_start(&self, subject_id: &str) -> Option<CancelToken> {
        let mut jobs = self.jobs.lock().expect("registry lock poisoned");
        if jobs.contains_key(subject_id) {
            return None;
        }
        let cancel = CancelToken::default();
        jobs.insert(
            subject_id.to_string(),
            JobEntry {
                cancel: cancel.clone(),
                handle: None,
            },
        );
        debug!(subject_id, "job admitted");
        Some(cancel)
    }

    /// Attach the spawned task handle to a registered job
    pub fn attach_handle(&self, subject_id: &str, handle: JoinHandle<()>) {
        let mut jobs = self.jobs.lock().expect("registry lock poisoned");
        if let Some(entry) = jobs.get_mut(subject_id) {
            entry.handle = Some(handle);
        }
    }

    /// Request cancellation of a running job; returns whether one existed
    pub fn cancel(&self, subject_id: &str) -> bool {
        let jobs = self.jobs.lock().expect("registry lock poisoned");
        match jobs.get(subject_id) {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether the registered job's task has run to completion.
    ///
    /// `true` for unknown subjects; a released job is finished by
    /// definition.
    pub fn task_finished(&self, subject_id: &str) -> bool {
        let jobs = self.jobs.lock().expect("registry lock poisoned");
        jobs.get(subject_id)
            .and_then(|entry| entry.handle.as_ref())
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }

    /// Whether a job is currently registered for the subject
    pub fn is_running(&self, subject_id: &str) -> bool {
        self.jobs
            .lock()
            .expect("registry lock poisoned")
            .contains_key(subject_id)
    }

    /// Free the subject's slot.
    ///
    /// Called exactly once per job from the pipeline's terminal handling;
    /// releasing an unknown subject is a no-op.
    pub fn release(&self, subject_id: &str) {
        let removed = self
            .jobs
            .lock()
            .expect("registry lock poisoned")
            .remove(subject_id);
        if removed.is_some() {
            debug!(subject_id, "job released");
        }
    }
}

/// Frees a registry slot when dropped, so a panicked or cancelled pipeline
/// still releases its subject.
pub struct ReleaseGuard {
    registry: Arc<JobRegistry>,
    subject_id: String,
}

impl ReleaseGuard {
    /// Guard the given subject's slot
    pub fn new(registry: Arc<JobRegistry>, subject_id: impl Into<String>) -> Self {
        Self {
            registry,
            subject_id: subject_id.into(),
        }
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.registry.release(&self.subject_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_start_is_rejected() {
        let registry = JobRegistry::new();
        assert!(registry.try_start("proj-1").is_some());
        assert!(registry.try_start("proj-1").is_none());
        // Other subjects are unaffected
        assert!(registry.try_start("proj-2").is_some());
    }

    #[test]
    fn test_release_reopens_the_slot() {
        let registry = JobRegistry::new();
        assert!(registry.try_start("proj-1").is_some());
        registry.release("proj-1");
        assert!(!registry.is_running("proj-1"));
        assert!(registry.try_start("proj-1").is_some());
    }

    #[test]
    fn test_cancel_flags_the_token() {
        let registry = JobRegistry::new();
        let token = registry.try_start("proj-1").unwrap();
        assert!(!token.is_cancelled());
        assert!(registry.cancel("proj-1"));
        assert!(token.is_cancelled());
        assert!(!registry.cancel("unknown"));
    }

    #[test]
    fn test_release_guard_frees_on_drop() {
        let registry = Arc::new(JobRegistry::new());
        registry.try_start("proj-1").unwrap();
        {
            let _guard = ReleaseGuard::new(registry.clone(), "proj-1");
        }
        assert!(!registry.is_running("proj-1"));
    }
}
