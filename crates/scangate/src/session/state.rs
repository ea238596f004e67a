//! The upload session state machine.
//!
//! Explicit tagged states rather than independent mutable flags, so the "at
//! most one in-flight request" and "new file clears old result" invariants
//! hold by construction: `Busy` carries no result slot, and entering `Ready`
//! via file selection starts with an empty one.

use super::gateway::{Gateway, GatewayOutcome};
use super::resources::ResourceStore;
use crate::error::Result;
use crate::types::{Mode, ProcessingResult, SelectedFile, suggested_download_name};

/// A completed processing round trip: the result plus its suggested
/// download name.
#[derive(Debug)]
pub struct SessionResult {
    pub result: ProcessingResult,
    pub download_name: String,
}

/// What went wrong with the last request, kept for presentation.
///
/// `status` is absent when the gateway could not be reached at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub status: Option<u16>,
    pub details: String,
}

/// Session lifecycle states.
#[derive(Debug)]
pub enum SessionState {
    /// No file selected.
    Idle,
    /// File selected, nothing in flight; `result` is `Some` only after a
    /// fully successful round trip for this file.
    Ready {
        file: SelectedFile,
        result: Option<SessionResult>,
    },
    /// One request in flight. Holds no result slot, so nothing stale can be
    /// shown and nothing new can be triggered.
    Busy { file: SelectedFile, mode: Mode },
}

/// Client-held session state and the transitions that drive it.
///
/// One session owns its state exclusively for its whole lifetime; all
/// failure paths are terminal for that single request and return control to
/// the caller.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    resources: ResourceStore,
    last_failure: Option<RequestFailure>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_store(ResourceStore::new())
    }

    /// Build a session over a shared resource store.
    pub fn with_store(resources: ResourceStore) -> Self {
        Self {
            state: SessionState::Idle,
            resources,
            last_failure: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, SessionState::Busy { .. })
    }

    /// The currently selected file, in any non-idle state.
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Ready { file, .. } | SessionState::Busy { file, .. } => Some(file),
        }
    }

    /// The current result, if the last round trip for this file succeeded.
    pub fn result(&self) -> Option<&ProcessingResult> {
        match &self.state {
            SessionState::Ready { result: Some(r), .. } => Some(&r.result),
            _ => None,
        }
    }

    /// Suggested download name for the current result.
    pub fn download_name(&self) -> Option<&str> {
        match &self.state {
            SessionState::Ready { result: Some(r), .. } => Some(r.download_name.as_str()),
            _ => None,
        }
    }

    pub fn last_failure(&self) -> Option<&RequestFailure> {
        self.last_failure.as_ref()
    }

    /// The store backing this session's result resources.
    pub fn resources(&self) -> &ResourceStore {
        &self.resources
    }

    /// Select a file for processing. Valid in any state.
    ///
    /// Clears the previous result, download name, and failure record; any
    /// resource backing the old result is released as it is dropped.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.last_failure = None;
        self.state = SessionState::Ready { file, result: None };
    }

    /// Try to start a request of the given mode.
    ///
    /// Only valid with a file selected and nothing in flight; otherwise a
    /// no-op returning `None` (the triggering affordance is expected to be
    /// disabled in those states). On success the session enters `Busy` and
    /// the file to upload is returned.
    pub fn begin(&mut self, mode: Mode) -> Option<SelectedFile> {
        match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Ready { file, result } => {
                // The old result is superseded the moment a new request
                // starts; dropping it here releases its resources.
                drop(result);
                let upload = file.clone();
                self.state = SessionState::Busy { file, mode };
                Some(upload)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Record the outcome of the in-flight request and leave `Busy`.
    ///
    /// A transport-level `Err` is treated identically to a gateway failure
    /// response: the failure is recorded and no result is populated.
    pub fn complete(&mut self, outcome: Result<GatewayOutcome>) {
        let (file, mode) = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Busy { file, mode } => (file, mode),
            other => {
                // Nothing in flight; nothing to record.
                self.state = other;
                return;
            }
        };

        let result = match outcome {
            Ok(GatewayOutcome::Success { content_type, body }) => {
                self.last_failure = None;
                Some(self.build_result(&file, mode, content_type, body))
            }
            Ok(GatewayOutcome::Failure { status, details }) => {
                tracing::warn!(%mode, status, %details, "upload failed");
                self.last_failure = Some(RequestFailure {
                    status: Some(status),
                    details,
                });
                None
            }
            Err(err) => {
                tracing::warn!(%mode, error = %err, "upload failed before reaching the gateway");
                self.last_failure = Some(RequestFailure {
                    status: None,
                    details: err.to_string(),
                });
                None
            }
        };

        self.state = SessionState::Ready { file, result };
    }

    fn build_result(&self, file: &SelectedFile, mode: Mode, content_type: String, body: Vec<u8>) -> SessionResult {
        let result = match mode {
            Mode::Rectify => {
                let resource = self.resources.alloc(content_type.clone(), body);
                ProcessingResult::Artifact {
                    resource,
                    media_type: content_type,
                }
            }
            Mode::ExtractText => {
                let content = String::from_utf8_lossy(&body).into_owned();
                // The same text backs both the inline display and the
                // download affordance.
                let resource = self.resources.alloc("text/plain", content.clone().into_bytes());
                ProcessingResult::Text { content, resource }
            }
        };

        SessionResult {
            result,
            download_name: suggested_download_name(&file.name, mode),
        }
    }

    /// Drive one full round trip: begin, submit, record the outcome.
    ///
    /// Returns `false` without any network call when the trigger precondition
    /// is unmet (no file selected, or a request already in flight).
    pub async fn process<G: Gateway + ?Sized>(&mut self, mode: Mode, gateway: &G) -> bool {
        let Some(file) = self.begin(mode) else {
            return false;
        };
        let outcome = gateway.submit(mode, &file).await;
        self.complete(outcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/png", vec![0x89, 0x50, 0x4e, 0x47])
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert!(matches!(session.state(), SessionState::Idle));
        assert!(!session.is_busy());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_begin_without_file_is_noop() {
        let mut session = Session::new();
        assert!(session.begin(Mode::Rectify).is_none());
        assert!(matches!(session.state(), SessionState::Idle));
    }

    #[test]
    fn test_begin_while_busy_is_noop() {
        let mut session = Session::new();
        session.select_file(file("doc.png"));
        assert!(session.begin(Mode::Rectify).is_some());
        assert!(session.is_busy());

        assert!(session.begin(Mode::ExtractText).is_none());
        assert!(matches!(session.state(), SessionState::Busy { mode: Mode::Rectify, .. }));
    }

    #[test]
    fn test_success_produces_artifact_result() {
        let mut session = Session::new();
        session.select_file(file("doc.png"));
        session.begin(Mode::Rectify).unwrap();
        session.complete(Ok(GatewayOutcome::Success {
            content_type: "image/jpeg".to_string(),
            body: vec![1, 2, 3],
        }));

        assert!(!session.is_busy());
        assert_eq!(session.download_name(), Some("doc_scanned.jpg"));
        match session.result() {
            Some(ProcessingResult::Artifact { resource, media_type }) => {
                assert_eq!(media_type, "image/jpeg");
                assert_eq!(resource.data().unwrap().bytes(), &[1, 2, 3]);
            }
            other => panic!("expected artifact result, got {other:?}"),
        }
        assert!(session.last_failure().is_none());
    }

    #[test]
    fn test_text_result_is_displayed_and_downloadable() {
        let mut session = Session::new();
        session.select_file(file("note.jpg"));
        session.begin(Mode::ExtractText).unwrap();
        session.complete(Ok(GatewayOutcome::Success {
            content_type: "text/plain".to_string(),
            body: b"Hello world".to_vec(),
        }));

        assert_eq!(session.download_name(), Some("note_recognized.txt"));
        match session.result() {
            Some(ProcessingResult::Text { content, resource }) => {
                assert_eq!(content, "Hello world");
                let data = resource.data().unwrap();
                assert_eq!(data.media_type(), "text/plain");
                assert_eq!(data.bytes(), b"Hello world");
            }
            other => panic!("expected text result, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_records_and_clears_busy() {
        let mut session = Session::new();
        session.select_file(file("doc.png"));
        session.begin(Mode::Rectify).unwrap();
        session.complete(Ok(GatewayOutcome::Failure {
            status: 500,
            details: "OOM".to_string(),
        }));

        assert!(!session.is_busy());
        assert!(session.result().is_none());
        let failure = session.last_failure().unwrap();
        assert_eq!(failure.status, Some(500));
        assert_eq!(failure.details, "OOM");
    }

    #[test]
    fn test_transport_error_treated_like_failure() {
        let mut session = Session::new();
        session.select_file(file("doc.png"));
        session.begin(Mode::Rectify).unwrap();
        session.complete(Err(crate::error::ScangateError::transport("connection refused")));

        assert!(!session.is_busy());
        assert!(session.result().is_none());
        let failure = session.last_failure().unwrap();
        assert_eq!(failure.status, None);
        assert!(failure.details.contains("connection refused"));
    }

    #[test]
    fn test_select_file_clears_previous_result() {
        let mut session = Session::new();
        session.select_file(file("doc.png"));
        session.begin(Mode::Rectify).unwrap();
        session.complete(Ok(GatewayOutcome::Success {
            content_type: "image/jpeg".to_string(),
            body: vec![1],
        }));
        assert!(session.result().is_some());
        assert_eq!(session.resources().len(), 1);

        session.select_file(file("other.png"));
        assert!(session.result().is_none());
        assert!(session.download_name().is_none());
        assert!(session.resources().is_empty());
    }

    #[test]
    fn test_new_request_releases_superseded_resource() {
        let mut session = Session::new();
        session.select_file(file("doc.png"));
        session.begin(Mode::Rectify).unwrap();
        session.complete(Ok(GatewayOutcome::Success {
            content_type: "image/jpeg".to_string(),
            body: vec![1],
        }));
        assert_eq!(session.resources().len(), 1);

        // Starting a new round trip supersedes the old result immediately.
        session.begin(Mode::ExtractText).unwrap();
        assert!(session.resources().is_empty());

        session.complete(Ok(GatewayOutcome::Success {
            content_type: "text/plain".to_string(),
            body: b"hi".to_vec(),
        }));
        assert_eq!(session.resources().len(), 1);
    }

    #[test]
    fn test_complete_outside_busy_is_ignored() {
        let mut session = Session::new();
        session.select_file(file("doc.png"));
        session.complete(Ok(GatewayOutcome::Failure {
            status: 500,
            details: "late".to_string(),
        }));

        assert!(matches!(session.state(), SessionState::Ready { .. }));
        assert!(session.last_failure().is_none());
    }
}
