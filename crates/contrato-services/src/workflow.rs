//! Upload-then-analyze orchestration for a single contract.
//!
//! A run moves `idle -> uploading -> analyzing -> succeeded | failed`. The
//! file is validated before anything touches the network, uploaded to object
//! storage, and then sent unchanged to the analysis service. `reset` returns
//! to `idle` from any state; responses belonging to a run that was reset in
//! the meantime are dropped instead of being applied.
//!
//! State lives behind a `tokio::sync::Mutex` that is never held across a
//! transport call. Every transition is published as a [`WorkflowSnapshot`]
//! on a `watch` channel.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use contrato_core::{
    AnalysisTransport, ContractAnalysis, ErrorMetadata, FileValidator, LogLevel, RunId,
    StorageReference, UploadTransport, UploadedFile, WorkflowError, WorkflowStatus,
};
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use crate::board::{ActionDetail, ActionRef, ResultBoard};

/// Point-in-time view of the workflow, safe to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSnapshot {
    pub run_id: Option<RunId>,
    pub status: WorkflowStatus,
    pub file_name: Option<String>,
    pub storage: Option<StorageReference>,
    pub analysis: Option<ContractAnalysis>,
    /// User-facing message of the terminal error.
    pub error: Option<String>,
    pub error_code: Option<&'static str>,
    pub selection: Option<ActionRef>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct RunState {
    run_id: Option<RunId>,
    status: WorkflowStatus,
    file: Option<UploadedFile>,
    storage: Option<StorageReference>,
    board: Option<ResultBoard>,
    error: Option<WorkflowError>,
    started_at: Option<Instant>,
}

impl RunState {
    fn is_current(&self, run_id: RunId) -> bool {
        self.run_id == Some(run_id)
    }

    fn elapsed_ms(&self) -> u128 {
        self.started_at
            .map(|start| start.elapsed().as_millis())
            .unwrap_or_default()
    }

    fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            run_id: self.run_id,
            status: self.status,
            file_name: self.file.as_ref().map(|f| f.name().to_string()),
            storage: self.storage.clone(),
            analysis: self.board.as_ref().map(|b| b.analysis().clone()),
            error: self.error.as_ref().map(ErrorMetadata::client_message),
            error_code: self.error.as_ref().map(ErrorMetadata::error_code),
            selection: self.board.as_ref().and_then(ResultBoard::selection),
            updated_at: Utc::now(),
        }
    }
}

pub struct ContractWorkflow {
    uploader: Arc<dyn UploadTransport>,
    analyzer: Arc<dyn AnalysisTransport>,
    validator: FileValidator,
    state: Mutex<RunState>,
    updates: watch::Sender<WorkflowSnapshot>,
}

impl ContractWorkflow {
    pub fn new(
        uploader: Arc<dyn UploadTransport>,
        analyzer: Arc<dyn AnalysisTransport>,
        validator: FileValidator,
    ) -> Self {
        let state = RunState::default();
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            uploader,
            analyzer,
            validator,
            state: Mutex::new(state),
            updates,
        }
    }

    /// Receive every published transition. Slow receivers only see the latest.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn status(&self) -> WorkflowStatus {
        self.state.lock().await.status
    }

    pub async fn storage_reference(&self) -> Option<StorageReference> {
        self.state.lock().await.storage.clone()
    }

    pub async fn board(&self) -> Option<ResultBoard> {
        self.state.lock().await.board.clone()
    }

    pub async fn error(&self) -> Option<WorkflowError> {
        self.state.lock().await.error.clone()
    }

    /// Validate, upload and analyze `file`.
    ///
    /// Only accepted from `idle`; any other state returns
    /// [`WorkflowError::Busy`] without touching the current run. Validation
    /// failures end the run before any network call. An analysis failure
    /// keeps the storage reference obtained by the upload.
    pub async fn submit(&self, file: UploadedFile) -> Result<ContractAnalysis, WorkflowError> {
        self.run(file, false).await
    }

    /// Start over with a new file after a finished run.
    ///
    /// The busy check and the reset happen under one lock, so a concurrent
    /// `submit` can never slip in between them.
    pub async fn replace(&self, file: UploadedFile) -> Result<ContractAnalysis, WorkflowError> {
        self.run(file, true).await
    }

    async fn run(
        &self,
        file: UploadedFile,
        replacing: bool,
    ) -> Result<ContractAnalysis, WorkflowError> {
        let run_id = self.begin(&file, replacing).await?;

        let uploaded = self.uploader.upload(&file).await;
        {
            let mut state = self.state.lock().await;
            if !state.is_current(run_id) {
                return Err(self.discard(run_id, "upload"));
            }
            match uploaded {
                Ok(reference) => {
                    tracing::info!(
                        run_id = %run_id,
                        url = %reference.secure_url,
                        "Upload complete, starting analysis"
                    );
                    state.storage = Some(reference);
                    state.status = WorkflowStatus::Analyzing;
                    self.publish(&state);
                }
                Err(err) => return Err(self.fail(&mut state, err.into())),
            }
        }

        let analyzed = self.analyzer.analyze(&file).await;
        let mut state = self.state.lock().await;
        if !state.is_current(run_id) {
            return Err(self.discard(run_id, "analysis"));
        }
        match analyzed {
            Ok(analysis) => {
                tracing::info!(
                    run_id = %run_id,
                    contract_id = %analysis.contract_id,
                    phases = analysis.phases.len(),
                    duration_ms = state.elapsed_ms(),
                    "Contract workflow succeeded"
                );
                state.board = Some(ResultBoard::new(analysis.clone()));
                state.status = WorkflowStatus::Succeeded;
                self.publish(&state);
                Ok(analysis)
            }
            Err(err) => Err(self.fail(&mut state, err.into())),
        }
    }

    /// Return to `idle` from any state. A call still in flight keeps running
    /// but its result is discarded.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        if let Some(run_id) = state.run_id {
            tracing::info!(run_id = %run_id, status = %state.status, "Workflow reset");
        }
        *state = RunState::default();
        self.publish(&state);
    }

    /// Focus an action on the result board. `None` when there is no result
    /// or the position does not exist.
    pub async fn select_action(&self, at: ActionRef) -> Option<ActionDetail> {
        let mut state = self.state.lock().await;
        let detail = state.board.as_mut()?.select(at)?;
        self.publish(&state);
        Some(detail)
    }

    pub async fn select_action_by_id(&self, id: &str) -> Option<ActionDetail> {
        let mut state = self.state.lock().await;
        let detail = state.board.as_mut()?.select_by_id(id)?;
        self.publish(&state);
        Some(detail)
    }

    pub async fn dismiss_selection(&self) {
        let mut state = self.state.lock().await;
        if let Some(board) = state.board.as_mut() {
            board.dismiss();
            self.publish(&state);
        }
    }

    pub async fn selected_detail(&self) -> Option<ActionDetail> {
        self.state.lock().await.board.as_ref()?.detail()
    }

    /// Claim the workflow for a new run. With `replacing`, a finished run is
    /// cleared first; otherwise only `idle` is accepted.
    async fn begin(&self, file: &UploadedFile, replacing: bool) -> Result<RunId, WorkflowError> {
        let mut state = self.state.lock().await;
        let accepted = match state.status {
            WorkflowStatus::Idle => true,
            status => replacing && !status.is_busy(),
        };
        if !accepted {
            tracing::debug!(status = %state.status, file = %file.name(), "Submit refused");
            return Err(WorkflowError::Busy(state.status));
        }
        if let Some(previous) = state.run_id {
            tracing::info!(run_id = %previous, status = %state.status, "Replacing finished run");
        }
        *state = RunState::default();

        let run_id = RunId::new();
        state.run_id = Some(run_id);
        state.started_at = Some(Instant::now());

        if let Err(err) = self.validator.validate(file) {
            return Err(self.fail(&mut state, err.into()));
        }

        tracing::info!(
            run_id = %run_id,
            file = %file.name(),
            bytes = file.len(),
            "Workflow started"
        );
        state.file = Some(file.clone());
        state.status = WorkflowStatus::Uploading;
        self.publish(&state);
        Ok(run_id)
    }

    fn fail(&self, state: &mut RunState, err: WorkflowError) -> WorkflowError {
        let run_id = state.run_id;
        let duration_ms = state.elapsed_ms();
        match err.log_level() {
            LogLevel::Debug => tracing::debug!(
                run_id = ?run_id,
                code = err.error_code(),
                error = %err,
                "Workflow run failed"
            ),
            LogLevel::Warn => tracing::warn!(
                run_id = ?run_id,
                code = err.error_code(),
                error = %err,
                duration_ms,
                "Workflow run failed"
            ),
            LogLevel::Error => tracing::error!(
                run_id = ?run_id,
                code = err.error_code(),
                error = %err,
                duration_ms,
                "Workflow run failed"
            ),
        }

        state.status = WorkflowStatus::Failed;
        state.error = Some(err.clone());
        self.publish(state);
        err
    }

    fn discard(&self, run_id: RunId, step: &'static str) -> WorkflowError {
        tracing::info!(run_id = %run_id, step, "Discarding response of a superseded run");
        WorkflowError::Superseded(run_id)
    }

    fn publish(&self, state: &RunState) {
        self.updates.send_replace(state.snapshot());
    }
}
