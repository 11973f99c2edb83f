//! Load, edit, and save one schedule document.
//!
//! An [`EditSession`] holds the current snapshot of a single document.
//! Edits go through [`EditSession::apply`], which swaps in the new
//! snapshot only when the operation succeeds. Saving runs the
//! validation gate first; a refused or failed save leaves both the
//! session and the stored document as they were.

use tracing::{info, warn};

use crate::config::EditorConfig;
use crate::constraints::{audit, validate_for_save, Violation};
use crate::document::{denormalize_with_shape, normalize_with_shape, DocumentShape};
use crate::editing::{move_window, resize_with_policy};
use crate::error::{EditResult, SessionError, SessionResult};
use crate::export::to_interchange_text;
use crate::models::{ModuleSchedule, WindowRef};
use crate::store::DocumentStore;

/// Editing state for one stored document.
#[derive(Debug, Clone)]
pub struct EditSession {
    document_id: String,
    current: ModuleSchedule,
    shape: DocumentShape,
    config: EditorConfig,
    dirty: bool,
}

impl EditSession {
    /// Loads and normalizes a document with default settings.
    ///
    /// # Errors
    /// `Store` if the document cannot be fetched, `Shape` if it is
    /// malformed.
    pub async fn load(store: &dyn DocumentStore, document_id: &str) -> SessionResult<Self> {
        Self::load_with_config(store, document_id, EditorConfig::default()).await
    }

    /// Loads and normalizes a document.
    pub async fn load_with_config(
        store: &dyn DocumentStore,
        document_id: &str,
        config: EditorConfig,
    ) -> SessionResult<Self> {
        let document = store.get(document_id).await?;
        let (current, shape) = normalize_with_shape(&document)
            .inspect_err(|e| warn!(document_id, error = %e, "document rejected"))?;
        info!(
            document_id,
            schedule = %current.schedule_name,
            partitions = current.partitions.len(),
            windows = current.window_count(),
            "schedule loaded"
        );
        Ok(Self {
            document_id: document_id.to_string(),
            current,
            shape,
            config,
            dirty: false,
        })
    }

    /// Starts a session on an in-memory schedule not yet stored.
    pub fn from_schedule(document_id: impl Into<String>, schedule: ModuleSchedule) -> Self {
        Self {
            document_id: document_id.into(),
            current: schedule,
            shape: DocumentShape::default(),
            config: EditorConfig::default(),
            dirty: true,
        }
    }

    /// Replaces the editor settings.
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Id of the document in the store.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// The current snapshot.
    pub fn current(&self) -> &ModuleSchedule {
        &self.current
    }

    /// Editor settings in use.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Layout of the loaded document.
    pub fn shape(&self) -> &DocumentShape {
        &self.shape
    }

    /// Whether there are edits not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Runs an edit against the current snapshot.
    ///
    /// On success the result becomes the current snapshot. On failure the
    /// snapshot is kept and the error is returned.
    pub fn apply<F>(&mut self, op: F) -> SessionResult<&ModuleSchedule>
    where
        F: FnOnce(&ModuleSchedule) -> EditResult<ModuleSchedule>,
    {
        let next = op(&self.current)?;
        self.current = next;
        self.dirty = true;
        Ok(&self.current)
    }

    /// Moves a window with the session's snapping settings.
    pub fn move_window(
        &mut self,
        window: &WindowRef,
        proposed_start: f64,
    ) -> SessionResult<&ModuleSchedule> {
        let snapper = self.config.snapper();
        self.apply(|s| move_window(s, window, proposed_start, &snapper))
    }

    /// Resizes a window with the session's resize policy.
    pub fn resize_window(
        &mut self,
        window: &WindowRef,
        fraction: f64,
    ) -> SessionResult<&ModuleSchedule> {
        let policy = self.config.resize_policy;
        self.apply(|s| resize_with_policy(s, window, fraction, policy))
    }

    /// Every violation in the current snapshot.
    pub fn audit(&self) -> Vec<Violation> {
        audit(&self.current)
    }

    /// Validates and writes the current snapshot back to the store.
    ///
    /// The document is written in the layout it was loaded with.
    ///
    /// # Errors
    /// `SaveRefused` with the first overlap found (the store is not
    /// called), or `Store` if the write fails.
    pub async fn save(&mut self, store: &dyn DocumentStore) -> SessionResult<()> {
        if let Err(violation) = validate_for_save(&self.current) {
            warn!(
                document_id = %self.document_id,
                violation = %violation,
                "save refused"
            );
            return Err(SessionError::SaveRefused(violation));
        }

        let document = denormalize_with_shape(&self.current, &self.shape);
        store
            .set(&self.document_id, document)
            .await
            .inspect_err(|e| warn!(document_id = %self.document_id, error = %e, "save failed"))?;

        self.dirty = false;
        info!(document_id = %self.document_id, "schedule saved");
        Ok(())
    }

    /// Renders the current snapshot as interchange text.
    pub fn export(&self) -> SessionResult<String> {
        Ok(to_interchange_text(&self.current)?)
    }
}
