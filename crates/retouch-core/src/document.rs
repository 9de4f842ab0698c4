//! Per-document editing state: the snapshot history, the pending slider
//! values, and the preview derived from them.
//!
//! # Two mutation paths
//!
//! - Slider changes ([`Document::set_parameter`]) re-render the preview from
//!   the newest snapshot. They never touch the history.
//! - Effects ([`Document::commit_effect`]) run on the newest snapshot, not
//!   on the preview, push the result as a new snapshot and reset the sliders.
//!
//! [`Document::undo`] drops the newest snapshot and also resets the sliders,
//! since they were tied to the discarded baseline.

use std::collections::VecDeque;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::adjustments::preview_with;
use crate::config::EditorConfig;
use crate::decode::{decode_file, DecodeError};
use crate::effects::{self, Effect, EffectError, FaceLocator};
use crate::histogram::analyze;
use crate::raster::Image;
use crate::{AdjustmentParameters, Histogram, ParameterKey};

/// Errors raised by document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Undo was requested with only the original image left
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error(transparent)]
    Effect(#[from] EffectError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// One image being edited.
#[derive(Debug, Clone)]
pub struct Document {
    /// Newest snapshot; the baseline for previews and effects.
    base: Image,
    /// Older snapshots, oldest first.
    previous: VecDeque<Image>,
    params: AdjustmentParameters,
    /// Rendered preview, `None` while the sliders are at their defaults.
    preview: Option<Image>,
    config: EditorConfig,
    name: Option<String>,
}

impl Document {
    /// Start editing `image` with the stock configuration.
    pub fn load(image: Image) -> Self {
        Self::with_config(image, EditorConfig::default())
    }

    pub fn with_config(image: Image, config: EditorConfig) -> Self {
        debug!(width = image.width(), height = image.height(), "document loaded");
        Self {
            base: image,
            previous: VecDeque::new(),
            params: AdjustmentParameters::default(),
            preview: None,
            config,
            name: None,
        }
    }

    /// Decode a file and start editing it, remembering its file name.
    ///
    /// # Errors
    /// Returns `DocumentError::Decode` if the file cannot be read or decoded.
    pub fn open(path: impl AsRef<Path>, config: EditorConfig) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let image = decode_file(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Ok(Self {
            name,
            ..Self::with_config(image, config)
        })
    }

    /// Attach a display/export name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // =========================================================================
    // Adjustments
    // =========================================================================

    /// Set one slider and re-render the preview.
    ///
    /// Out-of-range values are clamped. Returns the value actually applied.
    pub fn set_parameter(&mut self, key: ParameterKey, value: f32) -> f32 {
        let applied = key.clamp(value);
        if applied != value {
            debug!(%key, requested = value, applied, "parameter clamped");
        }
        self.params = self.params.with(key, applied);
        self.refresh_preview();
        applied
    }

    /// Replace every slider at once and re-render the preview.
    pub fn set_parameters(&mut self, params: AdjustmentParameters) {
        self.params = params.clamped();
        self.refresh_preview();
    }

    pub fn parameters(&self) -> &AdjustmentParameters {
        &self.params
    }

    /// Return every slider to its default, discarding the preview.
    pub fn reset_adjustments(&mut self) {
        self.params = AdjustmentParameters::default();
        self.preview = None;
    }

    pub fn has_pending_adjustments(&self) -> bool {
        self.preview.is_some()
    }

    fn refresh_preview(&mut self) {
        self.preview = if self.params.is_default() {
            None
        } else {
            Some(preview_with(&self.base, &self.params, &self.config.tone))
        };
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// The image to display: the preview, or the baseline without pending
    /// adjustments.
    pub fn current_preview(&self) -> &Image {
        self.preview.as_ref().unwrap_or(&self.base)
    }

    /// The newest history snapshot.
    pub fn baseline(&self) -> &Image {
        &self.base
    }

    /// Number of snapshots, including the original. Always at least 1.
    pub fn history_len(&self) -> usize {
        self.previous.len() + 1
    }

    /// Histogram of the current preview.
    pub fn histogram(&self) -> Histogram {
        analyze(self.current_preview())
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Apply an effect to the baseline and commit the result.
    ///
    /// Pending adjustments are discarded, not baked in.
    ///
    /// # Errors
    /// Returns `DocumentError::Effect` if the effect rejects the baseline; the
    /// document is left unchanged.
    pub fn commit_effect(&mut self, effect: Effect) -> Result<(), DocumentError> {
        let image = effect.apply(&self.base, &self.config.effects)?;
        self.push(image);
        debug!(%effect, history = self.history_len(), "effect committed");
        Ok(())
    }

    /// Run portrait retouch on the baseline and commit the result.
    pub fn portrait_retouch<L>(&mut self, locator: &L) -> Result<(), DocumentError>
    where
        L: FaceLocator + ?Sized,
    {
        let image = effects::portrait_retouch(&self.base, locator, &self.config.effects.portrait)?;
        self.push(image);
        debug!(history = self.history_len(), "portrait retouch committed");
        Ok(())
    }

    fn push(&mut self, image: Image) {
        let old = std::mem::replace(&mut self.base, image);
        self.previous.push_back(old);

        if let Some(max) = self.config.max_history {
            while self.history_len() > max.max(1) {
                self.previous.pop_front();
            }
        }

        self.reset_adjustments();
    }

    /// Drop the newest snapshot. Returns whether anything was undone.
    pub fn undo(&mut self) -> bool {
        self.try_undo().is_ok()
    }

    /// Drop the newest snapshot.
    ///
    /// # Errors
    /// Returns `DocumentError::NothingToUndo` when only the original is left;
    /// the document is left unchanged.
    pub fn try_undo(&mut self) -> Result<(), DocumentError> {
        let previous = self.previous.pop_back().ok_or(DocumentError::NothingToUndo)?;
        self.base = previous;
        self.reset_adjustments();
        debug!(history = self.history_len(), "undo");
        Ok(())
    }
}
