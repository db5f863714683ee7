/// Result alias used across the crate.
pub type CoverResult<T> = Result<T, CoverError>;

/// Error taxonomy for the cover pipeline.
///
/// `AcquisitionDenied`, `ModelLoad` and `Inference` are user-facing: the orchestrator surfaces
/// them through its status line and offers a reset path. Everything else is a contract violation
/// that aborts the current run.
#[derive(thiserror::Error, Debug)]
pub enum CoverError {
    /// Camera permission refused or the image could not be read.
    #[error("acquisition denied: {0}")]
    AcquisitionDenied(String),

    /// Segmentation model (or precomputed mask) unavailable.
    #[error("model load failure: {0}")]
    ModelLoad(String),

    /// Segmentation model failed at run time.
    #[error("inference failure: {0}")]
    Inference(String),

    /// Saliency output is not the fixed 320x320 grid.
    #[error("invalid mask dimensions: expected {expected}x{expected}, got {width}x{height}")]
    InvalidMaskDimensions {
        /// Required side length.
        expected: usize,
        /// Width received.
        width: usize,
        /// Height received.
        height: usize,
    },

    /// No pixel was eligible for palette extraction.
    #[error("palette is empty")]
    EmptyPalette,

    /// Malformed color string.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Zero-area or oversized render surface.
    #[error("invalid render target: {0}")]
    InvalidRenderTarget(String),

    /// Operation not allowed in the current workflow state.
    #[error("invalid workflow state: {0}")]
    InvalidState(String),

    /// Run superseded by a cancel or a newer run.
    #[error("pipeline run cancelled")]
    Cancelled,

    /// Invalid configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O and decode failures with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoverError {
    /// Build a [`CoverError::AcquisitionDenied`] value.
    pub fn acquisition_denied(msg: impl Into<String>) -> Self {
        Self::AcquisitionDenied(msg.into())
    }

    /// Build a [`CoverError::ModelLoad`] value.
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Build a [`CoverError::Inference`] value.
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Build a [`CoverError::InvalidColor`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    /// Build a [`CoverError::InvalidRenderTarget`] value.
    pub fn invalid_render_target(msg: impl Into<String>) -> Self {
        Self::InvalidRenderTarget(msg.into())
    }

    /// Build a [`CoverError::InvalidState`] value.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Build a [`CoverError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// `true` for errors the user can act on (retry capture, pick another model).
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::AcquisitionDenied(_) | Self::ModelLoad(_) | Self::Inference(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
