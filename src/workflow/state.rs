/// Lifecycle of one cover session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Nothing in flight; waiting for an image.
    Idle,
    /// Reading a file or camera frame.
    Acquiring,
    /// Running the saliency model.
    Inferring,
    /// Writing the mask into the alpha channel.
    Compositing,
    /// Extracting palettes and swatches.
    ColorDeriving,
    /// Rasterizing the preview.
    Rendering,
    /// A preview is available.
    Ready,
    /// A run failed; leave with `reset`.
    Error,
}

impl WorkflowState {
    /// States a pipeline run passes through between acquisition and `Ready`.
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            Self::Inferring | Self::Compositing | Self::ColorDeriving | Self::Rendering
        )
    }

    /// Whether `self -> next` is a legal transition.
    ///
    /// In-flight states may fall back to `Idle` or `Ready` when a run is cancelled, restoring
    /// whatever the session showed before the run started.
    pub fn can_transition_to(self, next: Self) -> bool {
        use WorkflowState::*;

        if self.is_in_flight() && matches!(next, Idle | Ready | Error) {
            return true;
        }
        match (self, next) {
            (Idle | Ready, Acquiring | Inferring) => true,
            (Acquiring, Inferring | Idle | Ready | Error) => true,
            (Inferring, Compositing) => true,
            (Compositing, ColorDeriving) => true,
            (ColorDeriving, Rendering) => true,
            (Ready, Rendering) => true,
            (Error, Idle) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/workflow/state.rs"]
mod tests;
