//! Workflow Orchestrator: acquisition, pipeline sequencing and session state.

/// Image sources: files, memory and cameras.
pub mod acquire;
/// Headline/subtitle lists and seeded picking.
pub mod phrases;
/// The orchestrator and its session state.
pub mod session;
/// Workflow state machine.
pub mod state;

pub use acquire::{CameraSource, CaptureDevice, CaptureSession, FileSource, ImageSource, MemorySource};
pub use phrases::{PhrasePicker, load_phrases, parse_phrases};
pub use session::{CancelHandle, Orchestrator, SessionState, Status};
pub use state::WorkflowState;
