use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::color::palette::PaletteExtractor;
use crate::color::scheme::{ColorOption, ColorScheme, ColorSelection};
use crate::config::CoverConfig;
use crate::foundation::core::{ImageBuffer, Phrase, RenderTarget};
use crate::foundation::error::{CoverError, CoverResult};
use crate::render::fonts::{FontBook, FontMeasure};
use crate::render::plan::{CoverLayout, compose_cover};
use crate::render::{CpuRenderer, FrameRGBA};
use crate::segment::model::{ModelInput, SaliencyModel};
use crate::segment::saliency::apply_mask_with;
use crate::workflow::acquire::ImageSource;
use crate::workflow::phrases::PhrasePicker;
use crate::workflow::state::WorkflowState;

/// Progress line shown to the user. Messages are upper-cased.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Status {
    /// Upper-cased message.
    pub message: String,
    /// Progress, 0 to 100.
    pub percent: u8,
}

impl Status {
    /// Upper-case `message` and clamp `percent` to 100.
    pub fn new(message: impl AsRef<str>, percent: u8) -> Self {
        Self {
            message: message.as_ref().to_uppercase(),
            percent: percent.min(100),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new("Ready to start", 0)
    }
}

/// Cloneable token that invalidates in-flight pipeline runs.
///
/// Each run records the generation it started with; `cancel` or a newer run bumps the counter and
/// the stale run discards its result at its next checkpoint.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    generation: Arc<AtomicU64>,
}

impl CancelHandle {
    /// Invalidate whatever run is in flight.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

/// Everything produced by the last successful run.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Photograph with its alpha rewritten by the mask.
    pub cutout: Option<ImageBuffer>,
    /// Colors derived from the cutout.
    pub scheme: Option<ColorScheme>,
    /// Colors the preview was drawn with.
    pub selection: ColorSelection,
    /// Phrase on the cover.
    pub phrase: Phrase,
    /// Latest preview render.
    pub preview: Option<FrameRGBA>,
}

/// Sequences acquisition, masking, color derivation and rendering, one run at a time.
pub struct Orchestrator<M: SaliencyModel, P: PaletteExtractor> {
    config: CoverConfig,
    model: M,
    extractor: P,
    renderer: CpuRenderer,
    phrases: Vec<Phrase>,
    picker: PhrasePicker,
    state: WorkflowState,
    session: SessionState,
    status: Status,
    cancel: CancelHandle,
}

impl<M: SaliencyModel, P: PaletteExtractor> Orchestrator<M, P> {
    /// Validate `config` and load its fonts.
    pub fn new(config: CoverConfig, model: M, extractor: P) -> CoverResult<Self> {
        config.validate()?;
        let fonts = FontBook::load(&config.fonts)?;
        Ok(Self::with_font_book(config, model, extractor, fonts))
    }

    /// Construct with already loaded fonts. `config` is assumed valid.
    pub fn with_font_book(config: CoverConfig, model: M, extractor: P, fonts: FontBook) -> Self {
        let picker = PhrasePicker::new(config.seed);
        Self {
            config,
            model,
            extractor,
            renderer: CpuRenderer::new(fonts),
            phrases: Vec::new(),
            picker,
            state: WorkflowState::Idle,
            session: SessionState::default(),
            status: Status::default(),
            cancel: CancelHandle::default(),
        }
    }

    /// Draw phrases from `phrases`; an empty list keeps the current phrase.
    pub fn with_phrases(mut self, phrases: Vec<Phrase>) -> Self {
        self.phrases = phrases;
        self
    }

    /// Current workflow state.
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Result of the last committed run.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Latest progress line.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Active configuration.
    pub fn config(&self) -> &CoverConfig {
        &self.config
    }

    /// Handle that cancels in-flight runs from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn transition(&mut self, next: WorkflowState) -> CoverResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(CoverError::invalid_state(format!(
                "cannot go from {:?} to {:?}",
                self.state, next
            )));
        }
        tracing::info!(from = ?self.state, to = ?next, "workflow transition");
        self.state = next;
        Ok(())
    }

    fn set_status(&mut self, message: impl AsRef<str>, percent: u8) {
        self.status = Status::new(message, percent);
        tracing::debug!(status = %self.status.message, percent, "status");
    }

    fn require_ready(&self, op: &str) -> CoverResult<()> {
        if self.state != WorkflowState::Ready {
            return Err(CoverError::invalid_state(format!(
                "{op} requires Ready, current state is {:?}",
                self.state
            )));
        }
        Ok(())
    }

    /// State the session rests in when no run is active.
    fn resting_state(&self) -> WorkflowState {
        if self.session.preview.is_some() {
            WorkflowState::Ready
        } else {
            WorkflowState::Idle
        }
    }

    fn fail(&mut self, err: CoverError) -> CoverError {
        tracing::error!(error = %err, from = ?self.state, "pipeline failed");
        self.set_status(format!("Error: {err}"), 0);
        self.state = WorkflowState::Error;
        err
    }

    /// Acquire an image and run the pipeline on it.
    ///
    /// A denied acquisition puts the session back where it was; any other failure is an error.
    pub fn acquire(&mut self, source: &mut dyn ImageSource) -> CoverResult<()> {
        let rest = self.resting_state();
        self.transition(WorkflowState::Acquiring)?;
        self.set_status("Acquiring image", 10);

        match source.acquire() {
            Ok(image) => self.run_pipeline(image),
            Err(err @ CoverError::AcquisitionDenied(_)) => {
                tracing::warn!(error = %err, "acquisition denied");
                self.set_status("Image acquisition denied", 0);
                self.transition(rest)?;
                Err(err)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Mask, color and render `image`, committing the result to the session.
    ///
    /// The previous session is only replaced once every stage has succeeded.
    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn run_pipeline(&mut self, image: ImageBuffer) -> CoverResult<()> {
        let generation = self.cancel.begin();
        let rest = self.resting_state();

        self.transition(WorkflowState::Inferring)?;
        self.set_status("Removing background", 40);
        let map = match ModelInput::from_image(&image).and_then(|input| self.model.infer(&input)) {
            Ok(map) => map,
            Err(err) => return Err(self.fail(err)),
        };
        self.checkpoint(generation, rest)?;

        self.transition(WorkflowState::Compositing)?;
        let mut cutout = image.clone();
        if let Err(err) = apply_mask_with(&mut cutout, &map, self.config.resample) {
            return Err(self.fail(err));
        }

        self.transition(WorkflowState::ColorDeriving)?;
        self.set_status("Extracting colors", 85);
        let scheme = match ColorScheme::derive_for_cutout(
            &cutout,
            &image,
            &self.extractor,
            &self.config.color,
        ) {
            Ok(s) => s,
            Err(err) => return Err(self.fail(err)),
        };
        drop(image);
        let selection = scheme.default_selection();
        let phrase = self
            .picker
            .pick(&self.phrases)
            .cloned()
            .unwrap_or_else(|| self.session.phrase.clone());

        self.transition(WorkflowState::Rendering)?;
        let preview = match render_cover(
            &mut self.renderer,
            &self.config.layout,
            self.config.preview,
            &cutout,
            &selection,
            &phrase,
        ) {
            Ok(frame) => frame,
            Err(err) => return Err(self.fail(err)),
        };
        self.checkpoint(generation, rest)?;

        self.session = SessionState {
            cutout: Some(cutout),
            scheme: Some(scheme),
            selection,
            phrase,
            preview: Some(preview),
        };
        self.transition(WorkflowState::Ready)?;
        self.set_status("Cover ready for print!", 100);
        Ok(())
    }

    /// Abandon the run if a newer run or a cancel happened since `generation` started.
    fn checkpoint(&mut self, generation: u64, rest: WorkflowState) -> CoverResult<()> {
        if self.cancel.is_current(generation) {
            return Ok(());
        }
        tracing::info!(generation, "discarding stale pipeline run");
        self.transition(rest)?;
        Err(CoverError::Cancelled)
    }

    /// Override the font or background color and re-render the preview.
    pub fn apply_color_selection(&mut self, option: &ColorOption) -> CoverResult<()> {
        self.require_ready("apply_color_selection")?;
        let mut selection = self.session.selection;
        selection.apply(option);
        tracing::debug!(role = ?option.role, css = %option.css, "applying color");
        self.rerender(selection, self.session.phrase.clone())
    }

    /// Pick another phrase and re-render the preview.
    pub fn next_phrase(&mut self) -> CoverResult<&Phrase> {
        self.require_ready("next_phrase")?;
        let phrase = self
            .picker
            .pick(&self.phrases)
            .cloned()
            .unwrap_or_else(|| self.session.phrase.clone());
        self.rerender(self.session.selection, phrase)?;
        Ok(&self.session.phrase)
    }

    fn rerender(&mut self, selection: ColorSelection, phrase: Phrase) -> CoverResult<()> {
        self.transition(WorkflowState::Rendering)?;
        let Some(cutout) = self.session.cutout.as_ref() else {
            return Err(self.fail(CoverError::invalid_state("no cutout in session")));
        };
        let frame = match render_cover(
            &mut self.renderer,
            &self.config.layout,
            self.config.preview,
            cutout,
            &selection,
            &phrase,
        ) {
            Ok(frame) => frame,
            Err(err) => return Err(self.fail(err)),
        };
        self.session.selection = selection;
        self.session.phrase = phrase;
        self.session.preview = Some(frame);
        self.transition(WorkflowState::Ready)
    }

    /// Render the current session at print resolution. The workflow state is unchanged.
    pub fn export(&mut self) -> CoverResult<FrameRGBA> {
        self.require_ready("export")?;
        let cutout = self
            .session
            .cutout
            .as_ref()
            .ok_or_else(|| CoverError::invalid_state("no cutout in session"))?;
        render_cover(
            &mut self.renderer,
            &self.config.layout,
            self.config.export,
            cutout,
            &self.session.selection,
            &self.session.phrase,
        )
    }

    /// Leave the `Error` state.
    pub fn reset(&mut self) -> CoverResult<()> {
        self.transition(WorkflowState::Idle)?;
        self.set_status("Ready to start", 0);
        Ok(())
    }
}

fn render_cover(
    renderer: &mut CpuRenderer,
    layout: &CoverLayout,
    target: RenderTarget,
    cutout: &ImageBuffer,
    selection: &ColorSelection,
    phrase: &Phrase,
) -> CoverResult<FrameRGBA> {
    let plan = {
        let mut measure = FontMeasure::new(renderer.fonts());
        compose_cover(
            target,
            (cutout.width(), cutout.height()),
            selection,
            phrase,
            layout,
            &mut measure,
        )?
    };
    renderer.render(&plan, cutout)
}

#[cfg(test)]
#[path = "../../tests/unit/workflow/session.rs"]
mod tests;
