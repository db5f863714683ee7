use std::sync::OnceLock;

use super::*;

use crate::color::palette::MedianCut;
use crate::color::scheme::{ColorRole, SwatchKind};
use crate::foundation::core::Rgb8;
use crate::segment::saliency::SaliencyMap;
use crate::workflow::acquire::MemorySource;

type TestModel = Box<dyn FnMut(&ModelInput) -> CoverResult<SaliencyMap>>;

fn small_config() -> CoverConfig {
    CoverConfig {
        preview: RenderTarget::new(62, 88).unwrap(),
        export: RenderTarget::new(124, 176).unwrap(),
        ..CoverConfig::default()
    }
}

fn photo() -> ImageBuffer {
    ImageBuffer::filled(40, 30, [200, 50, 50, 255])
}

fn confident() -> TestModel {
    Box::new(|_: &ModelInput| -> CoverResult<SaliencyMap> { Ok(SaliencyMap::filled(1.0)) })
}

fn orchestrator(model: TestModel) -> Orchestrator<TestModel, MedianCut> {
    Orchestrator::new(small_config(), model, MedianCut::default()).unwrap()
}

#[test]
fn starts_idle_with_placeholder_phrase() {
    let orch = orchestrator(confident());
    assert_eq!(orch.state(), WorkflowState::Idle);
    assert_eq!(orch.session().phrase, Phrase::default());
    assert!(orch.session().preview.is_none());
}

#[test]
fn successful_run_reaches_ready_with_preview() {
    let mut orch = orchestrator(confident());
    orch.acquire(&mut MemorySource::new(photo())).unwrap();

    assert_eq!(orch.state(), WorkflowState::Ready);
    assert_eq!(orch.status().percent, 100);
    assert_eq!(orch.status().message, "COVER READY FOR PRINT!");

    let session = orch.session();
    let preview = session.preview.as_ref().unwrap();
    assert_eq!((preview.width, preview.height), (62, 88));
    let scheme = session.scheme.as_ref().unwrap();
    assert_eq!(session.selection, scheme.default_selection());
    assert_eq!(session.cutout.as_ref().unwrap().alpha(0, 0), Some(255));
}

#[test]
fn inference_failure_leaves_session_untouched() {
    let failing: TestModel =
        Box::new(|_: &ModelInput| -> CoverResult<SaliencyMap> { Err(CoverError::inference("boom")) });
    let mut orch = orchestrator(failing);
    let err = orch.run_pipeline(photo()).unwrap_err();

    assert!(matches!(err, CoverError::Inference(_)));
    assert_eq!(orch.state(), WorkflowState::Error);
    assert_eq!(orch.status().percent, 0);
    assert!(orch.status().message.starts_with("ERROR"));
    assert!(orch.session().cutout.is_none());

    // Error only leaves through reset.
    assert!(matches!(
        orch.run_pipeline(photo()).unwrap_err(),
        CoverError::InvalidState(_)
    ));
    orch.reset().unwrap();
    assert_eq!(orch.state(), WorkflowState::Idle);
}

fn nothing_salient() -> TestModel {
    Box::new(|_: &ModelInput| -> CoverResult<SaliencyMap> { Ok(SaliencyMap::filled(0.0)) })
}

#[test]
fn subjectless_photo_takes_colors_from_the_unmasked_pixels() {
    let mut orch = orchestrator(nothing_salient());
    orch.acquire(&mut MemorySource::new(photo())).unwrap();

    assert_eq!(orch.state(), WorkflowState::Ready);
    let session = orch.session();
    let scheme = session.scheme.as_ref().unwrap();
    assert!(
        scheme
            .font_palette
            .colors()
            .iter()
            .all(|c| c.r.abs_diff(200) <= 8 && c.g.abs_diff(50) <= 8 && c.b.abs_diff(50) <= 8),
        "{:?}",
        scheme.font_palette
    );
    // The committed cutout still carries the mask.
    assert!(session.cutout.as_ref().unwrap().alpha(0, 0).unwrap() <= 1);
}

#[test]
fn transparent_photo_without_subject_is_an_error() {
    let mut orch = orchestrator(nothing_salient());
    let err = orch
        .run_pipeline(ImageBuffer::filled(40, 30, [200, 50, 50, 0]))
        .unwrap_err();
    assert!(matches!(err, CoverError::EmptyPalette));
    assert_eq!(orch.state(), WorkflowState::Error);
    assert!(orch.session().scheme.is_none());
}

#[test]
fn denied_acquisition_returns_to_idle() {
    let mut orch = orchestrator(confident());
    let mut source = MemorySource::new(photo());
    orch.acquire(&mut source).unwrap();
    assert_eq!(orch.state(), WorkflowState::Ready);

    // The source is now empty and refuses.
    let err = orch.acquire(&mut source).unwrap_err();
    assert!(matches!(err, CoverError::AcquisitionDenied(_)));
    assert_eq!(orch.state(), WorkflowState::Ready);

    let mut fresh = orchestrator(confident());
    let mut empty = MemorySource::new(photo());
    let _ = empty.acquire();
    assert!(fresh.acquire(&mut empty).is_err());
    assert_eq!(fresh.state(), WorkflowState::Idle);
}

#[test]
fn cancelled_run_is_discarded() {
    let slot: Arc<OnceLock<CancelHandle>> = Arc::default();
    let handle_slot = slot.clone();
    let cancelling: TestModel = Box::new(move |_: &ModelInput| -> CoverResult<SaliencyMap> {
        if let Some(h) = handle_slot.get() {
            h.cancel();
        }
        Ok(SaliencyMap::filled(1.0))
    });
    let mut orch = orchestrator(cancelling);
    let _ = slot.set(orch.cancel_handle());

    let err = orch.run_pipeline(photo()).unwrap_err();
    assert!(matches!(err, CoverError::Cancelled));
    assert_eq!(orch.state(), WorkflowState::Idle);
    assert!(orch.session().preview.is_none());
}

#[test]
fn color_override_changes_one_role_only() {
    let mut orch = orchestrator(confident());
    orch.run_pipeline(photo()).unwrap();
    let before = orch.session().selection;

    let option = ColorOption {
        role: ColorRole::Font,
        kind: SwatchKind::Inverted(0),
        color: Rgb8::new(1, 2, 3),
        css: "#010203".to_string(),
    };
    orch.apply_color_selection(&option).unwrap();

    let after = orch.session().selection;
    assert_eq!(after.font, Rgb8::new(1, 2, 3));
    assert_eq!(after.background, before.background);
    assert_eq!(orch.state(), WorkflowState::Ready);
}

#[test]
fn ready_only_operations_reject_idle() {
    let mut orch = orchestrator(confident());
    assert!(matches!(orch.export().unwrap_err(), CoverError::InvalidState(_)));
    assert!(matches!(orch.next_phrase().unwrap_err(), CoverError::InvalidState(_)));
    assert!(matches!(orch.reset().unwrap_err(), CoverError::InvalidState(_)));
}

#[test]
fn export_renders_at_print_size_and_keeps_state() {
    let mut orch = orchestrator(confident());
    orch.run_pipeline(photo()).unwrap();
    let frame = orch.export().unwrap();
    assert_eq!((frame.width, frame.height), (124, 176));
    assert_eq!(orch.state(), WorkflowState::Ready);
}

#[test]
fn phrases_come_from_the_configured_list() {
    let phrases = vec![Phrase::new("One", "First"), Phrase::new("Two", "Second")];
    let mut orch = orchestrator(confident()).with_phrases(phrases.clone());
    orch.run_pipeline(photo()).unwrap();
    assert!(phrases.contains(&orch.session().phrase));

    for _ in 0..5 {
        let p = orch.next_phrase().unwrap().clone();
        assert!(phrases.contains(&p));
        assert_eq!(orch.session().phrase, p);
    }
}

#[test]
fn status_messages_are_uppercase() {
    let s = Status::new("Extracting colors", 150);
    assert_eq!(s.message, "EXTRACTING COLORS");
    assert_eq!(s.percent, 100);
}
