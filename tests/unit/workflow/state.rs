use super::*;

use WorkflowState::*;

#[test]
fn happy_path_is_legal() {
    let path = [
        Idle,
        Acquiring,
        Inferring,
        Compositing,
        ColorDeriving,
        Rendering,
        Ready,
    ];
    for pair in path.windows(2) {
        assert!(pair[0].can_transition_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
    }
}

#[test]
fn stages_cannot_be_skipped() {
    assert!(!Idle.can_transition_to(Ready));
    assert!(!Idle.can_transition_to(Rendering));
    assert!(!Inferring.can_transition_to(ColorDeriving));
    assert!(!Compositing.can_transition_to(Rendering));
    assert!(!Acquiring.can_transition_to(Compositing));
}

#[test]
fn error_only_resets_to_idle() {
    for next in [Acquiring, Inferring, Compositing, ColorDeriving, Rendering, Ready, Error] {
        assert!(!Error.can_transition_to(next), "Error -> {next:?}");
    }
    assert!(Error.can_transition_to(Idle));
}

#[test]
fn ready_rerenders_and_accepts_new_images() {
    assert!(Ready.can_transition_to(Rendering));
    assert!(Ready.can_transition_to(Acquiring));
    assert!(Ready.can_transition_to(Inferring));
}

#[test]
fn in_flight_states_fail_or_roll_back() {
    for s in [Inferring, Compositing, ColorDeriving, Rendering] {
        assert!(s.is_in_flight());
        assert!(s.can_transition_to(Error));
        assert!(s.can_transition_to(Idle));
        assert!(s.can_transition_to(Ready));
    }
    assert!(!Idle.is_in_flight());
    assert!(!Ready.is_in_flight());
}

#[test]
fn denied_acquisition_returns_to_rest() {
    assert!(Acquiring.can_transition_to(Idle));
    assert!(Acquiring.can_transition_to(Ready));
}
