use super::*;

fn presented() -> Lifecycle {
    let mut lifecycle = Lifecycle::new();
    assert!(lifecycle.begin(Operation::Present));
    assert_eq!(lifecycle.settle(Operation::Present, Settlement::Succeeded), None);
    lifecycle
}

#[test]
fn starts_idle_with_only_present_enabled() {
    let lifecycle = Lifecycle::new();
    assert_eq!(lifecycle.phase(), Phase::Idle);
    assert!(lifecycle.can_present());
    assert!(!lifecycle.can_dismiss());
    assert_eq!(lifecycle.finish_cause(), None);
}

#[test]
fn present_disables_itself_as_soon_as_it_begins() {
    let mut lifecycle = Lifecycle::new();
    assert!(lifecycle.begin(Operation::Present));
    assert_eq!(lifecycle.phase(), Phase::Presenting);
    assert!(!lifecycle.can_present());
    assert!(!lifecycle.can_dismiss());
    assert!(!lifecycle.begin(Operation::Present));
}

#[test]
fn dismiss_is_refused_before_present_completes() {
    let mut lifecycle = Lifecycle::new();
    assert!(!lifecycle.begin(Operation::Dismiss));

    lifecycle.begin(Operation::Present);
    assert!(!lifecycle.begin(Operation::Dismiss));
    assert_eq!(lifecycle.phase(), Phase::Presenting);
}

#[test]
fn successful_present_unlocks_dismiss_once() {
    let mut lifecycle = presented();
    assert!(lifecycle.can_dismiss());
    assert!(!lifecycle.can_present());

    assert!(lifecycle.begin(Operation::Dismiss));
    assert!(!lifecycle.can_dismiss());
    assert!(!lifecycle.begin(Operation::Dismiss));
}

#[test]
fn successful_dismiss_finishes() {
    let mut lifecycle = presented();
    lifecycle.begin(Operation::Dismiss);
    assert_eq!(
        lifecycle.settle(Operation::Dismiss, Settlement::Succeeded),
        Some(FinishCause::Dismissed)
    );
    assert_eq!(lifecycle.phase(), Phase::Finished(FinishCause::Dismissed));
    assert!(!lifecycle.hide());
}

#[test]
fn failed_present_faults_without_unlocking_dismiss() {
    let mut lifecycle = Lifecycle::new();
    lifecycle.begin(Operation::Present);
    assert_eq!(lifecycle.settle(Operation::Present, Settlement::Failed), None);
    assert_eq!(lifecycle.phase(), Phase::Faulted(Operation::Present));
    assert!(!lifecycle.can_present());
    assert!(!lifecycle.can_dismiss());
    assert!(!lifecycle.begin(Operation::Dismiss));
}

#[test]
fn failed_or_abandoned_dismiss_never_re_enables() {
    for settlement in [Settlement::Failed, Settlement::Abandoned] {
        let mut lifecycle = presented();
        lifecycle.begin(Operation::Dismiss);
        assert_eq!(lifecycle.settle(Operation::Dismiss, settlement), None);
        assert_eq!(lifecycle.phase(), Phase::Faulted(Operation::Dismiss));
        assert!(!lifecycle.can_dismiss());
        assert!(!lifecycle.begin(Operation::Dismiss));
    }
}

#[test]
fn hidden_event_finishes_from_any_live_phase() {
    let mut idle = Lifecycle::new();
    assert!(idle.hide());
    assert!(!idle.can_present());

    let mut faulted = Lifecycle::new();
    faulted.begin(Operation::Present);
    faulted.settle(Operation::Present, Settlement::Failed);
    assert!(faulted.hide());
    assert_eq!(faulted.finish_cause(), Some(FinishCause::Hidden));

    let mut presented = presented();
    assert!(presented.hide());
    assert!(!presented.can_dismiss());
}

#[test]
fn settling_after_hidden_keeps_the_hidden_finish() {
    let mut lifecycle = Lifecycle::new();
    lifecycle.begin(Operation::Present);
    lifecycle.hide();
    assert_eq!(lifecycle.settle(Operation::Present, Settlement::Succeeded), None);
    assert_eq!(lifecycle.phase(), Phase::Finished(FinishCause::Hidden));
    assert!(!lifecycle.can_dismiss());

    let mut lifecycle = presented();
    lifecycle.begin(Operation::Dismiss);
    lifecycle.hide();
    assert_eq!(lifecycle.settle(Operation::Dismiss, Settlement::Succeeded), None);
    assert_eq!(lifecycle.finish_cause(), Some(FinishCause::Hidden));
}

#[test]
fn settling_an_operation_that_never_began_is_ignored() {
    let mut lifecycle = Lifecycle::new();
    assert_eq!(lifecycle.settle(Operation::Dismiss, Settlement::Succeeded), None);
    assert_eq!(lifecycle.settle(Operation::Present, Settlement::Succeeded), None);
    assert_eq!(lifecycle.phase(), Phase::Idle);
}

#[test]
fn finished_is_a_dead_end() {
    let mut lifecycle = presented();
    lifecycle.hide();
    assert!(!lifecycle.hide());
    assert!(!lifecycle.begin(Operation::Present));
    assert!(!lifecycle.begin(Operation::Dismiss));
    assert!(!lifecycle.can(Operation::Present));
    assert!(!lifecycle.can(Operation::Dismiss));
}
