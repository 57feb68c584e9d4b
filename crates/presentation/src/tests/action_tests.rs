use super::*;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use anyhow::anyhow;
use shared::domain::{Phase, PresentationId};
use tokio::sync::Notify;

struct Sheet;

fn procedure<F, Fut>(f: F) -> Arc<dyn Procedure<Sheet>>
where
    F: Fn(Arc<Sheet>, bool) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(FnProcedure::new(f))
}

fn counting(calls: &Arc<AtomicUsize>) -> Arc<dyn Procedure<Sheet>> {
    let calls = calls.clone();
    procedure(move |_unit, _animated| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { anyhow::Ok(()) }
    })
}

fn present_action(
    unit: &Arc<Sheet>,
    procedure: Arc<dyn Procedure<Sheet>>,
) -> (CompletableAction<Sheet>, Arc<PresentationState>) {
    let state = Arc::new(PresentationState::new(PresentationId::new()));
    let action = CompletableAction::new(
        Operation::Present,
        Arc::downgrade(unit),
        procedure,
        state.clone(),
    );
    (action, state)
}

#[tokio::test]
async fn executing_is_observable_while_the_procedure_runs() {
    let unit = Arc::new(Sheet);
    let gate = Arc::new(Notify::new());
    let procedure = {
        let gate = gate.clone();
        procedure(move |_unit, _animated| {
            let gate = gate.clone();
            async move {
                gate.notified().await;
                anyhow::Ok(())
            }
        })
    };
    let (action, state) = present_action(&unit, procedure);
    let mut executing = action.executing();

    let (outcome, ()) = tokio::join!(action.execute(true), async {
        executing.wait_for(|running| *running).await.expect("executing");
        assert!(!action.is_enabled());
        assert_eq!(state.phase(), Phase::Presenting);
        gate.notify_one();
    });

    assert_eq!(outcome.expect("present"), Outcome::Completed);
    assert!(!action.is_executing());
    assert_eq!(state.phase(), Phase::Presented);
}

#[tokio::test]
async fn second_execution_is_a_silent_no_op() {
    let unit = Arc::new(Sheet);
    let calls = Arc::new(AtomicUsize::new(0));
    let (action, _state) = present_action(&unit, counting(&calls));

    assert_eq!(action.execute(false).await.expect("first"), Outcome::Completed);
    assert_eq!(action.execute(false).await.expect("second"), Outcome::NotEnabled);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn vanished_unit_completes_without_running_the_procedure() {
    let unit = Arc::new(Sheet);
    let calls = Arc::new(AtomicUsize::new(0));
    let (action, state) = present_action(&unit, counting(&calls));
    drop(unit);

    assert_eq!(
        action.execute(true).await.expect("present"),
        Outcome::UnitUnavailable
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(state.phase(), Phase::Presented);
}

#[tokio::test]
async fn procedure_failure_propagates_and_faults_the_lifecycle() {
    let unit = Arc::new(Sheet);
    let (action, state) = present_action(
        &unit,
        procedure(|_unit, _animated| async { Err::<(), _>(anyhow!("window gone")) }),
    );

    let err = action.execute(true).await.expect_err("should fail");
    assert_eq!(err.operation(), Operation::Present);
    assert_eq!(err.to_string(), "present procedure failed: window gone");
    assert_eq!(state.phase(), Phase::Faulted(Operation::Present));
    assert!(!action.is_executing());
}

#[tokio::test]
async fn dropped_execution_is_settled_as_abandoned() {
    let unit = Arc::new(Sheet);
    let (action, state) = present_action(
        &unit,
        procedure(|_unit, _animated| futures::future::pending::<anyhow::Result<()>>()),
    );

    let timed_out = tokio::time::timeout(Duration::from_millis(20), action.execute(true)).await;
    assert!(timed_out.is_err());

    assert_eq!(state.phase(), Phase::Faulted(Operation::Present));
    assert!(!action.is_executing());
    assert!(!action.is_enabled());
}

#[tokio::test]
async fn animated_flag_reaches_the_procedure() {
    let unit = Arc::new(Sheet);
    let seen = Arc::new(parking_lot::Mutex::new(None));
    let procedure = {
        let seen = seen.clone();
        procedure(move |_unit, animated| {
            *seen.lock() = Some(animated);
            async { anyhow::Ok(()) }
        })
    };
    let (action, _state) = present_action(&unit, procedure);

    action.execute(false).await.expect("present");
    assert_eq!(*seen.lock(), Some(false));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn executing_flips_together_with_enablement() {
    let unit = Arc::new(Sheet);
    let gate = Arc::new(Notify::new());
    let procedure = {
        let gate = gate.clone();
        procedure(move |_unit, _animated| {
            let gate = gate.clone();
            async move {
                gate.notified().await;
                anyhow::Ok(())
            }
        })
    };
    let (action, state) = present_action(&unit, procedure);
    let action = Arc::new(action);

    let (disabled_tx, disabled_rx) = tokio::sync::oneshot::channel();
    let observer = {
        let mut can_present = action.enabled();
        let mut can_dismiss = state.enabled(Operation::Dismiss);
        let executing = action.executing();
        tokio::spawn(async move {
            can_present.changed().await.expect("present enablement");
            let _ = disabled_tx.send(*executing.borrow());
            can_dismiss.changed().await.expect("dismiss enablement");
            let running = *executing.borrow();
            running
        })
    };

    let runner = {
        let action = action.clone();
        tokio::spawn(async move { action.execute(true).await })
    };

    assert!(disabled_rx.await.expect("observer"), "executing must already be set");
    gate.notify_one();

    assert_eq!(runner.await.expect("join").expect("present"), Outcome::Completed);
    assert!(!observer.await.expect("join"), "executing must already be cleared");
}
