// tests/pipeline_execution_tests.rs
mod common;

use cartflow::{ContextData, Flow, FlowControl, FlowError, FlowResult};
use common::*;
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn steps_run_in_declared_order() {
  setup_tracing();
  let mut flow = Flow::<TallyContext, TestError>::new(&[("load", false, None), ("price", false, None), ("commit", false, None)]);
  flow.on_step("load", adding_handler("load", 1)).unwrap();
  flow.on_step("price", adding_handler("price", 10)).unwrap();
  flow.on_step("commit", adding_handler("commit", 100)).unwrap();

  let ctx = ContextData::new(TallyContext::default());
  let result = flow.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), FlowResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.total, 111);
  assert_eq!(guard.executed, vec!["load", "price", "commit"]);
}

#[tokio::test]
#[serial]
async fn stop_halts_remaining_steps() {
  setup_tracing();
  let mut flow = Flow::<TallyContext, TestError>::new(&[("guard", false, None), ("post", false, None)]);
  flow
    .on_step("guard", |ctx: ContextData<TallyContext>| {
      Box::pin(async move {
        ctx.write().executed.push("guard".to_string());
        Ok::<_, TestError>(FlowControl::Stop)
      })
    })
    .unwrap();
  flow.on_step("post", adding_handler("post", 5)).unwrap();

  let ctx = ContextData::new(TallyContext::default());
  let result = flow.run(ctx.clone()).await.unwrap();

  assert_eq!(result, FlowResult::Stopped);
  assert_eq!(ctx.read().executed, vec!["guard"]);
  assert_eq!(ctx.read().total, 0);
}

#[tokio::test]
#[serial]
async fn handler_error_is_returned_and_later_steps_skipped() {
  setup_tracing();
  let mut flow = Flow::<TallyContext, TestError>::new(&[
    ("first", false, None),
    ("broken", false, None),
    ("never", false, None),
  ]);
  flow.on_step("first", adding_handler("first", 1)).unwrap();
  flow.on_step("broken", failing_handler("broken", "upstream refused")).unwrap();
  flow.on_step("never", adding_handler("never", 1)).unwrap();

  let ctx = ContextData::new(TallyContext::default());
  let err = flow.run(ctx.clone()).await.unwrap_err();

  assert_eq!(err, TestError::Handler("upstream refused".to_string()));
  assert_eq!(ctx.read().executed, vec!["first", "broken"]);
}

#[tokio::test]
#[serial]
async fn skip_condition_is_evaluated_against_live_context() {
  setup_tracing();
  let mut flow = Flow::<TallyContext, TestError>::new(&[
    ("seed", false, None),
    (
      "only_when_empty",
      false,
      Some(Arc::new(|ctx: ContextData<TallyContext>| ctx.read().total > 0)),
    ),
    ("tail", false, None),
  ]);
  flow.on_step("seed", adding_handler("seed", 3)).unwrap();
  flow.on_step("only_when_empty", adding_handler("only_when_empty", 1000)).unwrap();
  flow.on_step("tail", adding_handler("tail", 4)).unwrap();

  let ctx = ContextData::new(TallyContext::default());
  flow.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().total, 7);
  assert_eq!(ctx.read().executed, vec!["seed", "tail"]);
}

#[tokio::test]
#[serial]
async fn before_on_after_run_in_phase_order() {
  setup_tracing();
  let mut flow = Flow::<TallyContext, TestError>::new(&[("main", false, None)]);
  flow.after_step("main", adding_handler("after", 1)).unwrap();
  flow.on_step("main", adding_handler("on", 1)).unwrap();
  flow.before_step("main", adding_handler("before", 1)).unwrap();

  let ctx = ContextData::new(TallyContext::default());
  flow.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().trail, "before;on;after;");
}

#[tokio::test]
#[serial]
async fn stop_in_before_phase_skips_on_handlers() {
  setup_tracing();
  let mut flow = Flow::<TallyContext, TestError>::new(&[("main", false, None)]);
  flow.before_step("main", adding_handler("before", 1)).unwrap();
  flow.on_step("main", adding_handler("on", 1)).unwrap();

  let ctx = ContextData::new(TallyContext {
    stop_at: Some("before".to_string()),
    ..Default::default()
  });
  let result = flow.run(ctx.clone()).await.unwrap();

  assert_eq!(result, FlowResult::Stopped);
  assert_eq!(ctx.read().executed, vec!["before"]);
}

#[tokio::test]
#[serial]
async fn optional_step_without_handlers_is_skipped() {
  setup_tracing();
  let mut flow = Flow::<TallyContext, TestError>::new(&[("notify", true, None), ("work", false, None)]);
  flow.on_step("work", adding_handler("work", 2)).unwrap();

  let ctx = ContextData::new(TallyContext::default());
  assert_eq!(flow.run(ctx.clone()).await.unwrap(), FlowResult::Completed);
  assert_eq!(ctx.read().total, 2);
}

#[tokio::test]
#[serial]
async fn structural_edits_reshape_the_step_list() {
  setup_tracing();
  let mut flow = Flow::<TallyContext, TestError>::new(&[("a", false, None), ("c", false, None)]);
  flow.insert_after("a", "b", false, None).unwrap();
  flow.insert_before("a", "start", true, None).unwrap();
  assert_eq!(flow.step_names(), vec!["start", "a", "b", "c"]);

  flow.on_step("c", adding_handler("c", 1)).unwrap();
  flow.remove_step("c");
  assert_eq!(flow.step_names(), vec!["start", "a", "b"]);
  assert_eq!(flow.len(), 3);

  let dup = flow.insert_after("a", "b", false, None).err().unwrap();
  assert!(matches!(dup, FlowError::DuplicateStep { ref step_name } if step_name == "b"));

  let missing = flow.on_step("ghost", adding_handler("ghost", 1)).err().unwrap();
  assert!(matches!(missing, FlowError::StepNotFound { ref step_name } if step_name == "ghost"));
}

#[tokio::test]
#[serial]
async fn handlers_can_await_between_lock_scopes() {
  setup_tracing();
  let mut flow = Flow::<TallyContext, TestError>::new(&[("slow", false, None)]);
  flow
    .on_step("slow", |ctx: ContextData<TallyContext>| {
      Box::pin(async move {
        let start = ctx.read().total;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        ctx.write().total = start + 42;
        Ok::<_, TestError>(FlowControl::Continue)
      })
    })
    .unwrap();

  let ctx = ContextData::new(TallyContext::default());
  flow.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.snapshot().total, 42);
}
