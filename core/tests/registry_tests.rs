// tests/registry_tests.rs
mod common;

use cartflow::{ContextData, Flow, FlowControl, FlowError, FlowRegistry, FlowResult};
use common::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct CartReload {
  lines: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct SelectionReload {
  ids: Vec<String>,
}

#[tokio::test]
async fn registry_dispatches_on_context_type() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();

  let mut cart_flow = Flow::<CartReload, TestError>::new(&[("fetch", false, None)]);
  cart_flow
    .on_step("fetch", |ctx: ContextData<CartReload>| {
      Box::pin(async move {
        ctx.write().lines = 2;
        Ok::<_, FlowError>(FlowControl::Continue)
      })
    })
    .unwrap();
  registry.register(cart_flow);

  let mut selection_flow = Flow::<SelectionReload, TestError>::new(&[("fetch", false, None)]);
  selection_flow
    .on_step("fetch", |ctx: ContextData<SelectionReload>| {
      Box::pin(async move {
        ctx.write().ids = vec!["a".to_string()];
        Ok::<_, TestError>(FlowControl::Continue)
      })
    })
    .unwrap();
  registry.register(selection_flow);

  assert_eq!(registry.len(), 2);
  assert!(registry.contains::<CartReload>());

  let cart_ctx = ContextData::new(CartReload::default());
  assert_eq!(registry.run(cart_ctx.clone()).await.unwrap(), FlowResult::Completed);
  assert_eq!(cart_ctx.read().lines, 2);

  let sel_ctx = ContextData::new(SelectionReload::default());
  registry.run(sel_ctx.clone()).await.unwrap();
  assert_eq!(sel_ctx.read().ids, vec!["a".to_string()]);
}

#[tokio::test]
async fn running_an_unregistered_context_fails() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();
  assert!(registry.is_empty());

  let err = registry.run(ContextData::new(CartReload::default())).await.unwrap_err();
  match err {
    TestError::Flow(s) => {
      assert!(s.contains("NotRegistered"));
      assert!(s.contains("CartReload"));
    }
    other => panic!("expected NotRegistered, got {:?}", other),
  }
}

#[tokio::test]
async fn registering_twice_replaces_the_flow() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();

  let mut first = Flow::<CartReload, TestError>::new(&[("fetch", false, None)]);
  first.on_step("fetch", |ctx: ContextData<CartReload>| {
    Box::pin(async move {
      ctx.write().lines = 1;
      Ok::<_, TestError>(FlowControl::Continue)
    })
  }).unwrap();
  registry.register(first);

  let mut second = Flow::<CartReload, TestError>::new(&[("fetch", false, None)]);
  second.on_step("fetch", |ctx: ContextData<CartReload>| {
    Box::pin(async move {
      ctx.write().lines = 9;
      Ok::<_, TestError>(FlowControl::Continue)
    })
  }).unwrap();
  registry.register(second);

  let ctx = ContextData::new(CartReload::default());
  registry.run(ctx.clone()).await.unwrap();
  assert_eq!(registry.len(), 1);
  assert_eq!(ctx.read().lines, 9);
}

#[tokio::test]
async fn handler_errors_surface_through_registry() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();
  let mut flow = Flow::<TallyContext, TestError>::new(&[("boom", false, None)]);
  flow.on_step("boom", failing_handler("boom", "503 from upstream")).unwrap();
  registry.register(flow);

  let err = registry.run(ContextData::new(TallyContext::default())).await.unwrap_err();
  assert_eq!(err, TestError::Handler("503 from upstream".to_string()));
}
