//! Integration tests for the session engine with mocked collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pageflow_config::{ApiConfig, PageConfig};
use pageflow_fields::{CompositionEvent, Validation};
use pageflow_request::{ApiResponse, RequestError, Requester};
use pageflow_runtime::{
  AbortReason, ChannelObserver, Collaborators, ConfirmPrompt, Engine, EngineError, Interaction,
  JsonView, NoopObserver, OperationOutcome, OperationRef, OperationScope, PageLoader, PageSummary,
  SessionEvent, SessionStatus, View, ViewError,
};
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct MockPages {
  pages: HashMap<String, Value>,
  urls: HashMap<String, String>,
  denied: Vec<String>,
  config_loads: AtomicUsize,
  auth_checks: AtomicUsize,
}

impl MockPages {
  fn with_page(mut self, page: &str, config: Value) -> Self {
    self.pages.insert(page.to_string(), config);
    self
  }

  fn with_url(mut self, page: &str, url: &str) -> Self {
    self.urls.insert(page.to_string(), url.to_string());
    self
  }
}

#[async_trait]
impl PageLoader for MockPages {
  async fn load_page_config(&self, page: &str) -> Result<Arc<PageConfig>, EngineError> {
    self.config_loads.fetch_add(1, Ordering::SeqCst);
    let config = self.pages.get(page).cloned().ok_or_else(|| EngineError::PageNotFound {
      page: page.to_string(),
    })?;
    Ok(Arc::new(PageConfig::from_value(config)?))
  }

  async fn load_page_url(&self, page: &str) -> Result<String, EngineError> {
    self.urls.get(page).cloned().ok_or_else(|| EngineError::PageUrlMissing {
      page: page.to_string(),
      kind: "page",
    })
  }

  async fn load_page_frame_url(&self, page: &str) -> Result<String, EngineError> {
    self.load_page_url(page).await
  }

  async fn load_page_list(&self) -> Result<Vec<PageSummary>, EngineError> {
    Ok(Vec::new())
  }

  async fn load_domain(&self) -> Result<Value, EngineError> {
    Ok(Value::Null)
  }

  async fn check_page_auth(&self, page: &str) -> Result<bool, EngineError> {
    self.auth_checks.fetch_add(1, Ordering::SeqCst);
    Ok(!self.denied.iter().any(|denied| denied == page))
  }
}

/// Answers by URL and records every call.
#[derive(Default)]
struct MockRequester {
  responses: HashMap<String, ApiResponse>,
  calls: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl MockRequester {
  fn with_response(mut self, url: &str, body: Value) -> Self {
    self.responses.insert(url.to_string(), ApiResponse::ok(body));
    self
  }

  fn calls_to(&self, url: &str) -> usize {
    self.calls.lock().unwrap().iter().filter(|(called, _)| called == url).count()
  }
}

#[async_trait]
impl Requester for MockRequester {
  async fn request(&self, api: &ApiConfig, params: Map<String, Value>) -> Result<ApiResponse, RequestError> {
    self.calls.lock().unwrap().push((api.url.clone(), params));
    self.responses.get(&api.url).cloned().ok_or_else(|| RequestError::Failed {
      url: api.url.clone(),
      message: "no mocked response".to_string(),
    })
  }
}

struct MockInteraction {
  accept: bool,
  confirms: AtomicUsize,
  prompts: Mutex<Vec<ConfirmPrompt>>,
  navigated: Mutex<Vec<String>>,
  opened: Mutex<Vec<String>>,
}

impl MockInteraction {
  fn answering(accept: bool) -> Self {
    Self {
      accept,
      confirms: AtomicUsize::new(0),
      prompts: Mutex::new(Vec::new()),
      navigated: Mutex::new(Vec::new()),
      opened: Mutex::new(Vec::new()),
    }
  }
}

#[async_trait]
impl Interaction for MockInteraction {
  async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
    self.confirms.fetch_add(1, Ordering::SeqCst);
    self.prompts.lock().unwrap().push(prompt.clone());
    self.accept
  }

  async fn acknowledge(&self, _message: &str, _success: bool) -> bool {
    true
  }

  async fn navigate(&self, url: &str) {
    self.navigated.lock().unwrap().push(url.to_string());
  }

  async fn open(&self, url: &str) {
    self.opened.lock().unwrap().push(url.to_string());
  }
}

struct Harness {
  pages: Arc<MockPages>,
  requester: Arc<MockRequester>,
  interaction: Arc<MockInteraction>,
  engine: Engine,
}

fn harness(pages: MockPages, requester: MockRequester, interaction: MockInteraction) -> Harness {
  let pages = Arc::new(pages);
  let requester = Arc::new(requester);
  let interaction = Arc::new(interaction);
  let engine = Engine::new(Collaborators {
    pages: pages.clone(),
    requester: requester.clone(),
    interaction: interaction.clone(),
    observer: Arc::new(NoopObserver),
  });
  Harness {
    pages,
    requester,
    interaction,
    engine,
  }
}

/// A page listing `list` rows with a single row button.
fn list_page(button: Value) -> Arc<PageConfig> {
  let config = PageConfig::from_value(json!({
    "steps": [{
      "type": "table",
      "field": "list",
      "columns": [{ "field": "x", "label": "X", "type": "text" }],
      "operations": { "rowOperations": [button] }
    }]
  }))
  .unwrap();
  Arc::new(config)
}

fn detail_page() -> Value {
  json!({
    "steps": [{
      "type": "form",
      "fields": [{ "field": "name", "label": "Name", "type": "text", "required": true }]
    }]
  })
}

fn rows() -> Value {
  json!({ "list": [{ "id": 1, "x": 5 }, { "id": 2, "x": 7 }] })
}

fn row_operation(row: usize) -> OperationRef {
  OperationRef {
    step: 0,
    scope: OperationScope::Row { row },
    index: 0,
    item: None,
  }
}

fn current_button(callback: bool) -> Value {
  json!({
    "type": "button",
    "label": "Edit",
    "handle": {
      "type": "ccms",
      "page": "detail",
      "target": "current",
      "callback": callback,
      "data": { "a": { "type": "field", "field": "x" } }
    }
  })
}

#[tokio::test]
async fn test_failing_check_stops_before_confirm_and_dispatch() {
  let button = json!({
    "type": "button",
    "label": "Delete",
    "check": {
      "enable": true,
      "api": { "url": "/check" },
      "request": { "id": { "type": "field", "field": "id" } },
      "condition": { "enable": true, "match": { "type": "field", "field": "ok", "value": true } }
    },
    "confirm": { "enable": true, "titleText": "Sure?" },
    "handle": { "type": "ccms", "page": "detail", "target": "current" }
  });
  let mut h = harness(
    MockPages::default().with_page("detail", detail_page()),
    MockRequester::default().with_response("/check", json!({ "ok": false })),
    MockInteraction::answering(true),
  );
  h.engine.open_config("list", list_page(button), rows()).await.unwrap();

  let outcome = h
    .engine
    .invoke_operation(&row_operation(1), &CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(
    outcome,
    OperationOutcome::Aborted {
      reason: AbortReason::CheckFailed
    }
  );
  assert_eq!(h.requester.calls_to("/check"), 1);
  assert_eq!(h.requester.calls.lock().unwrap()[0].1["id"], json!(2));
  assert_eq!(h.interaction.confirms.load(Ordering::SeqCst), 0);
  assert_eq!(h.pages.auth_checks.load(Ordering::SeqCst), 0);
  assert_eq!(h.pages.config_loads.load(Ordering::SeqCst), 0);
  assert_eq!(h.engine.depth(), 1);
}

#[tokio::test]
async fn test_declined_confirm_aborts_before_dispatch() {
  let button = json!({
    "type": "button",
    "label": "Delete",
    "confirm": {
      "enable": true,
      "titleText": "Delete {{ name }}?",
      "titleParams": [{ "field": "name", "data": { "type": "field", "field": "x" } }],
      "okText": "Yes"
    },
    "handle": { "type": "ccms", "page": "detail", "target": "current" }
  });
  let mut h = harness(
    MockPages::default().with_page("detail", detail_page()),
    MockRequester::default(),
    MockInteraction::answering(false),
  );
  h.engine.open_config("list", list_page(button), rows()).await.unwrap();

  let outcome = h
    .engine
    .invoke_operation(&row_operation(0), &CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(
    outcome,
    OperationOutcome::Aborted {
      reason: AbortReason::Declined
    }
  );
  let prompts = h.interaction.prompts.lock().unwrap();
  assert_eq!(prompts[0].title, "Delete 5?");
  assert_eq!(prompts[0].ok_text, "Yes");
  assert_eq!(h.pages.config_loads.load(Ordering::SeqCst), 0);
  assert_eq!(h.engine.depth(), 1);
}

#[tokio::test]
async fn test_dispatch_does_not_consult_page_auth() {
  let mut pages = MockPages::default().with_page("detail", detail_page());
  pages.denied.push("detail".to_string());
  let mut h = harness(pages, MockRequester::default(), MockInteraction::answering(true));
  h.engine
    .open_config("list", list_page(current_button(false)), rows())
    .await
    .unwrap();

  let outcome = h
    .engine
    .invoke_operation(&row_operation(0), &CancellationToken::new())
    .await
    .unwrap();

  assert!(matches!(outcome, OperationOutcome::Mounted { .. }));
  assert_eq!(h.pages.auth_checks.load(Ordering::SeqCst), 0);
  assert_eq!(h.pages.config_loads.load(Ordering::SeqCst), 1);
  assert_eq!(h.engine.depth(), 2);
}

#[tokio::test]
async fn test_cancelled_token_aborts_pipeline() {
  let mut h = harness(
    MockPages::default().with_page("detail", detail_page()),
    MockRequester::default(),
    MockInteraction::answering(true),
  );
  h.engine
    .open_config("list", list_page(current_button(false)), rows())
    .await
    .unwrap();

  let cancel = CancellationToken::new();
  cancel.cancel();
  let outcome = h.engine.invoke_operation(&row_operation(0), &cancel).await.unwrap();

  assert_eq!(
    outcome,
    OperationOutcome::Aborted {
      reason: AbortReason::Cancelled
    }
  );
  assert_eq!(h.engine.depth(), 1);
}

#[tokio::test]
async fn test_current_target_mounts_nested_session_with_source() {
  let mut h = harness(
    MockPages::default().with_page("detail", detail_page()),
    MockRequester::default(),
    MockInteraction::answering(true),
  );
  h.engine
    .open_config("list", list_page(current_button(false)), rows())
    .await
    .unwrap();

  let outcome = h
    .engine
    .invoke_operation(&row_operation(0), &CancellationToken::new())
    .await
    .unwrap();

  let OperationOutcome::Mounted { session_id } = outcome else {
    panic!("expected a mounted session, got {outcome:?}");
  };
  assert_eq!(h.engine.depth(), 2);
  let nested = h.engine.current().unwrap();
  assert_eq!(nested.id(), session_id);
  assert_eq!(nested.source()["a"], json!(5));
  assert_eq!(nested.depth(), 1);

  let parent = &h.engine.sessions()[0];
  let operation = parent.operation().unwrap();
  assert!(operation.enable && operation.visible);
  assert_eq!(operation.title, "Edit");
  assert_eq!(operation.data, json!({ "a": 5 }));

  h.engine.close().unwrap();
  assert_eq!(h.engine.depth(), 1);
  assert!(h.engine.sessions()[0].operation().is_none());
}

#[tokio::test]
async fn test_page_target_merges_params_into_url() {
  let button = json!({
    "type": "button",
    "label": "Go",
    "handle": {
      "type": "ccms",
      "page": "detail",
      "target": "page",
      "data": { "a": { "type": "static", "value": [1, 2] } }
    }
  });
  let mut h = harness(
    MockPages::default().with_url("detail", "https://x/y?z=1"),
    MockRequester::default(),
    MockInteraction::answering(true),
  );
  h.engine.open_config("list", list_page(button), rows()).await.unwrap();

  let outcome = h
    .engine
    .invoke_operation(&row_operation(0), &CancellationToken::new())
    .await
    .unwrap();

  let expected = "https://x/y?z=1&a[]=1&a[]=2".to_string();
  assert_eq!(outcome, OperationOutcome::Navigated { url: expected.clone() });
  assert_eq!(*h.interaction.navigated.lock().unwrap(), vec![expected]);
  assert!(h.interaction.opened.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_open_target_opens_new_context() {
  let button = json!({
    "type": "button",
    "label": "Open",
    "handle": {
      "type": "ccms",
      "page": "detail",
      "target": "open",
      "data": { "id": { "type": "field", "field": "id" } }
    }
  });
  let mut h = harness(
    MockPages::default().with_url("detail", "/detail"),
    MockRequester::default(),
    MockInteraction::answering(true),
  );
  h.engine.open_config("list", list_page(button), rows()).await.unwrap();

  let outcome = h
    .engine
    .invoke_operation(&row_operation(1), &CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(
    outcome,
    OperationOutcome::Opened {
      url: "/detail?id=2".to_string()
    }
  );
  assert!(h.interaction.navigated.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_nested_completion_with_callback_reloads_parent() {
  let parent = PageConfig::from_value(json!({
    "steps": [
      { "type": "fetch", "api": { "url": "/list" } },
      {
        "type": "table",
        "field": "list",
        "columns": [{ "field": "x", "label": "X", "type": "text" }],
        "operations": { "rowOperations": [current_button(true)] }
      }
    ]
  }))
  .unwrap();
  let mut h = harness(
    MockPages::default().with_page("detail", detail_page()),
    MockRequester::default().with_response("/list", rows()),
    MockInteraction::answering(true),
  );
  h.engine.open_config("list", Arc::new(parent), Value::Null).await.unwrap();
  assert_eq!(h.requester.calls_to("/list"), 1);

  let reference = OperationRef {
    step: 1,
    ..row_operation(0)
  };
  h.engine
    .invoke_operation(&reference, &CancellationToken::new())
    .await
    .unwrap();
  assert_eq!(h.engine.depth(), 2);

  // An invalid submit keeps the nested session open.
  let validation = h.engine.submit(0).await.unwrap();
  assert!(!validation.is_valid());
  assert_eq!(h.engine.depth(), 2);

  h.engine.change(0, "name", json!("bob")).unwrap();
  let validation = h.engine.submit(0).await.unwrap();
  assert_eq!(validation, Validation::Valid);

  assert_eq!(h.engine.depth(), 1);
  assert_eq!(h.requester.calls_to("/list"), 2);
  let parent = h.engine.current().unwrap();
  assert!(parent.operation().is_none());
  assert_eq!(parent.current(), 1);
  assert_eq!(parent.status(), SessionStatus::Running);
}

#[tokio::test]
async fn test_nested_completion_without_callback_keeps_parent() {
  let mut h = harness(
    MockPages::default().with_page("detail", detail_page()),
    MockRequester::default(),
    MockInteraction::answering(true),
  );
  h.engine
    .open_config("list", list_page(current_button(false)), rows())
    .await
    .unwrap();
  h.engine
    .invoke_operation(&row_operation(0), &CancellationToken::new())
    .await
    .unwrap();

  h.engine.change(0, "name", json!("bob")).unwrap();
  h.engine.submit(0).await.unwrap();

  assert_eq!(h.engine.depth(), 1);
  assert!(h.engine.current().unwrap().operation().is_none());
}

#[tokio::test]
async fn test_fetch_condition_failure_halts_session() {
  let page = PageConfig::from_value(json!({
    "steps": [
      {
        "type": "fetch",
        "api": { "url": "/load" },
        "condition": { "enable": true, "match": { "type": "field", "field": "code", "value": 0 } }
      },
      { "type": "form", "fields": [] }
    ]
  }))
  .unwrap();
  let mut h = harness(
    MockPages::default(),
    MockRequester::default().with_response("/load", json!({ "code": 1 })),
    MockInteraction::answering(true),
  );
  h.engine.open_config("p", Arc::new(page), Value::Null).await.unwrap();

  let session = h.engine.current().unwrap();
  assert_eq!(session.status(), SessionStatus::Halted { step: 0 });
  assert!(session.form(1).is_none());
}

#[tokio::test]
async fn test_fetch_merges_response_into_next_steps() {
  let page = PageConfig::from_value(json!({
    "steps": [
      { "type": "fetch", "api": { "url": "/load" }, "response": "data" },
      {
        "type": "form",
        "fields": [
          { "field": "name", "type": "text" },
          { "field": "count", "type": "number", "defaultValue": 1 }
        ]
      }
    ]
  }))
  .unwrap();
  let mut h = harness(
    MockPages::default(),
    MockRequester::default().with_response("/load", json!({ "data": { "name": "ann" } })),
    MockInteraction::answering(true),
  );
  h.engine
    .open_config("p", Arc::new(page), json!({ "origin": "menu" }))
    .await
    .unwrap();

  let session = h.engine.current().unwrap();
  assert_eq!(session.current(), 1);
  assert_eq!(
    session.slice(1).unwrap(),
    &json!({ "origin": "menu", "name": "ann", "count": 1 })
  );
}

#[tokio::test]
async fn test_form_pipeline_completes_and_reports_events() {
  let page = PageConfig::from_value(json!({
    "steps": [{
      "type": "form",
      "fields": [{ "field": "tags", "type": "select_multiple",
        "options": { "from": "manual", "data": [{ "value": "a", "label": "A" }, { "value": "b", "label": "B" }] },
        "multiple": { "type": "split", "split": "," } }]
    }]
  }))
  .unwrap();
  let (observer, mut events) = ChannelObserver::new();
  let mut engine = Engine::new(Collaborators {
    pages: Arc::new(MockPages::default()),
    requester: Arc::new(MockRequester::default()),
    interaction: Arc::new(MockInteraction::answering(true)),
    observer: Arc::new(observer),
  });
  let id = engine.open_config("tags", Arc::new(page), Value::Null).await.unwrap();

  engine.change(0, "tags", json!(["a", "zzz", "b"])).unwrap();
  assert_eq!(engine.current().unwrap().slice(0).unwrap()["tags"], json!("a,b"));

  engine.submit(0).await.unwrap();
  assert_eq!(engine.current().unwrap().status(), SessionStatus::Completed);

  let mut seen = Vec::new();
  while let Ok(event) = events.try_recv() {
    seen.push(event);
  }
  assert_eq!(
    seen,
    vec![
      SessionEvent::SessionMounted {
        session_id: id,
        page: "tags".to_string(),
        depth: 0
      },
      SessionEvent::StepMounted {
        session_id: id,
        step: 0,
        kind: "form"
      },
      SessionEvent::SessionCompleted { session_id: id },
    ]
  );
}

#[tokio::test]
async fn test_composition_commits_once_on_end() {
  let mut h = harness(MockPages::default(), MockRequester::default(), MockInteraction::answering(true));
  h.engine
    .open_config("p", Arc::new(PageConfig::from_value(detail_page()).unwrap()), Value::Null)
    .await
    .unwrap();

  h.engine.input(0, "name", CompositionEvent::Start).unwrap();
  h.engine.input(0, "name", CompositionEvent::Update("ni".to_string())).unwrap();
  assert!(h.engine.current().unwrap().slice(0).unwrap().get("name").is_none());

  h.engine.input(0, "name", CompositionEvent::End("你".to_string())).unwrap();
  assert_eq!(h.engine.current().unwrap().slice(0).unwrap()["name"], json!("你"));

  h.engine.input(0, "name", CompositionEvent::Input("你好".to_string())).unwrap();
  assert_eq!(h.engine.current().unwrap().slice(0).unwrap()["name"], json!("你好"));
}

#[tokio::test]
async fn test_import_subform_loads_fields_at_mount() {
  let page = PageConfig::from_value(json!({
    "steps": [{
      "type": "form",
      "fields": [{
        "field": "extra",
        "label": "Extra",
        "type": "import_subform",
        "api": { "url": "/fields" },
        "response": "fields"
      }]
    }]
  }))
  .unwrap();
  let mut h = harness(
    MockPages::default(),
    MockRequester::default().with_response(
      "/fields",
      json!({ "fields": [{ "field": "age", "label": "Age", "type": "number", "defaultValue": 3 }] }),
    ),
    MockInteraction::answering(true),
  );
  h.engine.open_config("p", Arc::new(page), Value::Null).await.unwrap();

  let session = h.engine.current().unwrap();
  assert_eq!(session.slice(0).unwrap()["extra"], json!({ "age": 3 }));

  let rendered = h.engine.render(&JsonView).unwrap();
  let field = &rendered["steps"][0]["fields"][0];
  assert_eq!(field["extra"]["loaded"], json!(true));
  assert_eq!(field["children"][0]["fields"][0]["path"], json!("extra.age"));
}

#[tokio::test]
async fn test_failed_import_degrades_to_unloaded_field() {
  let page = PageConfig::from_value(json!({
    "steps": [{
      "type": "form",
      "fields": [{ "field": "extra", "type": "import_subform", "api": { "url": "/missing" } }]
    }]
  }))
  .unwrap();
  let mut h = harness(MockPages::default(), MockRequester::default(), MockInteraction::answering(true));
  h.engine.open_config("p", Arc::new(page), Value::Null).await.unwrap();

  let rendered = h.engine.render(&JsonView).unwrap();
  assert_eq!(rendered["steps"][0]["fields"][0]["extra"]["loaded"], json!(false));
}

#[tokio::test]
async fn test_import_that_repeats_itself_is_refused() {
  let import = json!({ "field": "sub", "type": "import_subform", "api": { "url": "/fields" } });
  let page = PageConfig::from_value(json!({ "steps": [{ "type": "form", "fields": [import.clone()] }] })).unwrap();
  let mut h = harness(
    MockPages::default(),
    MockRequester::default().with_response(
      "/fields",
      json!([import, { "field": "name", "type": "text", "defaultValue": "n" }]),
    ),
    MockInteraction::answering(true),
  );
  h.engine.open_config("p", Arc::new(page), Value::Null).await.unwrap();

  assert_eq!(h.requester.calls_to("/fields"), 1);
  let session = h.engine.current().unwrap();
  assert_eq!(session.slice(0).unwrap()["sub"], json!({ "sub": {}, "name": "n" }));
}

#[tokio::test]
async fn test_same_named_imports_load_their_own_fields() {
  let page = PageConfig::from_value(json!({
    "steps": [{
      "type": "form",
      "fields": [{
        "field": "",
        "type": "tabs",
        "tabs": [
          { "field": "a", "label": "A", "fields": [{ "field": "detail", "type": "import_subform", "api": { "url": "/a" } }] },
          { "field": "b", "label": "B", "fields": [{ "field": "detail", "type": "import_subform", "api": { "url": "/b" } }] }
        ]
      }]
    }]
  }))
  .unwrap();
  let mut h = harness(
    MockPages::default(),
    MockRequester::default()
      .with_response("/a", json!([{ "field": "x", "type": "text", "defaultValue": "from a" }]))
      .with_response("/b", json!([{ "field": "y", "type": "number", "defaultValue": 2 }])),
    MockInteraction::answering(true),
  );
  h.engine.open_config("p", Arc::new(page), Value::Null).await.unwrap();

  assert_eq!(h.requester.calls_to("/a"), 1);
  assert_eq!(h.requester.calls_to("/b"), 1);
  let slice = h.engine.current().unwrap().slice(0).unwrap();
  assert_eq!(slice["a"]["detail"], json!({ "x": "from a" }));
  assert_eq!(slice["b"]["detail"], json!({ "y": 2 }));
}

#[tokio::test]
async fn test_json_view_renders_table_with_nested_session() {
  let mut h = harness(
    MockPages::default().with_page("detail", detail_page()),
    MockRequester::default(),
    MockInteraction::answering(true),
  );
  h.engine
    .open_config("list", list_page(current_button(false)), rows())
    .await
    .unwrap();
  h.engine
    .invoke_operation(&row_operation(0), &CancellationToken::new())
    .await
    .unwrap();

  let rendered = h.engine.render(&JsonView).unwrap();
  let table = &rendered["steps"][0];
  assert_eq!(table["table"]["keys"], json!([1, 2]));
  assert_eq!(table["table"]["columns"][1]["field"], json!("ccms-table-rowOperation"));
  assert_eq!(table["rows"][0][0]["display"], json!("5"));
  assert_eq!(table["rows"][1][1][0]["reference"]["row"], json!(1));

  let nested = &rendered["nested"];
  assert_eq!(nested["session"]["title"], json!("Edit"));
  assert_eq!(nested["steps"][0]["fields"][0]["path"], json!("name"));
}

/// Draws sessions only; every other node becomes a placeholder.
struct SessionsOnly;

impl View for SessionsOnly {
  type Node = String;

  fn placeholder(&self, message: &str) -> String {
    format!("<{message}>")
  }

  fn session(
    &self,
    _props: &pageflow_runtime::SessionProps,
    steps: Vec<String>,
    _nested: Option<String>,
  ) -> Result<String, ViewError> {
    Ok(steps.join(""))
  }
}

#[tokio::test]
async fn test_missing_view_components_render_placeholders() {
  let mut h = harness(MockPages::default(), MockRequester::default(), MockInteraction::answering(true));
  h.engine
    .open_config("list", list_page(current_button(false)), rows())
    .await
    .unwrap();

  let rendered = h.engine.render(&SessionsOnly).unwrap();
  assert_eq!(rendered, "<the current view does not implement the table component>");
}

#[tokio::test]
async fn test_unknown_page_is_an_error() {
  let mut h = harness(MockPages::default(), MockRequester::default(), MockInteraction::answering(true));
  let err = h.engine.open("nope", Value::Null).await.unwrap_err();
  assert!(matches!(err, EngineError::PageNotFound { .. }));
  assert!(matches!(h.engine.submit(0).await, Err(EngineError::NoSession)));
}
