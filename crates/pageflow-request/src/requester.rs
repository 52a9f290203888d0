use async_trait::async_trait;
use pageflow_config::{ApiConfig, ParamMap};
use pageflow_value::{EvaluationContext, resolve_params};
use serde_json::{Map, Value};

use crate::error::RequestError;

/// What an API call returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
  pub status: u16,
  /// Parsed JSON, or the raw text when the body is not JSON.
  pub body: Value,
}

impl ApiResponse {
  pub fn ok(body: Value) -> Self {
    Self { status: 200, body }
  }

  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Issues configured API calls.
///
/// `params` are already resolved; how they travel (query string or body)
/// is up to the implementation.
#[async_trait]
pub trait Requester: Send + Sync {
  async fn request(
    &self,
    api: &ApiConfig,
    params: Map<String, Value>,
  ) -> Result<ApiResponse, RequestError>;
}

/// Parameters for one call: the API's own `params` followed by the caller's
/// `request` mapping, which wins on conflicting keys.
pub fn request_params(api: &ApiConfig, request: &ParamMap, ctx: &EvaluationContext<'_>) -> Map<String, Value> {
  let mut params = resolve_params(&api.params, ctx);
  params.extend(resolve_params(request, ctx));
  params
}
