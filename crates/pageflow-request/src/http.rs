use async_trait::async_trait;
use pageflow_config::{ApiConfig, HttpMethod};
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use tracing::info;
use url::Url;

use crate::error::RequestError;
use crate::query::merge_query;
use crate::requester::{ApiResponse, Requester};

/// [`Requester`] over HTTP.
///
/// GET and DELETE send parameters in the query string; other methods send
/// them as a JSON body. Relative API URLs are joined onto `base_url`.
#[derive(Debug, Clone, Default)]
pub struct HttpRequester {
  client: Client,
  base_url: Option<Url>,
}

impl HttpRequester {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_base_url(mut self, base_url: Url) -> Self {
    self.base_url = Some(base_url);
    self
  }

  fn resolve_url(&self, url: &str) -> Result<Url, RequestError> {
    let parsed = match &self.base_url {
      Some(base) => base.join(url),
      None => Url::parse(url),
    };
    parsed.map_err(|e| RequestError::InvalidUrl {
      url: url.to_string(),
      message: e.to_string(),
    })
  }
}

fn method(method: HttpMethod) -> Method {
  match method {
    HttpMethod::Get => Method::GET,
    HttpMethod::Post => Method::POST,
    HttpMethod::Put => Method::PUT,
    HttpMethod::Patch => Method::PATCH,
    HttpMethod::Delete => Method::DELETE,
  }
}

#[async_trait]
impl Requester for HttpRequester {
  async fn request(
    &self,
    api: &ApiConfig,
    params: Map<String, Value>,
  ) -> Result<ApiResponse, RequestError> {
    let target = if api.method.uses_query() {
      merge_query(&api.url, &params)
    } else {
      api.url.clone()
    };
    let url = self.resolve_url(&target)?;

    let mut request = self.client.request(method(api.method), url.clone());
    for (key, value) in &api.headers {
      request = request.header(key, value);
    }
    if !api.method.uses_query() {
      request = request.json(&Value::Object(params));
    }

    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;

    // Try to parse body as JSON, fall back to string
    let body = serde_json::from_str(&body).unwrap_or(Value::String(body));

    info!(method = api.method.as_str(), url = %url, status, "api_request");
    Ok(ApiResponse { status, body })
  }
}
