//! Pageflow Request
//!
//! Calls configured APIs and decides whether their responses pass a
//! condition gate.
//!
//! - [`Requester`] issues one call; [`HttpRequester`] does it over HTTP with `reqwest`.
//! - [`evaluate`] and [`request_condition`] judge a response against a
//!   [`ConditionConfig`](pageflow_config::ConditionConfig), waiting on a
//!   [`Notifier`] when the outcome shows a message.
//! - [`merge_query`] folds parameters into a URL using bracket array notation.

mod condition;
mod error;
mod http;
mod query;
mod requester;

pub use condition::{Notifier, Verdict, evaluate, request_condition};
pub use error::RequestError;
pub use http::HttpRequester;
pub use query::{merge_query, stringify};
pub use requester::{ApiResponse, Requester, request_params};
