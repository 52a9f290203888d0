//! Pageflow Runtime
//!
//! Interprets page schemas. A [`Session`] runs one page's step pipeline
//! against its own data; the [`Engine`] keeps a stack of sessions so a table
//! operation can mount another page on top of the current one and report
//! back when it completes.
//!
//! Everything outside the core is a collaborator:
//! - [`PageLoader`] resolves page ids to schemas, URLs and permissions
//! - [`Requester`](pageflow_request::Requester) performs API calls
//! - [`Interaction`] asks the user (confirmations, messages) and navigates
//! - [`View`] turns props into renderable nodes

mod cache;
mod engine;
mod error;
mod events;
mod form;
mod fs_loader;
mod interaction;
mod json_view;
mod loader;
mod operation;
mod render;
mod session;
mod table;
mod view;

pub use cache::PageCache;
pub use engine::{Collaborators, Engine};
pub use error::EngineError;
pub use events::{ChannelObserver, NoopObserver, SessionEvent, SessionObserver};
pub use form::FormState;
pub use fs_loader::FsPageLoader;
pub use interaction::{ConfirmPrompt, Interaction};
pub use json_view::JsonView;
pub use loader::{PageLoader, PageSummary};
pub use operation::{AbortReason, OperationOutcome, OperationRef, OperationScope, OperationState};
pub use session::{Session, SessionStatus};
pub use table::{ROW_OPERATION_FIELD, ROW_OPERATION_LABEL, TableState};
pub use view::{
  ColumnHeader, FormProps, OperationProps, SessionProps, TableProps, View, ViewError,
};
