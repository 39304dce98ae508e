//! Client-side state for the ragchat workspace
//!
//! Two state containers make up the client:
//!
//! - [`AuthSession`] owns the signed-in identity and the bearer-token lifecycle.
//! - [`ChatStore`] owns the ordered session collection, the active selection
//!   and the status of the outstanding query.
//!
//! Both are explicitly constructed and passed by reference to whatever
//! renders them. The form and dashboard containers in [`forms`] and
//! [`dashboard`] back the secondary screens.

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod store;

pub use auth::AuthSession;
pub use dashboard::{Dashboard, RecentSession};
pub use error::ChatError;
pub use forms::{AuthForm, AuthMode, UploadForm};
pub use store::{ChatStore, Completion, PendingQuery, PendingReload, SendOutcome};

#[cfg(test)]
pub(crate) mod testing;
