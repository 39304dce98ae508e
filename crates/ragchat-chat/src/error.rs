use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// No identity is signed in, or restore has not finished
    #[error("not signed in; run `ragchat login` first")]
    NotAuthenticated,
}
