//! Error type returned by a decode pass.

use thiserror::Error;

use super::ResolveError;

/// Fatal errors that abort a decode pass.
///
/// `E` is the error type of the primitive source.
#[derive(Debug, Error)]
pub enum DecodeError<E>
where
    E: std::error::Error + 'static,
{
    /// The primitive source failed; the pass stops at that point.
    #[error("failed to decode primitive source")]
    Source(#[source] E),
    /// A way or relation referenced an entity that has not been seen.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl<E> DecodeError<E>
where
    E: std::error::Error + 'static,
{
    /// The resolution failure, when this is one.
    #[must_use]
    pub const fn as_resolve(&self) -> Option<&ResolveError> {
        match self {
            Self::Resolve(err) => Some(err),
            Self::Source(_) => None,
        }
    }
}
