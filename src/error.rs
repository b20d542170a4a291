use thiserror::Error;

/// Errors escaping a paint call.
///
/// The pipeline treats most trouble as defensive no-ops (empty clips,
/// unrealized surfaces, an exhausted buffer pool), so the only error that
/// propagates is one raised by a rendering delegate. By the time a caller
/// sees it, every transient flag and buffer-ownership marker touched during
/// the call has been restored.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A rendering delegate refused or failed to paint.
    #[error("rendering delegate failed: {0}")]
    DelegateFailed(String),
}
