use crate::{Repository, StdResult};

/// A trait for rendering batches of repositories.
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryFormatter: Send {
    /// Renders one batch of repositories, without retaining it.
    fn format(&mut self, repositories: &[Repository]) -> StdResult<()>;
}
