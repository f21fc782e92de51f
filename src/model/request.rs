use std::fmt::Display;

use super::InvalidArguments;

/// The maximum number of repositories the GitHub API returns per page.
pub const MAX_PAGE_SIZE: u16 = 100;

/// The page size used when walking the repositories of an account.
pub const DEFAULT_PAGE_SIZE: u16 = MAX_PAGE_SIZE;

/// A request for one page of the repositories owned by an account.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct PageRequest {
    /// The account owning the repositories.
    pub(crate) account: String,

    /// The 1-based page number.
    pub(crate) page: u32,

    /// The number of repositories per page.
    pub(crate) per_page: u16,
}

impl PageRequest {
    /// Creates a new `PageRequest`, validating its bounds.
    pub fn try_new(account: &str, page: u32, per_page: u16) -> Result<Self, InvalidArguments> {
        if account.is_empty() {
            return Err(InvalidArguments::EmptyAccount);
        }
        if page == 0 {
            return Err(InvalidArguments::PageNumberOutOfRange(page));
        }
        if per_page == 0 || per_page > MAX_PAGE_SIZE {
            return Err(InvalidArguments::PageSizeOutOfRange(per_page));
        }

        Ok(Self {
            account: account.to_string(),
            page,
            per_page,
        })
    }

    /// Builds the request for the page following this one.
    pub fn next(&self) -> Self {
        Self {
            account: self.account.clone(),
            page: self.page + 1,
            per_page: self.per_page,
        }
    }

    /// Retrieves the account.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Retrieves the page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Retrieves the page size.
    pub fn per_page(&self) -> u16 {
        self.per_page
    }

    /// Creates a dummy `PageRequest` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self {
            account: "octocat".to_string(),
            page: 1,
            per_page: 10,
        }
    }
}

impl Display for PageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PageRequest: account={}, page={}, per_page={}",
            self.account, self.page, self.per_page
        )
    }
}
