use super::pagination::total_pages;
use crate::crm::CrmError;
use log::*;

/// One page of rows as returned by a collection endpoint.
///
/// Never holds more than `page_size` items.
#[derive(Clone, Debug, PartialEq)]
pub struct PageResult<R> {
    pub items: Vec<R>,
    pub total: usize,
    pub page_size: usize,
}

impl<R> PageResult<R> {
    /// Return a page, dropping any rows beyond `page_size`.
    ///
    pub fn new(mut items: Vec<R>, total: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        if items.len() > page_size {
            warn!(
                "Server returned {} rows for a page of {}; dropping the surplus.",
                items.len(),
                page_size
            );
            items.truncate(page_size);
        }
        PageResult {
            items,
            total,
            page_size,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Why the last fetch of a collection failed, ready to show to the user.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchFailure {
    pub message: String,
    /// Set for session problems that a retry cannot fix.
    pub blocking: bool,
}

impl FetchFailure {
    pub fn retryable(message: impl Into<String>) -> Self {
        FetchFailure {
            message: message.into(),
            blocking: false,
        }
    }
}

impl From<&CrmError> for FetchFailure {
    fn from(error: &CrmError) -> Self {
        FetchFailure {
            message: error.to_string(),
            blocking: error.is_blocking(),
        }
    }
}

impl From<CrmError> for FetchFailure {
    fn from(error: CrmError) -> Self {
        FetchFailure::from(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_truncates_surplus() {
        let page = PageResult::new((0..12).collect::<Vec<_>>(), 40, 10);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages(), 4);
    }

    #[test]
    fn test_zero_page_size() {
        let page = PageResult::new(vec![1], 1, 0);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_failure_from_error() {
        let failure = FetchFailure::from(CrmError::MissingToken);
        assert!(failure.blocking);
        assert!(failure.message.contains("Not signed in"));

        let failure = FetchFailure::from(CrmError::Status {
            status: 503,
            body: "down".to_string(),
        });
        assert!(!failure.blocking);
    }
}
