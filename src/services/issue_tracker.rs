use async_trait::async_trait;

use crate::domain::priority::Priority;
use crate::domain::ticket::{IssueDraft, IssueQuery, TicketPage};
use crate::domain::user::AccountId;
use crate::error::AppResult;

/// The five backend operations this service consumes. Everything behind this
/// trait talks to the issue tracker's wire format; everything in front of it
/// works with domain types only.
#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Search the backend user directory, returning the first match if any.
    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<AccountId>>;

    /// Create a backend account for the email and return its identifier.
    async fn create_account(&self, email: &str) -> AppResult<AccountId>;

    /// Fetch the backend's full current priority enumeration.
    async fn list_priorities(&self) -> AppResult<Vec<Priority>>;

    /// Create an issue from a fully resolved draft and return its key.
    async fn create_issue(&self, draft: &IssueDraft) -> AppResult<String>;

    /// Run a paginated issue search and pass the result page through.
    async fn search_issues(&self, query: &IssueQuery) -> AppResult<TicketPage>;
}
