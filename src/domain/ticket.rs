use serde_json::Value;

use crate::domain::priority::PriorityId;
use crate::domain::user::{AccountId, Reporter};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A validated ticket-creation request. Every field has already been checked
/// for presence, but the priority is still a human-readable name and the
/// reporter is still an email/username pair.
#[derive(Debug, Clone)]
pub struct TicketSubmission {
    pub summary: String,
    pub priority: String,
    pub link: String,
    pub collection: String,
    pub reporter: Reporter,
}

/// The submission plus everything resolved against the backend. Holding
/// `AccountId` and `PriorityId` here keeps raw names and emails out of the
/// outbound creation payload.
#[derive(Debug, Clone)]
pub struct IssueDraft {
    pub project_key: String,
    pub submission: TicketSubmission,
    pub reporter_id: AccountId,
    pub priority_id: PriorityId,
}

#[derive(Debug, Clone)]
pub struct CreatedTicket {
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub start_at: u32,
    pub max_results: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            start_at: 0,
            max_results: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn from_params(start_at: Option<u32>, max_results: Option<u32>) -> Self {
        let defaults = Self::default();
        Self {
            start_at: start_at.unwrap_or(defaults.start_at),
            max_results: max_results.unwrap_or(defaults.max_results),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssueQuery {
    pub jql: String,
    pub page: PageRequest,
}

/// One page of backend search results, passed through to the caller
/// unchanged.
#[derive(Debug, Clone)]
pub struct TicketPage {
    pub issues: Vec<Value>,
    pub total: u64,
    pub start_at: u32,
    pub max_results: u32,
}
