use std::collections::HashMap;

use crate::context::AppContext;
use crate::domain::priority::PriorityId;
use crate::domain::ticket::{
    CreatedTicket, IssueDraft, IssueQuery, PageRequest, TicketPage, TicketSubmission,
};
use crate::domain::user::{AccountId, Reporter};
use crate::error::{AppError, AppResult};

/// Create a ticket in the backend. Each step is a hard dependency on the
/// previous one succeeding; any failure aborts the whole request. An account
/// created while resolving the reporter is not rolled back if a later step
/// fails.
pub async fn submit_ticket(
    ctx: &AppContext,
    submission: TicketSubmission,
) -> AppResult<CreatedTicket> {
    let reporter_id = resolve_reporter(ctx, &submission.reporter).await?;
    let priority_id = resolve_priority(ctx, &submission.priority).await?;

    let draft = IssueDraft {
        project_key: ctx.config.jira_project_key.clone(),
        submission,
        reporter_id,
        priority_id,
    };

    let key = ctx.issue_tracker.create_issue(&draft).await?;
    let url = ctx.config.browse_url(&key);

    Ok(CreatedTicket { key, url })
}

/// Look the reporter up by email, creating a backend account on first
/// contact. The first directory match wins; creation is a deliberate
/// non-idempotent side effect.
async fn resolve_reporter(ctx: &AppContext, reporter: &Reporter) -> AppResult<AccountId> {
    let existing = ctx
        .issue_tracker
        .find_account_by_email(&reporter.email)
        .await
        .map_err(|err| {
            AppError::UserResolution(format!("account lookup for {} failed: {err}", reporter.email))
        })?;

    match existing {
        Some(account) => Ok(account),
        None => ctx
            .issue_tracker
            .create_account(&reporter.email)
            .await
            .map_err(|err| {
                AppError::UserResolution(format!(
                    "account creation for {} failed: {err}",
                    reporter.email
                ))
            }),
    }
}

/// Resolve a priority name against the backend's current enumeration,
/// matching case-insensitively. The list is re-fetched on every call.
async fn resolve_priority(ctx: &AppContext, name: &str) -> AppResult<PriorityId> {
    let priorities = ctx.issue_tracker.list_priorities().await?;
    let mut lookup: HashMap<String, PriorityId> = priorities
        .into_iter()
        .map(|priority| (priority.name.to_lowercase(), priority.id))
        .collect();

    lookup
        .remove(&name.to_lowercase())
        .ok_or_else(|| AppError::InvalidPriority(name.to_string()))
}

/// List tickets filed by the given reporter, passing the backend's page
/// through unchanged.
pub async fn list_tickets(
    ctx: &AppContext,
    reporter: &str,
    page: PageRequest,
) -> AppResult<TicketPage> {
    let query = IssueQuery {
        jql: format!("reporter=\"{reporter}\""),
        page,
    };
    ctx.issue_tracker.search_issues(&query).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AppConfig;
    use crate::services::issue_tracker::testing::{MockIssueTracker, TrackerCall};

    fn test_config() -> AppConfig {
        AppConfig {
            port: 0,
            jira_base_url: "https://example.atlassian.net".to_string(),
            jira_email: "service@example.com".to_string(),
            jira_token: "token".to_string(),
            jira_project_key: "INT".to_string(),
        }
    }

    fn context(tracker: Arc<MockIssueTracker>) -> AppContext {
        AppContext::new(test_config(), tracker)
    }

    fn submission(priority: &str) -> TicketSubmission {
        TicketSubmission {
            summary: "Sync fails".to_string(),
            priority: priority.to_string(),
            link: "https://x/1".to_string(),
            collection: "orders".to_string(),
            reporter: Reporter {
                email: "a@b.com".to_string(),
                username: "alice".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn known_reporter_skips_account_creation() {
        let tracker = Arc::new(
            MockIssueTracker::default()
                .with_account("a@b.com", "acct-7")
                .with_priority("High", "2"),
        );
        let ctx = context(tracker.clone());

        submit_ticket(&ctx, submission("High")).await.unwrap();

        let calls = tracker.calls();
        assert!(
            !calls
                .iter()
                .any(|call| matches!(call, TrackerCall::CreateAccount { .. }))
        );
        assert!(calls.iter().any(|call| matches!(
            call,
            TrackerCall::CreateIssue { reporter_id, .. } if reporter_id == "acct-7"
        )));
    }

    #[tokio::test]
    async fn first_time_reporter_gets_exactly_one_account_before_the_issue() {
        let mut mock = MockIssueTracker::default().with_priority("High", "2");
        mock.new_account_id = "acct-new".to_string();
        mock.issue_key = "INT-42".to_string();
        let tracker = Arc::new(mock);
        let ctx = context(tracker.clone());

        let ticket = submit_ticket(&ctx, submission("High")).await.unwrap();

        assert_eq!(ticket.key, "INT-42");
        assert_eq!(ticket.url, "https://example.atlassian.net/browse/INT-42");

        let calls = tracker.calls();
        assert_eq!(
            calls,
            vec![
                TrackerCall::FindAccount {
                    email: "a@b.com".to_string()
                },
                TrackerCall::CreateAccount {
                    email: "a@b.com".to_string()
                },
                TrackerCall::ListPriorities,
                TrackerCall::CreateIssue {
                    project_key: "INT".to_string(),
                    summary: "Sync fails".to_string(),
                    reporter_id: "acct-new".to_string(),
                    priority_id: "2".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn priority_matching_is_case_insensitive() {
        for spelling in ["High", "high", "HIGH"] {
            let tracker = Arc::new(
                MockIssueTracker::default()
                    .with_account("a@b.com", "acct-7")
                    .with_priority("High", "2"),
            );
            let ctx = context(tracker.clone());

            submit_ticket(&ctx, submission(spelling)).await.unwrap();

            assert!(tracker.calls().iter().any(|call| matches!(
                call,
                TrackerCall::CreateIssue { priority_id, .. } if priority_id == "2"
            )));
        }
    }

    #[tokio::test]
    async fn unknown_priority_aborts_before_issue_creation() {
        let tracker = Arc::new(
            MockIssueTracker::default()
                .with_account("a@b.com", "acct-7")
                .with_priority("High", "2"),
        );
        let ctx = context(tracker.clone());

        let error = submit_ticket(&ctx, submission("Critical")).await.unwrap_err();

        assert!(matches!(
            &error,
            AppError::InvalidPriority(name) if name == "Critical"
        ));
        assert!(
            !tracker
                .calls()
                .iter()
                .any(|call| matches!(call, TrackerCall::CreateIssue { .. }))
        );
    }

    #[tokio::test]
    async fn account_lookup_failure_becomes_a_user_resolution_error() {
        let mut mock = MockIssueTracker::default().with_priority("High", "2");
        mock.fail_account_search = true;
        let ctx = context(Arc::new(mock));

        let error = submit_ticket(&ctx, submission("High")).await.unwrap_err();
        assert!(matches!(error, AppError::UserResolution(_)));
    }

    #[tokio::test]
    async fn priority_listing_failure_keeps_the_tracker_error_kind() {
        let mut mock = MockIssueTracker::default().with_account("a@b.com", "acct-7");
        mock.fail_priority_listing = true;
        let ctx = context(Arc::new(mock));

        let error = submit_ticket(&ctx, submission("High")).await.unwrap_err();
        assert!(matches!(error, AppError::IssueTracker(_)));
    }

    #[tokio::test]
    async fn listing_builds_an_exact_reporter_query() {
        let tracker = Arc::new(MockIssueTracker::default());
        let ctx = context(tracker.clone());

        let page = list_tickets(&ctx, "alice", PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.start_at, 0);
        assert_eq!(page.max_results, 10);
        assert_eq!(
            tracker.calls(),
            vec![TrackerCall::SearchIssues {
                jql: "reporter=\"alice\"".to_string(),
                start_at: 0,
                max_results: 10,
            }]
        );
    }

    #[tokio::test]
    async fn listing_forwards_explicit_pagination() {
        let tracker = Arc::new(MockIssueTracker::default());
        let ctx = context(tracker.clone());

        list_tickets(
            &ctx,
            "alice",
            PageRequest {
                start_at: 30,
                max_results: 5,
            },
        )
        .await
        .unwrap();

        assert_eq!(
            tracker.calls(),
            vec![TrackerCall::SearchIssues {
                jql: "reporter=\"alice\"".to_string(),
                start_at: 30,
                max_results: 5,
            }]
        );
    }
}
