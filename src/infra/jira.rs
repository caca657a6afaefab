use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, Method, RequestBuilder,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::domain::priority::{Priority, PriorityId};
use crate::domain::ticket::{IssueDraft, IssueQuery, TicketPage};
use crate::domain::user::AccountId;
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

/// Every bridged ticket lands as this issue type.
const ISSUE_TYPE: &str = "Integration";

/// Field projection for issue searches: the standard subset plus the two
/// custom fields the intake form populates.
const SEARCH_FIELDS: &str = "summary,status,priority,key,customfield_10044,customfield_10035";

pub struct JiraClient {
    http: Client,
    base_url: String,
    auth_header: String,
}

impl JiraClient {
    pub fn new(base_url: String, email: &str, token: &str) -> Self {
        Self {
            http: Client::new(),
            auth_header: Self::auth_header(email, token),
            base_url,
        }
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/rest/api/3/{path}", self.base_url.trim_end_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(path))
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> AppResult<T> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira {what}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira {what} responded with {status}: {body}"
            )));
        }

        response.json::<T>().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira {what} response: {err}"))
        })
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<AccountId>> {
        let request = self
            .request(Method::GET, "user/search")
            .query(&[("query", email)]);
        let users: Vec<JiraUser> = self.send_json(request, "user search").await?;
        Ok(users.into_iter().next().map(|user| AccountId(user.account_id)))
    }

    async fn create_account(&self, email: &str) -> AppResult<AccountId> {
        let body = JiraCreateUserRequest::for_email(email);
        let request = self.request(Method::POST, "user").json(&body);
        let user: JiraUser = self.send_json(request, "user creation").await?;
        Ok(AccountId(user.account_id))
    }

    async fn list_priorities(&self) -> AppResult<Vec<Priority>> {
        let request = self.request(Method::GET, "priority");
        let priorities: Vec<JiraPriority> = self.send_json(request, "priority listing").await?;
        Ok(priorities
            .into_iter()
            .map(|priority| Priority {
                id: PriorityId(priority.id),
                name: priority.name,
            })
            .collect())
    }

    async fn create_issue(&self, draft: &IssueDraft) -> AppResult<String> {
        let body = JiraCreateIssueRequest::new(draft);
        let request = self.request(Method::POST, "issue").json(&body);
        let created: JiraCreateIssueResponse = self.send_json(request, "issue creation").await?;
        Ok(created.key)
    }

    async fn search_issues(&self, query: &IssueQuery) -> AppResult<TicketPage> {
        let params = JiraSearchParams {
            jql: &query.jql,
            fields: SEARCH_FIELDS,
            start_at: query.page.start_at,
            max_results: query.page.max_results,
        };
        let request = self.request(Method::GET, "search").query(&params);
        let found: JiraSearchResponse = self.send_json(request, "issue search").await?;
        Ok(TicketPage {
            issues: found.issues,
            total: found.total,
            start_at: found.start_at,
            max_results: found.max_results,
        })
    }
}

#[derive(Deserialize)]
struct JiraUser {
    #[serde(rename = "accountId")]
    account_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JiraCreateUserRequest {
    email_address: String,
    products: Vec<&'static str>,
}

impl JiraCreateUserRequest {
    /// New accounts get the software product so the issue can be assigned
    /// to them as reporter.
    fn for_email(email: &str) -> Self {
        Self {
            email_address: email.to_string(),
            products: vec!["jira-software"],
        }
    }
}

#[derive(Deserialize)]
struct JiraPriority {
    id: String,
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JiraSearchParams<'a> {
    jql: &'a str,
    fields: &'a str,
    start_at: u32,
    max_results: u32,
}

#[derive(Deserialize)]
struct JiraSearchResponse {
    issues: Vec<serde_json::Value>,
    total: u64,
    #[serde(rename = "startAt")]
    start_at: u32,
    #[serde(rename = "maxResults")]
    max_results: u32,
}

#[derive(Serialize)]
struct JiraCreateIssueRequest {
    fields: JiraIssueFields,
}

impl JiraCreateIssueRequest {
    fn new(draft: &IssueDraft) -> Self {
        let submission = &draft.submission;
        let description = JiraDocument::from_labeled_lines(&[
            ("Summary", &submission.summary),
            ("Priority", &submission.priority),
            ("Link", &submission.link),
            ("Collection", &submission.collection),
            ("Reported by", &submission.reporter.username),
        ]);

        Self {
            fields: JiraIssueFields {
                project: JiraProject {
                    key: draft.project_key.clone(),
                },
                summary: submission.summary.clone(),
                issuetype: JiraIssueType { name: ISSUE_TYPE },
                priority: JiraPriorityRef {
                    id: draft.priority_id.as_str().to_string(),
                },
                description,
                reporter: JiraReporter {
                    account_id: draft.reporter_id.as_str().to_string(),
                },
                reporter_username: submission.reporter.username.clone(),
                collection: submission.collection.clone(),
                link: submission.link.clone(),
            },
        }
    }
}

#[derive(Serialize)]
struct JiraIssueFields {
    project: JiraProject,
    summary: String,
    issuetype: JiraIssueType,
    priority: JiraPriorityRef,
    description: JiraDocument,
    reporter: JiraReporter,
    #[serde(rename = "customfield_10034")]
    reporter_username: String,
    #[serde(rename = "customfield_10035")]
    collection: String,
    #[serde(rename = "customfield_10036")]
    link: String,
}

#[derive(Serialize)]
struct JiraProject {
    key: String,
}

#[derive(Serialize)]
struct JiraIssueType {
    name: &'static str,
}

#[derive(Serialize)]
struct JiraPriorityRef {
    id: String,
}

#[derive(Serialize)]
struct JiraReporter {
    #[serde(rename = "accountId")]
    account_id: String,
}

#[derive(Serialize)]
struct JiraDocument {
    #[serde(rename = "type")]
    doc_type: &'static str,
    version: u8,
    content: Vec<JiraDocNode>,
}

impl JiraDocument {
    /// One paragraph of `label: value` text nodes separated by hard breaks,
    /// the structured description format the backend expects.
    fn from_labeled_lines(lines: &[(&str, &str)]) -> Self {
        let mut content = Vec::with_capacity(lines.len() * 2);
        for (label, value) in lines {
            if !content.is_empty() {
                content.push(JiraDocInline::hard_break());
            }
            content.push(JiraDocInline::text(format!("{label}: {value}")));
        }

        Self {
            doc_type: "doc",
            version: 1,
            content: vec![JiraDocNode::paragraph(content)],
        }
    }
}

#[derive(Serialize)]
struct JiraDocNode {
    #[serde(rename = "type")]
    node_type: &'static str,
    content: Vec<JiraDocInline>,
}

impl JiraDocNode {
    fn paragraph(content: Vec<JiraDocInline>) -> Self {
        Self {
            node_type: "paragraph",
            content,
        }
    }
}

#[derive(Serialize)]
struct JiraDocInline {
    #[serde(rename = "type")]
    node_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl JiraDocInline {
    fn text(text: String) -> Self {
        Self {
            node_type: "text",
            text: Some(text),
        }
    }

    fn hard_break() -> Self {
        Self {
            node_type: "hardBreak",
            text: None,
        }
    }
}

#[derive(Deserialize)]
struct JiraCreateIssueResponse {
    key: String,
}
