use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::AppContext;
use crate::domain::ticket::{PageRequest, TicketPage, TicketSubmission};
use crate::domain::user::Reporter;
use crate::error::{AppError, AppResult};
use crate::workflow::ticket as workflow;

/// Inbound creation payload. Fields are optional at the serde layer so a
/// missing field becomes a 400 validation error instead of a deserialization
/// rejection.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub summary: Option<String>,
    pub priority: Option<String>,
    pub link: Option<String>,
    pub collection: Option<String>,
    pub user: Option<ReporterPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ReporterPayload {
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketResponse {
    pub issue_key: String,
    pub issue_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsQuery {
    pub reported_by: Option<String>,
    pub start_at: Option<u32>,
    pub max_results: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListResponse {
    pub issues: Vec<Value>,
    pub total: u64,
    pub start_at: u32,
    pub max_results: u32,
}

impl From<TicketPage> for TicketListResponse {
    fn from(page: TicketPage) -> Self {
        Self {
            issues: page.issues,
            total: page.total,
            start_at: page.start_at,
            max_results: page.max_results,
        }
    }
}

impl CreateTicketRequest {
    fn into_submission(self) -> AppResult<TicketSubmission> {
        let summary = required(self.summary, "summary")?;
        let priority = required(self.priority, "priority")?;
        let link = required(self.link, "link")?;
        let collection = required(self.collection, "collection")?;
        let user = self
            .user
            .ok_or_else(|| AppError::Validation("missing required field: user".to_string()))?;
        let email = required(user.email, "user.email")?;
        let username = required(user.username, "user.username")?;

        Ok(TicketSubmission {
            summary,
            priority,
            link,
            collection,
            reporter: Reporter { email, username },
        })
    }
}

fn required(value: Option<String>, name: &str) -> AppResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Validation(format!(
            "missing required field: {name}"
        ))),
    }
}

/// POST /create-ticket
pub async fn create_ticket(
    State(ctx): State<AppContext>,
    Json(payload): Json<CreateTicketRequest>,
) -> Result<Json<CreateTicketResponse>, AppError> {
    let submission = payload.into_submission()?;
    let ticket = workflow::submit_ticket(&ctx, submission).await?;
    Ok(Json(CreateTicketResponse {
        issue_key: ticket.key,
        issue_url: ticket.url,
    }))
}

/// GET /tickets
pub async fn list_tickets(
    State(ctx): State<AppContext>,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Json<TicketListResponse>, AppError> {
    let reporter = match query.reported_by {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            return Err(AppError::Validation(
                "missing required query parameter: reportedBy".to_string(),
            ));
        }
    };

    let page = PageRequest::from_params(query.start_at, query.max_results);
    let result = workflow::list_tickets(&ctx, &reporter, page).await?;
    Ok(Json(TicketListResponse::from(result)))
}
