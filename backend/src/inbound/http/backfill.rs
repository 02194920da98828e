//! Trigger endpoint for the `completed_at` backfill.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::state::HttpState;

/// Result of a sweep: `{ok, updated}` on success, `{ok, error}` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BackfillResponseBody {
    /// Whether the sweep finished.
    pub ok: bool,
    /// Records updated by the sweep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<usize>,
    /// Failure text when the sweep aborted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Sweep every order-history record missing `completed_at`.
///
/// Batches committed before a failure stay committed; re-running resumes
/// where the failed sweep stopped.
#[utoipa::path(
    method(get, post),
    path = "/backfill/completed-at",
    responses(
        (status = 200, description = "Sweep finished", body = BackfillResponseBody),
        (status = 500, description = "Sweep aborted", body = BackfillResponseBody)
    ),
    tags = ["backfill"],
    operation_id = "backfillCompletedAt"
)]
pub async fn backfill_completed_at(state: web::Data<HttpState>) -> HttpResponse {
    match state.backfill.run().await {
        Ok(report) => HttpResponse::Ok().json(BackfillResponseBody {
            ok: true,
            updated: Some(report.updated),
            error: None,
        }),
        Err(err) => HttpResponse::InternalServerError().json(BackfillResponseBody {
            ok: false,
            updated: None,
            error: Some(err.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{
        BackfillStoreError, MockBackfillCommand, MockOrderCreatedHandler, MockOrderUpdatedHandler,
    };
    use crate::domain::{SweepError, SweepReport};
    use crate::inbound::http::configure;

    fn state(command: MockBackfillCommand) -> HttpState {
        HttpState::new(
            Arc::new(command),
            Arc::new(MockOrderUpdatedHandler::new()),
            Arc::new(MockOrderCreatedHandler::new()),
        )
    }

    async fn call(command: MockBackfillCommand, req: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(command)))
                .configure(configure),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[case(test::TestRequest::get())]
    #[case(test::TestRequest::post())]
    #[actix_web::test]
    async fn reports_updated_count(#[case] req: test::TestRequest) {
        let mut command = MockBackfillCommand::new();
        command.expect_run().times(1).returning(|| {
            Ok(SweepReport {
                updated: 1200,
                batches: 3,
            })
        });

        let (status, body) = call(command, req.uri("/backfill/completed-at")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true, "updated": 1200 }));
    }

    #[rstest]
    #[actix_web::test]
    async fn reports_failure_text() {
        let mut command = MockBackfillCommand::new();
        command.expect_run().times(1).returning(|| {
            Err(SweepError {
                updated_before_failure: 500,
                source: BackfillStoreError::commit("deadlock detected"),
            })
        });

        let (status, body) = call(
            command,
            test::TestRequest::post().uri("/backfill/completed-at"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "ok": false, "error": "backfill batch commit failed: deadlock detected" })
        );
    }
}
