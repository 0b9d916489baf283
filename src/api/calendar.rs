use crate::auth::auth::AuthUser;
use crate::state::AppState;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Employee to build the calendar for. Defaults to the caller.
    #[param(example = 1)]
    pub employee_id: Option<u64>,

    /// Month in `YYYY-MM` form
    #[param(example = "2026-01")]
    pub month: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncDayRequest {
    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(value_type = String, format = Date, example = "2026-01-06")]
    pub date: NaiveDate,
}

/// Monthly attendance calendar
#[utoipa::path(
    get,
    path = "/api/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "One entry per day of the month", body = crate::calendar::assembler::Calendar),
        (status = 400, description = "Invalid employee or month", body = Object, example = json!({
            "message": "Invalid month format. Use YYYY-MM format"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Failed to generate calendar", body = Object, example = json!({
            "message": "Failed to generate calendar"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
#[instrument(skip_all, fields(user_id = auth.user_id, username = %auth.username, month = %query.month))]
pub async fn get_calendar(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<CalendarQuery>,
) -> actix_web::Result<HttpResponse> {
    let query = query.into_inner();
    let employee_id = match query.employee_id {
        Some(id) => id,
        None => auth.employee()?,
    };
    auth.require_self_or_hr(employee_id)?;

    let calendar = state
        .calendar
        .get_calendar_for(employee_id, &query.month)
        .await
        .inspect_err(|e| tracing::error!(error = %e, employee_id, "Calendar request failed"))?;

    Ok(HttpResponse::Ok().json(calendar))
}

/// Recompute one day and write it to the daily attendance table
#[utoipa::path(
    post,
    path = "/api/calendar/sync",
    request_body = SyncDayRequest,
    responses(
        (status = 200, description = "Day recomputed", body = crate::calendar::assembler::DaySync),
        (status = 400, description = "Invalid employee or date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only"),
        (status = 500, description = "Failed to sync daily attendance", body = Object, example = json!({
            "message": "Failed to sync daily attendance"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
#[instrument(skip_all, fields(user_id = auth.user_id, username = %auth.username))]
pub async fn sync_day(
    auth: AuthUser,
    state: web::Data<AppState>,
    body: web::Json<SyncDayRequest>,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;
    let SyncDayRequest { employee_id, date } = body.into_inner();

    let synced = state
        .calendar
        .sync_day(employee_id, date)
        .await
        .inspect_err(|e| tracing::error!(error = %e, employee_id, %date, "Day sync failed"))?;

    Ok(HttpResponse::Ok().json(synced))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{authed, init_app, state};
    use crate::model::role::Role;
    use crate::store::memory::{InMemoryStore, Port};
    use crate::model::punch::{Punch, PunchType};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::NaiveDate;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn seeded() -> Arc<InMemoryStore> {
        let store = InMemoryStore::new();
        let day = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        store.add_punch(Punch::new(1, day.and_hms_opt(9, 15, 0).unwrap(), PunchType::In));
        store.add_punch(Punch::new(1, day.and_hms_opt(18, 30, 0).unwrap(), PunchType::Out));
        Arc::new(store)
    }

    #[actix_web::test]
    async fn employee_reads_own_calendar() {
        let store = seeded();
        let app = init_app!(state(&store));

        let req = authed(test::TestRequest::get(), Role::Employee, Some(1))
            .uri("/api/calendar?month=2026-01")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let table = body["table"].as_array().unwrap();
        assert_eq!(table.len(), 31);
        assert_eq!(table[5]["date"], "2026-01-06");
        assert_eq!(table[5]["statusCode"], "P");
        assert_eq!(table[5]["workingMinutes"], 555);
        assert_eq!(table[5]["displayString"], "IN 09:15 AM\nOUT 06:30 PM");
        assert_eq!(table[3]["statusCode"], "WO");
        assert_eq!(store.cached_rows(), 1);
    }

    #[actix_web::test]
    async fn employee_cannot_read_someone_else() {
        let app = init_app!(state(&seeded()));
        let req = authed(test::TestRequest::get(), Role::Employee, Some(2))
            .uri("/api/calendar?employeeId=1&month=2026-01")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn hr_reads_any_calendar() {
        let app = init_app!(state(&seeded()));
        let req = authed(test::TestRequest::get(), Role::Hr, None)
            .uri("/api/calendar?employeeId=1&month=2026-02")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["table"].as_array().unwrap().len(), 28);
    }

    #[actix_web::test]
    async fn bad_month_is_a_400_with_message() {
        let app = init_app!(state(&seeded()));
        for month in ["2026-13", "January", "26-01"] {
            let req = authed(test::TestRequest::get(), Role::Employee, Some(1))
                .uri(&format!("/api/calendar?month={month}"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "month {month}");
            let body: Value = test::read_body_json(resp).await;
            assert!(body["message"].is_string());
        }
    }

    #[actix_web::test]
    async fn source_failure_is_a_500() {
        let store = seeded();
        store.set_offline(Port::Punches, true);
        let app = init_app!(state(&store));

        let req = authed(test::TestRequest::get(), Role::Employee, Some(1))
            .uri("/api/calendar?month=2026-01")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Failed to generate calendar" }));
    }

    #[actix_web::test]
    async fn missing_token_is_rejected() {
        let app = init_app!(state(&seeded()));
        let req = test::TestRequest::get()
            .uri("/api/calendar?month=2026-01")
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn sync_is_hr_only_and_writes_the_row() {
        let store = seeded();
        let app = init_app!(state(&store));
        let payload = json!({ "employeeId": 1, "date": "2026-01-06" });

        let req = authed(test::TestRequest::post(), Role::Employee, Some(1))
            .uri("/api/calendar/sync")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(store.cached_rows(), 0);

        let req = authed(test::TestRequest::post(), Role::Admin, None)
            .uri("/api/calendar/sync")
            .set_json(&payload)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["cached"], true);
        assert_eq!(body["day"]["statusCode"], "P");
        assert_eq!(store.cached_rows(), 1);
    }

    #[actix_web::test]
    async fn sync_reports_cache_failure() {
        let store = seeded();
        store.set_offline(Port::DailyCache, true);
        let app = init_app!(state(&store));

        let req = authed(test::TestRequest::post(), Role::Hr, None)
            .uri("/api/calendar/sync")
            .set_json(json!({ "employeeId": 1, "date": "2026-01-06" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Failed to sync daily attendance");
    }
}
