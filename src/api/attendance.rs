use crate::auth::auth::AuthUser;
use crate::calendar::duration::{format_hours_minutes, open_in, paired_minutes};
use crate::calendar::range::DateRange;
use crate::model::punch::{Punch, PunchType};
use crate::state::AppState;
use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PunchDirection {
    In,
    Out,
}

impl From<PunchDirection> for PunchType {
    fn from(direction: PunchDirection) -> Self {
        match direction {
            PunchDirection::In => PunchType::In,
            PunchDirection::Out => PunchType::Out,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PunchRequest {
    pub punch_type: PunchDirection,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PunchResponse {
    #[schema(example = "Punch OUT recorded")]
    pub message: String,

    #[schema(value_type = String, example = "2026-01-06T18:30:00")]
    pub punch_time: NaiveDateTime,

    /// Sum of today's IN/OUT pairs, reported on OUT only.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 555)]
    pub working_minutes_today: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwipeState {
    NotSwiped,
    In,
    Out,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayAttendance {
    #[schema(value_type = String, format = Date, example = "2026-01-06")]
    pub date: NaiveDate,

    pub status: SwipeState,

    #[schema(example = 2)]
    pub total_punches: usize,

    #[schema(example = 425)]
    pub working_minutes: u32,

    #[schema(example = "7h 5m")]
    pub total_time: String,

    #[schema(value_type = Option<String>, example = "2026-01-06T09:15:00")]
    pub last_in: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, example = "2026-01-06T16:20:00")]
    pub last_out: Option<NaiveDateTime>,
}

impl TodayAttendance {
    fn from_punches(date: NaiveDate, punches: &[Punch]) -> Self {
        let latest = |punch_type: PunchType| {
            punches
                .iter()
                .filter(|punch| punch.punch_type == punch_type)
                .map(|punch| punch.timestamp)
                .max()
        };
        let last_in = latest(PunchType::In);
        let last_out = latest(PunchType::Out);

        let status = if open_in(punches).is_some() {
            SwipeState::In
        } else if last_in.is_some() || last_out.is_some() {
            SwipeState::Out
        } else {
            SwipeState::NotSwiped
        };
        let working_minutes = paired_minutes(punches);

        Self {
            date,
            status,
            total_punches: punches
                .iter()
                .filter(|punch| matches!(punch.punch_type, PunchType::In | PunchType::Out))
                .count(),
            working_minutes,
            total_time: format_hours_minutes(working_minutes),
            last_in,
            last_out,
        }
    }
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "message": message }))
}

/// Punch endpoint
///
/// IN and OUT must alternate within the day: a second IN needs an OUT first,
/// and an OUT needs an open IN.
#[utoipa::path(
    post,
    path = "/api/attendance/punch",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Punch recorded", body = PunchResponse),
        (status = 400, description = "Unknown punch type or out of sequence", body = Object, example = json!({
            "message": "Already swiped in. Please swipe out first."
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile"),
        (status = 429, description = "Too many punches"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn punch(
    auth: AuthUser,
    state: web::Data<AppState>,
    body: web::Json<PunchRequest>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = auth.employee()?;
    let direction = body.punch_type;
    let punch = Punch::new(employee_id, Local::now().naive_local(), direction.into());

    let mut today = state
        .punches
        .punches(employee_id, DateRange::day(punch.date))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Could not read today's punches");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match (direction, open_in(&today)) {
        (PunchDirection::In, Some(_)) => {
            return Ok(bad_request("Already swiped in. Please swipe out first."));
        }
        (PunchDirection::Out, None) => return Ok(bad_request("Please swipe in first")),
        _ => {}
    }

    state.punches.record(&punch).await.map_err(|e| {
        tracing::error!(error = %e, employee_id, "Punch failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if let Err(e) = state.calendar.sync_day(employee_id, punch.date).await {
        tracing::warn!(error = %e, employee_id, date = %punch.date, "Daily row not refreshed after punch");
    }

    today.push(punch.clone());
    let working_minutes_today = match direction {
        PunchDirection::In => None,
        PunchDirection::Out => Some(paired_minutes(&today)),
    };

    Ok(HttpResponse::Ok().json(PunchResponse {
        message: format!("Punch {} recorded", punch.punch_type.as_str()),
        punch_time: punch.timestamp,
        working_minutes_today,
    }))
}

/// Caller's swipe state and worked time for today
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Today's attendance", body = TodayAttendance),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(auth: AuthUser, state: web::Data<AppState>) -> actix_web::Result<HttpResponse> {
    let employee_id = auth.employee()?;
    let date = Local::now().date_naive();

    let punches = state
        .punches
        .punches(employee_id, DateRange::day(date))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch today attendance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(TodayAttendance::from_punches(date, &punches)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{authed, init_app, state};
    use crate::model::role::Role;
    use crate::store::memory::{InMemoryStore, Port};
    use actix_web::http::StatusCode;
    use actix_web::test::{TestRequest, call_and_read_body_json, call_service, read_body_json};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn swipe(punch_type: &str) -> TestRequest {
        authed(TestRequest::post(), Role::Employee, Some(1))
            .uri("/api/attendance/punch")
            .set_json(json!({ "punchType": punch_type }))
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[actix_web::test]
    async fn in_then_out_reports_worked_minutes() {
        let store = Arc::new(InMemoryStore::new());
        let app = init_app!(state(&store));

        let body: Value = call_and_read_body_json(&app, swipe("IN").to_request()).await;
        assert_eq!(body["message"], "Punch IN recorded");
        assert!(body.get("workingMinutesToday").is_none());
        assert_eq!(store.cached_rows(), 1);

        let body: Value = call_and_read_body_json(&app, swipe("OUT").to_request()).await;
        assert_eq!(body["message"], "Punch OUT recorded");
        // both swipes land in the same minute
        assert_eq!(body["workingMinutesToday"], 0);
        assert_eq!(store.punch_count(), 2);
    }

    #[actix_web::test]
    async fn second_in_needs_an_out_first() {
        let store = Arc::new(InMemoryStore::new());
        let app = init_app!(state(&store));

        let resp = call_service(&app, swipe("IN").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = call_service(&app, swipe("IN").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["message"], "Already swiped in. Please swipe out first.");
        assert_eq!(store.punch_count(), 1);
    }

    #[actix_web::test]
    async fn out_without_open_in_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let app = init_app!(state(&store));

        let resp = call_service(&app, swipe("OUT").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["message"], "Please swipe in first");
        assert_eq!(store.punch_count(), 0);
        assert_eq!(store.cached_rows(), 0);
    }

    #[actix_web::test]
    async fn unreadable_punch_log_is_a_500() {
        let store = Arc::new(InMemoryStore::new());
        store.set_offline(Port::Punches, true);
        let app = init_app!(state(&store));

        let resp = call_service(&app, swipe("IN").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn unknown_punch_type_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let app = init_app!(state(&store));

        let resp = call_service(&app, swipe("BREAK").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.punch_count(), 0);
    }

    #[actix_web::test]
    async fn users_without_employee_profile_cannot_punch() {
        let store = Arc::new(InMemoryStore::new());
        let app = init_app!(state(&store));

        let req = authed(TestRequest::post(), Role::Hr, None)
            .uri("/api/attendance/punch")
            .set_json(json!({ "punchType": "IN" }))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn today_follows_the_swipes() {
        let store = Arc::new(InMemoryStore::new());
        let app = init_app!(state(&store));
        let today = || {
            authed(TestRequest::get(), Role::Employee, Some(1))
                .uri("/api/attendance/today")
                .to_request()
        };

        let body: Value = call_and_read_body_json(&app, today()).await;
        assert_eq!(body["status"], "NOT_SWIPED");
        assert_eq!(body["totalPunches"], 0);
        assert_eq!(body["totalTime"], "0h 0m");
        assert!(body["lastIn"].is_null());

        call_service(&app, swipe("IN").to_request()).await;
        let body: Value = call_and_read_body_json(&app, today()).await;
        assert_eq!(body["status"], "IN");
        assert!(body["lastIn"].is_string());

        call_service(&app, swipe("OUT").to_request()).await;
        let body: Value = call_and_read_body_json(&app, today()).await;
        assert_eq!(body["status"], "OUT");
        assert_eq!(body["totalPunches"], 2);
        assert!(body["lastOut"].is_string());
    }

    #[test]
    fn today_totals_every_pair() {
        let punches = vec![
            Punch::new(1, at(9, 0), PunchType::In),
            Punch::new(1, at(12, 30), PunchType::Out),
            Punch::new(1, at(13, 15), PunchType::In),
            Punch::new(1, at(17, 0), PunchType::Out),
            Punch::new(1, at(17, 30), PunchType::In),
        ];
        let summary = TodayAttendance::from_punches(at(0, 0).date(), &punches);

        assert_eq!(summary.status, SwipeState::In);
        assert_eq!(summary.total_punches, 5);
        assert_eq!(summary.working_minutes, 435);
        assert_eq!(summary.total_time, "7h 15m");
        assert_eq!(summary.last_in, Some(at(17, 30)));
        assert_eq!(summary.last_out, Some(at(17, 0)));
    }
}
