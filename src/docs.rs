use crate::api::attendance::{
    PunchDirection, PunchRequest, PunchResponse, SwipeState, TodayAttendance,
};
use crate::api::calendar::SyncDayRequest;
use crate::calendar::assembler::{Calendar, DaySync};
use crate::model::day_status::{DayCode, DayStatus};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Calendar API",
        version = "1.0.0",
        description = r#"
## Attendance Calendar

Monthly attendance calendars built from raw punch records, leave requests and
the holiday list.

### Day codes
| Code | Meaning |
|------|---------|
| `P` | Present, first IN and last OUT recorded |
| `A` | Absent |
| `WO` | Weekly off (Sunday) |
| `PH` / `RH` | Public / restricted holiday |
| `CL` / `SL` | Casual / sick leave |
| `CL/2` | Half day |
| `MP` | Missing punch, only one of IN or OUT recorded |

Every calendar read also refreshes the employee's rows in the daily attendance
table.

### Security
All endpoints require a **JWT Bearer** access token. Employees may read only
their own calendar; **HR** and **Admin** may read anyone's and run backfills.
"#,
    ),
    paths(
        crate::api::calendar::get_calendar,
        crate::api::calendar::sync_day,
        crate::api::attendance::punch,
        crate::api::attendance::today,
    ),
    components(
        schemas(
            Calendar,
            DayStatus,
            DayCode,
            DaySync,
            SyncDayRequest,
            PunchDirection,
            PunchRequest,
            PunchResponse,
            SwipeState,
            TodayAttendance
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Calendar", description = "Monthly attendance calendar APIs"),
        (name = "Attendance", description = "Punch recording and today's status APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
