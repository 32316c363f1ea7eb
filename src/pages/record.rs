use actix_web::{post, web, HttpResponse, Responder};
use sea_orm::DatabaseConnection;

use crate::{auth::Identity, error::PayrollError, intake::{self, SubmitOvertime, SubmitReimbursement, TapIn}};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(record_attendance)
        .service(submit_overtime)
        .service(submit_reimbursement);
}

/// Responds `201` for a fresh tap-in and `200` with the existing record otherwise
///
/// An empty object taps in for today
#[post("/attendance")]
async fn record_attendance(db: web::Data<DatabaseConnection>, employee: Identity, payload: web::Json<TapIn>) -> Result<impl Responder, PayrollError> {
    let (attendance, created) = intake::record_attendance(db.as_ref(), payload.into_inner(), &employee).await?;

    if created {
        Ok(HttpResponse::Created().json(attendance))
    } else {
        Ok(HttpResponse::Ok().json(attendance))
    }
}

#[post("/overtime")]
async fn submit_overtime(db: web::Data<DatabaseConnection>, employee: Identity, payload: web::Json<SubmitOvertime>) -> Result<impl Responder, PayrollError> {
    let overtime = intake::submit_overtime(db.as_ref(), payload.into_inner(), &employee).await?;

    Ok(HttpResponse::Created().json(overtime))
}

#[post("/reimbursement")]
async fn submit_reimbursement(db: web::Data<DatabaseConnection>, employee: Identity, payload: web::Json<SubmitReimbursement>) -> Result<impl Responder, PayrollError> {
    let reimbursement = intake::submit_reimbursement(db.as_ref(), payload.into_inner(), &employee).await?;

    Ok(HttpResponse::Created().json(reimbursement))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::{Local, NaiveDate};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use crate::{auth::{tests::identity, Authority}, entity::{employee_attendance, employee_overtime, employee_reimbursement, sea_orm_active_enums::{ReimbursementStatus, RoleType}}, payroll::tests::attendance};

    use super::*;

    const SECRET: &[u8] = b"secret";

    fn inserted() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[actix_web::test]
    async fn test_record_attendance() {
        let employee = identity(RoleType::Employee);
        let token = Authority::new(SECRET).issue_for(&employee).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ ],
                vec![ attendance(employee.id, monday) ],
            ])
            .append_exec_results([ inserted() ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .configure(config)
        ).await;

        let req = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(TapIn { date: Some(monday) })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let created: employee_attendance::Model = test::read_body_json(response).await;
        assert_eq!(created.attended_on, monday);
        assert_eq!(created.employee_id, employee.id);

        let req = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(TapIn { date: Some(monday) })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_record_attendance_rejections() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .configure(config)
        ).await;

        let req = test::TestRequest::post()
            .uri("/attendance")
            .set_json(TapIn::default())
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let admin = Authority::new(SECRET).issue_for(&identity(RoleType::Admin)).unwrap();
        let req = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(("Authorization", format!("JWT {admin}")))
            .set_json(TapIn { date: NaiveDate::from_ymd_opt(2025, 7, 14) })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let employee = Authority::new(SECRET).issue_for(&identity(RoleType::Employee)).unwrap();
        let req = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(("Authorization", format!("JWT {employee}")))
            .set_json(TapIn { date: NaiveDate::from_ymd_opt(2025, 7, 19) })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_record_attendance_malformed_date() {
        let token = Authority::new(SECRET).issue_for(&identity(RoleType::Employee)).unwrap();

        // Nothing is queued, reaching the store would surface as a server error
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .configure(crate::pages::config)
        ).await;

        let req = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(("Authorization", format!("JWT {token}")))
            .insert_header(("Content-Type", "application/json"))
            .set_payload(r#"{"date":"14/07/2025"}"#)
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = test::read_body(response).await;
        assert!(body.starts_with(b"Json deserialize error"));
    }

    #[actix_web::test]
    async fn test_record_attendance_defaults_to_today() {
        let employee = identity(RoleType::Employee);
        let token = Authority::new(SECRET).issue_for(&employee).unwrap();
        let today = Local::now().date_naive();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ attendance(employee.id, today) ] ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .configure(crate::pages::config)
        ).await;

        let req = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(("Authorization", format!("JWT {token}")))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{}")
            .to_request();

        let response = test::call_service(&app, req).await;

        if crate::utils::is_weekend(today) {
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(&test::read_body(response).await[..], b"cannot attend on weekend");
        } else {
            assert_eq!(response.status(), StatusCode::OK);

            let existing: employee_attendance::Model = test::read_body_json(response).await;
            assert_eq!(existing.attended_on, today);
        }
    }

    #[actix_web::test]
    async fn test_submit_overtime() {
        let employee = identity(RoleType::Employee);
        let token = Authority::new(SECRET).issue_for(&employee).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ attendance(employee.id, monday) ] ])
            .append_query_results([ Vec::<employee_overtime::Model>::new() ])
            .append_exec_results([ inserted() ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .configure(config)
        ).await;

        let req = test::TestRequest::post()
            .uri("/overtime")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(SubmitOvertime { date: monday, hours: 5 })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let overtime: employee_overtime::Model = test::read_body_json(response).await;
        assert_eq!(overtime.hours, 3);
    }

    #[actix_web::test]
    async fn test_submit_reimbursement() {
        let employee = identity(RoleType::Employee);
        let token = Authority::new(SECRET).issue_for(&employee).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([ inserted() ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .configure(config)
        ).await;

        let req = test::TestRequest::post()
            .uri("/reimbursement")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(SubmitReimbursement { amount: -1, description: "Taxi".to_string() })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/reimbursement")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(SubmitReimbursement { amount: 75_000, description: "Client dinner".to_string() })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let reimbursement: employee_reimbursement::Model = test::read_body_json(response).await;
        assert_eq!(reimbursement.amount, 75_000);
        assert_eq!(reimbursement.status, ReimbursementStatus::Pending);
        assert_eq!(reimbursement.employee_id, employee.id);
    }
}
