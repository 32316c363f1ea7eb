use super::*;

/// Loads the payroll period named by the `period_id` path segment
impl FromRequest for payroll_period::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let Some(period_id) = req.match_info().get("period_id") else {
                return Err(actix_web::error::ErrorInternalServerError("route has no `period_id`"))
            };
            let Ok(period_id) = Uuid::from_str(period_id) else {
                return Err(actix_web::error::ErrorBadRequest("invalid `period_id`"))
            };

            let Some(db) = req.app_data::<web::Data<DatabaseConnection>>() else {
                return Err(actix_web::error::ErrorInternalServerError("database is not configured"))
            };

            let period = intake::get_period(db.as_ref(), period_id).await?;

            Ok(period)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::payroll::tests::period;

    use super::*;

    #[actix_web::test]
    async fn test_period_extractor() {
        #[get("/{period_id}")]
        async fn test_handler(period: payroll_period::Model) -> impl Responder {
            web::Json(period)
        }

        let period = period(false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ period.clone() ],
                vec![ ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db.into_connection()))
                .service(test_handler)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}", period.id))
            .to_request();

        let returned_period: payroll_period::Model = test::call_and_read_body_json(&app, req).await;
        assert_eq!(returned_period, period);

        let req = test::TestRequest::default()
            .uri(&format!("/{}", Uuid::new_v4()))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::default()
            .uri("/not-a-uuid")
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
