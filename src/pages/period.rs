use std::str::FromStr;

use actix_web::{dev, get, post, web, FromRequest, HttpRequest, HttpResponse, Responder};
use futures_util::future::LocalBoxFuture;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{auth::{Admin, Identity}, entity::payroll_period, error::PayrollError, intake::{self, CreatePeriod}, payroll};

mod extractor;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_period)
        .service(get_period)
        .service(generate_payroll)
        .service(get_payslip)
        .service(get_payroll);
}

#[post("")]
async fn create_period(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<CreatePeriod>) -> Result<impl Responder, PayrollError> {
    let period = intake::create_period(db.as_ref(), payload.into_inner(), &admin).await?;

    Ok(HttpResponse::Created().json(period))
}

#[get("/{period_id}")]
async fn get_period(_identity: Identity, period: payroll_period::Model) -> impl Responder {
    web::Json(period)
}

#[post("/{period_id}/generate")]
async fn generate_payroll(db: web::Data<DatabaseConnection>, admin: Admin, period_id: web::Path<Uuid>) -> Result<impl Responder, PayrollError> {
    let detail = payroll::generate_payroll(db.as_ref(), period_id.into_inner(), &admin).await?;

    Ok(HttpResponse::Created().json(detail))
}

#[get("/{period_id}/payslip")]
async fn get_payslip(db: web::Data<DatabaseConnection>, identity: Identity, period_id: web::Path<Uuid>) -> Result<impl Responder, PayrollError> {
    let payslip = payroll::get_employee_payslip(db.as_ref(), period_id.into_inner(), &identity).await?;

    Ok(web::Json(payslip))
}

#[get("/{period_id}/payroll")]
async fn get_payroll(db: web::Data<DatabaseConnection>, admin: Admin, period_id: web::Path<Uuid>) -> Result<impl Responder, PayrollError> {
    let payroll = payroll::get_payroll(db.as_ref(), period_id.into_inner(), &admin).await?;

    Ok(web::Json(payroll))
}
