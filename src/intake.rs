//! Day-to-day records that payroll generation later consumes

use chrono::{Local, NaiveDate};
use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{auth::Identity, consts::MAX_OVERTIME_HOURS, entity::{employee_attendance, employee_overtime, employee_reimbursement, payroll_period, prelude::*, sea_orm_active_enums::ReimbursementStatus}, error::PayrollError, utils};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePeriod {
    pub start_on: NaiveDate,
    pub end_on: NaiveDate,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TapIn {
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitOvertime {
    pub date: NaiveDate,
    pub hours: i16,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReimbursement {
    pub amount: i64,
    pub description: String,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Only employees are on the payroll roster, so only they may file records
fn employee_only(caller: &Identity) -> Result<(), PayrollError> {
    if caller.is_admin() {
        warn!("admin attempted to file an employee record");
        return Err(PayrollError::Forbidden)
    }

    Ok(())
}

#[instrument(skip(db, caller), fields(caller = %caller.id))]
pub async fn create_period<C: ConnectionTrait>(db: &C, payload: CreatePeriod, caller: &Identity) -> Result<payroll_period::Model, PayrollError> {
    if !caller.is_admin() {
        warn!("payroll period creation requested by a non-admin");
        return Err(PayrollError::Forbidden)
    }

    if payload.end_on < payload.start_on {
        return Err(PayrollError::bad_input("end_on is lower than start_on"))
    }

    if utils::count_working_days(payload.start_on, payload.end_on) == 0 {
        return Err(PayrollError::bad_input("payroll period contains no working days"))
    }

    let now = utils::now();
    let period = payroll_period::Model {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        created_by: Some(caller.id),
        updated_by: Some(caller.id),
        start_on: payload.start_on,
        end_on: payload.end_on,
        processed_at: None,
    };

    PayrollPeriod::insert(payroll_period::ActiveModel {
        id: Set(period.id),
        created_at: Set(period.created_at),
        updated_at: Set(period.updated_at),
        created_by: Set(period.created_by),
        updated_by: Set(period.updated_by),
        start_on: Set(period.start_on),
        end_on: Set(period.end_on),
        processed_at: Set(None),
    }).exec_without_returning(db).await?;

    info!(period = %period.id, "payroll period created");

    Ok(period)
}

pub async fn get_period<C: ConnectionTrait>(db: &C, period_id: Uuid) -> Result<payroll_period::Model, PayrollError> {
    PayrollPeriod::find_by_id(period_id)
        .one(db).await?
        .ok_or(PayrollError::NotFound("payroll period"))
}

/// Records the caller's attendance, returning the existing record when already tapped in
///
/// The flag tells whether a new record was created
#[instrument(skip(db, caller), fields(caller = %caller.id))]
pub async fn record_attendance<C: ConnectionTrait>(db: &C, payload: TapIn, caller: &Identity) -> Result<(employee_attendance::Model, bool), PayrollError> {
    employee_only(caller)?;

    let date = payload.date.unwrap_or_else(today);

    if utils::is_weekend(date) {
        return Err(PayrollError::bad_input("cannot attend on weekend"))
    }

    let existing = EmployeeAttendance::find()
        .filter(employee_attendance::Column::EmployeeId.eq(caller.id))
        .filter(employee_attendance::Column::AttendedOn.eq(date))
        .one(db).await?;

    if let Some(existing) = existing {
        return Ok((existing, false))
    }

    let now = utils::now();
    let attendance = employee_attendance::Model {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        created_by: Some(caller.id),
        updated_by: Some(caller.id),
        employee_id: caller.id,
        attended_on: date,
        payroll_period_id: None,
    };

    EmployeeAttendance::insert(employee_attendance::ActiveModel {
        id: Set(attendance.id),
        created_at: Set(attendance.created_at),
        updated_at: Set(attendance.updated_at),
        created_by: Set(attendance.created_by),
        updated_by: Set(attendance.updated_by),
        employee_id: Set(attendance.employee_id),
        attended_on: Set(attendance.attended_on),
        payroll_period_id: Set(None),
    }).exec_without_returning(db).await?;

    Ok((attendance, true))
}

/// Files overtime for a single day, clamping the claimed hours to [`MAX_OVERTIME_HOURS`]
///
/// On weekdays overtime is only accepted once the caller has attended that day
#[instrument(skip(db, caller), fields(caller = %caller.id))]
pub async fn submit_overtime<C: ConnectionTrait>(db: &C, payload: SubmitOvertime, caller: &Identity) -> Result<employee_overtime::Model, PayrollError> {
    employee_only(caller)?;

    if payload.hours <= 0 {
        return Err(PayrollError::bad_input("hours must be positive"))
    }

    if !utils::is_weekend(payload.date) {
        let attended = EmployeeAttendance::find()
            .filter(employee_attendance::Column::EmployeeId.eq(caller.id))
            .filter(employee_attendance::Column::AttendedOn.eq(payload.date))
            .one(db).await?;

        if attended.is_none() {
            return Err(PayrollError::bad_input("you have not checked-in on the overtime date"))
        }
    }

    let existing = EmployeeOvertime::find()
        .filter(employee_overtime::Column::EmployeeId.eq(caller.id))
        .filter(employee_overtime::Column::OvertimeOn.eq(payload.date))
        .one(db).await?;

    if existing.is_some() {
        return Err(PayrollError::bad_input("overtime already submitted for this date"))
    }

    let hours = payload.hours.min(MAX_OVERTIME_HOURS);
    if hours < payload.hours {
        info!(claimed = payload.hours, hours, "overtime clamped");
    }

    let now = utils::now();
    let overtime = employee_overtime::Model {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        created_by: Some(caller.id),
        updated_by: Some(caller.id),
        employee_id: caller.id,
        overtime_on: payload.date,
        hours,
        payroll_period_id: None,
    };

    EmployeeOvertime::insert(employee_overtime::ActiveModel {
        id: Set(overtime.id),
        created_at: Set(overtime.created_at),
        updated_at: Set(overtime.updated_at),
        created_by: Set(overtime.created_by),
        updated_by: Set(overtime.updated_by),
        employee_id: Set(overtime.employee_id),
        overtime_on: Set(overtime.overtime_on),
        hours: Set(overtime.hours),
        payroll_period_id: Set(None),
    }).exec_without_returning(db).await?;

    Ok(overtime)
}

#[instrument(skip(db, caller, payload), fields(caller = %caller.id, amount = payload.amount))]
pub async fn submit_reimbursement<C: ConnectionTrait>(db: &C, payload: SubmitReimbursement, caller: &Identity) -> Result<employee_reimbursement::Model, PayrollError> {
    employee_only(caller)?;

    if payload.amount <= 0 {
        return Err(PayrollError::bad_input("amount must be positive"))
    }

    let description = payload.description.trim();
    if description.is_empty() {
        return Err(PayrollError::bad_input("description is required"))
    }

    let now = utils::now();
    let reimbursement = employee_reimbursement::Model {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        created_by: Some(caller.id),
        updated_by: Some(caller.id),
        employee_id: caller.id,
        claimed_on: today(),
        amount: payload.amount,
        description: description.to_string(),
        status: ReimbursementStatus::Pending,
        payroll_period_id: None,
    };

    EmployeeReimbursement::insert(employee_reimbursement::ActiveModel {
        id: Set(reimbursement.id),
        created_at: Set(reimbursement.created_at),
        updated_at: Set(reimbursement.updated_at),
        created_by: Set(reimbursement.created_by),
        updated_by: Set(reimbursement.updated_by),
        employee_id: Set(reimbursement.employee_id),
        claimed_on: Set(reimbursement.claimed_on),
        amount: Set(reimbursement.amount),
        description: Set(reimbursement.description.clone()),
        status: Set(reimbursement.status),
        payroll_period_id: Set(None),
    }).exec_without_returning(db).await?;

    Ok(reimbursement)
}
