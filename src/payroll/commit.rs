use sea_orm::{sea_query::Expr, ActiveEnum as _, ActiveValue::Set};

use super::*;

/// 16 columns per payslip keeps a batch well below the 65535 bind parameters Postgres accepts
const PAYSLIP_BATCH: usize = 1_000;

/// Record ids tagged per `UPDATE … WHERE id IN (…)`
const TAG_BATCH: usize = 10_000;

/// Writes everything a generation run derived
///
/// Must run inside the transaction that claimed the period, so that either every write
/// lands together with the processed marker or none of them do
pub(crate) async fn commit<C: ConnectionTrait>(
    txn: &C,
    settlement: &Settlement,
    detail: &payroll_detail::Model,
    consumed: &Consumed,
    stamp: &Stamp,
) -> Result<(), PayrollError> {
    for batch in settlement.payslips.chunks(PAYSLIP_BATCH) {
        EmployeePayslip::insert_many(batch.iter().map(payslip_active_model))
            .exec_without_returning(txn).await?;
    }

    PayrollDetail::insert(payroll_detail::ActiveModel {
        id: Set(detail.id),
        created_at: Set(detail.created_at),
        updated_at: Set(detail.updated_at),
        created_by: Set(detail.created_by),
        updated_by: Set(detail.updated_by),
        payroll_period_id: Set(detail.payroll_period_id),
        total_take_home: Set(detail.total_take_home),
    }).exec_without_returning(txn).await?;

    tag_attendance(txn, &consumed.attendance, stamp).await?;
    tag_overtime(txn, &consumed.overtime, stamp).await?;
    pay_reimbursements(txn, &consumed.reimbursements, stamp).await?;

    mark_processed(txn, stamp).await
}

fn payslip_active_model(payslip: &employee_payslip::Model) -> employee_payslip::ActiveModel {
    employee_payslip::ActiveModel {
        id: Set(payslip.id),
        created_at: Set(payslip.created_at),
        updated_at: Set(payslip.updated_at),
        created_by: Set(payslip.created_by),
        updated_by: Set(payslip.updated_by),
        employee_id: Set(payslip.employee_id),
        payroll_period_id: Set(payslip.payroll_period_id),
        username: Set(payslip.username.clone()),
        base_salary: Set(payslip.base_salary),
        working_days: Set(payslip.working_days),
        attended_days: Set(payslip.attended_days),
        prorated_salary: Set(payslip.prorated_salary),
        overtime_hours: Set(payslip.overtime_hours),
        overtime_pay: Set(payslip.overtime_pay),
        total_reimbursements: Set(payslip.total_reimbursements),
        total_take_home: Set(payslip.total_take_home),
    }
}

async fn tag_attendance<C: ConnectionTrait>(txn: &C, records: &[employee_attendance::Model], stamp: &Stamp) -> Result<(), PayrollError> {
    let mut tagged = 0;
    for batch in records.chunks(TAG_BATCH) {
        tagged += EmployeeAttendance::update_many()
            .col_expr(employee_attendance::Column::PayrollPeriodId, Expr::value(stamp.period_id))
            .col_expr(employee_attendance::Column::UpdatedBy, Expr::value(stamp.admin_id))
            .col_expr(employee_attendance::Column::UpdatedAt, Expr::value(stamp.at))
            .filter(employee_attendance::Column::Id.is_in(batch.iter().map(|r| r.id)))
            .filter(employee_attendance::Column::PayrollPeriodId.is_null())
            .exec(txn).await?
            .rows_affected;
    }

    expect_rows("attendance", tagged, records.len())
}

async fn tag_overtime<C: ConnectionTrait>(txn: &C, records: &[employee_overtime::Model], stamp: &Stamp) -> Result<(), PayrollError> {
    let mut tagged = 0;
    for batch in records.chunks(TAG_BATCH) {
        tagged += EmployeeOvertime::update_many()
            .col_expr(employee_overtime::Column::PayrollPeriodId, Expr::value(stamp.period_id))
            .col_expr(employee_overtime::Column::UpdatedBy, Expr::value(stamp.admin_id))
            .col_expr(employee_overtime::Column::UpdatedAt, Expr::value(stamp.at))
            .filter(employee_overtime::Column::Id.is_in(batch.iter().map(|r| r.id)))
            .filter(employee_overtime::Column::PayrollPeriodId.is_null())
            .exec(txn).await?
            .rows_affected;
    }

    expect_rows("overtime", tagged, records.len())
}

async fn pay_reimbursements<C: ConnectionTrait>(txn: &C, records: &[employee_reimbursement::Model], stamp: &Stamp) -> Result<(), PayrollError> {
    let mut tagged = 0;
    for batch in records.chunks(TAG_BATCH) {
        tagged += EmployeeReimbursement::update_many()
            .col_expr(employee_reimbursement::Column::PayrollPeriodId, Expr::value(stamp.period_id))
            .col_expr(employee_reimbursement::Column::Status, ReimbursementStatus::Paid.as_enum())
            .col_expr(employee_reimbursement::Column::UpdatedBy, Expr::value(stamp.admin_id))
            .col_expr(employee_reimbursement::Column::UpdatedAt, Expr::value(stamp.at))
            .filter(employee_reimbursement::Column::Id.is_in(batch.iter().map(|r| r.id)))
            .filter(employee_reimbursement::Column::Status.eq(ReimbursementStatus::Pending))
            .filter(employee_reimbursement::Column::PayrollPeriodId.is_null())
            .exec(txn).await?
            .rows_affected;
    }

    expect_rows("reimbursement", tagged, records.len())
}

async fn mark_processed<C: ConnectionTrait>(txn: &C, stamp: &Stamp) -> Result<(), PayrollError> {
    let res = PayrollPeriod::update_many()
        .col_expr(payroll_period::Column::ProcessedAt, Expr::value(stamp.at))
        .col_expr(payroll_period::Column::UpdatedBy, Expr::value(stamp.admin_id))
        .col_expr(payroll_period::Column::UpdatedAt, Expr::value(stamp.at))
        .filter(payroll_period::Column::Id.eq(stamp.period_id))
        .filter(payroll_period::Column::ProcessedAt.is_null())
        .exec(txn).await?;

    if res.rows_affected != 1 {
        return Err(PayrollError::AlreadyProcessed)
    }

    Ok(())
}

/// Records are only tagged while still unassigned; a shortfall means another writer got to them first
fn expect_rows(kind: &str, rows_affected: u64, expected: usize) -> Result<(), PayrollError> {
    if rows_affected != expected as u64 {
        return Err(PayrollError::Inconsistent(format!("expected to tag {expected} {kind} records, tagged {rows_affected}")))
    }

    Ok(())
}
