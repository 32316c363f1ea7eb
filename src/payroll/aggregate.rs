use super::*;

/// What a generation run writes onto every record it consumes
#[derive(Debug, Clone)]
pub(crate) struct Stamp {
    pub(crate) period_id: Uuid,
    pub(crate) admin_id: Uuid,
    pub(crate) at: DateTimeWithTimeZone,
}

/// Records consumed by a generation run, already stamped and waiting for the commit
#[derive(Debug, Default)]
pub(crate) struct Consumed {
    pub(crate) attendance: Vec<employee_attendance::Model>,
    pub(crate) overtime: Vec<employee_overtime::Model>,
    pub(crate) reimbursements: Vec<employee_reimbursement::Model>,
}

pub(crate) async fn aggregate_attendance<C: ConnectionTrait>(
    db: &C,
    period: &payroll_period::Model,
    ledger: &mut PayslipLedger,
    stamp: &Stamp,
) -> Result<Vec<employee_attendance::Model>, PayrollError> {
    let records = EmployeeAttendance::find()
        .filter(employee_attendance::Column::AttendedOn.between(period.start_on, period.end_on))
        .filter(employee_attendance::Column::PayrollPeriodId.is_null())
        .order_by_asc(employee_attendance::Column::AttendedOn)
        .all(db).await?;

    fold_attendance(ledger, records, stamp)
}

pub(crate) async fn aggregate_overtime<C: ConnectionTrait>(
    db: &C,
    period: &payroll_period::Model,
    ledger: &mut PayslipLedger,
    stamp: &Stamp,
) -> Result<Vec<employee_overtime::Model>, PayrollError> {
    let records = EmployeeOvertime::find()
        .filter(employee_overtime::Column::OvertimeOn.between(period.start_on, period.end_on))
        .filter(employee_overtime::Column::PayrollPeriodId.is_null())
        .order_by_asc(employee_overtime::Column::OvertimeOn)
        .all(db).await?;

    fold_overtime(ledger, records, stamp)
}

pub(crate) async fn aggregate_reimbursements<C: ConnectionTrait>(
    db: &C,
    period: &payroll_period::Model,
    ledger: &mut PayslipLedger,
    stamp: &Stamp,
) -> Result<Vec<employee_reimbursement::Model>, PayrollError> {
    let records = EmployeeReimbursement::find()
        .filter(employee_reimbursement::Column::ClaimedOn.between(period.start_on, period.end_on))
        .filter(employee_reimbursement::Column::Status.eq(ReimbursementStatus::Pending))
        .filter(employee_reimbursement::Column::PayrollPeriodId.is_null())
        .order_by_asc(employee_reimbursement::Column::ClaimedOn)
        .all(db).await?;

    fold_reimbursements(ledger, records, stamp)
}

fn fold_attendance(
    ledger: &mut PayslipLedger,
    records: Vec<employee_attendance::Model>,
    stamp: &Stamp,
) -> Result<Vec<employee_attendance::Model>, PayrollError> {
    records.into_iter()
        .map(|record| -> Result<employee_attendance::Model, PayrollError> {
            ledger.tally_mut(record.employee_id)?.attended_days += 1;

            Ok(employee_attendance::Model {
                payroll_period_id: Some(stamp.period_id),
                updated_by: Some(stamp.admin_id),
                updated_at: stamp.at,
                ..record
            })
        })
        .collect()
}

fn fold_overtime(
    ledger: &mut PayslipLedger,
    records: Vec<employee_overtime::Model>,
    stamp: &Stamp,
) -> Result<Vec<employee_overtime::Model>, PayrollError> {
    records.into_iter()
        .map(|record| -> Result<employee_overtime::Model, PayrollError> {
            ledger.tally_mut(record.employee_id)?.overtime_hours += i32::from(record.hours);

            Ok(employee_overtime::Model {
                payroll_period_id: Some(stamp.period_id),
                updated_by: Some(stamp.admin_id),
                updated_at: stamp.at,
                ..record
            })
        })
        .collect()
}

fn fold_reimbursements(
    ledger: &mut PayslipLedger,
    records: Vec<employee_reimbursement::Model>,
    stamp: &Stamp,
) -> Result<Vec<employee_reimbursement::Model>, PayrollError> {
    records.into_iter()
        .map(|record| -> Result<employee_reimbursement::Model, PayrollError> {
            let tally = ledger.tally_mut(record.employee_id)?;
            tally.total_reimbursements = tally.total_reimbursements.checked_add(record.amount)
                .ok_or_else(|| PayrollError::Inconsistent(format!("reimbursements of employee {} overflow", record.employee_id)))?;

            Ok(employee_reimbursement::Model {
                payroll_period_id: Some(stamp.period_id),
                updated_by: Some(stamp.admin_id),
                updated_at: stamp.at,
                status: ReimbursementStatus::Paid,
                ..record
            })
        })
        .collect()
}
