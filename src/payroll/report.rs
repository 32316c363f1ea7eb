use super::*;

/// Payslip of the calling employee, along with the records it was computed from
#[instrument(skip(db, caller), fields(caller = %caller.id))]
pub async fn get_employee_payslip<C: ConnectionTrait>(db: &C, period_id: Uuid, caller: &Identity) -> Result<PayslipView, PayrollError> {
    let Some(period) = PayrollPeriod::find_by_id(period_id)
        .one(db).await?
    else {
        return Err(PayrollError::NotFound("payroll period"))
    };

    let Some(payslip) = EmployeePayslip::find()
        .filter(employee_payslip::Column::PayrollPeriodId.eq(period_id))
        .filter(employee_payslip::Column::EmployeeId.eq(caller.id))
        .one(db).await?
    else {
        return Err(PayrollError::NotFound("payslip"))
    };

    let attendance_dates = EmployeeAttendance::find()
        .filter(employee_attendance::Column::PayrollPeriodId.eq(period_id))
        .filter(employee_attendance::Column::EmployeeId.eq(caller.id))
        .order_by_asc(employee_attendance::Column::AttendedOn)
        .all(db).await?
        .into_iter()
        .map(|attendance| attendance.attended_on)
        .collect();

    let overtimes = EmployeeOvertime::find()
        .filter(employee_overtime::Column::PayrollPeriodId.eq(period_id))
        .filter(employee_overtime::Column::EmployeeId.eq(caller.id))
        .order_by_asc(employee_overtime::Column::OvertimeOn)
        .all(db).await?
        .into_iter()
        .map(|overtime| PayslipOvertime {
            date: overtime.overtime_on,
            hours: overtime.hours,
        })
        .collect();

    let reimbursements = EmployeeReimbursement::find()
        .filter(employee_reimbursement::Column::PayrollPeriodId.eq(period_id))
        .filter(employee_reimbursement::Column::EmployeeId.eq(caller.id))
        .order_by_asc(employee_reimbursement::Column::ClaimedOn)
        .all(db).await?
        .into_iter()
        .map(|reimbursement| PayslipReimbursement {
            id: reimbursement.id,
            description: reimbursement.description,
            amount: reimbursement.amount,
            status: reimbursement.status,
        })
        .collect();

    Ok(PayslipView {
        period: PeriodRange::from(&period),
        attendance_dates,
        overtimes,
        reimbursements,
        summary: payslip.into(),
    })
}

/// Company-wide payroll of a processed period
#[instrument(skip(db, caller), fields(caller = %caller.id))]
pub async fn get_payroll<C: ConnectionTrait>(db: &C, period_id: Uuid, caller: &Identity) -> Result<PayrollView, PayrollError> {
    if !caller.is_admin() {
        warn!("payroll report requested by a non-admin");
        return Err(PayrollError::Forbidden)
    }

    let Some(period) = PayrollPeriod::find_by_id(period_id)
        .one(db).await?
    else {
        return Err(PayrollError::NotFound("payroll period"))
    };

    let payslips = EmployeePayslip::find()
        .filter(employee_payslip::Column::PayrollPeriodId.eq(period_id))
        .order_by_asc(employee_payslip::Column::Username)
        .all(db).await?;

    if payslips.is_empty() {
        return Err(PayrollError::NotFound("payslips"))
    }

    let Some(detail) = PayrollDetail::find()
        .filter(payroll_detail::Column::PayrollPeriodId.eq(period_id))
        .one(db).await?
    else {
        return Err(PayrollError::NotFound("payroll detail"))
    };

    Ok(PayrollView {
        period: PeriodRange::from(&period),
        payslips: payslips.into_iter().map(PayslipSummary::from).collect(),
        total_take_home: detail.total_take_home,
    })
}
