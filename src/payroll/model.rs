use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub start_on: NaiveDate,
    pub end_on: NaiveDate,
}

impl From<&payroll_period::Model> for PeriodRange {
    fn from(period: &payroll_period::Model) -> Self {
        Self {
            start_on: period.start_on,
            end_on: period.end_on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipSummary {
    pub employee_id: Uuid,
    pub username: String,
    pub base_salary: i64,
    pub working_days: i32,
    pub attended_days: i32,
    pub prorated_salary: i64,
    pub overtime_hours: i32,
    pub overtime_pay: i64,
    pub total_reimbursements: i64,
    pub total_take_home: i64,
}

impl From<employee_payslip::Model> for PayslipSummary {
    fn from(payslip: employee_payslip::Model) -> Self {
        Self {
            employee_id: payslip.employee_id,
            username: payslip.username,
            base_salary: payslip.base_salary,
            working_days: payslip.working_days,
            attended_days: payslip.attended_days,
            prorated_salary: payslip.prorated_salary,
            overtime_hours: payslip.overtime_hours,
            overtime_pay: payslip.overtime_pay,
            total_reimbursements: payslip.total_reimbursements,
            total_take_home: payslip.total_take_home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipOvertime {
    pub date: NaiveDate,
    pub hours: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipReimbursement {
    pub id: Uuid,
    pub description: String,
    pub amount: i64,
    pub status: ReimbursementStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipView {
    pub period: PeriodRange,
    pub attendance_dates: Vec<NaiveDate>,
    pub overtimes: Vec<PayslipOvertime>,
    pub reimbursements: Vec<PayslipReimbursement>,
    pub summary: PayslipSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollView {
    pub period: PeriodRange,
    pub payslips: Vec<PayslipSummary>,
    pub total_take_home: i64,
}
