//! Prorated salary, overtime pay and take-home pay
//!
//! Every intermediate value is a [`Decimal`]; fractions are only dropped (truncated toward
//! zero) when a figure is turned into a monetary integer. Multiplications happen before the
//! divisions so that no precision is lost to repeating decimals such as `1 / 3`.

use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use tracing::debug;

use crate::consts::{OVERTIME_MULTIPLIER, WORKING_HOURS_PER_DAY};

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Compensation {
    pub(crate) prorated_salary: i64,
    pub(crate) overtime_pay: i64,
    pub(crate) total_take_home: i64,
}

/// The payslips of a whole period together with the company-wide total
#[derive(Debug)]
pub(crate) struct Settlement {
    pub(crate) payslips: Vec<employee_payslip::Model>,
    pub(crate) total_take_home: i64,
}

pub(crate) fn hourly_rate(base_salary: i64, working_days: i32) -> Result<Decimal, PayrollError> {
    let working_days = checked_working_days(working_days)?;

    Decimal::from(base_salary)
        .checked_div(working_days)
        .and_then(|daily| daily.checked_div(Decimal::from(WORKING_HOURS_PER_DAY)))
        .ok_or_else(|| overflow("hourly rate"))
}

pub(crate) fn compensate(tally: &PayslipTally, working_days: i32) -> Result<Compensation, PayrollError> {
    let working_days = checked_working_days(working_days)?;
    let base_salary = Decimal::from(tally.base_salary);

    let prorated_salary = Decimal::from(tally.attended_days)
        .checked_mul(base_salary)
        .and_then(|v| v.checked_div(working_days));
    let prorated_salary = truncate(prorated_salary, "prorated salary")?;

    // hours * (salary / days / 8) * 2
    let overtime_pay = Decimal::from(tally.overtime_hours)
        .checked_mul(base_salary)
        .and_then(|v| v.checked_mul(Decimal::from(OVERTIME_MULTIPLIER)))
        .and_then(|v| v.checked_div(working_days * Decimal::from(WORKING_HOURS_PER_DAY)));
    let overtime_pay = truncate(overtime_pay, "overtime pay")?;

    let total_take_home = prorated_salary
        .checked_add(overtime_pay)
        .and_then(|v| v.checked_add(tally.total_reimbursements))
        .ok_or_else(|| overflow("take-home pay"))?;

    Ok(Compensation {
        prorated_salary,
        overtime_pay,
        total_take_home,
    })
}

/// Turns every tally of the ledger into a payslip for the period described by `stamp`
pub(crate) fn settle(ledger: &PayslipLedger, working_days: i32, stamp: &Stamp) -> Result<Settlement, PayrollError> {
    let mut total_take_home = 0i64;
    let mut payslips = Vec::with_capacity(ledger.len());

    for tally in ledger.tallies() {
        let compensation = compensate(tally, working_days)?;
        let rate = hourly_rate(tally.base_salary, working_days)?;

        debug!(
            employee = %tally.employee_id,
            hourly_rate = %rate,
            total_take_home = compensation.total_take_home,
            "settled payslip"
        );

        total_take_home = total_take_home.checked_add(compensation.total_take_home)
            .ok_or_else(|| overflow("company take-home pay"))?;

        payslips.push(employee_payslip::Model {
            id: Uuid::new_v4(),
            created_at: stamp.at,
            updated_at: stamp.at,
            created_by: Some(stamp.admin_id),
            updated_by: Some(stamp.admin_id),
            employee_id: tally.employee_id,
            payroll_period_id: stamp.period_id,
            username: tally.username.clone(),
            base_salary: tally.base_salary,
            working_days,
            attended_days: tally.attended_days,
            prorated_salary: compensation.prorated_salary,
            overtime_hours: tally.overtime_hours,
            overtime_pay: compensation.overtime_pay,
            total_reimbursements: tally.total_reimbursements,
            total_take_home: compensation.total_take_home,
        });
    }

    Ok(Settlement { payslips, total_take_home })
}

fn checked_working_days(working_days: i32) -> Result<Decimal, PayrollError> {
    if working_days <= 0 {
        return Err(PayrollError::bad_input("payroll period contains no working days"))
    }

    Ok(Decimal::from(working_days))
}

fn truncate(value: Option<Decimal>, what: &str) -> Result<i64, PayrollError> {
    value
        .and_then(|v| v.trunc().to_i64())
        .ok_or_else(|| overflow(what))
}

fn overflow(what: &str) -> PayrollError {
    PayrollError::Inconsistent(format!("{what} is out of range"))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::payroll::tests::stamp;

    fn tally(base_salary: i64, attended_days: i32, overtime_hours: i32, total_reimbursements: i64) -> PayslipTally {
        PayslipTally {
            employee_id: Uuid::new_v4(),
            username: "Bob".to_string(),
            base_salary,
            attended_days,
            overtime_hours,
            total_reimbursements,
        }
    }

    #[test]
    fn test_full_attendance_with_overtime() {
        assert_eq!(hourly_rate(1_000_000, 20).unwrap(), dec!(6250));

        let compensation = compensate(&tally(1_000_000, 20, 4, 50_000), 20).unwrap();

        assert_eq!(compensation, Compensation {
            prorated_salary: 1_000_000,
            overtime_pay: 50_000,
            total_take_home: 1_100_000,
        });
    }

    #[test]
    fn test_partial_attendance() {
        let compensation = compensate(&tally(2_000_000, 15, 2, 100_000), 20).unwrap();

        assert_eq!(compensation, Compensation {
            prorated_salary: 1_500_000,
            overtime_pay: 50_000,
            total_take_home: 1_650_000,
        });
    }

    #[test]
    fn test_nothing_recorded_pays_nothing() {
        let compensation = compensate(&tally(5_000_000, 0, 0, 0), 21).unwrap();

        assert_eq!(compensation.total_take_home, 0);
    }

    #[test]
    fn test_fractions_are_truncated() {
        // 7 / 21 * 1_000_000 = 333_333.33..
        // 1 * 1_000_000 / 21 / 8 * 2 = 11_904.76..
        let compensation = compensate(&tally(1_000_000, 7, 1, 0), 21).unwrap();

        assert_eq!(compensation.prorated_salary, 333_333);
        assert_eq!(compensation.overtime_pay, 11_904);
        assert_eq!(compensation.total_take_home, 345_237);
    }

    #[test]
    fn test_exact_thirds_are_not_lost() {
        // A naive 1 / 3 * 3_000_000 would land on 999_999
        let compensation = compensate(&tally(3_000_000, 1, 0, 0), 3).unwrap();

        assert_eq!(compensation.prorated_salary, 1_000_000);
    }

    #[test]
    fn test_zero_working_days_is_rejected() {
        assert!(matches!(compensate(&tally(1_000_000, 0, 0, 0), 0), Err(PayrollError::BadInput(_))));
        assert!(matches!(hourly_rate(1_000_000, 0), Err(PayrollError::BadInput(_))));
    }

    #[test]
    fn test_take_home_is_sum_of_parts() {
        for (attended, hours, reimbursement) in [(0, 0, 0), (3, 1, 1), (19, 7, 12_345), (22, 66, 999_999)] {
            let compensation = compensate(&tally(7_654_321, attended, hours, reimbursement), 22).unwrap();

            assert_eq!(
                compensation.prorated_salary + compensation.overtime_pay + reimbursement,
                compensation.total_take_home
            );
        }
    }

    #[test]
    fn test_settle() {
        let roster = [
            crate::payroll::tests::employee("Alice", 1_000_000),
            crate::payroll::tests::employee("Bob", 2_000_000),
            crate::payroll::tests::employee("Carol", 3_000_000),
        ];
        let mut ledger = PayslipLedger::seed(&roster);

        {
            let alice = ledger.tally_mut(roster[0].id).unwrap();
            alice.attended_days = 20;
            alice.overtime_hours = 4;
            alice.total_reimbursements = 50_000;
        }
        {
            let bob = ledger.tally_mut(roster[1].id).unwrap();
            bob.attended_days = 15;
            bob.overtime_hours = 2;
            bob.total_reimbursements = 100_000;
        }

        let stamp = stamp();
        let settlement = settle(&ledger, 20, &stamp).unwrap();

        assert_eq!(settlement.payslips.len(), 3);
        assert_eq!(settlement.total_take_home, 1_100_000 + 1_650_000);
        assert_eq!(settlement.total_take_home, settlement.payslips.iter().map(|p| p.total_take_home).sum::<i64>());

        let carol = settlement.payslips.iter().find(|p| p.employee_id == roster[2].id).unwrap();
        assert_eq!(carol.total_take_home, 0);
        assert_eq!(carol.working_days, 20);
        assert_eq!(carol.payroll_period_id, stamp.period_id);
    }
}
