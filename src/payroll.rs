//! Payroll generation and the read side over its results
//!
//! A generation run for one period goes through the following steps, all inside a single
//! database transaction:
//!
//! 1. the period row is locked and checked to be unprocessed ([`validator`])
//! 2. every employee on the roster gets a zeroed tally in a [`PayslipLedger`]
//! 3. unassigned attendance, overtime and pending reimbursements of the period are folded
//!    into the ledger ([`aggregate`])
//! 4. each tally becomes a payslip ([`compensation`])
//! 5. payslips, the payroll detail, the consumed records and the processed marker are
//!    written ([`commit`])
//!
//! Dropping the transaction on any error rolls every write back, so a failed run can simply
//! be retried.

use sea_orm::{prelude::DateTimeWithTimeZone, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{auth::Identity, entity::{employee_attendance, employee_overtime, employee_payslip, employee_reimbursement, payroll_detail, payroll_period, prelude::*, sea_orm_active_enums::{ReimbursementStatus, RoleType}, user}, error::PayrollError, utils};

use aggregate::{Consumed, Stamp};
use compensation::Settlement;
use ledger::{PayslipLedger, PayslipTally};

pub use model::*;
pub use report::{get_employee_payslip, get_payroll};

mod aggregate;
mod commit;
mod compensation;
mod ledger;
mod model;
mod report;
mod validator;

/// Generates the payslips of every employee for the given period, exactly once
#[instrument(skip(db, caller), fields(caller = %caller.id))]
pub async fn generate_payroll<C: TransactionTrait>(db: &C, period_id: Uuid, caller: &Identity) -> Result<payroll_detail::Model, PayrollError> {
    if !caller.is_admin() {
        warn!("payroll generation requested by a non-admin");
        return Err(PayrollError::Forbidden)
    }

    let txn = db.begin().await?;

    let period = validator::claim_period(&txn, period_id).await?;

    let working_days = utils::count_working_days(period.start_on, period.end_on);
    if working_days == 0 {
        return Err(PayrollError::bad_input("payroll period contains no working days"))
    }

    info!(start_on = %period.start_on, end_on = %period.end_on, working_days, "claimed payroll period");

    let roster = User::find()
        .filter(user::Column::Role.eq(RoleType::Employee))
        .order_by_asc(user::Column::Id)
        .all(&txn).await?;

    let stamp = Stamp {
        period_id,
        admin_id: caller.id,
        at: utils::now(),
    };

    let mut ledger = PayslipLedger::seed(&roster);

    let consumed = Consumed {
        attendance: aggregate::aggregate_attendance(&txn, &period, &mut ledger, &stamp).await?,
        overtime: aggregate::aggregate_overtime(&txn, &period, &mut ledger, &stamp).await?,
        reimbursements: aggregate::aggregate_reimbursements(&txn, &period, &mut ledger, &stamp).await?,
    };

    info!(
        employees = ledger.len(),
        attendance = consumed.attendance.len(),
        overtime = consumed.overtime.len(),
        reimbursements = consumed.reimbursements.len(),
        "aggregated period records"
    );

    let settlement = compensation::settle(&ledger, working_days, &stamp)?;

    let detail = payroll_detail::Model {
        id: Uuid::new_v4(),
        created_at: stamp.at,
        updated_at: stamp.at,
        created_by: Some(caller.id),
        updated_by: Some(caller.id),
        payroll_period_id: period_id,
        total_take_home: settlement.total_take_home,
    };

    commit::commit(&txn, &settlement, &detail, &consumed, &stamp).await?;
    txn.commit().await?;

    info!(total_take_home = detail.total_take_home, "payroll generated");

    Ok(detail)
}
