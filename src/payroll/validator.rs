use super::*;

/// Loads the period for generation and locks its row until the surrounding transaction ends
///
/// A second run for the same period blocks here and then sees the processed marker
pub(crate) async fn claim_period<C: ConnectionTrait>(db: &C, period_id: Uuid) -> Result<payroll_period::Model, PayrollError> {
    let Some(period) = PayrollPeriod::find_by_id(period_id)
        .lock_exclusive()
        .one(db).await?
    else {
        return Err(PayrollError::NotFound("payroll period"))
    };

    if period.processed_at.is_some() {
        return Err(PayrollError::AlreadyProcessed)
    }

    Ok(period)
}
