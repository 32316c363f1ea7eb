use std::collections::BTreeMap;

use super::*;

/// Running totals for a single employee while a period is being generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PayslipTally {
    pub(crate) employee_id: Uuid,
    pub(crate) username: String,
    pub(crate) base_salary: i64,
    pub(crate) attended_days: i32,
    pub(crate) overtime_hours: i32,
    pub(crate) total_reimbursements: i64,
}

/// Per-employee accumulator threaded through every aggregation step of one generation run
#[derive(Debug, Default)]
pub(crate) struct PayslipLedger {
    tallies: BTreeMap<Uuid, PayslipTally>,
}

impl PayslipLedger {
    /// Every roster entry starts at zero, so employees without any record still get a payslip
    pub(crate) fn seed<'a>(roster: impl IntoIterator<Item = &'a user::Model>) -> Self {
        let tallies = roster.into_iter()
            .map(|employee| (employee.id, PayslipTally {
                employee_id: employee.id,
                username: employee.username.clone(),
                base_salary: employee.salary,
                attended_days: 0,
                overtime_hours: 0,
                total_reimbursements: 0,
            }))
            .collect();

        Self { tallies }
    }

    pub(crate) fn tally_mut(&mut self, employee_id: Uuid) -> Result<&mut PayslipTally, PayrollError> {
        self.tallies.get_mut(&employee_id)
            .ok_or_else(|| PayrollError::Inconsistent(format!("record references employee {employee_id} which is not on the roster")))
    }

    #[cfg(test)]
    pub(crate) fn get(&self, employee_id: &Uuid) -> Option<&PayslipTally> {
        self.tallies.get(employee_id)
    }

    pub(crate) fn tallies(&self) -> impl Iterator<Item = &PayslipTally> {
        self.tallies.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.tallies.len()
    }
}
