//! Groups the months to print into payment slip batches.
//!
//! A billing group paying every three months gets one slip per three months, a standing order
//! gets a single setup slip, and months that are already paid are never printed.

use crate::error::SlipError;
use crate::model::{Contract, PaymentTerm};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::{debug, trace};

/// An inclusive range of months covered by one payment slip. Both ends are first-of-month dates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: first_of_month(start),
            end: first_of_month(end),
        }
    }

    pub fn single(month: NaiveDate) -> Self {
        Self::new(month, month)
    }

    pub fn is_single_month(&self) -> bool {
        self.start == self.end
    }

    /// Iterates over the first day of every month in the range.
    pub fn months(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), |m| next_month(*m)).take_while(move |m| *m <= end)
    }
}

impl Display for MonthRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Moves `date` back to the first day of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub(crate) fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(1))
}

/// `count` consecutive months starting with the month of `from`.
pub fn month_sequence(from: NaiveDate, count: usize) -> Vec<NaiveDate> {
    std::iter::successors(Some(first_of_month(from)), |m| next_month(*m))
        .take(count)
        .collect()
}

/// Finds the first month that is not paid: the earliest open invoice of the contracts or, when
/// nothing is open, the earliest next invoice date.
///
/// # Errors
/// - `SlipError::NoOpenInvoice` if no contract has any of the two dates.
pub fn first_unpaid_month(contracts: &[Contract]) -> Result<NaiveDate, SlipError> {
    let open = contracts.iter().filter_map(|c| c.first_open_invoice).min();
    let next = || contracts.iter().filter_map(|c| c.next_invoice_date).min();
    open.or_else(next)
        .map(first_of_month)
        .ok_or(SlipError::NoOpenInvoice)
}

/// Groups the `candidate_months` into the ranges that get one payment slip each.
///
/// Months before `first_unpaid_month` are dropped. A standing order only ever gets one slip, for
/// the first unpaid month. Otherwise runs of `frequency` months are formed; the last run is shorter
/// when the candidates run out.
pub fn group_months(
    frequency: u32,
    payment_term: &PaymentTerm,
    candidate_months: &[NaiveDate],
    first_unpaid_month: NaiveDate,
) -> Vec<MonthRange> {
    let first_unpaid = first_of_month(first_unpaid_month);
    let valid: Vec<NaiveDate> = candidate_months
        .iter()
        .map(|m| first_of_month(*m))
        .filter(|m| *m >= first_unpaid)
        .collect();
    trace!(
        "{} of {} months are unpaid since {first_unpaid}",
        valid.len(),
        candidate_months.len()
    );

    if payment_term.is_standing_order() {
        debug!("Standing order '{payment_term}': printing a single setup slip");
        return valid.first().map(|m| MonthRange::single(*m)).into_iter().collect();
    }

    let run = frequency.max(1) as usize;
    valid
        .chunks(run)
        .filter_map(|chunk| match (chunk.first(), chunk.last()) {
            (Some(start), Some(end)) => Some(MonthRange::new(*start, *end)),
            _ => None,
        })
        .collect()
}
