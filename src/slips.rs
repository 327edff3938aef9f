//! Prepares the payment slips of billing groups for printing.
//!
//! Each billing group is handled on its own: bad data in one group is reported and the remaining
//! groups are still prepared.

use crate::communication::{attachment_phrase, build_text, MonthLabels};
use crate::error::SlipError;
use crate::grouper::MonthRange;
use crate::model::{BankAccount, BillingGroup};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Everything printed on one payment slip.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PaymentSlip {
    pub range: MonthRange,
    /// `None` for a group that has no BVR reference yet.
    pub scan_line: Option<String>,
    pub communication: String,
    /// What the donor receives with the sponsorship letter, taken from the group's first
    /// contract. Empty for a group without contracts.
    #[serde(default)]
    pub attachment: String,
}

/// A billing group whose slips could not be prepared.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupFailure {
    pub group: String,
    pub error: String,
}

/// The outcome of preparing the slips of many billing groups.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Slips by billing group id.
    pub slips: BTreeMap<String, Vec<PaymentSlip>>,
    pub failures: Vec<GroupFailure>,
}

impl BatchReport {
    pub fn slip_count(&self) -> usize {
        self.slips.values().map(Vec::len).sum()
    }
}

/// Prepares the slips of one billing group for the given `months`.
///
/// # Errors
/// - `SlipError::NoOpenInvoice` if the group has no invoice date at all.
/// - `SlipError::InvalidReference` or `SlipError::InvalidAccount` for a malformed reference or
///   account.
pub fn prepare_group(
    group: &BillingGroup,
    account: &BankAccount,
    months: &[NaiveDate],
    labels: &dyn MonthLabels,
) -> Result<Vec<PaymentSlip>, SlipError> {
    let scan_line = group.scan_line(account)?;
    let ranges = group.months_to_print(months)?;
    debug!("Group '{}': {} slips to print", group.id, ranges.len());
    let attachment = group
        .contracts
        .first()
        .map(attachment_phrase)
        .unwrap_or_default();
    Ok(ranges
        .into_iter()
        .map(|range| PaymentSlip {
            communication: build_text(
                &range,
                &group.contracts,
                group.billing_frequency_months,
                &group.payment_term,
                &group.frequency_label,
                labels,
            ),
            scan_line: scan_line.clone(),
            attachment: attachment.to_string(),
            range,
        })
        .collect())
}

/// Prepares the slips of every group, recording failed groups instead of stopping at them. A group
/// whose id was already prepared is recorded as failed and the first group's slips are kept.
pub fn prepare_batch(
    groups: &[BillingGroup],
    account: &BankAccount,
    months: &[NaiveDate],
    labels: &dyn MonthLabels,
) -> BatchReport {
    let mut report = BatchReport::default();
    for (ix, group) in groups.iter().enumerate() {
        let id = if group.id.is_empty() {
            format!("#{ix}")
        } else {
            group.id.clone()
        };
        let error = match report.slips.entry(id.clone()) {
            Entry::Occupied(_) => String::from("duplicate billing group id"),
            Entry::Vacant(entry) => match prepare_group(group, account, months, labels) {
                Ok(slips) => {
                    entry.insert(slips);
                    continue;
                }
                Err(e) => e.to_string(),
            },
        };
        warn!("Skipping billing group '{id}': {error}");
        report.failures.push(GroupFailure { group: id, error });
    }
    report
}
