use crate::error::SlipError;
use crate::grouper::{self, MonthRange};
use crate::model::{BankAccount, Contract};
use crate::scan_line;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Marker found in the (English) name of standing order payment terms.
const STANDING_ORDER_MARKER: &str = "Permanent";
const DIRECT_DEBIT_MARKERS: [&str; 2] = ["LSV", "Postfinance"];

/// The English name of a payment term, e.g. `Permanent Order`, `BVR` or `LSV`.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentTerm(String);

impl PaymentTerm {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// The payer's bank transfers the amount on its own, a single setup slip is enough.
    pub fn is_standing_order(&self) -> bool {
        self.0.contains(STANDING_ORDER_MARKER)
    }

    /// The amount is withdrawn from the payer's account.
    pub fn is_direct_debit(&self) -> bool {
        DIRECT_DEBIT_MARKERS.iter().any(|m| self.0.contains(m))
    }
}

impl Display for PaymentTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaymentTerm {
    fn from(value: &str) -> Self {
        PaymentTerm::new(value)
    }
}

/// A set of contracts whose invoices are paid together with the same BVR reference.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BillingGroup {
    /// Identifies the group in batch reports.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    pub billing_frequency_months: u32,
    pub payment_term: PaymentTerm,
    /// How the billing frequency reads on a slip, e.g. `Monthly` or `Quarterly`.
    #[serde(default)]
    pub frequency_label: String,
    #[serde(default)]
    pub contracts: Vec<Contract>,
}

impl BillingGroup {
    pub fn new(
        id: impl Into<String>,
        billing_frequency_months: u32,
        payment_term: impl Into<PaymentTerm>,
    ) -> Self {
        Self {
            id: id.into(),
            billing_frequency_months,
            payment_term: payment_term.into(),
            ..Self::default()
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_frequency_label(mut self, label: impl Into<String>) -> Self {
        self.frequency_label = label.into();
        self
    }

    pub fn with_contract(mut self, contract: Contract) -> Self {
        self.contracts.push(contract);
        self
    }

    /// The scan line of the group, `None` when the group has no BVR reference.
    pub fn scan_line(&self, account: &BankAccount) -> Result<Option<String>, SlipError> {
        self.reference
            .as_deref()
            .map(|r| scan_line::format_scan_line(account, r))
            .transpose()
    }

    /// The reference as printed for humans, `None` when the group has no BVR reference.
    pub fn formatted_reference(&self) -> Result<Option<String>, SlipError> {
        self.reference
            .as_deref()
            .map(scan_line::format_reference)
            .transpose()
    }

    /// The first month the group still owes.
    pub fn first_unpaid_month(&self) -> Result<NaiveDate, SlipError> {
        grouper::first_unpaid_month(&self.contracts)
    }

    /// Groups the `months` that should be printed into slip batches, leaving out what is paid.
    ///
    /// # Errors
    /// - `SlipError::NoOpenInvoice` if none of the contracts has an invoice date.
    pub fn months_to_print(&self, months: &[NaiveDate]) -> Result<Vec<MonthRange>, SlipError> {
        let first_unpaid = self.first_unpaid_month()?;
        Ok(grouper::group_months(
            self.billing_frequency_months,
            &self.payment_term,
            months,
            first_unpaid,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_term_kinds() {
        assert!(PaymentTerm::new("Permanent Order").is_standing_order());
        assert!(!PaymentTerm::new("BVR").is_standing_order());
        assert!(PaymentTerm::new("LSV").is_direct_debit());
        assert!(PaymentTerm::new("Postfinance Direct Debit").is_direct_debit());
        assert!(!PaymentTerm::new("Permanent Order").is_direct_debit());
    }

    #[test]
    fn test_group_without_reference_has_no_scan_line() {
        let group = BillingGroup::new("g1", 1, "BVR");
        let account = BankAccount::bvr("01-145-6");
        assert_eq!(group.scan_line(&account).unwrap(), None);
        assert_eq!(group.formatted_reference().unwrap(), None);
    }

    #[test]
    fn test_group_scan_line() {
        let group = BillingGroup::new("g1", 1, "BVR").with_reference("123");
        let account = BankAccount::bvr("01-145-6");
        assert_eq!(
            group.scan_line(&account).unwrap().unwrap(),
            "042>000000000000000000000000123+ 011450006>"
        );
    }

    #[test]
    fn test_group_from_json() {
        let json = r#"{
            "id": "1042",
            "reference": "00 00000 00001 04200 00000 01015",
            "billing_frequency_months": 3,
            "payment_term": "BVR",
            "frequency_label": "Quarterly",
            "contracts": [{
                "first_open_invoice": "2024-02-01",
                "next_invoice_date": "2024-05-01",
                "total_amount": 42,
                "child": {"reference": "UG1230034", "name": "Amina"}
            }]
        }"#;
        let group: BillingGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.billing_frequency_months, 3);
        assert_eq!(group.contracts.len(), 1);
        assert_eq!(
            group.first_unpaid_month().unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(
            group.formatted_reference().unwrap().unwrap(),
            "10 42000 00000 1015"
        );
    }

    #[test]
    fn test_months_to_print_without_invoice() {
        let group = BillingGroup::new("g1", 1, "BVR").with_contract(Contract::default());
        let months = vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()];
        assert_eq!(
            group.months_to_print(&months).unwrap_err(),
            SlipError::NoOpenInvoice
        );
    }
}
