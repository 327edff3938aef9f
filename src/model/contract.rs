use crate::model::{Amount, PaymentTerm};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The sponsored child of a sponsorship contract.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Child {
    /// The child's local reference, e.g. `UG1230034`.
    pub reference: String,
    /// The name printed on slips, usually the first name.
    pub name: String,
}

impl Child {
    pub fn new(reference: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractState {
    Draft,
    /// Waiting for a direct debit authorization.
    Mandate,
    Waiting,
    #[default]
    Active,
    Terminated,
    Cancelled,
}

serde_plain::derive_display_from_serialize!(ContractState);
serde_plain::derive_fromstr_from_deserialize!(ContractState);

/// A sponsorship or donation commitment. Contracts are maintained by the billing system, this crate
/// only reads them.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(default)]
    pub first_open_invoice: Option<NaiveDate>,
    #[serde(default)]
    pub next_invoice_date: Option<NaiveDate>,
    pub total_amount: Amount,
    #[serde(default)]
    pub child: Option<Child>,
    #[serde(default)]
    pub state: ContractState,
    #[serde(default)]
    pub payment_term: PaymentTerm,
    /// Months between two invoices of this contract, i.e. the recurring value of its payment
    /// term as exported by the ERP. `12` marks a yearly payer.
    #[serde(default = "default_frequency")]
    pub billing_frequency_months: u32,
}

fn default_frequency() -> u32 {
    1
}

impl Contract {
    pub fn new(total_amount: Amount) -> Self {
        Self {
            total_amount,
            billing_frequency_months: default_frequency(),
            ..Self::default()
        }
    }

    pub fn with_first_open_invoice(mut self, date: NaiveDate) -> Self {
        self.first_open_invoice = Some(date);
        self
    }

    pub fn with_next_invoice_date(mut self, date: NaiveDate) -> Self {
        self.next_invoice_date = Some(date);
        self
    }

    pub fn with_child(mut self, child: Child) -> Self {
        self.child = Some(child);
        self
    }

    /// The date from which this contract owes money: the first open invoice, or the next invoice
    /// date when nothing is open.
    pub fn due_from(&self) -> Option<NaiveDate> {
        self.first_open_invoice.or(self.next_invoice_date)
    }

    /// Whether the contract has something to pay in the month starting at `month`.
    pub fn is_due_in(&self, month: NaiveDate) -> bool {
        self.due_from().is_some_and(|date| date <= month)
    }
}
