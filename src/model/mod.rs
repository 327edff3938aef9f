//! Types that represent the billing data handed over by the ERP, such as `BillingGroup` and
//! `Contract`.
mod amount;
mod bank_account;
mod contract;
mod group;

pub use amount::{Amount, AmountError};
pub use bank_account::{company_bvr_account, AccountKind, BankAccount};
pub use contract::{Child, Contract, ContractState};
pub use group::{BillingGroup, PaymentTerm};
use serde::{Deserialize, Serialize};

/// The content of a billing groups input file.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BillingData {
    pub groups: Vec<BillingGroup>,
}
