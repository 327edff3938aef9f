use crate::commands::Out;
use crate::model::BankAccount;
use crate::{scan_line as slip, Config, Result};
use anyhow::Context;

/// Prints the scan line of `reference`, paid into `account` when given, otherwise into the
/// configured BVR account.
pub fn scan_line(config: &Config, reference: &str, account: Option<&str>) -> Result<Out<String>> {
    let account = match account {
        Some(number) => BankAccount::bvr(number),
        None => config.bvr_account()?.clone(),
    };
    let line = slip::format_scan_line(&account, reference)
        .with_context(|| format!("Unable to build the scan line of account {}", account.number()))?;
    Ok(Out::new(line.clone(), line))
}

/// Prints `reference` grouped by five digits.
pub fn format_ref(reference: &str) -> Result<Out<String>> {
    let formatted = slip::format_reference(reference)?;
    Ok(Out::new(formatted.clone(), formatted))
}
