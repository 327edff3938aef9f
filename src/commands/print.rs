use crate::args::MonthSpan;
use crate::commands::Out;
use crate::grouper::month_sequence;
use crate::model::BillingData;
use crate::slips::{prepare_batch, BatchReport};
use crate::{utils, Config, Result};
use std::path::Path;
use tracing::{info, warn};

const REPORT_JSON: &str = "slips.json";

/// Prepares the slips of every billing group in `groups_file`. Groups with bad data are listed in
/// the report's failures, they do not fail the command.
pub async fn print(
    config: &Config,
    groups_file: &Path,
    span: &MonthSpan,
    save: bool,
) -> Result<Out<BatchReport>> {
    let data: BillingData = utils::deserialize(groups_file).await?;
    let account = config.bvr_account()?;
    let months = month_sequence(span.first_month(), span.count());
    let labels = config.month_labels()?;

    info!(
        "Preparing slips of {} billing groups from {}",
        data.groups.len(),
        span.first_month()
    );
    let report = prepare_batch(&data.groups, account, &months, &*labels);
    if !report.failures.is_empty() {
        warn!("{} billing groups could not be prepared", report.failures.len());
    }

    if save {
        let path = config.output().join(REPORT_JSON);
        utils::serialize(&path, &report).await?;
        info!("Saved the slips to {}", path.display());
    }

    Ok(Out::new(
        format!(
            "Prepared {} slips for {} billing groups, {} groups failed",
            report.slip_count(),
            report.slips.len(),
            report.failures.len()
        ),
        report,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, BillingGroup, Child, Contract};
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn data() -> BillingData {
        BillingData {
            groups: vec![
                BillingGroup::new("standing", 1, "Permanent Order")
                    .with_reference("42")
                    .with_frequency_label("Monthly")
                    .with_contract(
                        Contract::new(Amount::new(Decimal::from(42)))
                            .with_next_invoice_date(date(2024, 3))
                            .with_child(Child::new("UG1230034", "Amina")),
                    ),
                BillingGroup::new("broken", 1, "BVR"),
            ],
        }
    }

    #[tokio::test]
    async fn test_print_and_save() {
        let env = TestEnv::new().await;
        let path = env.write_json("groups.json", &data()).await;
        let config = env.config();

        let out = print(&config, &path, &MonthSpan::new(date(2024, 1), 12), true)
            .await
            .unwrap();
        assert_eq!(
            out.message(),
            "Prepared 1 slips for 1 billing groups, 1 groups failed"
        );
        let report = out.structure().unwrap();
        let slips = &report.slips["standing"];
        assert_eq!(slips.len(), 1);
        assert_eq!(slips[0].range.start, date(2024, 3));
        assert_eq!(
            slips[0].communication,
            "ISR for standing order CHF 42<br/>Amina (UG1230034)<br/>"
        );
        assert_eq!(report.failures[0].group, "broken");

        let saved: BatchReport = utils::deserialize(&config.output().join(REPORT_JSON))
            .await
            .unwrap();
        assert_eq!(&saved, report);
    }

    #[tokio::test]
    async fn test_print_missing_file() {
        let env = TestEnv::new().await;
        let missing = env.config().root().join("missing.json");
        let result = print(&env.config(), &missing, &MonthSpan::new(date(2024, 1), 1), false).await;
        assert!(result.is_err());
    }
}
