use crate::args::MonthSpan;
use crate::commands::Out;
use crate::grouper::{month_sequence, MonthRange};
use crate::model::BillingGroup;
use crate::{utils, Config, Result};
use anyhow::Context;
use std::path::Path;
use tracing::debug;

/// Loads the billing group found in `group_file` and groups the months of `span` into slips.
pub async fn months(
    config: &Config,
    group_file: &Path,
    span: &MonthSpan,
) -> Result<Out<Vec<MonthRange>>> {
    let group: BillingGroup = utils::deserialize(group_file).await?;
    let months = month_sequence(span.first_month(), span.count());
    debug!(
        "Grouping {} months for group '{}' paying every {} months",
        months.len(),
        group.id,
        group.billing_frequency_months
    );
    let ranges = group
        .months_to_print(&months)
        .with_context(|| format!("Unable to group the months of group '{}'", group.id))?;

    let labels = config.month_labels()?;
    let lines: Vec<String> = ranges
        .iter()
        .map(|r| {
            if r.is_single_month() {
                labels.month_year(r.start)
            } else {
                format!("{} - {}", labels.month_year(r.start), labels.month_year(r.end))
            }
        })
        .collect();
    let message = if lines.is_empty() {
        String::from("Nothing to print, every month is paid")
    } else {
        lines.join("\n")
    };
    Ok(Out::new(message, ranges))
}
