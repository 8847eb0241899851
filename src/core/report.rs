use crate::domain::model::SubscriptionPlan;
use crate::utils::error::{EtlError, Result};
use std::path::Path;

pub const CSV_HEADERS: [&str; 8] = [
    "subscriptionName",
    "type",
    "periodLengthInMonths",
    "country",
    "countryCode",
    "trialPeriodInDays",
    "price",
    "currency",
];

/// 產生 CSV 內容；即使沒有任何方案也會輸出標題列
pub fn render_csv(plans: &[SubscriptionPlan]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for plan in plans {
        writer.serialize(plan)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// Writes the report to `path`, replacing any file left by a previous run.
///
/// Convenience wrapper for callers that write straight to disk. The pipeline renders with
/// [`render_csv`] and hands the bytes to its [`Storage`](crate::domain::ports::Storage).
pub fn write_csv(plans: &[SubscriptionPlan], path: impl AsRef<Path>) -> Result<()> {
    let data = render_csv(plans)?;
    std::fs::write(path, data)?;
    Ok(())
}
