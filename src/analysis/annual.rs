//! Yearly aggregation of monthly results

use super::percentage;
use crate::config::AnalysisConfig;
use crate::models::{AnnualSummary, AnnualTotals, AnnualViability, MonthlyAnalysis, Recommendation};
use crate::{Result, ViabilityError};

/// Sum monthly results into yearly totals and pick a recommendation.
///
/// Summation does not depend on the order of `months`.
pub fn summarize_year(months: &[MonthlyAnalysis], config: &AnalysisConfig) -> Result<AnnualSummary> {
    let (wind_days, solar_days, total_days) =
        months
            .iter()
            .fold((0usize, 0usize, 0usize), |(wind, solar, total), month| {
                (
                    wind + month.metrics.wind.viable_days,
                    solar + month.metrics.solar.viable_days,
                    total + month.total_days,
                )
            });

    if total_days == 0 {
        return Err(ViabilityError::NoData);
    }

    let wind_pct = percentage(wind_days, total_days);
    let solar_pct = percentage(solar_days, total_days);

    Ok(AnnualSummary {
        totals: AnnualTotals {
            wind: AnnualViability {
                viable_days: wind_days,
                viability_pct: wind_pct,
            },
            solar: AnnualViability {
                viable_days: solar_days,
                viability_pct: solar_pct,
            },
            total_days,
        },
        recommendation: Recommendation::select(wind_pct, solar_pct, config.preference_ratio),
    })
}
