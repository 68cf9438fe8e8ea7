//! Monthly and annual viability results
//!
//! Field names on the wire are fixed by the presentation layer that consumes
//! them, hence the serde renames.

use serde::{Deserialize, Serialize};
use std::fmt;

const WIND_TEXT: &str = "wind is the more consistent option across the year";
const SOLAR_TEXT: &str = "solar is the more consistent option across the year";
const SIMILAR_TEXT: &str = "both options show similar potential";

/// Viability results for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAnalysis {
    /// Month name (e.g. "March")
    #[serde(rename = "mes")]
    pub month: String,
    #[serde(rename = "anio")]
    pub year: i32,
    /// Number of days in the bucket
    #[serde(rename = "totalDias")]
    pub total_days: usize,
    #[serde(rename = "analisis")]
    pub metrics: MonthlyMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetrics {
    #[serde(rename = "eolico")]
    pub wind: WindMetrics,
    pub solar: SolarMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindMetrics {
    /// Mean wind speed in m/s, 2 decimals
    #[serde(rename = "velocidadPromedio")]
    pub average_speed: f64,
    #[serde(rename = "diasViables")]
    pub viable_days: usize,
    /// Percentage of viable days, 2 decimals
    #[serde(rename = "porcentajeViabilidad")]
    pub viability_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarMetrics {
    /// Precipitation total in mm, 2 decimals
    #[serde(rename = "precipitacionTotal")]
    pub total_precipitation: f64,
    #[serde(rename = "diasViables")]
    pub viable_days: usize,
    /// Percentage of viable days, 2 decimals
    #[serde(rename = "porcentajeViabilidad")]
    pub viability_pct: f64,
}

/// Which energy source the year favours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Recommendation {
    Wind,
    Solar,
    Similar,
}

impl Recommendation {
    /// Pick a source when one beats the other by more than `ratio`
    #[must_use]
    pub fn select(wind_pct: f64, solar_pct: f64, ratio: f64) -> Self {
        if wind_pct > solar_pct * ratio {
            Recommendation::Wind
        } else if solar_pct > wind_pct * ratio {
            Recommendation::Solar
        } else {
            Recommendation::Similar
        }
    }

    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Recommendation::Wind => WIND_TEXT,
            Recommendation::Solar => SOLAR_TEXT,
            Recommendation::Similar => SIMILAR_TEXT,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl From<Recommendation> for String {
    fn from(value: Recommendation) -> Self {
        value.text().to_string()
    }
}

impl TryFrom<String> for Recommendation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            WIND_TEXT => Ok(Recommendation::Wind),
            SOLAR_TEXT => Ok(Recommendation::Solar),
            SIMILAR_TEXT => Ok(Recommendation::Similar),
            other => Err(format!("unknown recommendation: {other}")),
        }
    }
}

/// Yearly totals and recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualSummary {
    #[serde(rename = "resumen")]
    pub totals: AnnualTotals,
    #[serde(rename = "recomendacion")]
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualTotals {
    #[serde(rename = "eolico")]
    pub wind: AnnualViability,
    pub solar: AnnualViability,
    /// Days across all months
    #[serde(rename = "totalDias")]
    pub total_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualViability {
    #[serde(rename = "diasViables")]
    pub viable_days: usize,
    #[serde(rename = "porcentajeViabilidadAnual")]
    pub viability_pct: f64,
}

/// Output of a complete run: per-month results and the yearly summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysis {
    #[serde(rename = "analisisPorMes")]
    pub months: Vec<MonthlyAnalysis>,
    #[serde(rename = "resumenAnual")]
    pub annual: AnnualSummary,
}

impl FullAnalysis {
    /// Plain-text summary card followed by one line per month
    #[must_use]
    pub fn format_report(&self) -> String {
        let totals = &self.annual.totals;
        let mut out = String::new();

        out.push_str("Wind energy\n");
        out.push_str(&format!(
            "  {:.2}% viable days over the year ({} of {})\n",
            totals.wind.viability_pct, totals.wind.viable_days, totals.total_days
        ));
        out.push_str("Solar energy\n");
        out.push_str(&format!(
            "  {:.2}% viable days over the year ({} of {})\n",
            totals.solar.viability_pct, totals.solar.viable_days, totals.total_days
        ));
        out.push_str(&format!("Recommendation: {}\n", self.annual.recommendation));

        if !self.months.is_empty() {
            out.push('\n');
            for month in &self.months {
                out.push_str(&month.format_line());
                out.push('\n');
            }
        }
        out
    }
}

impl MonthlyAnalysis {
    /// One-line monthly summary
    #[must_use]
    pub fn format_line(&self) -> String {
        format!(
            "{:<9} {} ({:>2} days)  wind {:>5.2} m/s avg, {:>6.2}% viable  |  solar {:>7.2} mm, {:>6.2}% viable",
            self.month,
            self.year,
            self.total_days,
            self.metrics.wind.average_speed,
            self.metrics.wind.viability_pct,
            self.metrics.solar.total_precipitation,
            self.metrics.solar.viability_pct,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_month() -> MonthlyAnalysis {
        MonthlyAnalysis {
            month: "March".to_string(),
            year: 2024,
            total_days: 31,
            metrics: MonthlyMetrics {
                wind: WindMetrics {
                    average_speed: 5.25,
                    viable_days: 20,
                    viability_pct: 64.52,
                },
                solar: SolarMetrics {
                    total_precipitation: 12.4,
                    viable_days: 18,
                    viability_pct: 58.06,
                },
            },
        }
    }

    #[rstest]
    #[case(50.0, 40.0, Recommendation::Wind)]
    #[case(50.0, 48.0, Recommendation::Similar)]
    #[case(40.0, 50.0, Recommendation::Solar)]
    #[case(0.0, 0.0, Recommendation::Similar)]
    #[case(10.0, 0.0, Recommendation::Wind)]
    #[case(11.5, 10.0, Recommendation::Similar)]
    fn test_recommendation_selection(
        #[case] wind: f64,
        #[case] solar: f64,
        #[case] expected: Recommendation,
    ) {
        assert_eq!(Recommendation::select(wind, solar, 1.15), expected);
    }

    #[test]
    fn test_monthly_wire_format() {
        let value = serde_json::to_value(sample_month()).unwrap();
        assert_eq!(value["mes"], "March");
        assert_eq!(value["anio"], 2024);
        assert_eq!(value["totalDias"], 31);
        assert_eq!(value["analisis"]["eolico"]["velocidadPromedio"], 5.25);
        assert_eq!(value["analisis"]["eolico"]["diasViables"], 20);
        assert_eq!(value["analisis"]["solar"]["precipitacionTotal"], 12.4);
        assert_eq!(value["analisis"]["solar"]["porcentajeViabilidad"], 58.06);
    }

    #[test]
    fn test_recommendation_serializes_as_text() {
        let value = serde_json::to_value(Recommendation::Similar).unwrap();
        assert_eq!(value, "both options show similar potential");

        let parsed: Recommendation =
            serde_json::from_str("\"solar is the more consistent option across the year\"")
                .unwrap();
        assert_eq!(parsed, Recommendation::Solar);

        assert!(serde_json::from_str::<Recommendation>("\"maybe\"").is_err());
    }

    #[test]
    fn test_format_report() {
        let analysis = FullAnalysis {
            months: vec![sample_month()],
            annual: AnnualSummary {
                totals: AnnualTotals {
                    wind: AnnualViability {
                        viable_days: 20,
                        viability_pct: 64.52,
                    },
                    solar: AnnualViability {
                        viable_days: 18,
                        viability_pct: 58.06,
                    },
                    total_days: 31,
                },
                recommendation: Recommendation::Similar,
            },
        };

        let report = analysis.format_report();
        assert!(report.contains("64.52% viable days over the year (20 of 31)"));
        assert!(report.contains("Recommendation: both options show similar potential"));
        assert!(report.contains("March"));
        assert!(report.contains("2024"));
    }
}
