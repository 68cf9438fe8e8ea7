//! CSV export of monthly results

use crate::Result;
use crate::models::MonthlyAnalysis;
use serde::Serialize;
use std::io::Write;

/// Flat CSV row for one month
#[derive(Debug, Serialize)]
struct MonthlyCsvRow<'a> {
    mes: &'a str,
    anio: i32,
    #[serde(rename = "totalDias")]
    total_dias: usize,
    #[serde(rename = "velocidadPromedio")]
    velocidad_promedio: f64,
    #[serde(rename = "diasViablesEolico")]
    dias_viables_eolico: usize,
    #[serde(rename = "porcentajeViabilidadEolico")]
    porcentaje_viabilidad_eolico: f64,
    #[serde(rename = "precipitacionTotal")]
    precipitacion_total: f64,
    #[serde(rename = "diasViablesSolar")]
    dias_viables_solar: usize,
    #[serde(rename = "porcentajeViabilidadSolar")]
    porcentaje_viabilidad_solar: f64,
}

impl<'a> From<&'a MonthlyAnalysis> for MonthlyCsvRow<'a> {
    fn from(month: &'a MonthlyAnalysis) -> Self {
        Self {
            mes: &month.month,
            anio: month.year,
            total_dias: month.total_days,
            velocidad_promedio: month.metrics.wind.average_speed,
            dias_viables_eolico: month.metrics.wind.viable_days,
            porcentaje_viabilidad_eolico: month.metrics.wind.viability_pct,
            precipitacion_total: month.metrics.solar.total_precipitation,
            dias_viables_solar: month.metrics.solar.viable_days,
            porcentaje_viabilidad_solar: month.metrics.solar.viability_pct,
        }
    }
}

/// Write one header row and one row per month
pub fn write_monthly_csv<W: Write>(writer: W, months: &[MonthlyAnalysis]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for month in months {
        csv_writer.serialize(MonthlyCsvRow::from(month))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Monthly results as CSV text
pub fn monthly_csv_string(months: &[MonthlyAnalysis]) -> Result<String> {
    let mut buffer = Vec::new();
    write_monthly_csv(&mut buffer, months)?;
    String::from_utf8(buffer).map_err(|e| crate::ViabilityError::export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthlyMetrics, SolarMetrics, WindMetrics};

    fn month(name: &str, year: i32) -> MonthlyAnalysis {
        MonthlyAnalysis {
            month: name.to_string(),
            year,
            total_days: 30,
            metrics: MonthlyMetrics {
                wind: WindMetrics {
                    average_speed: 4.56,
                    viable_days: 12,
                    viability_pct: 40.0,
                },
                solar: SolarMetrics {
                    total_precipitation: 20.25,
                    viable_days: 15,
                    viability_pct: 50.0,
                },
            },
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = monthly_csv_string(&[month("November", 2023), month("December", 2023)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "mes,anio,totalDias,velocidadPromedio,diasViablesEolico,porcentajeViabilidadEolico,precipitacionTotal,diasViablesSolar,porcentajeViabilidadSolar"
        );
        assert_eq!(lines[1], "November,2023,30,4.56,12,40.0,20.25,15,50.0");
        assert!(lines[2].starts_with("December,2023,"));
    }

    #[test]
    fn test_no_months_writes_nothing() {
        let csv = monthly_csv_string(&[]).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_write_to_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_monthly_csv(file.reopen().unwrap(), &[month("May", 2024)]).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert!(written.contains("May,2024,30"));
    }
}
