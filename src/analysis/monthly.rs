//! Wind and solar viability for a single month

use super::{percentage, round2};
use crate::config::{AnalysisConfig, MissingValuePolicy};
use crate::models::{
    DailyRecord, Measurement, MonthKey, MonthlyAnalysis, MonthlyMetrics, SolarMetrics,
    WindMetrics,
};
use crate::{Result, ViabilityError};

/// Analyze the days of one month.
///
/// A day is wind-viable when its wind speed reaches `wind_viable_ms`, and
/// solar-viable when it had no precipitation and humidity stayed strictly
/// below `solar_humidity_max`.
pub fn analyze_month(
    key: MonthKey,
    days: &[DailyRecord],
    config: &AnalysisConfig,
) -> Result<MonthlyAnalysis> {
    if days.is_empty() {
        return Err(ViabilityError::degenerate_bucket(key.to_string()));
    }

    let total_days = days.len();
    let mut wind_sum = 0.0;
    let mut wind_samples = 0usize;
    let mut wind_viable = 0usize;
    let mut solar_viable = 0usize;
    let mut precipitation_total = 0.0;

    for day in days {
        if let Some(speed) = read(day, Measurement::WindSpeed, config)? {
            wind_sum += speed;
            wind_samples += 1;
            if speed >= config.wind_viable_ms {
                wind_viable += 1;
            }
        }

        let precipitation = read(day, Measurement::Precipitation, config)?;
        let humidity = read(day, Measurement::RelativeHumidity, config)?;
        if let (Some(precip), Some(humidity)) = (precipitation, humidity) {
            if precip == 0.0 && humidity < config.solar_humidity_max {
                solar_viable += 1;
            }
        }
        precipitation_total += precipitation.unwrap_or(0.0);
    }

    let average_speed = if wind_samples == 0 {
        0.0
    } else {
        round2(wind_sum / wind_samples as f64)
    };

    Ok(MonthlyAnalysis {
        month: key.month_name_in(config.month_names).to_string(),
        year: key.year(),
        total_days,
        metrics: MonthlyMetrics {
            wind: WindMetrics {
                average_speed,
                viable_days: wind_viable,
                viability_pct: percentage(wind_viable, total_days),
            },
            solar: SolarMetrics {
                total_precipitation: round2(precipitation_total),
                viable_days: solar_viable,
                viability_pct: percentage(solar_viable, total_days),
            },
        },
    })
}

fn read(day: &DailyRecord, measurement: Measurement, config: &AnalysisConfig) -> Result<Option<f64>> {
    match (day.get(measurement), config.missing_values) {
        (None, MissingValuePolicy::Reject) => Err(ViabilityError::missing_measurement(
            day.date,
            measurement.to_string(),
        )),
        (value, _) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthNames;
    use chrono::{Duration, NaiveDate};
    use rstest::rstest;

    fn key() -> MonthKey {
        MonthKey::new(2024, 4).unwrap()
    }

    fn day(offset: i64, wind: f64, precip: f64, humidity: f64) -> DailyRecord {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap() + Duration::days(offset);
        DailyRecord::new(date)
            .with(Measurement::WindSpeed, wind)
            .with(Measurement::Precipitation, precip)
            .with(Measurement::RelativeHumidity, humidity)
    }

    #[test]
    fn test_constant_threshold_wind_is_fully_viable() {
        let days: Vec<_> = (0..30).map(|i| day(i, 5.0, 0.0, 60.0)).collect();
        let analysis = analyze_month(key(), &days, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.month, "April");
        assert_eq!(analysis.year, 2024);
        assert_eq!(analysis.total_days, 30);
        assert_eq!(analysis.metrics.wind.average_speed, 5.0);
        assert_eq!(analysis.metrics.wind.viable_days, 30);
        assert_eq!(analysis.metrics.wind.viability_pct, 100.0);
    }

    #[test]
    fn test_rainy_month_has_no_solar_days() {
        let days: Vec<_> = (0..30).map(|i| day(i, 2.0, 0.4, 20.0)).collect();
        let analysis = analyze_month(key(), &days, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.metrics.solar.viable_days, 0);
        assert_eq!(analysis.metrics.solar.viability_pct, 0.0);
        assert_eq!(analysis.metrics.solar.total_precipitation, 12.0);
    }

    #[rstest]
    #[case(4.99, 0)]
    #[case(5.0, 1)]
    #[case(5.01, 1)]
    fn test_wind_threshold_is_inclusive(#[case] speed: f64, #[case] expected: usize) {
        let analysis =
            analyze_month(key(), &[day(0, speed, 0.0, 50.0)], &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.metrics.wind.viable_days, expected);
    }

    #[rstest]
    #[case(89.99, 1)]
    #[case(90.0, 0)]
    #[case(95.0, 0)]
    fn test_humidity_threshold_is_strict(#[case] humidity: f64, #[case] expected: usize) {
        let analysis = analyze_month(
            key(),
            &[day(0, 1.0, 0.0, humidity)],
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert_eq!(analysis.metrics.solar.viable_days, expected);
    }

    #[test]
    fn test_any_precipitation_blocks_solar() {
        let analysis =
            analyze_month(key(), &[day(0, 1.0, 0.01, 10.0)], &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.metrics.solar.viable_days, 0);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        // 1 of 3 days viable -> 33.333..%
        let days = vec![day(0, 6.0, 0.0, 50.0), day(1, 1.0, 0.125, 50.0), day(2, 1.0, 0.0, 95.0)];
        let analysis = analyze_month(key(), &days, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.metrics.wind.viability_pct, 33.33);
        assert_eq!(analysis.metrics.wind.average_speed, 2.67);
        assert_eq!(analysis.metrics.solar.viability_pct, 33.33);
        assert_eq!(analysis.metrics.solar.total_precipitation, 0.13);
    }

    #[test]
    fn test_empty_bucket_is_degenerate() {
        let err = analyze_month(key(), &[], &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, ViabilityError::DegenerateBucket { ref month } if month == "2024-04"));
    }

    #[test]
    fn test_missing_values_are_skipped_by_default() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let days = vec![
            day(0, 8.0, 0.0, 40.0),
            // no wind, no humidity: neither source can count this day
            DailyRecord::new(date).with(Measurement::Precipitation, 0.0),
        ];

        let analysis = analyze_month(key(), &days, &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.total_days, 2);
        assert_eq!(analysis.metrics.wind.average_speed, 8.0);
        assert_eq!(analysis.metrics.wind.viable_days, 1);
        assert_eq!(analysis.metrics.wind.viability_pct, 50.0);
        assert_eq!(analysis.metrics.solar.viable_days, 1);
    }

    #[test]
    fn test_month_without_wind_samples_averages_zero() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let days = vec![DailyRecord::new(date).with(Measurement::Temperature, 18.0)];

        let analysis = analyze_month(key(), &days, &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.metrics.wind.average_speed, 0.0);
        assert_eq!(analysis.metrics.wind.viable_days, 0);
        assert_eq!(analysis.metrics.solar.total_precipitation, 0.0);
    }

    #[test]
    fn test_missing_values_rejected_in_strict_mode() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();
        let days = vec![
            day(0, 8.0, 0.0, 40.0),
            DailyRecord::new(date)
                .with(Measurement::WindSpeed, 3.0)
                .with(Measurement::RelativeHumidity, 70.0),
        ];

        let err = analyze_month(key(), &days, &AnalysisConfig::default().strict()).unwrap_err();
        match err {
            ViabilityError::MissingMeasurement { date: d, measurement } => {
                assert_eq!(d, date);
                assert_eq!(measurement, "precipitation");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_spanish_month_names() {
        let config = AnalysisConfig {
            month_names: MonthNames::Spanish,
            ..AnalysisConfig::default()
        };
        let analysis = analyze_month(key(), &[day(0, 5.0, 0.0, 60.0)], &config).unwrap();
        assert_eq!(analysis.month, "Abril");
        assert_eq!(analysis.year, 2024);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = AnalysisConfig {
            wind_viable_ms: 3.0,
            solar_humidity_max: 50.0,
            ..AnalysisConfig::default()
        };
        let analysis = analyze_month(key(), &[day(0, 3.5, 0.0, 60.0)], &config).unwrap();
        assert_eq!(analysis.metrics.wind.viable_days, 1);
        assert_eq!(analysis.metrics.solar.viable_days, 0);
    }
}
