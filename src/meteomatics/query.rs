//! Request builders for the Meteomatics timeseries and grid endpoints

use crate::config::MeteomaticsConfig;
use crate::models::Measurement;
use crate::{Result, ViabilityError};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Response formats the API can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Csv,
    Png,
    Webp,
    Geotiff,
    Netcdf,
}

impl ResponseFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Csv => "csv",
            ResponseFormat::Png => "png",
            ResponseFormat::Webp => "webp",
            ResponseFormat::Geotiff => "geotiff",
            ResponseFormat::Netcdf => "netcdf",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = ViabilityError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(ResponseFormat::Json),
            "csv" => Ok(ResponseFormat::Csv),
            "png" => Ok(ResponseFormat::Png),
            "webp" => Ok(ResponseFormat::Webp),
            "geotiff" => Ok(ResponseFormat::Geotiff),
            "netcdf" => Ok(ResponseFormat::Netcdf),
            other => Err(ViabilityError::validation(format!(
                "unsupported format: {other}"
            ))),
        }
    }
}

/// Point timeseries request
#[derive(Debug, Clone, PartialEq)]
pub struct TimeseriesQuery {
    pub lat: f64,
    pub lon: f64,
    /// ISO-8601 start
    pub start: String,
    /// ISO-8601 end
    pub end: String,
    /// ISO-8601 duration between samples (e.g. `PT1H`)
    pub step: String,
    /// Comma-separated parameter identifiers
    pub params: String,
    pub format: ResponseFormat,
    pub model: Option<String>,
}

impl TimeseriesQuery {
    /// Hourly temperature request in JSON
    #[must_use]
    pub fn new(lat: f64, lon: f64, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            start: start.into(),
            end: end.into(),
            step: "PT1H".to_string(),
            params: Measurement::Temperature.identifier().to_string(),
            format: ResponseFormat::Json,
            model: None,
        }
    }

    /// Request feeding the yearly analysis: every measurement, JSON,
    /// covering `days_back` days up to `now`
    pub fn annual(
        lat: f64,
        lon: f64,
        now: DateTime<Utc>,
        config: &MeteomaticsConfig,
    ) -> Result<Self> {
        let (start, end) = default_time_range(now, config.days_back)?;
        Ok(Self {
            step: config.annual_step.clone(),
            params: Measurement::all_identifiers(),
            model: config.model.clone(),
            ..Self::new(lat, lon, start, end)
        })
    }

    pub fn validate(&self) -> Result<()> {
        validate_latitude(self.lat)?;
        validate_longitude(self.lon)?;
        validate_iso(&self.start)?;
        validate_iso(&self.end)?;
        validate_segment("step", &self.step)?;
        validate_segment("params", &self.params)?;
        Ok(())
    }

    /// `/{start}--{end}:{step}/{params}/{lat},{lon}/{fmt}` plus optional model
    pub fn path(&self) -> Result<String> {
        self.validate()?;
        let path = format!(
            "/{}--{}:{}/{}/{},{}/{}",
            self.start, self.end, self.step, self.params, self.lat, self.lon, self.format
        );
        Ok(with_model(path, self.model.as_deref()))
    }
}

/// Raster grid request over a bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct GridQuery {
    pub bbox: BoundingBox,
    pub res_lat: f64,
    pub res_lon: f64,
    /// `now` or an ISO-8601 timestamp
    pub valid_time: String,
    pub params: String,
    pub format: ResponseFormat,
    pub model: Option<String>,
}

impl GridQuery {
    /// Current temperature grid as PNG
    #[must_use]
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            res_lat: 0.05,
            res_lon: 0.05,
            valid_time: "now".to_string(),
            params: Measurement::Temperature.identifier().to_string(),
            format: ResponseFormat::Png,
            model: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bbox.validate()?;
        if !(self.res_lat > 0.0 && self.res_lon > 0.0) {
            return Err(ViabilityError::validation(
                "grid resolution must be positive",
            ));
        }
        if self.valid_time != "now" {
            validate_iso(&self.valid_time)?;
        }
        validate_segment("params", &self.params)?;
        Ok(())
    }

    /// `/{valid_time}/{params}/{lat1},{lon1}_{lat2},{lon2}:{res_lat},{res_lon}/{fmt}`
    pub fn path(&self) -> Result<String> {
        self.validate()?;
        let path = format!(
            "/{}/{}/{}:{},{}/{}",
            self.valid_time, self.params, self.bbox, self.res_lat, self.res_lon, self.format
        );
        Ok(with_model(path, self.model.as_deref()))
    }
}

/// Box given by its north-west (`lat1`, `lon1`) and south-east (`lat2`, `lon2`) corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

impl BoundingBox {
    /// Square box of `half_span` degrees around a point
    #[must_use]
    pub fn around(lat: f64, lon: f64, half_span: f64) -> Self {
        Self {
            lat1: lat + half_span,
            lon1: lon - half_span,
            lat2: lat - half_span,
            lon2: lon + half_span,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_latitude(self.lat1)?;
        validate_latitude(self.lat2)?;
        validate_longitude(self.lon1)?;
        validate_longitude(self.lon2)?;
        Ok(())
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6},{:.6}_{:.6},{:.6}",
            self.lat1, self.lon1, self.lat2, self.lon2
        )
    }
}

/// `(start, end)` covering `days_back` days up to `now`, second precision.
/// Fails when `days_back` is zero or reaches past the representable range.
pub fn default_time_range(now: DateTime<Utc>, days_back: u32) -> Result<(String, String)> {
    if days_back == 0 {
        return Err(ViabilityError::validation(
            "time range must cover at least one day",
        ));
    }
    let start = Duration::try_days(i64::from(days_back))
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| {
            ViabilityError::validation(format!("{days_back} days back is out of range"))
        })?;
    Ok((to_iso(start), to_iso(now)))
}

fn to_iso(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn with_model(path: String, model: Option<&str>) -> String {
    match model {
        Some(model) if !model.is_empty() => {
            format!("{path}?model={}", urlencoding::encode(model))
        }
        _ => path,
    }
}

fn validate_latitude(lat: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ViabilityError::validation(format!(
            "latitude {lat} is outside [-90, 90]"
        )));
    }
    Ok(())
}

fn validate_longitude(lon: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ViabilityError::validation(format!(
            "longitude {lon} is outside [-180, 180]"
        )));
    }
    Ok(())
}

/// Accepts RFC 3339 (`Z` or offset), a naive date-time, or a plain date
fn validate_iso(value: &str) -> Result<()> {
    let valid = DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    if valid {
        Ok(())
    } else {
        Err(ViabilityError::validation(format!(
            "invalid date/time: {value}"
        )))
    }
}

fn validate_segment(name: &str, value: &str) -> Result<()> {
    if value.is_empty() || value.contains('/') || value.contains(char::is_whitespace) {
        return Err(ViabilityError::validation(format!(
            "{name} must be a non-empty path segment, got '{value}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn test_timeseries_path() {
        let query = TimeseriesQuery::new(19.4326, -99.1332, "2024-01-01T00:00:00Z", "2024-12-31T00:00:00Z");
        assert_eq!(
            query.path().unwrap(),
            "/2024-01-01T00:00:00Z--2024-12-31T00:00:00Z:PT1H/t_2m:C/19.4326,-99.1332/json"
        );
    }

    #[test]
    fn test_timeseries_path_with_model() {
        let mut query = TimeseriesQuery::new(10.0, 20.0, "2024-01-01", "2024-01-02");
        query.model = Some("ecmwf-era5".to_string());
        query.format = ResponseFormat::Csv;
        assert_eq!(
            query.path().unwrap(),
            "/2024-01-01--2024-01-02:PT1H/t_2m:C/10,20/csv?model=ecmwf-era5"
        );
    }

    #[test]
    fn test_annual_query() {
        let now = Utc.with_ymd_and_hms(2024, 10, 18, 12, 30, 45).unwrap();
        let query =
            TimeseriesQuery::annual(19.4, -99.1, now, &MeteomaticsConfig::default()).unwrap();

        assert_eq!(query.start, "2023-10-19T12:30:45Z");
        assert_eq!(query.end, "2024-10-18T12:30:45Z");
        assert_eq!(query.step, "P1D");
        assert_eq!(query.params, Measurement::all_identifiers());
        assert_eq!(query.format, ResponseFormat::Json);
        assert!(query.validate().is_ok());
    }

    #[rstest]
    #[case(91.0, 0.0)]
    #[case(-90.5, 0.0)]
    #[case(0.0, 180.1)]
    #[case(0.0, -181.0)]
    fn test_rejects_out_of_range_coordinates(#[case] lat: f64, #[case] lon: f64) {
        let query = TimeseriesQuery::new(lat, lon, "2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z");
        let err = query.path().unwrap_err();
        assert!(matches!(err, ViabilityError::Validation { .. }));
    }

    #[rstest]
    #[case("2024-01-01T00:00:00Z", true)]
    #[case("2024-01-01T00:00:00+02:00", true)]
    #[case("2024-01-01T00:00:00", true)]
    #[case("2024-01-01T00:00:00.123", true)]
    #[case("2024-01-01", true)]
    #[case("now", false)]
    #[case("01/02/2024", false)]
    #[case("", false)]
    fn test_iso_validation(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(validate_iso(value).is_ok(), valid);
    }

    #[test]
    fn test_response_format_parsing() {
        assert_eq!("geotiff".parse::<ResponseFormat>().unwrap(), ResponseFormat::Geotiff);
        let err = "gif".parse::<ResponseFormat>().unwrap_err();
        assert!(err.to_string().contains("unsupported format: gif"));
    }

    #[test]
    fn test_bounding_box_around_point() {
        let bbox = BoundingBox::around(19.4326, -99.1332, 0.25);
        assert_eq!(bbox.to_string(), "19.682600,-99.383200_19.182600,-98.883200");
    }

    #[test]
    fn test_grid_path() {
        let mut query = GridQuery::new(BoundingBox::around(10.0, 20.0, 0.5));
        query.res_lat = 0.02;
        query.res_lon = 0.02;
        assert_eq!(
            query.path().unwrap(),
            "/now/t_2m:C/10.500000,19.500000_9.500000,20.500000:0.02,0.02/png"
        );
    }

    #[test]
    fn test_grid_valid_time_must_be_iso() {
        let mut query = GridQuery::new(BoundingBox::around(10.0, 20.0, 0.5));
        query.valid_time = "tomorrow".to_string();
        assert!(query.path().is_err());

        query.valid_time = "2024-06-01T12:00:00Z".to_string();
        assert!(query.path().unwrap().starts_with("/2024-06-01T12:00:00Z/"));
    }

    #[test]
    fn test_grid_box_must_stay_on_the_globe() {
        let query = GridQuery::new(BoundingBox::around(89.9, 0.0, 0.25));
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_default_time_range_drops_subseconds() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
            + Duration::milliseconds(789);
        let (start, end) = default_time_range(now, 1).unwrap();
        assert_eq!(start, "2024-02-29T00:00:00Z");
        assert_eq!(end, "2024-03-01T00:00:00Z");
    }

    #[rstest]
    #[case(0)]
    #[case(u32::MAX)]
    fn test_default_time_range_rejects_bad_span(#[case] days_back: u32) {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let err = default_time_range(now, days_back).unwrap_err();
        assert!(matches!(err, ViabilityError::Validation { .. }));
    }

    #[test]
    fn test_annual_query_rejects_empty_range() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let config = MeteomaticsConfig {
            days_back: 0,
            ..MeteomaticsConfig::default()
        };
        assert!(TimeseriesQuery::annual(19.4, -99.1, now, &config).is_err());
    }
}
