//! Bugzilla timestamp conversion.

use super::ConvertError;
use chrono::DateTime;

const BUGZILLA_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const GITHUB_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Converts `YYYY-MM-DD HH:MM:SS +HHMM` into `YYYY-MM-DDTHH:MM:SS+HH:MM`.
///
/// The offset is kept as written; the instant is not normalised to UTC.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidDate`] if the export format has drifted.
pub fn convert_date(value: &str) -> Result<String, ConvertError> {
    let parsed = DateTime::parse_from_str(value.trim(), BUGZILLA_FORMAT).map_err(|source| {
        ConvertError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })?;
    Ok(parsed.format(GITHUB_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_utc_timestamp() {
        assert_eq!(
            convert_date("2014-03-01 12:00:00 +0000").unwrap(),
            "2014-03-01T12:00:00+00:00"
        );
    }

    #[test]
    fn keeps_original_offset() {
        assert_eq!(
            convert_date("2009-11-20 08:15:42 +0530").unwrap(),
            "2009-11-20T08:15:42+05:30"
        );
        assert_eq!(
            convert_date("2009-11-20 08:15:42 -0800").unwrap(),
            "2009-11-20T08:15:42-08:00"
        );
    }

    #[test]
    fn rejects_drifted_format() {
        assert!(matches!(
            convert_date("2014-03-01T12:00:00Z"),
            Err(ConvertError::InvalidDate { .. })
        ));
        assert!(matches!(
            convert_date("yesterday"),
            Err(ConvertError::InvalidDate { .. })
        ));
    }
}
