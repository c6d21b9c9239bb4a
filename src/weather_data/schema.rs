use crate::types::rows::REQUIRED_SOURCE_COLUMNS;
use crate::weather_data::error::FetchError;
use log::debug;
use polars::prelude::*;
use std::io::Cursor;

/// Names of all columns in `df`, in frame order.
pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.as_str().to_string())
        .collect()
}

/// Fails with [`FetchError::MissingColumns`] unless every name in `required` is present.
pub(crate) fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), FetchError> {
    let present = column_names(df);
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !present.iter().any(|p| p == *name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FetchError::MissingColumns { missing, present })
    }
}

/// Parses a delimited-text response body (header row first) and checks that
/// the five source columns are there.
///
/// Schema inference scans the whole body, so a column that only turns
/// fractional in its last row is still read as a float.
pub(crate) fn parse_days_csv(body: Vec<u8>) -> Result<DataFrame, FetchError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(body))
        .finish()
        .map_err(FetchError::CsvParse)?;

    require_columns(&df, &REQUIRED_SOURCE_COLUMNS)?;
    debug!("Parsed {} rows with columns {:?}", df.height(), column_names(&df));
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_body() {
        let body = "datetime,temp,tempmin,tempmax,precip\n\
                    2024-06-11,17.2,12.1,22.4,0\n\
                    2024-06-12,18.0,13.0,24.5,1.2\n";
        let df = parse_days_csv(body.as_bytes().to_vec()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(column_names(&df), REQUIRED_SOURCE_COLUMNS);
    }

    #[test]
    fn test_extra_columns_are_tolerated() {
        let body = "name,datetime,temp,tempmin,tempmax,precip\n\
                    \"San Francisco,CA\",2024-06-11,17.2,12.1,22.4,0\n";
        let df = parse_days_csv(body.as_bytes().to_vec()).unwrap();
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn test_missing_temp_column_is_named() {
        let body = "datetime,tempmin,tempmax,precip\n2024-06-11,12.1,22.4,0\n";
        let err = parse_days_csv(body.as_bytes().to_vec()).unwrap_err();
        match err {
            FetchError::MissingColumns { missing, present } => {
                assert_eq!(missing, vec!["temp".to_string()]);
                assert_eq!(present, vec!["datetime", "tempmin", "tempmax", "precip"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_error_message_lists_both_sides() {
        let body = "datetime,foo\n2024-06-11,1\n";
        let err = parse_days_csv(body.as_bytes().to_vec()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("\"temp\""), "{msg}");
        assert!(msg.contains("\"foo\""), "{msg}");
    }
}
