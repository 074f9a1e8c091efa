use std::{fs, path::Path};

use anyhow::{Context, bail, ensure};
use rootnet_growth::params::DataRecord;

/// Input format of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum DataFormat {
    Json,
    Csv,
}

impl DataFormat {
    /// Guesses the format from the file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// Sample records used when no dataset file is given.
pub fn builtin_records() -> Vec<DataRecord> {
    [("A", 100.0, 20), ("B", 200.0, 30), ("C", 250.0, 25)]
        .into_iter()
        .map(|(name, length, n_segments)| DataRecord {
            name: name.to_owned(),
            length,
            n_segments,
        })
        .collect()
}

pub fn load_records(path: &Path, format: Option<DataFormat>) -> anyhow::Result<Vec<DataRecord>> {
    let format = format.unwrap_or_else(|| DataFormat::from_path(path));
    let records = match format {
        DataFormat::Json => crate::util::read_json_file("dataset", path)?,
        DataFormat::Csv => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;
            parse_csv(&text)
                .with_context(|| format!("Failed to parse dataset CSV file: {}", path.display()))?
        }
    };
    tracing::debug!(path = %path.display(), ?format, count = records.len(), "dataset loaded");
    Ok(records)
}

/// Parses `name,id,length,n_segments` rows after a header line.
///
/// Each record is named `"{name}-{id}"`.
pub fn parse_csv(text: &str) -> anyhow::Result<Vec<DataRecord>> {
    let mut records = vec![];
    for (line_no, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
        let [name, id, length, n_segments, ..] = fields[..] else {
            bail!(
                "line {}: expected at least 4 columns, found {}",
                line_no + 1,
                fields.len()
            );
        };
        let length = length
            .parse::<f64>()
            .with_context(|| format!("line {}: invalid length {length:?}", line_no + 1))?;
        let n_segments = n_segments
            .parse::<usize>()
            .with_context(|| format!("line {}: invalid segment count {n_segments:?}", line_no + 1))?;
        records.push(DataRecord {
            name: format!("{name}-{id}"),
            length,
            n_segments,
        });
    }
    Ok(records)
}

/// Rejects records no growth run could be built from.
pub fn validate_records(records: &[DataRecord]) -> anyhow::Result<()> {
    for record in records {
        ensure!(
            record.n_segments > 0,
            "record {}: at least one segment is required",
            record.name
        );
        ensure!(
            record.length.is_finite() && record.length > 0.0,
            "record {}: length must be positive, got {}",
            record.name,
            record.length
        );
    }
    Ok(())
}

/// Replaces the segment count of every record.
pub fn override_segments(records: &mut [DataRecord], n_segments: usize) -> anyhow::Result<()> {
    ensure!(n_segments > 0, "segment count override must be positive");
    for record in records {
        record.n_segments = n_segments;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_joins_name_and_id() {
        let text = "name,id,length,n_segments\nroot,1,100,20\n\nroot, 2 ,12.5,5\n";
        let records = parse_csv(text).unwrap();
        assert_eq!(
            records,
            vec![
                DataRecord {
                    name: "root-1".to_owned(),
                    length: 100.0,
                    n_segments: 20,
                },
                DataRecord {
                    name: "root-2".to_owned(),
                    length: 12.5,
                    n_segments: 5,
                },
            ]
        );
        assert_eq!(records[1].segment_length(), 2.5);
    }

    #[test]
    fn test_parse_csv_reports_bad_rows() {
        let err = parse_csv("h\na,1,100\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "unexpected error: {err}");

        let err = parse_csv("h\na,1,long,3\n").unwrap_err();
        assert!(err.to_string().contains("invalid length"), "unexpected error: {err}");
    }

    #[test]
    fn test_json_records_parse() {
        let records: Vec<DataRecord> =
            serde_json::from_str(r#"[{"name":"A","length":100.0,"n_segments":20}]"#).unwrap();
        assert_eq!(records, builtin_records()[..1]);
    }

    #[test]
    fn test_validate_records_rejects_empty_segments() {
        assert!(validate_records(&builtin_records()).is_ok());

        let records = parse_csv("h\nroot,1,100,0\n").unwrap();
        let err = validate_records(&records).unwrap_err();
        assert_eq!(
            err.to_string(),
            "record root-1: at least one segment is required"
        );

        let records = parse_csv("h\nroot,2,-5,3\n").unwrap();
        assert!(validate_records(&records).is_err());
    }

    #[test]
    fn test_format_detection_and_override() {
        assert_eq!(DataFormat::from_path(Path::new("data.CSV")), DataFormat::Csv);
        assert_eq!(DataFormat::from_path(Path::new("data.json")), DataFormat::Json);
        assert_eq!("csv".parse::<DataFormat>().unwrap(), DataFormat::Csv);

        let mut records = builtin_records();
        override_segments(&mut records, 4).unwrap();
        assert!(records.iter().all(|r| r.n_segments == 4));
        assert_eq!(records[0].segment_length(), 25.0);
        assert!(override_segments(&mut records, 0).is_err());
    }
}
