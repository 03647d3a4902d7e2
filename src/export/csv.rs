//! CSV exchange format for transaction records
//!
//! One row per record with the columns
//! `id,date,amount,kind,category,paymentMethod,notes,tags,creator,createdAt,updatedAt,deleted`.
//! Amounts are two-decimal magnitudes, timestamps are RFC 3339 and tags are
//! joined with [`TAG_DELIMITER`]. An empty `notes` cell means no notes and an
//! empty `tags` cell means no tags, so empty tag strings cannot be exchanged.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{parse_date, Money, TransactionRecord};

/// Separator between tags inside the `tags` column
pub const TAG_DELIMITER: char = '|';

/// Column order of the exchange format
pub const COLUMNS: [&str; 12] = [
    "id",
    "date",
    "amount",
    "kind",
    "category",
    "paymentMethod",
    "notes",
    "tags",
    "creator",
    "createdAt",
    "updatedAt",
    "deleted",
];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    id: String,
    date: String,
    amount: String,
    kind: String,
    category: String,
    payment_method: String,
    notes: String,
    tags: String,
    creator: String,
    created_at: String,
    updated_at: String,
    deleted: String,
}

impl CsvRow {
    fn from_record(record: &TransactionRecord) -> PocketbookResult<Self> {
        if let Some(tag) = record.tags.iter().find(|t| t.contains(TAG_DELIMITER)) {
            return Err(PocketbookError::Export(format!(
                "Tag '{}' on record {} contains the tag delimiter '{}'",
                tag, record.id, TAG_DELIMITER
            )));
        }
        if record.has_tag("") {
            return Err(PocketbookError::Export(format!(
                "Record {} has an empty tag",
                record.id
            )));
        }

        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();

        Ok(Self {
            id: record.id.to_string(),
            date: record.date.format("%Y-%m-%d").to_string(),
            amount: record.amount.to_decimal_string(),
            kind: record.kind.to_string(),
            category: record.category.clone(),
            payment_method: record.payment_method.to_string(),
            notes: record.notes.clone().unwrap_or_default(),
            tags: tags.join(&TAG_DELIMITER.to_string()),
            creator: record.creator.to_string(),
            created_at: record.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            updated_at: record.updated_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            deleted: record.deleted.to_string(),
        })
    }

    fn into_record(self, row: usize) -> PocketbookResult<TransactionRecord> {
        let bad = |field: &str, value: &str| {
            PocketbookError::import(row, format!("invalid {} '{}'", field, value))
        };

        if self.id.trim().is_empty() {
            return Err(PocketbookError::import(row, "missing id"));
        }

        let date = parse_date(&self.date).map_err(|_| bad("date", &self.date))?;

        let amount = Money::parse(&self.amount)
            .map_err(|e| PocketbookError::import(row, e.to_string()))?;
        if amount.is_negative() {
            return Err(PocketbookError::import(
                row,
                format!("amount must not be negative, got {}", self.amount),
            ));
        }

        let kind = self
            .kind
            .parse()
            .map_err(|e: String| PocketbookError::import(row, e))?;
        let payment_method = self
            .payment_method
            .parse()
            .map_err(|e: String| PocketbookError::import(row, e))?;

        let tags: BTreeSet<String> = if self.tags.is_empty() {
            BTreeSet::new()
        } else {
            self.tags.split(TAG_DELIMITER).map(str::to_string).collect()
        };
        if tags.contains("") {
            return Err(bad("tags", &self.tags));
        }

        let created_at = parse_timestamp(&self.created_at).ok_or_else(|| bad("createdAt", &self.created_at))?;
        let updated_at = parse_timestamp(&self.updated_at).ok_or_else(|| bad("updatedAt", &self.updated_at))?;

        let deleted = match self.deleted.trim().to_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" | "" => false,
            _ => return Err(bad("deleted", &self.deleted)),
        };

        Ok(TransactionRecord {
            id: self.id.into(),
            date,
            amount,
            kind,
            category: self.category,
            payment_method,
            notes: if self.notes.is_empty() {
                None
            } else {
                Some(self.notes)
            },
            tags,
            creator: self.creator.into(),
            created_at,
            updated_at,
            deleted,
        })
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Write records in the exchange format, header first
pub fn write_records<W: Write>(records: &[TransactionRecord], writer: W) -> PocketbookResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv.write_record(COLUMNS)?;
    }
    for record in records {
        csv.serialize(CsvRow::from_record(record)?)?;
    }
    csv.flush()?;
    Ok(())
}

/// Read records from the exchange format
///
/// The first malformed row aborts the read with an error naming its row.
pub fn read_records<R: Read>(reader: R) -> PocketbookResult<Vec<TransactionRecord>> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let headers = csv.headers()?.clone();
    if headers.iter().ne(COLUMNS.iter().copied()) {
        return Err(PocketbookError::import(
            0,
            format!(
                "unexpected header '{}', expected '{}'",
                headers.iter().collect::<Vec<_>>().join(","),
                COLUMNS.join(",")
            ),
        ));
    }

    let mut records = Vec::new();
    for (index, row) in csv.deserialize::<CsvRow>().enumerate() {
        let row_number = index + 1;
        let row = row.map_err(|e| PocketbookError::import(row_number, e.to_string()))?;
        records.push(row.into_record(row_number)?);
    }

    Ok(records)
}

/// Load records from a CSV file on disk
pub fn load_records(path: &Path) -> PocketbookResult<Vec<TransactionRecord>> {
    if !path.exists() {
        warn!(path = %path.display(), "transaction file does not exist");
        return Err(PocketbookError::file_not_found(path.display().to_string()));
    }

    let file = File::open(path)
        .map_err(|e| PocketbookError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let records = read_records(BufReader::new(file))?;
    info!(path = %path.display(), count = records.len(), "loaded transactions");
    Ok(records)
}

/// Save records to a CSV file, creating parent directories
pub fn save_records(path: &Path, records: &[TransactionRecord]) -> PocketbookResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)
        .map_err(|e| PocketbookError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
    write_records(records, BufWriter::new(file))?;
    info!(path = %path.display(), count = records.len(), "saved transactions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMethod, TransactionKind};
    use chrono::{NaiveDate, TimeZone};
    use tempfile::TempDir;

    const HEADER: &str =
        "id,date,amount,kind,category,paymentMethod,notes,tags,creator,createdAt,updatedAt,deleted";

    fn sample() -> TransactionRecord {
        TransactionRecord::new(
            "r-1",
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            Money::from_cents(1250),
            TransactionKind::Expense,
            "Food, Groceries",
            PaymentMethod::Cash,
            "alex",
        )
        .with_notes("weekly \"big\" shop")
        .with_tags(["family", "market"])
        .created(Utc.with_ymd_and_hms(2025, 1, 5, 9, 30, 0).unwrap())
    }

    #[test]
    fn test_write_format() {
        let mut out = Vec::new();
        write_records(&[sample()], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], HEADER);
        assert_eq!(
            lines[1],
            "r-1,2025-01-05,12.50,expense,\"Food, Groceries\",cash,\"weekly \"\"big\"\" shop\",family|market,alex,2025-01-05T09:30:00Z,2025-01-05T09:30:00Z,false"
        );
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let mut out = Vec::new();
        write_records(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim_end(), HEADER);
    }

    #[test]
    fn test_read_back() {
        let mut out = Vec::new();
        write_records(&[sample()], &mut out).unwrap();
        let records = read_records(out.as_slice()).unwrap();
        assert_eq!(records, vec![sample()]);
    }

    #[test]
    fn test_read_optional_fields() {
        let data = format!(
            "{}\nx,2025-03-01,4,income,Salary,card,,,sam,2025-03-01T00:00:00+02:00,2025-03-01T00:00:00Z,true\n",
            HEADER
        );
        let records = read_records(data.as_bytes()).unwrap();
        let rec = &records[0];
        assert_eq!(rec.amount.cents(), 400);
        assert_eq!(rec.kind, TransactionKind::Income);
        assert!(rec.notes.is_none());
        assert!(rec.tags.is_empty());
        assert!(rec.deleted);
        assert_eq!(rec.created_at, Utc.with_ymd_and_hms(2025, 2, 28, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_malformed_rows() {
        let cases = [
            "a,2025-13-01,1.00,expense,Food,cash,,,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,-1.00,expense,Food,cash,,,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,1.00,transfer,Food,cash,,,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,1.00,expense,Food,cheque,,,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,1.00,expense,Food,cash,,,u,yesterday,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,1.00,expense,Food,cash,,,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,maybe",
            ",2025-01-01,1.00,expense,Food,cash,,,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,--5,expense,Food,cash,,,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,1.-5,expense,Food,cash,,,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,1.999,expense,Food,cash,,,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,92233720368547759,expense,Food,cash,,,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,1.00,expense,Food,cash,,family||trip,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
            "a,2025-01-01,1.00,expense,Food,cash,,|,u,2025-01-01T00:00:00Z,2025-01-01T00:00:00Z,false",
        ];

        for line in cases {
            let data = format!("{}\n{}\n", HEADER, line);
            let err = read_records(data.as_bytes()).unwrap_err();
            assert!(
                matches!(err, PocketbookError::Import { row: 1, .. }),
                "{} -> {}",
                line,
                err
            );
        }
    }

    #[test]
    fn test_rejects_wrong_header() {
        let err = read_records("id,date,amount\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PocketbookError::Import { row: 0, .. }));
    }

    #[test]
    fn test_tag_with_delimiter_cannot_be_exported() {
        let rec = sample().with_tags(["a|b"]);
        let err = write_records(&[rec], Vec::new()).unwrap_err();
        assert!(matches!(err, PocketbookError::Export(_)));
    }

    #[test]
    fn test_empty_tag_cannot_be_exported() {
        let rec = sample().with_tags([""]);
        let err = write_records(&[rec], Vec::new()).unwrap_err();
        assert!(matches!(err, PocketbookError::Export(_)));

        let rec = sample().with_tags(["family", ""]);
        assert!(write_records(&[rec], Vec::new()).is_err());
    }

    #[test]
    fn test_sub_second_timestamps_keep_creation_order() {
        let base = Utc.with_ymd_and_hms(2025, 1, 5, 9, 30, 0).unwrap();
        let first = sample().created(base + chrono::Duration::milliseconds(250));
        let mut second = sample().created(base + chrono::Duration::milliseconds(750));
        second.id = "r-2".into();

        let mut out = Vec::new();
        write_records(&[second.clone(), first.clone()], &mut out).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.contains("2025-01-05T09:30:00.250Z"));

        let records = read_records(out.as_slice()).unwrap();
        assert_eq!(records, vec![second, first]);
        assert!(records[1].created_at < records[0].created_at);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("transactions.csv");

        save_records(&path, &[sample()]).unwrap();
        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id.as_str(), "r-1");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_records(&temp_dir.path().join("nope.csv")).unwrap_err();
        assert!(err.is_not_found());
    }
}
