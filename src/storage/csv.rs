use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::{ClubRecord, StoreError, CSV_COLUMNS};

/// Flat-file sink: one header row, then one line per club per district per
/// month. String fields are double-quoted, numeric fields bare.
pub struct CsvStorage {
    writer: BufWriter<File>,
}

impl CsvStorage {
    /// Creates (truncates) the output file and writes the canonical header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", header_line())?;
        Ok(Self { writer })
    }

    pub fn append(&mut self, record: &ClubRecord) -> Result<(), StoreError> {
        writeln!(self.writer, "{}", format_record(record))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn header_line() -> String {
    CSV_COLUMNS
        .iter()
        .map(|column| quote(column))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serializes one record in canonical column order.
pub fn format_record(record: &ClubRecord) -> String {
    let mut fields: Vec<String> = Vec::with_capacity(CSV_COLUMNS.len());
    fields.push(quote(&record.district));
    fields.push(quote(&record.division));
    fields.push(quote(&record.area));
    fields.push(record.club_number.to_string());
    fields.push(quote(&record.club_name));
    fields.push(quote(&record.status.to_string()));
    fields.push(record.membership_base.to_string());
    fields.push(record.active_members.to_string());
    fields.push(record.goals_met.to_string());
    for goal in record.goals {
        fields.push(goal.to_string());
    }
    fields.push(record.new_members.to_string());
    fields.push(record.additional_new_members.to_string());
    fields.push(record.officers_trained_round1.to_string());
    fields.push(record.officers_trained_round2.to_string());
    fields.push(record.dues_on_time.to_string());
    fields.push(record.officer_list_on_time.to_string());
    fields.push(quote(&record.distinguished_status));
    fields.push(quote(&record.program_year));
    fields.push(quote(&record.month));
    fields.join(",")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClubStatus;

    fn sample_record() -> ClubRecord {
        ClubRecord {
            district: "57".to_string(),
            division: "A".to_string(),
            area: "1".to_string(),
            club_number: 1234,
            club_name: "Test Club".to_string(),
            status: ClubStatus::Active,
            membership_base: 20,
            active_members: 10,
            goals_met: 3,
            goals: [0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
            new_members: 2,
            additional_new_members: 0,
            officers_trained_round1: 7,
            officers_trained_round2: 5,
            dues_on_time: 1,
            officer_list_on_time: 2,
            distinguished_status: "D".to_string(),
            program_year: "2022-2023".to_string(),
            month: "7".to_string(),
        }
    }

    /// Minimal quote-aware splitter for asserting on emitted lines.
    fn split_line(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '"' if in_quotes && chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
                _ => field.push(ch),
            }
        }
        fields.push(field);
        fields
    }

    #[test]
    fn header_matches_canonical_columns() {
        let header = split_line(&header_line());
        assert_eq!(header.len(), CSV_COLUMNS.len());
        assert_eq!(header[0], "District");
        assert_eq!(header[29], "Month");
    }

    #[test]
    fn strings_quoted_numbers_bare() {
        let line = format_record(&sample_record());
        assert!(line.starts_with(r#""57","A","1",1234,"Test Club","Active",20,10,3,"#));
        assert!(line.ends_with(r#","D","2022-2023","7""#));
    }

    #[test]
    fn serialized_record_round_trips_by_position() {
        let record = sample_record();
        let fields = split_line(&format_record(&record));
        assert_eq!(fields.len(), 30);
        assert_eq!(fields[0], record.district);
        assert_eq!(fields[1], record.division);
        assert_eq!(fields[2], record.area);
        assert_eq!(fields[3].parse::<u32>().unwrap(), record.club_number);
        assert_eq!(fields[4], record.club_name);
        assert_eq!(fields[5], record.status.to_string());
        assert_eq!(fields[6].parse::<u32>().unwrap(), record.membership_base);
        assert_eq!(fields[7].parse::<u32>().unwrap(), record.active_members);
        assert_eq!(fields[8].parse::<u32>().unwrap(), record.goals_met);
        for (i, goal) in record.goals.iter().enumerate() {
            assert_eq!(fields[9 + i].parse::<u32>().unwrap(), *goal);
        }
        assert_eq!(fields[21].parse::<u32>().unwrap(), record.new_members);
        assert_eq!(fields[27], record.distinguished_status);
        assert_eq!(fields[28], record.program_year);
        assert_eq!(fields[29], record.month);
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        let mut record = sample_record();
        record.club_name = r#"The "Best" Club"#.to_string();
        let fields = split_line(&format_record(&record));
        assert_eq!(fields[4], r#"The "Best" Club"#);
    }

    #[test]
    fn suspended_status_serializes_with_its_date() {
        let mut record = sample_record();
        record.status = ClubStatus::Suspended("03/15/2022".to_string());
        let fields = split_line(&format_record(&record));
        assert_eq!(fields[5], "Suspended 03/15/2022");
    }

    #[test]
    fn file_sink_writes_header_and_rows() {
        let path = std::env::temp_dir().join("dcp_harvest_csv_test.csv");
        {
            let mut storage = CsvStorage::create(&path).unwrap();
            storage.append(&sample_record()).unwrap();
            storage.flush().unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], header_line());
        assert_eq!(lines[1], format_record(&sample_record()));
    }
}
