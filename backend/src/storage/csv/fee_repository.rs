use anyhow::Result;
use async_trait::async_trait;
use csv::{Reader, Writer};
use shared::Fee;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::storage::traits::FeeStorage;

const FEES_FILE: &str = "fees.csv";
const FEES_HEADER: [&str; 6] = [
    "id",
    "amount",
    "due_date",
    "semester",
    "academic_year",
    "description",
];

/// CSV-based fee repository
#[derive(Clone)]
pub struct FeeRepository {
    connection: CsvConnection,
}

impl FeeRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all fees for a student from their CSV file
    fn read_fees(&self, student_id: &str) -> Result<Vec<Fee>> {
        let file_path = self
            .connection
            .ensure_file_exists(student_id, FEES_FILE, &FEES_HEADER)?;
        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut fees = Vec::new();
        for result in csv_reader.records() {
            let record = result?;

            fees.push(Fee {
                id: record.get(0).unwrap_or("").to_string(),
                amount: record.get(1).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                due_date: record.get(2).unwrap_or("").to_string(),
                semester: record.get(3).unwrap_or("").to_string(),
                academic_year: record.get(4).unwrap_or("").to_string(),
                description: record.get(5).unwrap_or("").to_string(),
            });
        }

        Ok(fees)
    }

    /// Write all fees for a student to their CSV file
    fn write_fees(&self, student_id: &str, fees: &[Fee]) -> Result<()> {
        let file_path = self
            .connection
            .ensure_file_exists(student_id, FEES_FILE, &FEES_HEADER)?;
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));

            csv_writer.write_record(FEES_HEADER)?;
            for fee in fees {
                csv_writer.write_record(&[
                    &fee.id,
                    &fee.amount.to_string(),
                    &fee.due_date,
                    &fee.semester,
                    &fee.academic_year,
                    &fee.description,
                ])?;
            }
            csv_writer.flush()?;
        }

        // Atomic move from temp to final file
        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

#[async_trait]
impl FeeStorage for FeeRepository {
    async fn store_fee(&self, student_id: &str, fee: &Fee) -> Result<()> {
        let mut fees = self.read_fees(student_id)?;
        fees.push(fee.clone());
        self.write_fees(student_id, &fees)
    }

    async fn list_fees(&self, student_id: &str) -> Result<Vec<Fee>> {
        let mut fees = self.read_fees(student_id)?;
        fees.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        Ok(fees)
    }
}
