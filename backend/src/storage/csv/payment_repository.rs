use anyhow::Result;
use async_trait::async_trait;
use csv::{Reader, Writer};
use shared::{Payment, PaymentStatus};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::storage::traits::PaymentStorage;

const PAYMENTS_FILE: &str = "payments.csv";
const PAYMENTS_HEADER: [&str; 7] = [
    "id",
    "fee_id",
    "amount",
    "paid_at",
    "payment_method",
    "status",
    "transaction_ref",
];

/// CSV-based payment repository
#[derive(Clone)]
pub struct PaymentRepository {
    connection: CsvConnection,
}

impl PaymentRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all payments for a student from their CSV file
    fn read_payments(&self, student_id: &str) -> Result<Vec<Payment>> {
        let file_path = self
            .connection
            .ensure_file_exists(student_id, PAYMENTS_FILE, &PAYMENTS_HEADER)?;
        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut payments = Vec::new();
        for result in csv_reader.records() {
            let record = result?;

            payments.push(Payment {
                id: record.get(0).unwrap_or("").to_string(),
                fee_id: record.get(1).unwrap_or("").to_string(),
                amount: record.get(2).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                paid_at: record.get(3).unwrap_or("").to_string(),
                payment_method: record.get(4).unwrap_or("").to_string(),
                // Unknown status cells must never count as paid
                status: match record.get(5).unwrap_or("") {
                    "pending" => PaymentStatus::Pending,
                    "completed" => PaymentStatus::Completed,
                    _ => PaymentStatus::Failed,
                },
                transaction_ref: record.get(6).unwrap_or("").to_string(),
            });
        }

        Ok(payments)
    }

    /// Write all payments for a student to their CSV file
    fn write_payments(&self, student_id: &str, payments: &[Payment]) -> Result<()> {
        let file_path = self
            .connection
            .ensure_file_exists(student_id, PAYMENTS_FILE, &PAYMENTS_HEADER)?;
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));

            csv_writer.write_record(PAYMENTS_HEADER)?;
            for payment in payments {
                csv_writer.write_record(&[
                    &payment.id,
                    &payment.fee_id,
                    &payment.amount.to_string(),
                    &payment.paid_at,
                    &payment.payment_method,
                    &payment.status.as_str().to_string(),
                    &payment.transaction_ref,
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
impl PaymentStorage for PaymentRepository {
    async fn store_payment(&self, student_id: &str, payment: &Payment) -> Result<()> {
        let mut payments = self.read_payments(student_id)?;
        payments.push(payment.clone());
        self.write_payments(student_id, &payments)
    }

    async fn list_payments(&self, student_id: &str) -> Result<Vec<Payment>> {
        let mut payments = self.read_payments(student_id)?;
        payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        Ok(payments)
    }
}
