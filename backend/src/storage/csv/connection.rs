use anyhow::Result;
use csv::Writer;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::{EnrollmentRepository, FeeRepository, PaymentRepository};
use crate::storage::traits::Connection;

/// Environment variable overriding the default data directory.
const DATA_DIR_ENV: &str = "BURSARY_DATA_DIR";

/// CsvConnection manages file paths and ensures CSV files exist per student
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a new CSV connection in the default data directory,
    /// overridable through `BURSARY_DATA_DIR`.
    pub fn new_default() -> Result<Self> {
        let data_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => PathBuf::from("data"),
        };

        info!("Using data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    /// Directory holding one student's CSV files
    pub fn student_directory(&self, student_id: &str) -> PathBuf {
        self.base_directory.join(Self::safe_directory_name(student_id))
    }

    /// Path of one of a student's CSV files; creates the directory and an
    /// empty file with the header row when missing.
    pub(crate) fn ensure_file_exists(
        &self,
        student_id: &str,
        file_name: &str,
        header: &[&str],
    ) -> Result<PathBuf> {
        let student_dir = self.student_directory(student_id);
        if !student_dir.exists() {
            fs::create_dir_all(&student_dir)?;
        }

        let file_path = student_dir.join(file_name);
        if !file_path.exists() {
            let mut writer = Writer::from_path(&file_path)?;
            writer.write_record(header)?;
            writer.flush()?;
        }

        Ok(file_path)
    }

    /// Turn a student ID into a filesystem-safe directory name
    fn safe_directory_name(student_id: &str) -> String {
        student_id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl Connection for CsvConnection {
    type FeeRepository = FeeRepository;
    type PaymentRepository = PaymentRepository;
    type EnrollmentRepository = EnrollmentRepository;

    fn create_fee_repository(&self) -> FeeRepository {
        FeeRepository::new(self.clone())
    }

    fn create_payment_repository(&self) -> PaymentRepository {
        PaymentRepository::new(self.clone())
    }

    fn create_enrollment_repository(&self) -> EnrollmentRepository {
        EnrollmentRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_directory_name() {
        assert_eq!(CsvConnection::safe_directory_name("student-001"), "student-001");
        assert_eq!(CsvConnection::safe_directory_name("S 23/001"), "s_23_001");
    }

    #[test]
    fn test_ensure_file_exists_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let connection = CsvConnection::new(dir.path()).unwrap();

        let path = connection
            .ensure_file_exists("student-001", "fees.csv", &["id", "amount"])
            .unwrap();
        let first = fs::read_to_string(&path).unwrap();
        assert_eq!(first.trim(), "id,amount");

        // A second call must not truncate existing content
        fs::write(&path, "id,amount\nfee::1,10\n").unwrap();
        connection
            .ensure_file_exists("student-001", "fees.csv", &["id", "amount"])
            .unwrap();
        let second = fs::read_to_string(&path).unwrap();
        assert!(second.contains("fee::1"));
    }
}
