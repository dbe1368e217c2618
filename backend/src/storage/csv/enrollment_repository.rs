use anyhow::Result;
use async_trait::async_trait;
use csv::{Reader, Writer};
use shared::{Course, Enrollment};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::storage::traits::EnrollmentStorage;

const ENROLLMENTS_FILE: &str = "enrollments.csv";
// The embedded course is flattened into the row; course_id doubles as the
// course's own id.
const ENROLLMENTS_HEADER: [&str; 9] = [
    "id",
    "course_id",
    "status",
    "enrolled_at",
    "course_title",
    "course_code",
    "course_credits",
    "course_semester",
    "course_year",
];

/// CSV-based enrollment repository
#[derive(Clone)]
pub struct EnrollmentRepository {
    connection: CsvConnection,
}

impl EnrollmentRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all enrollments for a student from their CSV file
    fn read_enrollments(&self, student_id: &str) -> Result<Vec<Enrollment>> {
        let file_path = self
            .connection
            .ensure_file_exists(student_id, ENROLLMENTS_FILE, &ENROLLMENTS_HEADER)?;
        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut enrollments = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let course_id = record.get(1).unwrap_or("").to_string();

            enrollments.push(Enrollment {
                id: record.get(0).unwrap_or("").to_string(),
                course_id: course_id.clone(),
                status: record.get(2).unwrap_or("").to_string(),
                enrolled_at: record.get(3).unwrap_or("").to_string(),
                course: Course {
                    id: course_id,
                    title: record.get(4).unwrap_or("").to_string(),
                    code: record.get(5).unwrap_or("").to_string(),
                    credits: record.get(6).unwrap_or("0").parse::<u32>().unwrap_or(0),
                    semester: record.get(7).unwrap_or("").to_string(),
                    year: record.get(8).unwrap_or("0").parse::<u32>().unwrap_or(0),
                },
            });
        }

        Ok(enrollments)
    }

    /// Write all enrollments for a student to their CSV file
    fn write_enrollments(&self, student_id: &str, enrollments: &[Enrollment]) -> Result<()> {
        let file_path = self
            .connection
            .ensure_file_exists(student_id, ENROLLMENTS_FILE, &ENROLLMENTS_HEADER)?;
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));

            csv_writer.write_record(ENROLLMENTS_HEADER)?;
            for enrollment in enrollments {
                csv_writer.write_record(&[
                    &enrollment.id,
                    &enrollment.course_id,
                    &enrollment.status,
                    &enrollment.enrolled_at,
                    &enrollment.course.title,
                    &enrollment.course.code,
                    &enrollment.course.credits.to_string(),
                    &enrollment.course.semester,
                    &enrollment.course.year.to_string(),
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
impl EnrollmentStorage for EnrollmentRepository {
    async fn store_enrollment(&self, student_id: &str, enrollment: &Enrollment) -> Result<()> {
        let mut enrollments = self.read_enrollments(student_id)?;
        enrollments.push(enrollment.clone());
        self.write_enrollments(student_id, &enrollments)
    }

    async fn list_enrollments(&self, student_id: &str) -> Result<Vec<Enrollment>> {
        let mut enrollments = self.read_enrollments(student_id)?;
        enrollments.sort_by(|a, b| b.enrolled_at.cmp(&a.enrolled_at));
        Ok(enrollments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(id: &str, enrolled_at: &str) -> Enrollment {
        Enrollment {
            id: id.to_string(),
            course_id: "course::prog".to_string(),
            status: "active".to_string(),
            enrolled_at: enrolled_at.to_string(),
            course: Course {
                id: "course::prog".to_string(),
                title: "Programming".to_string(),
                code: "CSC 101".to_string(),
                credits: 3,
                semester: "Semester 1".to_string(),
                year: 2026,
            },
        }
    }

    fn create_test_repository() -> (EnrollmentRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let connection = CsvConnection::new(dir.path()).unwrap();
        (EnrollmentRepository::new(connection), dir)
    }

    #[tokio::test]
    async fn test_store_and_list_round_trip_with_embedded_course() {
        let (repository, _dir) = create_test_repository();

        let stored = enrollment("enrollment::1", "2026-01-10T09:00:00+03:00");
        repository
            .store_enrollment("student-001", &stored)
            .await
            .unwrap();

        let enrollments = repository.list_enrollments("student-001").await.unwrap();
        assert_eq!(enrollments, vec![stored]);
        assert_eq!(enrollments[0].course.semester, "Semester 1");
        assert_eq!(enrollments[0].course.credits, 3);
    }

    #[tokio::test]
    async fn test_list_orders_by_enrolled_at_descending() {
        let (repository, _dir) = create_test_repository();

        repository
            .store_enrollment("student-001", &enrollment("enrollment::old", "2026-01-01T09:00:00+03:00"))
            .await
            .unwrap();
        repository
            .store_enrollment("student-001", &enrollment("enrollment::new", "2026-02-01T09:00:00+03:00"))
            .await
            .unwrap();

        let enrollments = repository.list_enrollments("student-001").await.unwrap();
        assert_eq!(enrollments[0].id, "enrollment::new");
        assert_eq!(enrollments[1].id, "enrollment::old");
    }
}
