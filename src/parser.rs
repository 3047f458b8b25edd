use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;
use serde::de::DeserializeOwned;

use crate::planning::{Subject, SubjectType, TimeSlot};

/// Reads every well-formed record of a CSV source; malformed rows are skipped
fn read_records<T: DeserializeOwned, R: Read>(source: R, what: &str) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(source);

    let mut records = Vec::new();
    for (line, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                // Header is line 1, so data rows start at 2
                log::warn!("Skipping {} row {}: {}", what, line + 2, e);
            }
        }
    }
    Ok(records)
}

/// Loads subjects from a CSV file.
///
/// Expected headers: `id,name,coefficient,examDate` plus the optional
/// `estimatedHours`, `currentProgress` and `type` columns.
pub fn load_subjects<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Subject>, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(csv_path)?;
    read_records(file, "subject")
}

/// Loads weekly slots from a CSV file.
///
/// Expected headers: `id,dayOfWeek,startTime,endTime` plus an optional `available` column.
pub fn load_slots<P: AsRef<Path>>(csv_path: P) -> Result<Vec<TimeSlot>, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(csv_path)?;
    read_records(file, "slot")
}

/// Built-in subjects used when no input files are available
pub fn demo_subjects() -> Vec<Subject> {
    vec![
        Subject {
            id: "1".to_string(),
            name: "Mathématiques".to_string(),
            coefficient: 2.0,
            exam_date: "2025-01-20".to_string(),
            estimated_hours: 10.0,
            current_progress: 0.0,
            subject_type: SubjectType::Revision,
        },
        Subject {
            id: "2".to_string(),
            name: "Histoire".to_string(),
            coefficient: 1.0,
            exam_date: "2025-01-25".to_string(),
            estimated_hours: 8.0,
            current_progress: 0.0,
            subject_type: SubjectType::Revision,
        },
    ]
}

/// Built-in weekly slots used when no input files are available
pub fn demo_slots() -> Vec<TimeSlot> {
    [(1, "14:00", "16:00"), (2, "08:00", "10:00"), (3, "18:00", "20:00")]
        .iter()
        .enumerate()
        .map(|(i, (day, start, end))| TimeSlot {
            id: (i + 1).to_string(),
            day_of_week: *day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            available: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_subjects_with_optional_columns() {
        let data = "id,name,coefficient,examDate,type\n\
                    s1,Math,2,2025-01-20,exercices\n\
                    s2, Histoire ,1,2025-01-25,\n";
        let subjects: Vec<Subject> = read_records(data.as_bytes(), "subject").unwrap();
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].subject_type, SubjectType::Exercices);
        assert_eq!(subjects[0].coefficient, 2.0);
        assert_eq!(subjects[1].name, "Histoire");
        assert_eq!(subjects[1].estimated_hours, 0.0);
    }

    #[test]
    fn test_read_slots_skips_bad_rows() {
        let data = "id,dayOfWeek,startTime,endTime,available\n\
                    t1,1,14:00,16:00,true\n\
                    t2,lundi,09:00,11:00,true\n\
                    t3,7,10:00,12:00,false\n";
        let slots: Vec<TimeSlot> = read_records(data.as_bytes(), "slot").unwrap();
        let ids: Vec<&str> = slots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
        assert!(!slots[1].available);
    }

    #[test]
    fn test_read_slots_without_available_column() {
        let data = "id,dayOfWeek,startTime,endTime\nt1,3,18:00,20:00\n";
        let slots: Vec<TimeSlot> = read_records(data.as_bytes(), "slot").unwrap();
        assert_eq!(slots.len(), 1);
        assert!(slots[0].available);
    }

    #[test]
    fn test_demo_data_is_valid() {
        assert_eq!(demo_subjects().len(), 2);
        for slot in demo_slots() {
            assert!(crate::planning::validate_slot(&slot).is_ok());
        }
    }
}
