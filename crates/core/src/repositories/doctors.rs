//! Directory of practitioners offering consultations.

use super::matches_term;
use crate::constants::DOCTOR_SEED;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Doctor {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub hospital: String,
    pub rating: f64,
    pub experience_years: u32,
    /// Whether the doctor is accepting appointments.
    pub available: bool,
}

/// Read-only doctor listing with the dashboard's search filter.
#[derive(Clone, Debug, Default)]
pub struct DoctorDirectory {
    doctors: Vec<Doctor>,
}

impl DoctorDirectory {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self { doctors }
    }

    /// The six practitioners shown on the doctors page, with ids starting at 1.
    pub fn seeded() -> Self {
        let doctors = DOCTOR_SEED
            .iter()
            .zip(1..)
            .map(
                |(&(name, specialty, hospital, rating, experience_years, available), id)| Doctor {
                    id,
                    name: name.to_string(),
                    specialty: specialty.to_string(),
                    hospital: hospital.to_string(),
                    rating,
                    experience_years,
                    available,
                },
            )
            .collect();
        Self::new(doctors)
    }

    pub fn list(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn get(&self, id: u32) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    /// Doctors whose name, specialty or hospital contains `term`, ignoring case.
    ///
    /// # Returns
    ///
    /// Matches in listing order. A blank term returns every doctor.
    pub fn search(&self, term: &str) -> Vec<&Doctor> {
        self.doctors
            .iter()
            .filter(|d| matches_term(term, &[&d.name, &d.specialty, &d.hospital]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(found: Vec<&Doctor>) -> Vec<&str> {
        found.into_iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn seeded_directory_lists_six_doctors() {
        let directory = DoctorDirectory::seeded();
        assert_eq!(directory.list().len(), 6);
        assert_eq!(directory.get(3).map(|d| d.available), Some(false));
        assert!(directory.get(7).is_none());
    }

    #[test]
    fn search_matches_name_specialty_or_hospital() {
        let directory = DoctorDirectory::seeded();
        assert_eq!(names(directory.search("教授")), ["张教授", "郑教授"]);
        assert_eq!(names(directory.search("针灸")), ["李医师"]);
        assert_eq!(names(directory.search("上海中医药大学")), ["张教授", "郑教授"]);
        assert!(directory.search("牙科").is_empty());
    }

    #[test]
    fn search_ignores_case_and_blank_terms() {
        let directory = DoctorDirectory::new(vec![Doctor {
            id: 1,
            name: "Dr Lin".into(),
            specialty: "Acupuncture".into(),
            hospital: "Harbour Clinic".into(),
            rating: 4.5,
            experience_years: 10,
            available: true,
        }]);
        assert_eq!(names(directory.search("ACUPUNCTURE")), ["Dr Lin"]);
        assert_eq!(directory.search("  ").len(), 1);
    }
}
