use crate::error::KaygiError;
use crate::model::{Gender, InputRecord};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

pub const AGE: &str = "Age";
pub const OCCUPATION: &str = "Occupation";
pub const SLEEP_HOURS: &str = "Sleep_Hours";
pub const PHYSICAL_ACTIVITY: &str = "Physical_Activity_(hrs/week)";
pub const CAFFEINE: &str = "Caffeine_Intake_(mg/day)";
pub const ALCOHOL: &str = "Alcohol_Consumption_(drinks/week)";
pub const SMOKING: &str = "Smoking";
pub const FAMILY_HISTORY: &str = "Family_History_of_Anxiety";
pub const STRESS_LEVEL: &str = "Stress_Level_(1-10)";
pub const HEART_RATE: &str = "Heart_Rate_(bpm)";
pub const BREATHING_RATE: &str = "Breathing_Rate_(breaths/min)";
pub const SWEATING_LEVEL: &str = "Sweating_Level_(1-5)";
pub const DIZZINESS: &str = "Dizziness";
pub const MEDICATION: &str = "Medication";
pub const THERAPY_SESSIONS: &str = "Therapy_Sessions_(per_month)";
pub const LIFE_EVENT: &str = "Recent_Major_Life_Event";
pub const DIET_QUALITY: &str = "Diet_Quality_(1-10)";
pub const GENDER_FEMALE: &str = "Gender_Female";
pub const GENDER_MALE: &str = "Gender_Male";
pub const GENDER_OTHER: &str = "Gender_Other";

/// Every column `encode` produces, in production order.
pub const ENCODED_COLUMNS: [&str; 20] = [
    AGE,
    OCCUPATION,
    SLEEP_HOURS,
    PHYSICAL_ACTIVITY,
    CAFFEINE,
    ALCOHOL,
    SMOKING,
    FAMILY_HISTORY,
    STRESS_LEVEL,
    HEART_RATE,
    BREATHING_RATE,
    SWEATING_LEVEL,
    DIZZINESS,
    MEDICATION,
    THERAPY_SESSIONS,
    LIFE_EVENT,
    DIET_QUALITY,
    GENDER_FEMALE,
    GENDER_MALE,
    GENDER_OTHER,
];

/// A single row of named numeric features.
///
/// Column order is significant: it is the order values are handed to the
/// model after [`FeatureVector::reindex`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    columns: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn new() -> Self {
        FeatureVector::default()
    }

    /// Set a column, replacing the value if the name already exists.
    pub fn set(&mut self, name: &str, value: f64) {
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.columns.iter().map(|(_, v)| *v).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Align to `order`: exactly those columns, in that order. Names this
    /// vector lacks are filled with 0; names not in `order` are dropped.
    pub fn reindex<S: AsRef<str>>(&self, order: &[S]) -> FeatureVector {
        let columns = order
            .iter()
            .map(|name| {
                let name = name.as_ref();
                (name.to_string(), self.get(name).unwrap_or(0.0))
            })
            .collect();
        FeatureVector { columns }
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Turn a form submission into the model's named feature row.
///
/// Validates the record first; nothing is encoded for out-of-range input.
pub fn encode(record: &InputRecord) -> Result<FeatureVector, KaygiError> {
    record.validate()?;

    let sleep = record
        .sleep_hours
        .to_f64()
        .ok_or_else(|| KaygiError::InputValidation {
            field: "sleep_hours",
            value: record.sleep_hours.to_string(),
            min: "0".into(),
            max: "12".into(),
        })?;

    let mut fv = FeatureVector::new();
    fv.set(AGE, f64::from(record.age));
    fv.set(OCCUPATION, f64::from(record.occupation.code()));
    fv.set(SLEEP_HOURS, sleep);
    fv.set(PHYSICAL_ACTIVITY, f64::from(record.physical_activity_hours));
    fv.set(CAFFEINE, f64::from(record.caffeine_mg));
    fv.set(ALCOHOL, f64::from(record.alcohol_drinks_per_week));
    fv.set(SMOKING, flag(record.smoking));
    fv.set(FAMILY_HISTORY, flag(record.family_history));
    fv.set(STRESS_LEVEL, f64::from(record.stress_level));
    fv.set(HEART_RATE, f64::from(record.heart_rate_bpm));
    fv.set(BREATHING_RATE, f64::from(record.breathing_rate));
    fv.set(SWEATING_LEVEL, f64::from(record.sweating_level));
    fv.set(DIZZINESS, flag(record.dizziness));
    fv.set(MEDICATION, flag(record.medication));
    fv.set(THERAPY_SESSIONS, f64::from(record.therapy_sessions_per_month));
    fv.set(LIFE_EVENT, flag(record.recent_major_life_event));
    fv.set(DIET_QUALITY, f64::from(record.diet_quality));
    fv.set(GENDER_FEMALE, flag(record.gender == Gender::Female));
    fv.set(GENDER_MALE, flag(record.gender == Gender::Male));
    fv.set(GENDER_OTHER, flag(record.gender == Gender::Other));
    Ok(fv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Occupation;
    use rust_decimal_macros::dec;

    #[test]
    fn test_encode_produces_every_column() {
        for occupation in Occupation::ALL {
            for gender in Gender::ALL {
                let record = InputRecord {
                    occupation,
                    gender,
                    ..InputRecord::default()
                };
                let fv = encode(&record).unwrap();
                let names: Vec<&str> = fv.names().collect();
                assert_eq!(names, ENCODED_COLUMNS.to_vec());
            }
        }
    }

    #[test]
    fn test_gender_one_hot_is_exclusive() {
        for gender in Gender::ALL {
            let record = InputRecord {
                gender,
                ..InputRecord::default()
            };
            let fv = encode(&record).unwrap();
            let hot: f64 = [GENDER_FEMALE, GENDER_MALE, GENDER_OTHER]
                .iter()
                .map(|c| fv.get(c).unwrap())
                .sum();
            assert_eq!(hot, 1.0);
        }
        let male = encode(&InputRecord {
            gender: Gender::Male,
            ..InputRecord::default()
        })
        .unwrap();
        assert_eq!(male.get(GENDER_MALE), Some(1.0));
        assert_eq!(male.get(GENDER_FEMALE), Some(0.0));
    }

    #[test]
    fn test_occupation_and_flags() {
        let record = InputRecord {
            occupation: Occupation::Unemployed,
            smoking: false,
            medication: true,
            sleep_hours: dec!(6.5),
            ..InputRecord::default()
        };
        let fv = encode(&record).unwrap();
        assert_eq!(fv.get(OCCUPATION), Some(2.0));
        assert_eq!(fv.get(SMOKING), Some(0.0));
        assert_eq!(fv.get(MEDICATION), Some(1.0));
        assert_eq!(fv.get(SLEEP_HOURS), Some(6.5));
        assert_eq!(fv.get(CAFFEINE), Some(200.0));
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        let record = InputRecord {
            heart_rate_bpm: 130,
            ..InputRecord::default()
        };
        assert!(matches!(
            encode(&record),
            Err(KaygiError::InputValidation {
                field: "heart_rate_bpm",
                ..
            })
        ));
    }

    #[test]
    fn test_reindex_fills_and_drops() {
        let mut fv = FeatureVector::new();
        fv.set("a", 1.0);
        fv.set("b", 2.0);
        fv.set("extra", 9.0);

        let out = fv.reindex(&["b", "c", "a"]);
        let names: Vec<&str> = out.names().collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(out.values(), vec![2.0, 0.0, 1.0]);
        assert_eq!(out.get("extra"), None);
    }

    #[test]
    fn test_reindex_is_idempotent() {
        let fv = encode(&InputRecord::default()).unwrap();
        let order = vec![
            "Gender_Other".to_string(),
            "Unseen_Feature".to_string(),
            "Age".to_string(),
        ];
        let once = fv.reindex(&order);
        let twice = once.reindex(&order);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_replaces_existing() {
        let mut fv = FeatureVector::new();
        fv.set("a", 1.0);
        fv.set("a", 3.0);
        assert_eq!(fv.len(), 1);
        assert_eq!(fv.get("a"), Some(3.0));
    }
}
