use crate::error::KaygiError;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lowercase, trim, and drop the combining dot that `İ` leaves behind.
fn fold(s: &str) -> String {
    s.trim().to_lowercase().replace('\u{307}', "")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Occupation {
    #[default]
    Student,
    Employed,
    Unemployed,
    Other,
}

impl Occupation {
    pub const ALL: [Occupation; 4] = [
        Occupation::Student,
        Occupation::Employed,
        Occupation::Unemployed,
        Occupation::Other,
    ];

    /// Integer code the model was trained with.
    pub fn code(self) -> u8 {
        match self {
            Occupation::Student => 0,
            Occupation::Employed => 1,
            Occupation::Unemployed => 2,
            Occupation::Other => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Occupation::Student => "Öğrenci",
            Occupation::Employed => "Çalışan",
            Occupation::Unemployed => "İşsiz",
            Occupation::Other => "Diğer",
        }
    }

    /// Accepts the English variant name or the Turkish label, any case.
    pub fn from_str_loose(s: &str) -> Option<Occupation> {
        match fold(s).as_str() {
            "student" | "öğrenci" | "ogrenci" => Some(Occupation::Student),
            "employed" | "çalışan" | "calisan" => Some(Occupation::Employed),
            "unemployed" | "işsiz" | "issiz" => Some(Occupation::Unemployed),
            "other" | "diğer" | "diger" => Some(Occupation::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Gender {
    #[default]
    Female,
    Male,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Female, Gender::Male, Gender::Other];

    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Kadın",
            Gender::Male => "Erkek",
            Gender::Other => "Diğer",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Gender> {
        match fold(s).as_str() {
            "female" | "kadın" | "kadin" => Some(Gender::Female),
            "male" | "erkek" => Some(Gender::Male),
            "other" | "diğer" | "diger" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Both enums persist as their Turkish label and read back leniently.
macro_rules! label_serde {
    ($ty:ident, $what:literal) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                $ty::from_str_loose(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown {} '{}'", $what, raw))
                })
            }
        }
    };
}

label_serde!(Occupation, "occupation");
label_serde!(Gender, "gender");

/// Parse a yes/no answer: Evet/Hayır, yes/no, true/false, 1/0.
pub fn parse_yes_no(s: &str) -> Option<bool> {
    match fold(s).as_str() {
        "evet" | "yes" | "y" | "true" | "1" => Some(true),
        "hayır" | "hayir" | "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

pub fn yes_no_label(value: bool) -> &'static str {
    if value {
        "Evet"
    } else {
        "Hayır"
    }
}

/// Accept `"7.5"` as well as `7.5` for decimal fields in hand-written JSON.
///
/// Numbers are read from their written form so `7.0` keeps its scale.
fn decimal_from_text_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Decimal, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    let text = match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text.trim().to_string(),
        Raw::Number(n) => n.to_string(),
    };
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| serde::de::Error::custom(format!("invalid number '{text}': {e}")))
}

/// One form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub age: u32,
    pub occupation: Occupation,
    pub gender: Gender,
    #[serde(deserialize_with = "decimal_from_text_or_number")]
    pub sleep_hours: Decimal,
    pub physical_activity_hours: u32,
    pub caffeine_mg: u32,
    pub alcohol_drinks_per_week: u32,
    pub smoking: bool,
    pub family_history: bool,
    pub stress_level: u32,
    pub heart_rate_bpm: u32,
    pub breathing_rate: u32,
    pub sweating_level: u32,
    pub dizziness: bool,
    pub medication: bool,
    pub therapy_sessions_per_month: u32,
    pub recent_major_life_event: bool,
    pub diet_quality: u32,
}

impl Default for InputRecord {
    /// The values the form starts out with.
    fn default() -> Self {
        InputRecord {
            age: 25,
            occupation: Occupation::Student,
            gender: Gender::Female,
            sleep_hours: Decimal::new(70, 1),
            physical_activity_hours: 3,
            caffeine_mg: 200,
            alcohol_drinks_per_week: 2,
            smoking: true,
            family_history: true,
            stress_level: 5,
            heart_rate_bpm: 75,
            breathing_rate: 16,
            sweating_level: 3,
            dizziness: true,
            medication: true,
            therapy_sessions_per_month: 2,
            recent_major_life_event: true,
            diet_quality: 6,
        }
    }
}

fn check_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), KaygiError>
where
    T: PartialOrd + fmt::Display,
{
    if value < min || value > max {
        return Err(KaygiError::InputValidation {
            field,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

impl InputRecord {
    /// Check every numeric field against the bounds of its form control.
    pub fn validate(&self) -> Result<(), KaygiError> {
        check_range("age", self.age, 10, 80)?;
        check_range(
            "sleep_hours",
            self.sleep_hours,
            Decimal::ZERO,
            Decimal::from(12),
        )?;
        check_range("physical_activity_hours", self.physical_activity_hours, 0, 20)?;
        check_range("caffeine_mg", self.caffeine_mg, 0, 1000)?;
        check_range("alcohol_drinks_per_week", self.alcohol_drinks_per_week, 0, 20)?;
        check_range("stress_level", self.stress_level, 1, 10)?;
        check_range("heart_rate_bpm", self.heart_rate_bpm, 50, 120)?;
        check_range("breathing_rate", self.breathing_rate, 10, 30)?;
        check_range("sweating_level", self.sweating_level, 1, 5)?;
        check_range(
            "therapy_sessions_per_month",
            self.therapy_sessions_per_month,
            0,
            30,
        )?;
        check_range("diet_quality", self.diet_quality, 1, 10)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionCategory {
    Low,
    Medium,
    High,
}

impl PredictionCategory {
    pub const ALL: [PredictionCategory; 3] = [
        PredictionCategory::Low,
        PredictionCategory::Medium,
        PredictionCategory::High,
    ];

    pub fn index(self) -> u8 {
        match self {
            PredictionCategory::Low => 0,
            PredictionCategory::Medium => 1,
            PredictionCategory::High => 2,
        }
    }

    /// Map a raw class index from the model; anything outside 0..=2 is rejected.
    pub fn from_index(index: i64) -> Result<PredictionCategory, KaygiError> {
        match index {
            0 => Ok(PredictionCategory::Low),
            1 => Ok(PredictionCategory::Medium),
            2 => Ok(PredictionCategory::High),
            other => Err(KaygiError::UnknownCategory(other)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PredictionCategory::Low => "Düşük",
            PredictionCategory::Medium => "Orta",
            PredictionCategory::High => "Yüksek",
        }
    }
}

impl fmt::Display for PredictionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One persisted row of the prediction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "Yaş")]
    pub age: u32,
    #[serde(rename = "Cinsiyet")]
    pub gender: Gender,
    #[serde(rename = "Stres")]
    pub stress_level: u32,
    #[serde(rename = "Uyku")]
    pub sleep_hours: Decimal,
    /// Raw category index.
    #[serde(rename = "Tahmin")]
    pub prediction: u8,
    /// Category label, e.g. "Düşük".
    #[serde(rename = "Sonuç")]
    pub outcome: String,
}

impl HistoryRecord {
    /// Column names in persisted order.
    pub const COLUMNS: [&'static str; 6] = ["Yaş", "Cinsiyet", "Stres", "Uyku", "Tahmin", "Sonuç"];

    /// Sleep hours are stored with at least one decimal place.
    pub fn new(input: &InputRecord, category: PredictionCategory) -> Self {
        let mut sleep_hours = input.sleep_hours;
        if sleep_hours.scale() == 0 {
            sleep_hours.rescale(1);
        }
        HistoryRecord {
            age: input.age,
            gender: input.gender,
            stress_level: input.stress_level,
            sleep_hours,
            prediction: category.index(),
            outcome: category.label().to_string(),
        }
    }

    /// Display values, one per column in `COLUMNS` order.
    pub fn values(&self) -> [String; 6] {
        [
            self.age.to_string(),
            self.gender.label().to_string(),
            self.stress_level.to_string(),
            self.sleep_hours.to_string(),
            self.prediction.to_string(),
            self.outcome.clone(),
        ]
    }
}
