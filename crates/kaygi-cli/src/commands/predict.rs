use clap::Args;
use kaygi_core::error::KaygiError;
use kaygi_core::model::{parse_yes_no, Gender, InputRecord, Occupation};
use kaygi_core::session::Session;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::output;

fn occupation(s: &str) -> Result<Occupation, String> {
    Occupation::from_str_loose(s)
        .ok_or_else(|| format!("'{s}' is not one of: student, employed, unemployed, other"))
}

fn gender(s: &str) -> Result<Gender, String> {
    Gender::from_str_loose(s).ok_or_else(|| format!("'{s}' is not one of: female, male, other"))
}

fn yes_no(s: &str) -> Result<bool, String> {
    parse_yes_no(s).ok_or_else(|| format!("'{s}' is not yes/no (evet/hayır)"))
}

/// The form fields. Defaults match the form's initial state.
#[derive(Args, Debug)]
pub struct FormArgs {
    /// Age in years (10-80)
    #[arg(long, default_value_t = 25)]
    age: u32,

    /// student, employed, unemployed or other (Turkish labels accepted)
    #[arg(long, default_value = "student", value_parser = occupation)]
    occupation: Occupation,

    /// female, male or other (Turkish labels accepted)
    #[arg(long, default_value = "female", value_parser = gender)]
    gender: Gender,

    /// Hours of sleep per night (0-12)
    #[arg(long = "sleep", default_value = "7.0", value_name = "HOURS")]
    sleep_hours: Decimal,

    /// Hours of physical activity per week (0-20)
    #[arg(long = "activity", default_value_t = 3, value_name = "HOURS")]
    physical_activity_hours: u32,

    /// Caffeine intake in mg per day (0-1000)
    #[arg(long = "caffeine", default_value_t = 200, value_name = "MG")]
    caffeine_mg: u32,

    /// Alcoholic drinks per week (0-20)
    #[arg(long = "alcohol", default_value_t = 2, value_name = "DRINKS")]
    alcohol_drinks_per_week: u32,

    /// Smoker (yes/no)
    #[arg(long, default_value = "yes", value_parser = yes_no, value_name = "YES|NO")]
    smoking: bool,

    /// Anxiety in the family (yes/no)
    #[arg(long, default_value = "yes", value_parser = yes_no, value_name = "YES|NO")]
    family_history: bool,

    /// Stress level (1-10)
    #[arg(long = "stress", default_value_t = 5, value_name = "LEVEL")]
    stress_level: u32,

    /// Heart rate in bpm (50-120)
    #[arg(long = "heart-rate", default_value_t = 75, value_name = "BPM")]
    heart_rate_bpm: u32,

    /// Breaths per minute (10-30)
    #[arg(long = "breathing-rate", default_value_t = 16, value_name = "PER_MIN")]
    breathing_rate: u32,

    /// Sweating level (1-5)
    #[arg(long = "sweating", default_value_t = 3, value_name = "LEVEL")]
    sweating_level: u32,

    /// Dizziness (yes/no)
    #[arg(long, default_value = "yes", value_parser = yes_no, value_name = "YES|NO")]
    dizziness: bool,

    /// Takes medication (yes/no)
    #[arg(long, default_value = "yes", value_parser = yes_no, value_name = "YES|NO")]
    medication: bool,

    /// Therapy sessions per month (0-30)
    #[arg(long = "therapy", default_value_t = 2, value_name = "SESSIONS")]
    therapy_sessions_per_month: u32,

    /// Recent major life event (yes/no)
    #[arg(long = "life-event", default_value = "yes", value_parser = yes_no, value_name = "YES|NO")]
    recent_major_life_event: bool,

    /// Diet quality (1-10)
    #[arg(long = "diet", default_value_t = 6, value_name = "LEVEL")]
    diet_quality: u32,
}

impl FormArgs {
    fn into_record(self) -> InputRecord {
        InputRecord {
            age: self.age,
            occupation: self.occupation,
            gender: self.gender,
            sleep_hours: self.sleep_hours,
            physical_activity_hours: self.physical_activity_hours,
            caffeine_mg: self.caffeine_mg,
            alcohol_drinks_per_week: self.alcohol_drinks_per_week,
            smoking: self.smoking,
            family_history: self.family_history,
            stress_level: self.stress_level,
            heart_rate_bpm: self.heart_rate_bpm,
            breathing_rate: self.breathing_rate,
            sweating_level: self.sweating_level,
            dizziness: self.dizziness,
            medication: self.medication,
            therapy_sessions_per_month: self.therapy_sessions_per_month,
            recent_major_life_event: self.recent_major_life_event,
            diet_quality: self.diet_quality,
        }
    }
}

pub fn run(
    session: &Session,
    form: FormArgs,
    input_file: Option<PathBuf>,
    output_format: &str,
) -> Result<(), KaygiError> {
    let record = match input_file {
        Some(path) => {
            let bytes = std::fs::read(&path)?;
            serde_json::from_slice::<InputRecord>(&bytes)?
        }
        None => form.into_record(),
    };

    let prediction = session.predict(&record)?;

    match output_format {
        "json" => output::json::print(&prediction)?,
        _ => output::table::print_prediction(&prediction),
    }

    Ok(())
}
