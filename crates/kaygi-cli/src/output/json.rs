use kaygi_core::error::KaygiError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), KaygiError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
