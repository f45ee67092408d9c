use kaygi_core::error::KaygiError;
use kaygi_core::encoding::ENCODED_COLUMNS;
use kaygi_core::session::Session;

pub fn run(session: &Session) -> Result<(), KaygiError> {
    let model = session.model()?;
    let features = model.declared_feature_names();

    println!("Backend: {}", model.backend_name());
    println!("Features ({}):", features.len());
    for (i, name) in features.iter().enumerate() {
        let marker = if ENCODED_COLUMNS.contains(&name.as_str()) {
            ""
        } else {
            "  (not produced by the form, sent as 0)"
        };
        println!("  {:>2}. {}{}", i, name, marker);
    }

    let ignored: Vec<&str> = ENCODED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !features.iter().any(|f| f == c))
        .collect();
    if !ignored.is_empty() {
        println!("\nForm fields the model ignores: {}", ignored.join(", "));
    }
    Ok(())
}
