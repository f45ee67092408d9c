use kaygi_core::error::KaygiError;
use kaygi_core::session::Session;

use crate::output;

pub fn show(session: &Session, output_format: &str) -> Result<(), KaygiError> {
    let view = session.history();
    if let Some(ref warning) = view.warning {
        eprintln!("warning: {warning}");
    }

    match output_format {
        "json" => output::json::print(&view)?,
        _ => output::table::print_history(&view),
    }
    Ok(())
}

pub fn clear(session: &Session) -> Result<(), KaygiError> {
    session.clear_history()?;
    println!("Geçmiş temizlendi.");
    Ok(())
}
