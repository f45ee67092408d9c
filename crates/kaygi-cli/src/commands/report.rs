use kaygi_core::error::KaygiError;
use kaygi_core::session::Session;
use std::path::PathBuf;

pub fn run(session: &Session, out: Option<PathBuf>) -> Result<(), KaygiError> {
    let bytes = session.report()?;
    let path = out.unwrap_or_else(|| PathBuf::from(session.report_file_name()));
    std::fs::write(&path, &bytes)?;
    println!("📥 PDF kaydedildi: {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
