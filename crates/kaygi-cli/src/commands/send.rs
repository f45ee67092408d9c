use kaygi_core::error::KaygiError;
use kaygi_core::export::ExportDispatcher;
use kaygi_core::session::Session;

pub fn run(session: &Session, address: &str) -> Result<(), KaygiError> {
    let dispatcher = ExportDispatcher::default();
    let result = session.send(&dispatcher, address)?;
    for message in result.messages() {
        println!("{message}");
    }
    Ok(())
}
