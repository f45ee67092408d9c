use crate::error::KaygiError;
use serde::Serialize;

/// A document handed to a transport.
#[derive(Debug, Clone, Copy)]
pub struct Attachment<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

/// Trait for report delivery backends.
pub trait MailTransport: Send + Sync {
    /// Deliver `attachment` to `recipient`. Returns whether it was simulated.
    fn deliver(&self, recipient: &str, attachment: &Attachment<'_>) -> Result<bool, KaygiError>;

    /// Name of this transport (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Accepts every delivery without contacting anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedTransport;

impl MailTransport for SimulatedTransport {
    fn deliver(&self, recipient: &str, attachment: &Attachment<'_>) -> Result<bool, KaygiError> {
        log::info!(
            "simulated delivery of {} ({} bytes) to {}",
            attachment.file_name,
            attachment.bytes.len(),
            recipient
        );
        Ok(true)
    }

    fn backend_name(&self) -> &str {
        "simulated"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryResult {
    pub recipient: String,
    pub file_name: String,
    pub size_bytes: usize,
    pub simulated: bool,
}

impl DeliveryResult {
    /// User-facing notices, in display order.
    pub fn messages(&self) -> Vec<String> {
        let mut out = vec![format!(
            "📨 {} adresine PDF gönderme işlemi (demo).",
            self.recipient
        )];
        if self.simulated {
            out.push("Bu işlev sadece simülasyondur.".to_string());
        }
        out
    }
}

/// Structural check only: non-blank and contains an `@`.
pub fn validate_address(address: &str) -> Result<&str, KaygiError> {
    let trimmed = address.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(KaygiError::InvalidAddress(address.to_string()));
    }
    Ok(trimmed)
}

pub struct ExportDispatcher<T: MailTransport> {
    transport: T,
}

impl<T: MailTransport> ExportDispatcher<T> {
    pub fn new(transport: T) -> Self {
        ExportDispatcher { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate `address` and hand the report to the transport.
    pub fn send(
        &self,
        address: &str,
        file_name: &str,
        report: &[u8],
    ) -> Result<DeliveryResult, KaygiError> {
        let recipient = validate_address(address)?;
        let attachment = Attachment {
            file_name,
            bytes: report,
        };
        let simulated = self.transport.deliver(recipient, &attachment)?;
        log::debug!("{} accepted delivery to {}", self.transport.backend_name(), recipient);
        Ok(DeliveryResult {
            recipient: recipient.to_string(),
            file_name: file_name.to_string(),
            size_bytes: report.len(),
            simulated,
        })
    }
}

impl Default for ExportDispatcher<SimulatedTransport> {
    fn default() -> Self {
        ExportDispatcher::new(SimulatedTransport)
    }
}
