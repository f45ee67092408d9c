use crate::error::KaygiError;
use crate::report::{ReportLayout, ReportRenderer};
use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::{Alignment, Document, SimplePageDecorator};
use std::path::{Path, PathBuf};

const FONT_SIZE: u8 = 11;
const MARGIN_MM: i32 = 10;

/// PDF backend using genpdf with an embedded TrueType font.
///
/// The font must cover the report's characters (Turkish diacritics included),
/// so the built-in PDF fonts are never used.
pub struct GenpdfRenderer {
    font: Vec<u8>,
    source: PathBuf,
}

impl GenpdfRenderer {
    /// Load and check the TrueType font at `path`.
    pub fn from_font_file(path: &Path) -> Result<Self, KaygiError> {
        let font = std::fs::read(path).map_err(|e| KaygiError::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_font_bytes(font, path)
    }

    /// Use in-memory font data. `source` only labels errors.
    pub fn from_font_bytes(font: Vec<u8>, source: &Path) -> Result<Self, KaygiError> {
        let renderer = GenpdfRenderer {
            font,
            source: source.to_path_buf(),
        };
        // Parse once up front so a bad font fails here, not on first render.
        renderer.font_family()?;
        log::debug!("loaded report font {}", source.display());
        Ok(renderer)
    }

    fn font_family(&self) -> Result<FontFamily<FontData>, KaygiError> {
        let data = FontData::new(self.font.clone(), None).map_err(|e| KaygiError::FontLoad {
            path: self.source.clone(),
            reason: e.to_string(),
        })?;
        Ok(FontFamily {
            regular: data.clone(),
            bold: data.clone(),
            italic: data.clone(),
            bold_italic: data,
        })
    }
}

impl ReportRenderer for GenpdfRenderer {
    fn render(&self, layout: &ReportLayout) -> Result<Vec<u8>, KaygiError> {
        let mut doc = Document::new(self.font_family()?);
        doc.set_title(layout.title.clone());
        doc.set_font_size(FONT_SIZE);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(MARGIN_MM);
        doc.set_page_decorator(decorator);

        doc.push(Paragraph::new(layout.title.clone()).aligned(Alignment::Center));
        doc.push(Break::new(1.0));
        for line in &layout.lines {
            doc.push(Paragraph::new(line.clone()));
        }

        let mut bytes = Vec::new();
        doc.render(&mut bytes)
            .map_err(|e| KaygiError::Render(e.to_string()))?;
        Ok(bytes)
    }

    fn backend_name(&self) -> &str {
        "genpdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

    #[test]
    fn test_missing_font_is_font_load_error() {
        let err = GenpdfRenderer::from_font_file(Path::new("/nonexistent/DejaVuSans.ttf"))
            .err()
            .unwrap();
        assert!(matches!(err, KaygiError::FontLoad { .. }));
    }

    #[test]
    fn test_invalid_font_data_rejected() {
        let err = GenpdfRenderer::from_font_bytes(b"not a font".to_vec(), Path::new("x.ttf"))
            .err()
            .unwrap();
        assert!(matches!(err, KaygiError::FontLoad { .. }));
    }

    #[test]
    fn test_renders_pdf_with_turkish_text() {
        let path = Path::new(SYSTEM_FONT);
        if !path.exists() {
            eprintln!("skipping: {SYSTEM_FONT} not installed");
            return;
        }
        let renderer = GenpdfRenderer::from_font_file(path).unwrap();
        let layout = ReportLayout {
            title: "Anksiyete Tahmin Raporu".into(),
            lines: vec!["Cinsiyet: Kadın".into(), "Sonuç: Düşük".into()],
        };
        let bytes = renderer.render(&layout).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
