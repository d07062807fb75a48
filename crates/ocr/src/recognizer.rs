use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error ({language}): {message}")]
    Engine { language: String, message: String },
    #[error("OCR backend not available - build with the `tesseract` feature")]
    NotAvailable,
}

impl OcrError {
    pub fn engine(language: Option<&str>, message: impl Into<String>) -> Self {
        OcrError::Engine {
            language: language.unwrap_or("default").to_string(),
            message: message.into(),
        }
    }
}

/// Abstraction over an OCR backend.
/// Implementations accept PNG page bytes and return the recognized text.
/// `language` is a Tesseract-style code (`por`, `eng`); `None` lets the
/// engine pick its default.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8], language: Option<&str>) -> Result<String, OcrError>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn recognize(&self, image_bytes: &[u8], language: Option<&str>) -> Result<String, OcrError> {
        (**self).recognize(image_bytes, language)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string, optionally failing for some languages, so the
/// statement pipeline can be tested without Tesseract installed.
pub struct MockRecognizer {
    pub text: String,
    pub failing_languages: Vec<Option<String>>,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), failing_languages: Vec::new() }
    }

    pub fn failing_for(mut self, language: Option<&str>) -> Self {
        self.failing_languages.push(language.map(str::to_string));
        self
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8], language: Option<&str>) -> Result<String, OcrError> {
        if self.failing_languages.iter().any(|l| l.as_deref() == language) {
            return Err(OcrError::engine(language, "traineddata not installed"));
        }
        Ok(self.text.clone())
    }
}

/// Stand-in used when no OCR engine was compiled in.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn recognize(&self, _image_bytes: &[u8], _language: Option<&str>) -> Result<String, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::{LepTess, Variable};

    /// Statement pages are a single uniform block of text (psm 6).
    const PAGE_SEG_MODE: &str = "6";

    pub struct TesseractRecognizer {
        data_path: Option<String>,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>) -> Self {
            Self { data_path }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8], language: Option<&str>) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), language.unwrap_or("eng"))
                .map_err(|e| OcrError::engine(language, e.to_string()))?;
            lt.set_variable(Variable::TesseditPagesegMode, PAGE_SEG_MODE)
                .map_err(|e| OcrError::engine(language, e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::engine(language, e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_preset_text() {
        let r = MockRecognizer::new("01/03/2024 UBER TRIP 45,90 9,18 5,000");
        assert_eq!(
            r.recognize(b"fake image data", Some("por")).unwrap(),
            "01/03/2024 UBER TRIP 45,90 9,18 5,000"
        );
    }

    #[test]
    fn mock_fails_for_configured_language() {
        let r = MockRecognizer::new("hello").failing_for(Some("por"));
        assert!(matches!(
            r.recognize(b"", Some("por")),
            Err(OcrError::Engine { ref language, .. }) if language == "por"
        ));
        assert_eq!(r.recognize(b"", Some("eng")).unwrap(), "hello");
        assert_eq!(r.recognize(b"", None).unwrap(), "hello");
    }

    #[test]
    fn unavailable_backend_reports_precondition() {
        assert!(matches!(
            UnavailableRecognizer.recognize(b"", None),
            Err(OcrError::NotAvailable)
        ));
    }

    #[test]
    fn boxed_backend_delegates() {
        let r: Box<dyn OcrBackend> = Box::new(MockRecognizer::new("boxed"));
        assert_eq!(r.recognize(b"", None).unwrap(), "boxed");
    }
}
