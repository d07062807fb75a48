pub mod pipeline;
pub mod preprocess;
pub mod recognizer;

pub use pipeline::{ImageFilePages, InMemoryPages, PageSource, PipelineError, StatementOcr};
pub use preprocess::{prepare_page_bytes, PageScale, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;

/// The recognizer compiled into this build: Tesseract when the `tesseract`
/// feature is on, otherwise a backend that reports itself unavailable.
pub fn default_backend(data_path: Option<String>) -> Box<dyn OcrBackend> {
    #[cfg(feature = "tesseract")]
    {
        Box::new(TesseractRecognizer::new(data_path))
    }
    #[cfg(not(feature = "tesseract"))]
    {
        let _ = data_path;
        Box::new(UnavailableRecognizer)
    }
}
