use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::preprocess::{self, PageScale};
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Page preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR failed on page {page}: {source}")]
    Ocr {
        page: usize,
        #[source]
        source: OcrError,
    },
    #[error("OCR backend not available - build with the `tesseract` feature")]
    NotAvailable,
    #[error("Statement has no pages")]
    NoPages,
}

/// Supplies the raster images of a statement, one per page, in order.
/// PDF rasterization lives behind this trait.
pub trait PageSource {
    fn pages(&self) -> Result<Vec<Vec<u8>>, PipelineError>;
}

/// Pages already rendered to image files (PNG/JPEG/TIFF scans).
#[derive(Debug, Clone)]
pub struct ImageFilePages {
    paths: Vec<PathBuf>,
}

impl ImageFilePages {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self { paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect() }
    }
}

impl PageSource for ImageFilePages {
    fn pages(&self) -> Result<Vec<Vec<u8>>, PipelineError> {
        self.paths
            .iter()
            .map(|path| {
                std::fs::read(path).map_err(|source| PipelineError::Io { path: path.clone(), source })
            })
            .collect()
    }
}

/// Page images held in memory, e.g. from an external PDF renderer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPages(pub Vec<Vec<u8>>);

impl PageSource for InMemoryPages {
    fn pages(&self) -> Result<Vec<Vec<u8>>, PipelineError> {
        Ok(self.0.clone())
    }
}

/// Turns statement pages into one block of text: preprocess → OCR with
/// language fallback → join pages with newlines.
pub struct StatementOcr<R: OcrBackend> {
    recognizer: R,
    languages: Vec<String>,
    scale: PageScale,
}

impl<R: OcrBackend> StatementOcr<R> {
    pub const DEFAULT_LANGUAGES: [&'static str; 2] = ["por", "eng"];

    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            languages: Self::DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            scale: PageScale::default(),
        }
    }

    /// Languages tried in order; the engine default is always tried last.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_scale(mut self, scale: PageScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn extract_text(&self, source: &dyn PageSource) -> Result<String, PipelineError> {
        let pages = source.pages()?;
        if pages.is_empty() {
            return Err(PipelineError::NoPages);
        }

        let mut text = String::new();
        for (idx, raw) in pages.iter().enumerate() {
            let page = idx + 1;
            let prepared = preprocess::prepare_page_bytes(raw, self.scale)?;
            let page_text = self.recognize_page(&prepared).map_err(|e| match e {
                OcrError::NotAvailable => PipelineError::NotAvailable,
                source => PipelineError::Ocr { page, source },
            })?;
            tracing::debug!(page, chars = page_text.len(), "page recognized");
            text.push_str(&page_text);
            text.push('\n');
        }

        tracing::info!(pages = pages.len(), "statement text extracted");
        Ok(text)
    }

    fn recognize_page(&self, image: &[u8]) -> Result<String, OcrError> {
        let chain = self
            .languages
            .iter()
            .map(|l| Some(l.as_str()))
            .chain(std::iter::once(None));

        let mut last_err = None;
        for language in chain {
            match self.recognizer.recognize(image, language) {
                Ok(text) => return Ok(text),
                Err(OcrError::NotAvailable) => return Err(OcrError::NotAvailable),
                Err(e) => {
                    tracing::warn!(language = language.unwrap_or("default"), "OCR attempt failed: {e}");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or(OcrError::NotAvailable))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
