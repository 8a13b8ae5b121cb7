//! Image fallback chain
//!
//! When text samples produce no name, images are labeled by an ordered chain
//! of strategies: OCR, then embedded metadata, then semantic labels. The first
//! non-empty answer wins. Which strategies exist is decided once, at startup,
//! from the detected [`Capabilities`]; a strategy that is not available is not
//! in the chain at all.

pub mod metadata;
pub mod ocr;
pub mod semantic;

use std::path::Path;

use crate::error::ExtractError;
use crate::utils::truncate_chars;

pub use metadata::{MetadataReader, MetadataTagSet};
pub use ocr::{OcrEngine, TesseractOcr};
pub use semantic::SemanticLabeler;

#[cfg(feature = "exif")]
pub use metadata::ExifReader;

/// Optional capabilities of the running environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub ocr: bool,
    pub metadata: bool,
    pub semantic_labels: bool,
}

impl Capabilities {
    /// Probe the environment. Call once; the result is not refreshed.
    pub fn detect() -> Self {
        let caps = Self {
            ocr: TesseractOcr::new().is_available(),
            metadata: cfg!(feature = "exif"),
            semantic_labels: true,
        };
        tracing::info!(
            "[Vision] Capabilities: ocr={} metadata={} semantic_labels={}",
            caps.ocr,
            caps.metadata,
            caps.semantic_labels
        );
        caps
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Which strategy produced a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    Ocr,
    Metadata,
    SemanticLabel,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Ocr => "ocr",
            StrategyKind::Metadata => "metadata",
            StrategyKind::SemanticLabel => "semantic label",
        }
    }
}

/// One step of the chain. `Ok(None)` means "nothing here, try the next one".
pub trait ImageStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;
    fn label(&self, path: &Path, max_chars: usize) -> Result<Option<String>, ExtractError>;
}

/// OCR step: non-empty recognized text, truncated to the budget
pub struct OcrStrategy {
    engine: Box<dyn OcrEngine>,
}

impl OcrStrategy {
    pub fn new(engine: Box<dyn OcrEngine>) -> Self {
        Self { engine }
    }
}

impl ImageStrategy for OcrStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ocr
    }

    fn label(&self, path: &Path, max_chars: usize) -> Result<Option<String>, ExtractError> {
        let text = self.engine.recognize(path)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(truncate_chars(text, max_chars).to_string()))
    }
}

/// Metadata step: camera model, make, or capture time
pub struct MetadataStrategy {
    reader: Box<dyn MetadataReader>,
}

impl MetadataStrategy {
    pub fn new(reader: Box<dyn MetadataReader>) -> Self {
        Self { reader }
    }
}

impl ImageStrategy for MetadataStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Metadata
    }

    fn label(&self, path: &Path, _max_chars: usize) -> Result<Option<String>, ExtractError> {
        let tags = self.reader.read_tags(path)?;
        Ok(tags.naming_fallback().map(str::to_string))
    }
}

/// Semantic step: first label, if the labeler ever returns one
pub struct SemanticStrategy {
    labeler: SemanticLabeler,
}

impl SemanticStrategy {
    pub fn new(labeler: SemanticLabeler) -> Self {
        Self { labeler }
    }
}

impl ImageStrategy for SemanticStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SemanticLabel
    }

    fn label(&self, path: &Path, _max_chars: usize) -> Result<Option<String>, ExtractError> {
        Ok(self.labeler.labels(path).into_iter().next())
    }
}

/// Ordered OCR -> metadata -> semantic chain
pub struct ImageFallbackChain {
    strategies: Vec<Box<dyn ImageStrategy>>,
    max_chars: usize,
}

impl ImageFallbackChain {
    /// Chain with the production engines for every detected capability
    pub fn from_capabilities(caps: Capabilities, max_chars: usize) -> Self {
        let mut builder = ImageFallbackChainBuilder::new(max_chars);
        if caps.ocr {
            builder = builder.ocr(Box::new(TesseractOcr::new()));
        }
        if caps.metadata {
            if let Some(reader) = default_metadata_reader() {
                builder = builder.metadata(reader);
            }
        }
        if caps.semantic_labels {
            builder = builder.semantic(SemanticLabeler::new());
        }
        builder.build()
    }

    /// Chain with no strategies; every image yields nothing
    pub fn empty(max_chars: usize) -> Self {
        ImageFallbackChainBuilder::new(max_chars).build()
    }

    pub fn builder(max_chars: usize) -> ImageFallbackChainBuilder {
        ImageFallbackChainBuilder::new(max_chars)
    }

    pub fn has(&self, kind: StrategyKind) -> bool {
        self.strategies.iter().any(|s| s.kind() == kind)
    }

    pub fn kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Label an image; `None` when every strategy came up empty or failed
    pub fn label_image(&self, path: &Path) -> Option<String> {
        self.label_image_with_source(path).map(|(label, _)| label)
    }

    /// Like [`label_image`](Self::label_image), also reporting which step answered
    pub fn label_image_with_source(&self, path: &Path) -> Option<(String, StrategyKind)> {
        for strategy in &self.strategies {
            match strategy.label(path, self.max_chars) {
                Ok(Some(label)) if !label.trim().is_empty() => {
                    tracing::debug!(
                        "[Vision] {} labeled {}",
                        strategy.kind().as_str(),
                        path.display()
                    );
                    return Some((label, strategy.kind()));
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(
                        "[Vision] {} failed for {}: {}",
                        strategy.kind().as_str(),
                        path.display(),
                        e
                    );
                }
            }
        }
        None
    }

    /// Run only the OCR step (used by the extractor for image samples)
    pub fn ocr_text(&self, path: &Path, max_chars: usize) -> Result<String, ExtractError> {
        let ocr = self
            .strategies
            .iter()
            .find(|s| s.kind() == StrategyKind::Ocr)
            .ok_or(ExtractError::CapabilityMissing("ocr"))?;

        ocr.label(path, max_chars)?.ok_or(ExtractError::Empty)
    }
}

#[cfg(feature = "exif")]
fn default_metadata_reader() -> Option<Box<dyn MetadataReader>> {
    Some(Box::new(ExifReader))
}

#[cfg(not(feature = "exif"))]
fn default_metadata_reader() -> Option<Box<dyn MetadataReader>> {
    None
}

/// Assembles a chain in the fixed OCR -> metadata -> semantic order,
/// regardless of the order the steps are supplied in
pub struct ImageFallbackChainBuilder {
    ocr: Option<Box<dyn OcrEngine>>,
    metadata: Option<Box<dyn MetadataReader>>,
    semantic: Option<SemanticLabeler>,
    max_chars: usize,
}

impl ImageFallbackChainBuilder {
    fn new(max_chars: usize) -> Self {
        Self {
            ocr: None,
            metadata: None,
            semantic: None,
            max_chars,
        }
    }

    pub fn ocr(mut self, engine: Box<dyn OcrEngine>) -> Self {
        self.ocr = Some(engine);
        self
    }

    pub fn metadata(mut self, reader: Box<dyn MetadataReader>) -> Self {
        self.metadata = Some(reader);
        self
    }

    pub fn semantic(mut self, labeler: SemanticLabeler) -> Self {
        self.semantic = Some(labeler);
        self
    }

    pub fn build(self) -> ImageFallbackChain {
        let mut strategies: Vec<Box<dyn ImageStrategy>> = Vec::new();
        if let Some(engine) = self.ocr {
            strategies.push(Box::new(OcrStrategy::new(engine)));
        }
        if let Some(reader) = self.metadata {
            strategies.push(Box::new(MetadataStrategy::new(reader)));
        }
        if let Some(labeler) = self.semantic {
            strategies.push(Box::new(SemanticStrategy::new(labeler)));
        }
        ImageFallbackChain {
            strategies,
            max_chars: self.max_chars,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// OCR engine answering with a fixed result
    pub struct StubOcr(pub Result<String, String>);

    impl StubOcr {
        pub fn text(text: &str) -> Box<dyn OcrEngine> {
            Box::new(StubOcr(Ok(text.to_string())))
        }

        pub fn failing() -> Box<dyn OcrEngine> {
            Box::new(StubOcr(Err("engine crashed".to_string())))
        }
    }

    impl OcrEngine for StubOcr {
        fn recognize(&self, _path: &Path) -> Result<String, ExtractError> {
            self.0.clone().map_err(ExtractError::Ocr)
        }
    }

    /// Metadata reader answering with a fixed tag set
    pub struct StubMetadata(pub MetadataTagSet);

    impl StubMetadata {
        pub fn tags(tags: &[(u16, &str)]) -> Box<dyn MetadataReader> {
            Box::new(StubMetadata(tags.iter().map(|(t, v)| (*t, *v)).collect()))
        }
    }

    impl MetadataReader for StubMetadata {
        fn read_tags(&self, _path: &Path) -> Result<MetadataTagSet, ExtractError> {
            Ok(self.0.clone())
        }
    }
}
