//! Embedded image metadata (EXIF)

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ExtractError;

/// EXIF tag numbers used as naming fallbacks
pub const TAG_MAKE: u16 = 0x010F;
pub const TAG_MODEL: u16 = 0x0110;
pub const TAG_DATETIME: u16 = 0x0132;
pub const TAG_DATETIME_ORIGINAL: u16 = 0x9003;

/// Tags consulted by the metadata fallback, highest priority first:
/// camera model, camera make, then capture time
pub const FALLBACK_TAGS: [u16; 4] = [TAG_MODEL, TAG_MAKE, TAG_DATETIME_ORIGINAL, TAG_DATETIME];

/// Tag number -> scalar value rendered as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTagSet {
    tags: BTreeMap<u16, String>,
}

impl MetadataTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; blank values are dropped and the first value per tag wins
    pub fn insert(&mut self, tag: u16, value: impl Into<String>) {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.tags.entry(tag).or_insert_with(|| value.to_string());
    }

    pub fn get(&self, tag: u16) -> Option<&str> {
        self.tags.get(&tag).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// First present value among [`FALLBACK_TAGS`]
    pub fn naming_fallback(&self) -> Option<&str> {
        FALLBACK_TAGS.iter().find_map(|tag| self.get(*tag))
    }
}

impl<S: Into<String>> FromIterator<(u16, S)> for MetadataTagSet {
    fn from_iter<I: IntoIterator<Item = (u16, S)>>(iter: I) -> Self {
        let mut set = MetadataTagSet::new();
        for (tag, value) in iter {
            set.insert(tag, value);
        }
        set
    }
}

/// Reads the metadata tag set of one image. A missing metadata block is an
/// empty set, not an error.
pub trait MetadataReader: Send + Sync {
    fn read_tags(&self, path: &Path) -> Result<MetadataTagSet, ExtractError>;
}

/// EXIF reader backed by kamadak-exif
#[cfg(feature = "exif")]
#[derive(Debug, Clone, Default)]
pub struct ExifReader;

#[cfg(feature = "exif")]
impl MetadataReader for ExifReader {
    fn read_tags(&self, path: &Path) -> Result<MetadataTagSet, ExtractError> {
        let file = std::fs::File::open(path).map_err(|e| ExtractError::io(path, e))?;
        let mut reader = std::io::BufReader::new(file);

        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(MetadataTagSet::new()),
            Err(e) => return Err(ExtractError::Metadata(e.to_string())),
        };

        let tags: MetadataTagSet = exif
            .fields()
            .filter(|field| field.ifd_num == exif::In::PRIMARY)
            .filter_map(|field| field_text(field).map(|text| (field.tag.number(), text)))
            .collect();

        tracing::debug!("[Metadata] {} tags from {}", tags.len(), path.display());
        Ok(tags)
    }
}

/// ASCII values are read raw (display_value would quote them); everything
/// else uses the crate's display form
#[cfg(feature = "exif")]
fn field_text(field: &exif::Field) -> Option<String> {
    match &field.value {
        exif::Value::Ascii(parts) => parts.first().map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_end_matches('\0')
                .trim()
                .to_string()
        }),
        _ => Some(field.display_value().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_beats_make_and_time() {
        let tags: MetadataTagSet = [
            (TAG_DATETIME_ORIGINAL, "2021:06:01 10:00:00"),
            (TAG_MAKE, "Canon"),
            (TAG_MODEL, "Canon EOS 80D"),
        ]
        .into_iter()
        .collect();

        assert_eq!(tags.naming_fallback(), Some("Canon EOS 80D"));
    }

    #[test]
    fn test_make_then_capture_time() {
        let tags: MetadataTagSet = [(TAG_MAKE, "NIKON"), (TAG_DATETIME_ORIGINAL, "2020:01:01")]
            .into_iter()
            .collect();
        assert_eq!(tags.naming_fallback(), Some("NIKON"));

        let tags: MetadataTagSet = [(TAG_DATETIME_ORIGINAL, "2020:01:01 08:00:00")]
            .into_iter()
            .collect();
        assert_eq!(tags.naming_fallback(), Some("2020:01:01 08:00:00"));
    }

    #[test]
    fn test_blank_values_are_absent() {
        let tags: MetadataTagSet = [(TAG_MODEL, "   "), (0x0112, "1")].into_iter().collect();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.naming_fallback(), None);
    }

    #[cfg(feature = "exif")]
    #[test]
    fn test_exif_reader_on_non_image_is_error_or_empty() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::with_suffix(".jpg").unwrap();
        file.write_all(b"\x00\x01").unwrap();

        match ExifReader.read_tags(file.path()) {
            Ok(tags) => assert!(tags.is_empty()),
            Err(e) => assert!(matches!(e, ExtractError::Metadata(_))),
        }
    }
}
