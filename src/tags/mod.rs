//! Artist and title extraction from uploaded audio.

use serde::{Deserialize, Serialize};
use symphonia::core::meta::{StandardTagKey, Tag};
use thiserror::Error;

use crate::audio::symphonia_reader::probe;

/// Descriptive tags reported back to the uploader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundTags {
    pub artist: Option<String>,
    pub title: Option<String>,
}

impl SoundTags {
    /// Fill still-missing fields from `tags`; earlier sources take precedence.
    fn absorb(&mut self, tags: &[Tag]) {
        for tag in tags {
            let slot = match (tag.std_key, tag.key.to_ascii_lowercase().as_str()) {
                (Some(StandardTagKey::Artist), _) | (None, "artist") => &mut self.artist,
                (Some(StandardTagKey::TrackTitle), _) | (None, "title") => &mut self.title,
                _ => continue,
            };
            if slot.is_some() {
                continue;
            }
            let value = tag.value.to_string();
            let value = value.trim();
            if !value.is_empty() {
                *slot = Some(value.to_string());
            }
        }
    }
}

/// Tag extraction failure.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The payload could not be parsed as a tagged audio container.
    #[error("Unable to read tags: {message}")]
    Unreadable { message: String },
}

/// Reads descriptive tags from an encoded payload.
pub trait TagReader: Send + Sync {
    /// Extract artist and title; absent tags are `None`, unparseable input is an error.
    fn read_tags(&self, bytes: &[u8]) -> Result<SoundTags, MetadataError>;
}

/// Tag reader backed by symphonia's container and ID3/Vorbis comment parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaTagReader;

impl TagReader for SymphoniaTagReader {
    fn read_tags(&self, bytes: &[u8]) -> Result<SoundTags, MetadataError> {
        if bytes.is_empty() {
            return Err(MetadataError::Unreadable {
                message: "empty payload".into(),
            });
        }
        let mut probed = probe(bytes).map_err(|error| MetadataError::Unreadable {
            message: error.to_string(),
        })?;
        let mut tags = SoundTags::default();
        if let Some(metadata) = probed.metadata.get() {
            if let Some(revision) = metadata.current() {
                tags.absorb(revision.tags());
            }
        }
        let mut format = probed.format;
        if let Some(revision) = format.metadata().current() {
            tags.absorb(revision.tags());
        }
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symphonia::core::meta::Value;

    fn tag(std_key: Option<StandardTagKey>, key: &str, value: &str) -> Tag {
        Tag::new(std_key, key, Value::String(value.to_string()))
    }

    fn silent_wav() -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("create wav writer");
            for _ in 0..64 {
                writer.write_sample(0_i16).expect("write sample");
            }
            writer.finalize().expect("finalize wav");
        }
        cursor.into_inner()
    }

    #[test]
    fn standard_keys_fill_artist_and_title() {
        let mut tags = SoundTags::default();
        tags.absorb(&[
            tag(Some(StandardTagKey::Album), "TALB", "Ignored"),
            tag(Some(StandardTagKey::Artist), "TPE1", " Example Artist "),
            tag(Some(StandardTagKey::TrackTitle), "TIT2", "Night"),
        ]);
        assert_eq!(tags.artist.as_deref(), Some("Example Artist"));
        assert_eq!(tags.title.as_deref(), Some("Night"));
    }

    #[test]
    fn first_source_wins_and_blank_values_are_skipped() {
        let mut tags = SoundTags::default();
        tags.absorb(&[tag(Some(StandardTagKey::Artist), "TPE1", "   ")]);
        tags.absorb(&[tag(None, "ARTIST", "Fallback")]);
        tags.absorb(&[tag(Some(StandardTagKey::Artist), "TPE1", "Later")]);
        assert_eq!(tags.artist.as_deref(), Some("Fallback"));
        assert_eq!(tags.title, None);
    }

    #[test]
    fn untagged_wav_yields_empty_tags() {
        let tags = SymphoniaTagReader.read_tags(&silent_wav()).unwrap();
        assert_eq!(tags, SoundTags::default());
    }

    #[test]
    fn garbage_is_unreadable() {
        let err = SymphoniaTagReader.read_tags(b"not an audio container").unwrap_err();
        assert!(matches!(err, MetadataError::Unreadable { .. }));
        assert!(SymphoniaTagReader.read_tags(&[]).is_err());
    }

    #[test]
    fn tags_serialize_missing_fields_as_null() {
        let json = serde_json::to_value(SoundTags::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "artist": null, "title": null }));
    }
}
