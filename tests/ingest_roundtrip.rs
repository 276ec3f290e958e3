mod support;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use soundpeaks::tags::MetadataError;
use soundpeaks::{IngestError, SoundService, SoundStore, WaveformError};
use support::aiff::constant_aiff;
use support::wav::{constant_stereo, float_wav_bytes, read_spec};
use tempfile::TempDir;

fn service() -> (TempDir, SoundService) {
    let temp = tempfile::tempdir().expect("create tempdir");
    let store = SoundStore::new(temp.path().join("upload"), []);
    (temp, SoundService::new(store))
}

#[test]
fn ingested_upload_is_stored_as_canonical_wav() {
    let (_temp, service) = service();
    let upload = float_wav_bytes(2, 48_000, &vec![0.25; 4_800 * 2]);

    let receipt = service.ingest(&upload).expect("ingest");

    assert_eq!(receipt.artist, None);
    assert_eq!(receipt.title, None);
    let stored = service.store().read(&receipt.id).expect("read stored asset");
    let (spec, _) = read_spec(&stored);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44_100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
}

#[test]
fn ingested_asset_reduces_to_its_level() {
    let (_temp, service) = service();
    let receipt = service
        .ingest(&constant_stereo(1_000, 0.5, 44_100))
        .expect("ingest");

    let summary = service.waveform(receipt.id.as_str()).expect("waveform");

    assert_eq!(summary.peaks.len(), 100);
    assert!(summary.peaks.iter().all(|&peak| peak == 0.5));
    assert_eq!(summary.max, 0.5);
}

#[test]
fn aiff_upload_is_transcoded_and_reduced() {
    let (_temp, service) = service();

    let receipt = service
        .ingest(&constant_aiff(2, 1_000, 16_384, 44_100))
        .expect("ingest aiff");

    let stored = service.store().read(&receipt.id).expect("read stored asset");
    let (spec, samples) = read_spec(&stored);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44_100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(samples, 2_000);

    let summary = service.waveform(receipt.id.as_str()).expect("waveform");
    assert_eq!(summary.peaks.len(), 100);
    assert_eq!(summary.max, 0.5);
}

#[test]
fn identical_uploads_get_distinct_ids() {
    let (_temp, service) = service();
    let upload = constant_stereo(64, 0.1, 44_100);
    let first = service.ingest(&upload).expect("first ingest");
    let second = service.ingest(&upload).expect("second ingest");
    assert_ne!(first.id, second.id);
    assert!(service.store().exists(&first.id));
    assert!(service.store().exists(&second.id));
}

#[test]
fn undecodable_upload_is_rejected_without_storing() {
    let (temp, service) = service();

    let err = service
        .ingest(b"definitely not audio")
        .expect_err("garbage should fail");

    assert!(
        matches!(err, IngestError::Metadata(MetadataError::Unreadable { .. })),
        "{err:?}"
    );
    let sounds = temp.path().join("upload").join("sounds");
    let stored = std::fs::read_dir(&sounds).map(|dir| dir.count()).unwrap_or(0);
    assert_eq!(stored, 0);
}

#[test]
fn empty_upload_is_rejected() {
    let (_temp, service) = service();
    assert!(matches!(service.ingest(&[]), Err(IngestError::EmptyUpload)));
}

#[test]
fn concurrent_ingests_are_independent() {
    let (_temp, service) = service();
    let service = Arc::new(service);
    let handles: Vec<_> = (0..6)
        .map(|n| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let level = 0.1 * (n + 1) as f32;
                let receipt = service
                    .ingest(&constant_stereo(500, level, 44_100))
                    .expect("ingest");
                let summary = service.waveform(receipt.id.as_str()).expect("waveform");
                (receipt.id, summary.max)
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let (id, max) = handle.join().expect("join ingest thread");
        assert!(max > 0.0);
        assert!(ids.insert(id));
    }
    assert_eq!(ids.len(), 6);
}

#[test]
fn receipt_id_is_usable_for_lookup_but_unknown_ids_are_not() {
    let (_temp, service) = service();
    service
        .ingest(&constant_stereo(10, 0.2, 44_100))
        .expect("ingest");
    assert!(matches!(
        service.waveform("00000000-0000-0000-0000-000000000000"),
        Err(WaveformError::NotFound { .. })
    ));
}
