use bvget_engine::{select_streams, ErrorKind, ItemError, PlayInfo, SelectedStreams, StreamKind};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn info(data: Value) -> PlayInfo {
    PlayInfo::from_value(json!({ "code": 0, "data": data })).expect("payload has data")
}

#[test]
fn first_backup_url_beats_base_url() {
    let payload = info(json!({
        "dash": {
            "video": [
                {"id": 80, "base_url": "https://v/base", "backup_url": ["https://v/b1", "https://v/b2"]},
                {"id": 64, "base_url": "https://v/other"}
            ],
            "audio": [
                {"base_url": "https://a/base", "backup_url": ["https://a/b1"]}
            ]
        }
    }));

    let streams = select_streams("BV1", &payload).unwrap();
    assert_eq!(
        streams,
        SelectedStreams {
            video_url: "https://v/b1".to_string(),
            audio_url: "https://a/b1".to_string(),
        }
    );
}

#[test]
fn base_url_used_when_backups_absent_or_empty() {
    let payload = info(json!({
        "dash": {
            "video": [{"base_url": "https://v/base", "backup_url": []}],
            "audio": [{"base_url": "https://a/base", "backup_url": null}]
        }
    }));

    let streams = select_streams("BV1", &payload).unwrap();
    assert_eq!(streams.video_url, "https://v/base");
    assert_eq!(streams.audio_url, "https://a/base");
}

#[test]
fn single_string_backup_is_accepted() {
    let payload = info(json!({
        "dash": {
            "video": [{"base_url": "https://v/base", "backup_url": "https://v/single"}],
            "audio": [{"base_url": "https://a/base"}]
        }
    }));

    let streams = select_streams("BV1", &payload).unwrap();
    assert_eq!(streams.video_url, "https://v/single");
}

#[test]
fn missing_or_empty_dash_is_unsupported() {
    for data in [
        json!({"durl": [{"url": "https://flv"}]}),
        json!({"dash": null}),
        json!({"dash": {}}),
    ] {
        let err = select_streams("BV5", &info(data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }
}

#[test]
fn empty_sequences_are_missing_streams() {
    let no_video = info(json!({"dash": {"video": [], "audio": [{"base_url": "https://a"}]}}));
    let err = select_streams("BV1", &no_video).unwrap_err();
    assert!(matches!(
        err,
        ItemError::MissingStream {
            stream: StreamKind::Video,
            ..
        }
    ));

    let no_audio = info(json!({"dash": {"video": [{"base_url": "https://v"}]}}));
    let err = select_streams("BV1", &no_audio).unwrap_err();
    assert!(matches!(
        err,
        ItemError::MissingStream {
            stream: StreamKind::Audio,
            ..
        }
    ));
}

#[test]
fn descriptor_without_any_address_is_missing() {
    let payload = info(json!({
        "dash": {
            "video": [{"base_url": "https://v"}],
            "audio": [{"base_url": "", "backup_url": []}]
        }
    }));

    let err = select_streams("BV9", &payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingStream);
    assert_eq!(err.to_string(), "no usable audio stream for BV9");
}
