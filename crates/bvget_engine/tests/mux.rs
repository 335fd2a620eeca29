use std::ffi::OsString;
use std::path::Path;

use bvget_engine::FfmpegMuxer;
use pretty_assertions::assert_eq;

#[test]
fn ffmpeg_arguments_copy_video_and_transcode_audio() {
    let muxer = FfmpegMuxer::default();
    let args = muxer.args(
        Path::new("video/X1_temp_v.mp4"),
        Path::new("video/X1_temp_a.mp3"),
        Path::new("video/X1_temp_out.mp4"),
    );

    let expected: Vec<OsString> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-i",
        "video/X1_temp_v.mp4",
        "-i",
        "video/X1_temp_a.mp3",
        "-c:v",
        "copy",
        "-c:a",
        "aac",
        "-strict",
        "experimental",
        "-y",
        "video/X1_temp_out.mp4",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    assert_eq!(args, expected);
}

#[test]
fn audio_codec_is_configurable() {
    let args = FfmpegMuxer::default().with_audio_codec("libopus").args(
        Path::new("v"),
        Path::new("a"),
        Path::new("o"),
    );
    assert!(args.windows(2).any(|w| w[0] == "-c:a" && w[1] == "libopus"));
}

// Spawning processes stays in one test so freshly written scripts are never
// executed while another test thread is forking.
#[cfg(unix)]
#[tokio::test]
async fn ffmpeg_muxer_runs_program_and_reports_exit_status() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use bvget_engine::{MuxError, Muxer};

    let temp = tempfile::TempDir::new().unwrap();
    let dir = temp.path();
    let video = dir.join("X1_temp_v.mp4");
    let audio = dir.join("X1_temp_a.mp3");
    let output = dir.join("X1_temp_out.mp4");
    fs::write(&video, "VIDEO").unwrap();
    fs::write(&audio, "AUDIO").unwrap();

    let write_script = |name: &str, body: &str| {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    };
    // $5 and $7 are the two inputs; the output is the last argument.
    let merging = write_script(
        "fake-ffmpeg",
        r#"for last; do :; done; cat "$5" "$7" > "$last""#,
    );
    let failing = write_script(
        "broken-ffmpeg",
        "echo 'first line' >&2; echo 'Invalid data found' >&2; exit 3",
    );

    FfmpegMuxer::new(&merging)
        .mux(&video, &audio, &output)
        .await
        .expect("fake merge succeeds");
    assert_eq!(fs::read_to_string(&output).unwrap(), "VIDEOAUDIO");

    let err = FfmpegMuxer::new(&failing)
        .mux(&video, &audio, &output)
        .await
        .unwrap_err();
    match err {
        MuxError::ExitStatus {
            code, stderr_tail, ..
        } => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr_tail, "first line | Invalid data found");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = FfmpegMuxer::new("false")
        .mux(&video, &audio, &output)
        .await
        .unwrap_err();
    assert!(matches!(err, MuxError::ExitStatus { code: Some(1), .. }));

    let err = FfmpegMuxer::new(dir.join("no-such-tool"))
        .mux(&video, &audio, &output)
        .await
        .unwrap_err();
    assert!(matches!(err, MuxError::Launch { .. }));
    assert!(err.to_string().starts_with("failed to launch"));
}
