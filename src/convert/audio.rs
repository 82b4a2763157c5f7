//! MP4 audio extraction via the ffmpeg binary.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::ConvertError;

/// Output sample rate for extracted audio.
pub const SAMPLE_RATE_HZ: u32 = 44_100;

/// Output bitrate for extracted audio, in kbit/s.
pub const BITRATE_KBPS: u32 = 192;

/// Extract the audio track of a video file as MP3 bytes.
///
/// ffmpeg writes into a named temporary file which is read back into
/// memory and removed when the handle drops. A missing ffmpeg binary,
/// a nonzero exit, or an empty result all surface as `ConvertError`.
pub async fn extract_mp3(input: &Path) -> Result<Vec<u8>, ConvertError> {
    let output_file = tempfile::Builder::new()
        .prefix("filetools_audio_")
        .suffix(".mp3")
        .tempfile()
        .map_err(|e| ConvertError::io("audio scratch file", e))?;

    let output = Command::new("ffmpeg")
        .args(build_args(input, output_file.path()))
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ConvertError::ffmpeg(format!("failed to run ffmpeg: {}", e), None))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ConvertError::ffmpeg(
            format!("ffmpeg exited with {}", output.status),
            Some(stderr),
        ));
    }

    let bytes = tokio::fs::read(output_file.path())
        .await
        .map_err(|e| ConvertError::io(output_file.path(), e))?;
    if bytes.is_empty() {
        return Err(ConvertError::ffmpeg("ffmpeg produced no audio output", None));
    }
    Ok(bytes)
}

fn build_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        // Drop the video stream, re-encode audio only
        "-vn".to_string(),
        "-c:a".to_string(),
        "libmp3lame".to_string(),
        "-ar".to_string(),
        SAMPLE_RATE_HZ.to_string(),
        "-b:a".to_string(),
        format!("{}k", BITRATE_KBPS),
        "-loglevel".to_string(),
        "error".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ffmpeg_available() -> bool {
        std::process::Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[test]
    fn args_fix_sample_rate_and_bitrate() {
        let args = build_args(Path::new("in.mp4"), Path::new("out.mp3"));
        let joined = args.join(" ");
        assert!(joined.contains("-ar 44100"));
        assert!(joined.contains("-b:a 192k"));
        assert!(joined.contains("-vn"));
        assert_eq!(args.last().unwrap(), "out.mp3");
    }

    #[tokio::test]
    async fn rejects_non_video_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("garbage.mp4");
        std::fs::write(&input, b"definitely not a video").unwrap();

        assert!(extract_mp3(&input).await.is_err());
    }

    #[tokio::test]
    async fn extracts_mp3_from_generated_video() {
        if !ffmpeg_available() {
            eprintln!("ffmpeg not available, skipping");
            return;
        }

        let dir = TempDir::new().unwrap();
        let input = dir.path().join("sample.mp4");
        // One second of 440 Hz sine over a blank video track
        let status = std::process::Command::new("ffmpeg")
            .args([
                "-y",
                "-f",
                "lavfi",
                "-i",
                "sine=frequency=440:duration=1",
                "-f",
                "lavfi",
                "-i",
                "color=c=black:s=64x64:d=1",
                "-c:v",
                "mpeg4",
                "-c:a",
                "aac",
                "-shortest",
            ])
            .arg(&input)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(status.success(), "fixture generation failed");

        let bytes = extract_mp3(&input).await.unwrap();
        // ID3v2 header or a bare MPEG frame sync
        assert!(bytes.starts_with(b"ID3") || bytes[0] == 0xFF);
        // 1 s at 192 kbit/s is roughly 24 KB; allow generous slack
        assert!(bytes.len() > 10_000, "suspiciously small output: {} bytes", bytes.len());
    }
}
