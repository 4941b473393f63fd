//! Encode profile and ffmpeg command-line construction.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::Timestamp;

use super::caption::Caption;

/// Typed encoding parameters for the trim/re-encode pass.
///
/// Codecs are fixed (libx264 + aac in an mp4 with `+faststart`); the
/// profile only varies scale, preset, and bitrates. maxrate tracks the
/// video bitrate and bufsize is twice it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeProfile {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// x264 preset.
    pub preset: String,
    /// Video bitrate in kbps.
    pub video_bitrate_kbps: u32,
    /// Audio bitrate in kbps.
    pub audio_bitrate_kbps: u32,
}

impl Default for EncodeProfile {
    fn default() -> Self {
        Self {
            width: 256,
            height: 144,
            preset: "medium".to_string(),
            video_bitrate_kbps: 86,
            audio_bitrate_kbps: 64,
        }
    }
}

impl EncodeProfile {
    /// The complete `-vf` filter chain: scale, plus drawtext if a
    /// caption is present.
    pub fn filter_chain(&self, caption: Option<&Caption>) -> String {
        let scale = format!("scale={}:{}", self.width, self.height);
        match caption {
            Some(caption) => format!("{},{}", scale, caption.to_filter()),
            None => scale,
        }
    }

    /// Build the full ffmpeg argument vector for one encode.
    ///
    /// Argument order is fixed; every value arrives as its own argv
    /// element, so nothing here passes through a shell.
    pub fn build_args(
        &self,
        input: &Path,
        start: Timestamp,
        end: Timestamp,
        caption: Option<&Caption>,
        output: &Path,
    ) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-ss".to_string(),
            start.to_string(),
            "-to".to_string(),
            end.to_string(),
            "-vf".to_string(),
            self.filter_chain(caption),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-preset".to_string(),
            self.preset.clone(),
            "-b:v".to_string(),
            format!("{}k", self.video_bitrate_kbps),
            "-maxrate".to_string(),
            format!("{}k", self.video_bitrate_kbps),
            "-bufsize".to_string(),
            format!("{}k", self.video_bitrate_kbps * 2),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            format!("{}k", self.audio_bitrate_kbps),
            "-movflags".to_string(),
            "+faststart".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn default_profile_matches_cli_variant() {
        let profile = EncodeProfile::default();
        assert_eq!(profile.width, 256);
        assert_eq!(profile.height, 144);
        assert_eq!(profile.preset, "medium");
        assert_eq!(profile.video_bitrate_kbps, 86);
        assert_eq!(profile.audio_bitrate_kbps, 64);
    }

    #[test]
    fn args_follow_fixed_order_without_caption() {
        let profile = EncodeProfile::default();
        let args = profile.build_args(
            &PathBuf::from("/tmp/temp_full_video.mp4"),
            ts("00:01:00"),
            ts("00:01:30"),
            None,
            &PathBuf::from("/tmp/optimized_clip.mp4"),
        );

        let expected = [
            "-y",
            "-hide_banner",
            "-i",
            "/tmp/temp_full_video.mp4",
            "-ss",
            "00:01:00",
            "-to",
            "00:01:30",
            "-vf",
            "scale=256:144",
            "-c:v",
            "libx264",
            "-preset",
            "medium",
            "-b:v",
            "86k",
            "-maxrate",
            "86k",
            "-bufsize",
            "172k",
            "-c:a",
            "aac",
            "-b:a",
            "64k",
            "-movflags",
            "+faststart",
            "/tmp/optimized_clip.mp4",
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn caption_extends_the_filter_chain() {
        let profile = EncodeProfile::default();
        let caption = Caption::new("Title", "/fonts/arial.ttf", 16);
        let args = profile.build_args(
            &PathBuf::from("in.mp4"),
            ts("00:00:00"),
            ts("00:00:30"),
            Some(&caption),
            &PathBuf::from("out.mp4"),
        );

        let vf_pos = args.iter().position(|a| a == "-vf").unwrap();
        let chain = &args[vf_pos + 1];
        assert!(chain.starts_with("scale=256:144,drawtext=text='Title'"));
    }

    #[test]
    fn bufsize_is_twice_video_bitrate() {
        let profile = EncodeProfile {
            video_bitrate_kbps: 414,
            ..EncodeProfile::default()
        };
        let chain = profile.build_args(
            &PathBuf::from("in.mp4"),
            ts("00:00:00"),
            ts("00:00:10"),
            None,
            &PathBuf::from("out.mp4"),
        );

        let buf_pos = chain.iter().position(|a| a == "-bufsize").unwrap();
        assert_eq!(chain[buf_pos + 1], "828k");
    }

    #[test]
    fn reversed_range_is_passed_through() {
        // start > end is not this layer's problem; ffmpeg reports it
        let profile = EncodeProfile::default();
        let args = profile.build_args(
            &PathBuf::from("in.mp4"),
            ts("00:02:00"),
            ts("00:01:00"),
            None,
            &PathBuf::from("out.mp4"),
        );

        let ss_pos = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss_pos + 1], "00:02:00");
        let to_pos = args.iter().position(|a| a == "-to").unwrap();
        assert_eq!(args[to_pos + 1], "00:01:00");
    }
}
