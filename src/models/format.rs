use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Caption file formats the broker can request from vendors and turn into
/// transcripts. Tags are matched case-sensitively (`"vtt"`, not `"VTT"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CaptionFormat {
    /// WebVTT
    Vtt,
    /// SubRip
    Srt,
    /// YouTube SubViewer
    Sbv,
    /// SubStation Alpha / Advanced SubStation Alpha
    Ssa,
}

impl CaptionFormat {
    /// File extension used for outputs of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            CaptionFormat::Vtt => "vtt",
            CaptionFormat::Srt => "srt",
            CaptionFormat::Sbv => "sbv",
            CaptionFormat::Ssa => "ssa",
        }
    }
}
