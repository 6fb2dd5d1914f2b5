/*!
 * Edit point records.
 *
 * `RawRow` is the record handed over by the external tabular loader; cells
 * may arrive as strings or numbers. `EditPoint` is the normalized candidate
 * the validators work on during one preflight run.
 */

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::timecode::TcFormat;

/// One input row as produced by the loader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Provenance row number (defaults to the 1-based position in the batch)
    #[serde(default, deserialize_with = "row_cell")]
    pub row: Option<usize>,

    /// Reel / tape name
    #[serde(default, alias = "tape", deserialize_with = "cell")]
    pub reel: Option<String>,

    /// Clip label
    #[serde(default, alias = "label", alias = "clip", deserialize_with = "cell")]
    pub clip_name: Option<String>,

    /// Source In timecode
    #[serde(default, alias = "tc_in", alias = "start_tc", deserialize_with = "cell")]
    pub src_tc_in: Option<String>,

    /// Source Out timecode (synthesized as In + 1 frame when absent)
    #[serde(default, alias = "tc_out", alias = "end_tc", deserialize_with = "cell")]
    pub src_tc_out: Option<String>,

    /// Frame rate
    #[serde(default, deserialize_with = "cell")]
    pub fps: Option<String>,

    /// `DF` or `NDF`
    #[serde(default, deserialize_with = "cell")]
    pub tc_format: Option<String>,

    /// Free-form identifier
    #[serde(default, deserialize_with = "cell")]
    pub uid: Option<String>,

    /// Record In timecode on the output timeline
    #[serde(default, deserialize_with = "cell")]
    pub rec_tc_in: Option<String>,

    #[serde(default, deserialize_with = "cell")]
    pub marker_name: Option<String>,

    #[serde(default, deserialize_with = "cell")]
    pub marker_color: Option<String>,

    #[serde(default, deserialize_with = "cell")]
    pub marker_note: Option<String>,

    #[serde(default, deserialize_with = "cell")]
    pub marker_duration: Option<String>,
}

/// Accept string, number or boolean cells; null stays missing
fn cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Row numbers may arrive as numbers or numeric strings; blank stays missing
fn row_cell<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = cell(deserializer)? else {
        return Ok(None);
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<usize>()
        .map(Some)
        .map_err(|_| D::Error::custom(format!("invalid row number: {:?}", text)))
}

/// Trimmed cell content, `None` when missing or blank
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Marker metadata carried through to NLE marker placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerInfo {
    pub name: String,
    pub color: Option<String>,
    pub note: Option<String>,
    /// Duration cell as supplied
    pub duration_raw: Option<String>,
    /// Duration in frames (at least 1 once validated)
    pub duration_frames: u64,
}

/// A candidate edit interval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditPoint {
    pub row_number: usize,
    pub reel: String,
    pub clip_name: String,

    /// Source In as supplied
    pub src_tc_in_raw: Option<String>,
    /// Source Out as supplied
    pub src_tc_out_raw: Option<String>,
    /// Normalized source In (empty until validated)
    pub src_tc_in: String,
    /// Normalized source Out (empty until validated)
    pub src_tc_out: String,
    /// Whether the Out point was synthesized from the In point
    pub out_synthesized: bool,

    /// Record In as supplied
    pub rec_tc_in: Option<String>,

    pub fps_raw: Option<String>,
    pub proj_fps: f64,
    pub tc_format_raw: Option<String>,
    pub tc_format: TcFormat,

    pub uid: Option<String>,
    pub marker: Option<MarkerInfo>,

    pub src_in_frames: Option<u64>,
    pub src_out_frames: Option<u64>,
    pub rec_in_frames: Option<u64>,
    pub duration_frames: Option<u64>,
}

impl EditPoint {
    /// Build a candidate from a loader row.
    ///
    /// `index` is the 0-based position in the batch; the run defaults seed
    /// the frame rate and timecode format until the validators settle them.
    pub fn from_row(row: &RawRow, index: usize, default_fps: f64, default_format: TcFormat) -> Self {
        let clip_name = non_blank(&row.clip_name).unwrap_or_default();

        let marker_fields = [
            &row.marker_name,
            &row.marker_color,
            &row.marker_note,
            &row.marker_duration,
        ];
        let marker = if marker_fields.iter().any(|f| non_blank(f).is_some()) {
            Some(MarkerInfo {
                name: non_blank(&row.marker_name).unwrap_or_else(|| clip_name.clone()),
                color: non_blank(&row.marker_color),
                note: non_blank(&row.marker_note),
                duration_raw: non_blank(&row.marker_duration),
                duration_frames: 1,
            })
        } else {
            None
        };

        Self {
            row_number: row.row.unwrap_or(index + 1),
            reel: row.reel.as_deref().map(str::trim).unwrap_or_default().to_string(),
            clip_name,
            src_tc_in_raw: non_blank(&row.src_tc_in),
            src_tc_out_raw: non_blank(&row.src_tc_out),
            src_tc_in: String::new(),
            src_tc_out: String::new(),
            out_synthesized: false,
            rec_tc_in: non_blank(&row.rec_tc_in),
            fps_raw: non_blank(&row.fps),
            proj_fps: default_fps,
            tc_format_raw: non_blank(&row.tc_format),
            tc_format: default_format,
            uid: non_blank(&row.uid),
            marker,
            src_in_frames: None,
            src_out_frames: None,
            rec_in_frames: None,
            duration_frames: None,
        }
    }

    /// Source interval in frames once both ends have been parsed
    pub fn interval(&self) -> Option<(u64, u64)> {
        Some((self.src_in_frames?, self.src_out_frames?))
    }

    /// Name written on the `FROM CLIP NAME` line
    pub fn display_name(&self) -> &str {
        if self.clip_name.is_empty() {
            &self.reel
        } else {
            &self.clip_name
        }
    }
}
