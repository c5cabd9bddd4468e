//! Plain-text transcripts from timed-text caption files.
//!
//! Each supported [`CaptionFormat`] maps to a cue parser that returns the
//! spoken text of every cue, in order, with timing, numbering and styling
//! removed. The transcript is the cues joined by a single space.
//!
//! Parsing is best effort: blocks that do not look like cues are skipped
//! instead of failing the whole file.

mod sbv;
mod srt;
mod ssa;
mod webvtt;

use crate::models::format::CaptionFormat;

/// Extracts cue text from a decoded caption document.
type CueParser = fn(&str) -> Vec<String>;

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Unable to generate a transcript for caption format: {0}")]
    UnsupportedFormat(String),
}

/// Generate a transcript from raw caption bytes tagged with a format tag.
pub fn generate(caption: &[u8], format: &str) -> Result<String, TranscriptError> {
    let format = parse_format(format)?;
    Ok(generate_for(caption, format))
}

/// Generate a transcript for a caption file whose format is already known.
pub fn generate_for(caption: &[u8], format: CaptionFormat) -> String {
    let document = decode(caption);
    let parse = parser_for(format);
    parse(&document).join(" ")
}

/// Resolve a format tag, reporting the offending tag when it is unknown.
pub fn parse_format(format: &str) -> Result<CaptionFormat, TranscriptError> {
    format
        .parse()
        .map_err(|_| TranscriptError::UnsupportedFormat(format.to_string()))
}

fn parser_for(format: CaptionFormat) -> CueParser {
    match format {
        CaptionFormat::Vtt => webvtt::parse_cues,
        CaptionFormat::Srt => srt::parse_cues,
        CaptionFormat::Sbv => sbv::parse_cues,
        CaptionFormat::Ssa => ssa::parse_cues,
    }
}

/// Lossy UTF-8 decode with the BOM dropped and line endings normalized to `\n`.
fn decode(caption: &[u8]) -> String {
    let text = String::from_utf8_lossy(caption);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split a document into blocks of non-blank lines.
fn blocks(document: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in document.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Join cue lines with single spaces, collapsing runs of whitespace.
/// Returns `None` when nothing but whitespace remains.
fn join_cue_lines<'a, I>(lines: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let words: Vec<&str> = lines
        .into_iter()
        .flat_map(|line| line.split_whitespace())
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Remove `<...>` markup such as `<i>`, `<v Speaker>` or `<00:00:01.000>`.
fn strip_tags(line: &str) -> String {
    strip_delimited(line, '<', '>')
}

/// Remove every `open ... close` span. An unterminated span is kept as text.
fn strip_delimited(line: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find(open) {
        match rest[start..].find(close) {
            Some(len) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + len + close.len_utf8()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Decode the handful of character references that show up in cue text.
fn decode_entities(line: &str) -> String {
    line.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&lrm;", "")
        .replace("&rlm;", "")
        .replace("&amp;", "&")
}

/// Index of the timing line (`... --> ...`) within the first `window` lines.
fn find_arrow_line(block: &[&str], window: usize) -> Option<usize> {
    block.iter().take(window).position(|line| line.contains("-->"))
}
