use super::{blocks, decode_entities, find_arrow_line, join_cue_lines, strip_tags};

/// Block keywords whose content is never spoken text.
const NON_CUE_BLOCKS: [&str; 4] = ["WEBVTT", "NOTE", "STYLE", "REGION"];

pub(super) fn parse_cues(document: &str) -> Vec<String> {
    blocks(document)
        .into_iter()
        .filter_map(|block| {
            let timing = if is_metadata_block(block[0]) {
                // A cue may follow a header or note without a blank line.
                find_arrow_line(&block, block.len())?
            } else {
                // An optional cue identifier may precede the timing line.
                find_arrow_line(&block, 2)?
            };
            let lines: Vec<String> = block[timing + 1..]
                .iter()
                .map(|line| decode_entities(&strip_tags(line)))
                .collect();
            join_cue_lines(lines.iter().map(String::as_str))
        })
        .collect()
}

fn is_metadata_block(first_line: &str) -> bool {
    let first_line = first_line.trim_start();
    NON_CUE_BLOCKS.iter().any(|keyword| {
        first_line
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
    })
}
