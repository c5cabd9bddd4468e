use super::{blocks, decode_entities, find_arrow_line, join_cue_lines, strip_delimited, strip_tags};

pub(super) fn parse_cues(document: &str) -> Vec<String> {
    blocks(document)
        .into_iter()
        .filter_map(|block| {
            // Index line, then `HH:MM:SS,mmm --> HH:MM:SS,mmm`. Some encoders omit the index.
            let timing = find_arrow_line(&block, 2)?;
            if timing == 1 && !is_index(block[0]) {
                return None;
            }

            let lines: Vec<String> = block[timing + 1..]
                .iter()
                .map(|line| decode_entities(&strip_delimited(&strip_tags(line), '{', '}')))
                .collect();
            join_cue_lines(lines.iter().map(String::as_str))
        })
        .collect()
}

fn is_index(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}
