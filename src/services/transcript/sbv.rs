use super::{blocks, decode_entities, join_cue_lines};

pub(super) fn parse_cues(document: &str) -> Vec<String> {
    blocks(document)
        .into_iter()
        .filter(|block| is_timing_line(block[0]))
        .filter_map(|block| {
            let lines: Vec<String> = block[1..].iter().map(|line| decode_entities(line)).collect();
            join_cue_lines(lines.iter().map(String::as_str))
        })
        .collect()
}

/// `H:MM:SS.mmm,H:MM:SS.mmm`
fn is_timing_line(line: &str) -> bool {
    line.trim()
        .split_once(',')
        .is_some_and(|(start, end)| is_timestamp(start) && is_timestamp(end))
}

fn is_timestamp(value: &str) -> bool {
    let Some((clock, millis)) = value.trim().rsplit_once('.') else {
        return false;
    };
    let fields: Vec<&str> = clock.split(':').collect();

    (2..=3).contains(&fields.len())
        && fields.iter().chain(std::iter::once(&millis)).all(|f| {
            !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit())
        })
}
