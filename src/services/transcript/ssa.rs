use super::{join_cue_lines, strip_delimited};

/// Field count of the standard `[Events]` format line; `Text` is last.
const DEFAULT_EVENT_FIELDS: usize = 10;

pub(super) fn parse_cues(document: &str) -> Vec<String> {
    let mut fields = DEFAULT_EVENT_FIELDS;
    let mut in_events = false;
    let mut cues = Vec::new();

    for line in document.lines() {
        let line = line.trim();

        if line.starts_with('[') && line.ends_with(']') {
            in_events = line.eq_ignore_ascii_case("[events]");
            continue;
        }

        if in_events {
            if let Some(format) = line.strip_prefix("Format:") {
                fields = format.split(',').count().max(1);
                continue;
            }
        }

        let Some(event) = line.strip_prefix("Dialogue:") else {
            continue;
        };

        // The text field may itself contain commas, so only split off the leading fields.
        let parts: Vec<&str> = event.splitn(fields, ',').collect();
        if parts.len() < fields {
            continue;
        }

        let text = strip_delimited(parts[fields - 1], '{', '}')
            .replace("\\N", " ")
            .replace("\\n", " ")
            .replace("\\h", " ");
        if let Some(cue) = join_cue_lines([text.as_str()]) {
            cues.push(cue);
        }
    }

    cues
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "[Script Info]\nTitle: Sample\nScriptType: v4.00+\n\n\
        [V4+ Styles]\nFormat: Name, Fontname, Fontsize\nStyle: Default,Arial,20\n\n\
        [Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n";

    #[test]
    fn test_only_dialogue_text_is_kept() {
        let doc = format!(
            "{HEADER}Comment: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,ignored\n\
             Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Some more of the speech"
        );
        assert_eq!(parse_cues(&doc), vec!["Some more of the speech".to_string()]);
    }

    #[test]
    fn test_override_tags_and_line_breaks_are_removed() {
        let doc = format!(
            "{HEADER}Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{{\\i1}}Well,{{\\i0}} hello\\Nthere, friend"
        );
        assert_eq!(parse_cues(&doc), vec!["Well, hello there, friend".to_string()]);
    }

    #[test]
    fn test_custom_format_line_changes_field_count() {
        let doc = "[Events]\nFormat: Start, End, Text\nDialogue: 0:00:01.00,0:00:02.00,short, format";
        assert_eq!(parse_cues(doc), vec!["short, format".to_string()]);
    }

    #[test]
    fn test_truncated_dialogue_is_skipped() {
        let doc = format!("{HEADER}Dialogue: 0,0:00:01.00,broken\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,ok");
        assert_eq!(parse_cues(&doc), vec!["ok".to_string()]);
    }
}
