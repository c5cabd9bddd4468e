//! Caption files returned by the fake providers

#![allow(dead_code)]

pub const VTT_CAPTION: &str = "WEBVTT\n\nNOTE Paragraph\n\n00:00:09.240 --> 00:00:11.010\nWe're all talking\nabout the Iowa caucuses";

pub const SRT_CAPTION: &str = "1\n\
00:00:09,240 --> 00:00:11,010\n\
We’re all talking\n\
about the Iowa caucuses\n\
\n\
2\n\
00:00:11,010 --> 00:00:13,180\n\
right now, less than two weeks\n\
\n\
3\n\
00:00:13,180 --> 00:00:14,900\n\
till the Iowa caucuses.\n";

pub const SBV_CAPTION: &str = "0:00:09.240,0:00:11.010\n\
We're all talking\n\
about the Iowa caucuses\n\
\n\
0:00:11.010,0:00:13.180\n\
right now, less than two weeks\n\
\n\
0:00:13.180,0:00:14.900\n\
till the Iowa caucuses.\n";

pub const SSA_CAPTION: &str = "[Script Info]\n\
Title: Iowa\n\
ScriptType: v4.00\n\
\n\
[V4 Styles]\n\
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, TertiaryColour, BackColour, Bold, Italic, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, AlphaLevel, Encoding\n\
Style: Default,Arial,20,16777215,65535,65535,-2147483640,-1,0,1,3,0,2,30,30,30,0,0\n\
\n\
[Events]\n\
Format: Marked, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
Dialogue: Marked=0,0:00:01.18,0:00:06.85,Default,,0000,0000,0000,,Some more of the speech\n";

/// SRT whose second block is missing its timing line.
pub const SRT_WITH_BROKEN_BLOCK: &str = "1\n\
00:00:01,000 --> 00:00:02,000\n\
First line.\n\
\n\
2\n\
this block lost its timing\n\
\n\
3\n\
00:00:03,000 --> 00:00:04,000\n\
Last line.\n";

/// The spoken text of `SBV_CAPTION`.
pub const IOWA_TRANSCRIPT: &str =
    "We're all talking about the Iowa caucuses right now, less than two weeks till the Iowa caucuses.";

/// The spoken text of `SRT_CAPTION`, which uses a typographic apostrophe.
pub const IOWA_TRANSCRIPT_TYPOGRAPHIC: &str =
    "We’re all talking about the Iowa caucuses right now, less than two weeks till the Iowa caucuses.";
