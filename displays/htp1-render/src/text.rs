//! Label text preparation
//!
//! Turns raw status strings into what is drawn: the abbreviated codec line
//! and the friendly input name.

use heapless::String;
use htp1_core::config::InputName;
use htp1_core::status::LABEL_CAPACITY;

/// Capacity of one drawn line (two labels joined by a space)
pub const LINE_CAPACITY: usize = 2 * LABEL_CAPACITY + 1;

/// Text of one drawn line
pub type Line = String<LINE_CAPACITY>;

/// Literal replacements applied in order
///
/// A literal containing another must come first.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Dolby Digital Plus", "DD+"),
    ("Dolby TrueHD", "TrueHD"),
    ("Dolby Digital", "DD"),
    ("Dolby Atmos", "Atmos"),
    ("DTS-HD Master Audio", "DTS-HD MA"),
    ("DTS-HD High Resolution", "DTS-HD HR"),
    ("Object Audio", ""),
    ("(Legacy)", ""),
    ("Legacy", ""),
];

/// Build the codec/format line
///
/// `codec` and `format` are joined with a space (the format is left out
/// when empty), known audio-format names are abbreviated, runs of spaces
/// are collapsed and the ends trimmed.
pub fn codec_line(codec: &str, format: &str) -> Line {
    let mut line = Line::new();
    let _ = line.push_str(codec);
    if !format.is_empty() {
        let _ = line.push(' ');
        let _ = line.push_str(format);
    }

    for (from, to) in ABBREVIATIONS {
        replace_all(&mut line, from, to);
    }

    collapse_spaces(&line)
}

fn replace_all(line: &mut Line, from: &str, to: &str) {
    if !line.contains(from) {
        return;
    }

    let mut out = Line::new();
    let mut rest = line.as_str();
    while let Some(at) = rest.find(from) {
        let _ = out.push_str(&rest[..at]);
        let _ = out.push_str(to);
        rest = &rest[at + from.len()..];
    }
    let _ = out.push_str(rest);
    *line = out;
}

fn collapse_spaces(text: &str) -> Line {
    let mut out = Line::new();
    for word in text.split_whitespace() {
        if !out.is_empty() {
            let _ = out.push(' ');
        }
        let _ = out.push_str(word);
    }
    out
}

/// Resolve an input code to its friendly name
///
/// The first entry whose code matches exactly and whose name is non-empty
/// wins. Falls back to the raw code.
pub fn input_name<'a>(code: &'a str, names: &'a [InputName]) -> &'a str {
    names
        .iter()
        .find(|entry| entry.code.as_str() == code && !entry.name.is_empty())
        .map_or(code, |entry| entry.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_audio_suffix_dropped() {
        assert_eq!(codec_line("Dolby TrueHD", "Object Audio").as_str(), "TrueHD");
    }

    #[test]
    fn test_longest_literal_first() {
        assert_eq!(codec_line("Dolby Digital Plus", "").as_str(), "DD+");
        assert_eq!(codec_line("Dolby Digital", "5.1").as_str(), "DD 5.1");
        assert_eq!(
            codec_line("DTS-HD Master Audio", "Legacy").as_str(),
            "DTS-HD MA"
        );
    }

    #[test]
    fn test_format_omitted_when_empty() {
        assert_eq!(codec_line("PCM", "").as_str(), "PCM");
        assert_eq!(codec_line("", "Atmos").as_str(), "Atmos");
        assert!(codec_line("", "").is_empty());
    }

    #[test]
    fn test_spaces_collapsed_and_trimmed() {
        assert_eq!(
            codec_line("  Dolby TrueHD ", " Dolby Atmos ").as_str(),
            "TrueHD Atmos"
        );
        assert_eq!(codec_line("DTS:X", "(Legacy)  7.1").as_str(), "DTS:X 7.1");
    }

    #[test]
    fn test_unknown_names_untouched() {
        assert_eq!(codec_line("Auro-3D", "13.1").as_str(), "Auro-3D 13.1");
    }

    #[test]
    fn test_input_name_first_match_wins() {
        let names = [
            InputName::new("h1", "Apple TV"),
            InputName::new("h1", "Shadowed"),
            InputName::new("h2", "Blu-ray"),
        ];
        assert_eq!(input_name("h1", &names), "Apple TV");
        assert_eq!(input_name("h2", &names), "Blu-ray");
    }

    #[test]
    fn test_input_name_falls_back_to_code() {
        let names = [InputName::new("h1", ""), InputName::new("H3", "Case")];
        assert_eq!(input_name("h1", &names), "h1");
        assert_eq!(input_name("h3", &names), "h3");
        assert_eq!(input_name("usb", &[]), "usb");
    }

    #[test]
    fn test_empty_name_skipped_for_later_match() {
        let names = [InputName::new("h4", ""), InputName::new("h4", "Console")];
        assert_eq!(input_name("h4", &names), "Console");
    }
}
