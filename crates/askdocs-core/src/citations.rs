//! Citation marker extraction from streamed answer text.
//!
//! Answers embed markers of the literal form `[Source: <name>, Page: <n>]`.
//! Extraction re-runs over the full accumulated text after every stream
//! increment, so a marker split across chunks simply fails to match until
//! its closing bracket arrives — no resumable parser state is needed.

use once_cell::sync::Lazy;
use regex::Regex;

static CITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[Source: (.+?), Page: (\d+)\]").unwrap());

/// One renderable piece of an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Citation {
        /// Matches a tracked document's `name`.
        source_name: String,
        page: u32,
        /// The original marker text, rendered verbatim.
        label: String,
    },
}

impl Segment {
    /// The text this segment contributes to the displayed answer.
    pub fn display(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Citation { label, .. } => label,
        }
    }

    pub fn is_citation(&self) -> bool {
        matches!(self, Segment::Citation { .. })
    }
}

/// Split `text` into plain-text and citation segments.
///
/// Concatenating the segments' display values reconstructs `text` exactly.
/// The trailing text after the last marker is always emitted, even when
/// empty, so characters appended by the next stream increment extend a
/// text segment instead of vanishing. Pure: identical input yields
/// identical output (no scan position carried between calls).
pub fn extract_citations(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    if text.is_empty() {
        return segments;
    }

    let mut last = 0;
    for caps in CITATION_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        // A page too large for u32 leaves the marker as plain text.
        let Ok(page) = caps[2].parse::<u32>() else {
            continue;
        };
        if m.start() > last {
            segments.push(Segment::Text(text[last..m.start()].to_string()));
        }
        segments.push(Segment::Citation {
            source_name: caps[1].to_string(),
            page,
            label: m.as_str().to_string(),
        });
        last = m.end();
    }

    segments.push(Segment::Text(text[last..].to_string()));
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.display()).collect()
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(extract_citations("").is_empty());
    }

    #[test]
    fn plain_text_passes_through() {
        let segments = extract_citations("no markers here");
        assert_eq!(segments, vec![Segment::Text("no markers here".into())]);
    }

    #[test]
    fn single_citation_with_surrounding_text() {
        let segments = extract_citations("See [Source: report.pdf, Page: 3] for details");
        assert_eq!(
            segments,
            vec![
                Segment::Text("See ".into()),
                Segment::Citation {
                    source_name: "report.pdf".into(),
                    page: 3,
                    label: "[Source: report.pdf, Page: 3]".into(),
                },
                Segment::Text(" for details".into()),
            ]
        );
    }

    #[test]
    fn multi_citation_splits_into_three_segments() {
        let segments = extract_citations("[Source: A, Page: 1] mid [Source: B, Page: 2]");
        assert_eq!(segments.len(), 4); // two citations, " mid ", empty tail
        assert_eq!(
            segments[0],
            Segment::Citation {
                source_name: "A".into(),
                page: 1,
                label: "[Source: A, Page: 1]".into(),
            }
        );
        assert_eq!(segments[1], Segment::Text(" mid ".into()));
        assert_eq!(
            segments[2],
            Segment::Citation {
                source_name: "B".into(),
                page: 2,
                label: "[Source: B, Page: 2]".into(),
            }
        );
        assert_eq!(segments[3], Segment::Text("".into()));
    }

    #[test]
    fn partial_marker_is_plain_text() {
        let segments = extract_citations("answer so far [Source: A, Pag");
        assert!(segments.iter().all(|s| !s.is_citation()));
        assert_eq!(reconstruct(&segments), "answer so far [Source: A, Pag");

        // Completing the marker in a later pass over the grown buffer matches.
        let segments = extract_citations("answer so far [Source: A, Page: 3]");
        let citations: Vec<_> = segments.iter().filter(|s| s.is_citation()).collect();
        assert_eq!(citations.len(), 1);
        assert_eq!(
            citations[0],
            &Segment::Citation {
                source_name: "A".into(),
                page: 3,
                label: "[Source: A, Page: 3]".into(),
            }
        );
    }

    #[test]
    fn reconstruction_is_exact() {
        let inputs = [
            "",
            "plain",
            "[Source: a.pdf, Page: 1]",
            "x[Source: a.pdf, Page: 1]y[Source: b.pdf, Page: 22]",
            "broken [Source: a.pdf, Page: ] marker",
            "unicode départ [Source: résumé.pdf, Page: 7] fin",
        ];
        for input in inputs {
            assert_eq!(reconstruct(&extract_citations(input)), input);
        }
    }

    #[test]
    fn extraction_is_idempotent() {
        let input = "a [Source: x, Page: 1] b [Source: y, Page: 2] c";
        let first = extract_citations(input);
        let second = extract_citations(&reconstruct(&first));
        assert_eq!(first, second);
    }

    #[test]
    fn name_may_contain_commas() {
        let segments = extract_citations("[Source: report, v2, final.pdf, Page: 9]");
        assert_eq!(
            segments[0],
            Segment::Citation {
                source_name: "report, v2, final.pdf".into(),
                page: 9,
                label: "[Source: report, v2, final.pdf, Page: 9]".into(),
            }
        );
    }

    #[test]
    fn malformed_markers_stay_plain_text() {
        for input in [
            "[Source: a.pdf Page: 3]",     // missing comma
            "[Source: a.pdf, Page: x]",    // non-numeric page
            "[source: a.pdf, Page: 3]",    // wrong case
            "[Source: a.pdf, Page: 3",     // unclosed
            "[Source: a.pdf, Page: 99999999999]", // page overflows u32
        ] {
            let segments = extract_citations(input);
            assert!(
                segments.iter().all(|s| !s.is_citation()),
                "expected no citation in {input:?}"
            );
            assert_eq!(reconstruct(&segments), input);
        }
    }

    #[test]
    fn repeated_calls_share_no_state() {
        let input = "a [Source: x, Page: 1] b";
        assert_eq!(extract_citations(input), extract_citations(input));
    }
}
