use askdocs_core::citations::{Segment, extract_citations};
use askdocs_core::QueryScope;

/// State of the QA panel: the question being typed and the streamed answer.
#[derive(Debug)]
pub struct AnswerState {
    pub query: String,
    pub scope: QueryScope,
    /// Accumulated answer text for the current generation.
    pub answer: String,
    /// Segments derived from `answer`; rebuilt on every update.
    pub segments: Vec<Segment>,
    /// Index into `segments` of the highlighted citation, if any.
    pub citation_cursor: Option<usize>,
    /// True from ask submission until stream end or failure.
    pub loading: bool,
    /// The stream ended abnormally; the text above is all that arrived.
    pub interrupted: bool,
    /// Generation of the ask whose events are currently accepted.
    pub generation: u64,
    pub scroll: u16,
}

impl AnswerState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            scope: QueryScope::ThisDocument,
            answer: String::new(),
            segments: Vec::new(),
            citation_cursor: None,
            loading: false,
            interrupted: false,
            generation: 0,
            scroll: 0,
        }
    }

    /// Begin a new exchange, superseding any stream still running.
    /// Returns the new generation to tag the ask with.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.answer.clear();
        self.segments.clear();
        self.citation_cursor = None;
        self.loading = true;
        self.interrupted = false;
        self.scroll = 0;
        self.generation
    }

    /// Replace the visible answer and re-derive citation segments.
    pub fn set_answer(&mut self, text: String) {
        self.segments = extract_citations(&text);
        self.answer = text;
        // Drop the cursor if its segment is no longer a citation.
        if let Some(cursor) = self.citation_cursor
            && !self.segments.get(cursor).is_some_and(Segment::is_citation)
        {
            self.citation_cursor = None;
        }
    }

    /// Segment indices of all citations, in answer order.
    pub fn citation_indices(&self) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_citation())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn next_citation(&mut self) {
        let indices = self.citation_indices();
        if indices.is_empty() {
            return;
        }
        self.citation_cursor = Some(match self.citation_cursor {
            None => indices[0],
            Some(cur) => indices
                .iter()
                .copied()
                .find(|&i| i > cur)
                .unwrap_or(indices[0]),
        });
    }

    pub fn prev_citation(&mut self) {
        let indices = self.citation_indices();
        if indices.is_empty() {
            return;
        }
        self.citation_cursor = Some(match self.citation_cursor {
            None => indices[indices.len() - 1],
            Some(cur) => indices
                .iter()
                .rev()
                .copied()
                .find(|&i| i < cur)
                .unwrap_or(indices[indices.len() - 1]),
        });
    }

    /// The highlighted citation's target, if the cursor is on one.
    pub fn selected_citation(&self) -> Option<(&str, u32)> {
        match self.citation_cursor.and_then(|i| self.segments.get(i)) {
            Some(Segment::Citation {
                source_name, page, ..
            }) => Some((source_name.as_str(), *page)),
            _ => None,
        }
    }
}

impl Default for AnswerState {
    fn default() -> Self {
        Self::new()
    }
}
