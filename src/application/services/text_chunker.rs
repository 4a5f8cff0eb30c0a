use regex::Regex;

use crate::application::ports::text_extractor::PageText;
use crate::domain::entities::DocumentChunk;

/// Splits extracted text into overlapping character windows. Pages are
/// chunked independently so every chunk carries an exact page number, and
/// window boundaries prefer paragraph, line, sentence, and word breaks, in
/// that order. Output is fully determined by the input text and the
/// configured window.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<&'static str>,
    whitespace_re: Regex,
    blank_lines_re: Regex,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size / 2),
            separators: vec!["\n\n", "\n", ". ", " "],
            whitespace_re: Regex::new(r"[ \t]+").expect("static regex"),
            blank_lines_re: Regex::new(r"\n{3,}").expect("static regex"),
        }
    }

    /// Chunk a document's pages; chunk indexes are sequential across pages.
    pub fn chunk_pages(&self, document_id: i32, pages: &[PageText]) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();
        let mut chunk_index = 0;

        for page in pages {
            let cleaned = self.clean_text(&page.text);
            if cleaned.is_empty() {
                continue;
            }
            for piece in self.split_text(&cleaned) {
                let trimmed = piece.trim();
                if trimmed.is_empty() {
                    continue;
                }
                chunks.push(DocumentChunk::new(
                    document_id,
                    chunk_index,
                    page.page_number,
                    trimmed.to_string(),
                ));
                chunk_index += 1;
            }
        }

        chunks
    }

    /// Collapse runs of spaces/tabs and excessive blank lines.
    pub fn clean_text(&self, text: &str) -> String {
        let collapsed = self.whitespace_re.replace_all(text, " ");
        let trimmed_lines: Vec<&str> = collapsed.lines().map(str::trim_end).collect();
        let joined = trimmed_lines.join("\n");
        self.blank_lines_re
            .replace_all(&joined, "\n\n")
            .trim()
            .to_string()
    }

    /// Overlapping windows over a single cleaned text. Operates on chars to
    /// stay safe on multi-byte input.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut pieces = Vec::new();
        let mut start = 0;

        loop {
            let hard_end = (start + self.chunk_size).min(chars.len());
            let end = if hard_end == chars.len() {
                hard_end
            } else {
                self.find_break(&chars, start, hard_end)
            };

            pieces.push(chars[start..end].iter().collect::<String>());

            if end == chars.len() {
                break;
            }
            // Step back by the overlap, while guaranteeing forward progress.
            start = end.saturating_sub(self.chunk_overlap).max(start + 1);
        }

        pieces
    }

    /// Best break position in `(start, hard_end]`: latest occurrence of the
    /// highest-priority separator in the second half of the window, falling
    /// back to a hard cut.
    fn find_break(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let min_end = start + self.chunk_size / 2;

        for separator in &self.separators {
            let sep_chars: Vec<char> = separator.chars().collect();
            let sep_len = sep_chars.len();
            if hard_end < sep_len {
                continue;
            }

            let mut pos = hard_end - sep_len;
            while pos > min_end.saturating_sub(sep_len) && pos > start {
                if chars[pos..pos + sep_len] == sep_chars[..] {
                    let candidate = pos + sep_len;
                    if candidate > min_end {
                        return candidate;
                    }
                    break;
                }
                pos -= 1;
            }
        }

        hard_end
    }
}
