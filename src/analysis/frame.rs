use regex::Regex;

/// Splits a paragraph into sentences. Frames never span a sentence
/// boundary produced by this trait.
pub trait SentenceSplitter: Send + Sync {
    fn split<'a>(&self, paragraph: &'a str) -> Vec<&'a str>;
}

/// A light heuristic sentence splitter: a sentence ends at `.`, `!`, or `?`
/// followed by whitespace (or the end of the paragraph). This deliberately
/// doesn't special-case abbreviations the way a trained model would; it
/// trades a few over-split sentences for a dependency-free implementation.
pub struct EnglishSentenceSplitter;

impl SentenceSplitter for EnglishSentenceSplitter {
    fn split<'a>(&self, paragraph: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let bytes = paragraph.as_bytes();
        let mut start = 0usize;
        let mut i = 0usize;
        while i < bytes.len() {
            let c = bytes[i];
            if c == b'.' || c == b'!' || c == b'?' {
                let mut end = i + 1;
                while end < bytes.len() && (bytes[end] == b'.' || bytes[end] == b'!' || bytes[end] == b'?') {
                    end += 1;
                }
                let at_boundary = end == bytes.len() || bytes[end].is_ascii_whitespace();
                if at_boundary {
                    let sentence = paragraph[start..end].trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence);
                    }
                    while end < bytes.len() && bytes[end].is_ascii_whitespace() {
                        end += 1;
                    }
                    start = end;
                    i = end;
                    continue;
                }
                i = end;
                continue;
            }
            i += 1;
        }
        let tail = paragraph[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail);
        }
        sentences
    }
}

/// Groups a document's text into frames: runs of up to `frame_size`
/// sentences, never crossing a paragraph break. A `frame_size` of zero
/// indexes the whole field value as a single frame.
pub struct FrameBuilder {
    frame_size: usize,
    paragraph_break: Regex,
    sentence_splitter: Box<dyn SentenceSplitter>,
}

impl FrameBuilder {
    pub fn new(frame_size: usize) -> Self {
        FrameBuilder {
            frame_size,
            paragraph_break: Regex::new(r"\n\s*\n+").expect("static paragraph break pattern is valid"),
            sentence_splitter: Box::new(EnglishSentenceSplitter),
        }
    }

    pub fn with_sentence_splitter(mut self, splitter: Box<dyn SentenceSplitter>) -> Self {
        self.sentence_splitter = splitter;
        self
    }

    /// Split `text` into frame-sized chunks of text, in document order.
    pub fn build(&self, text: &str) -> Vec<String> {
        if self.frame_size == 0 {
            let trimmed = text.trim();
            return if trimmed.is_empty() { Vec::new() } else { vec![trimmed.to_string()] };
        }

        let mut frames = Vec::new();
        for paragraph in self.paragraph_break.split(text) {
            if paragraph.trim().is_empty() {
                continue;
            }
            let sentences = self.sentence_splitter.split(paragraph);
            for chunk in sentences.chunks(self.frame_size) {
                frames.push(chunk.join(" "));
            }
        }
        frames
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        FrameBuilder::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_sentences() {
        let sentences = EnglishSentenceSplitter.split("One. Two! Three?");
        assert_eq!(sentences, vec!["One.", "Two!", "Three?"]);
    }

    #[test]
    fn groups_sentences_into_frame_size_chunks() {
        let builder = FrameBuilder::new(2);
        let frames = builder.build("One. Two. Three. Four. Five.");
        assert_eq!(frames, vec!["One. Two.", "Three. Four.", "Five."]);
    }

    #[test]
    fn paragraph_break_always_starts_a_new_frame() {
        let builder = FrameBuilder::new(3);
        let frames = builder.build("One. Two.\n\nThree. Four.");
        assert_eq!(frames, vec!["One. Two.", "Three. Four."]);
    }

    #[test]
    fn zero_frame_size_yields_whole_text_as_one_frame() {
        let builder = FrameBuilder::new(0);
        let frames = builder.build("One. Two. Three.");
        assert_eq!(frames, vec!["One. Two. Three."]);
    }

    #[test]
    fn empty_text_yields_no_frames() {
        let builder = FrameBuilder::new(2);
        assert!(builder.build("   ").is_empty());
    }
}
