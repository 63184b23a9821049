use regex::Regex;

use crate::analysis::token::Token;

pub const FRAME_BOUNDARY: char = '\u{0004}';

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Splits text into words, recognizing a handful of multi-character
/// constructs as single tokens rather than breaking them on punctuation:
/// compound proper nouns ("New South Wales"), email addresses, URLs,
/// contractions other than possessives, and decimal numbers.
///
/// Stops at the frame boundary sentinel so that a single regex pass never
/// produces a token spanning two frames.
pub struct WordTokenizer {
    combined: Regex,
    name_leadin_exclude: [&'static str; 2],
    word_only: Regex,
}

impl WordTokenizer {
    const CONTRACTION: &'static str = r"[A-Za-z]+'[A-RT-Za-rt-z]+";
    const EMAIL: &'static str = r"\b[-A-Za-z0-9._%+]+@[-A-Za-z0-9.]+\.[A-Za-z]{2,4}\b";
    const NAME_COMPOUND: &'static str =
        r"(?:[A-Z][a-z]+|[A-Z][a-z]{0,2}\.)(?: of)?(?: [A-Z][A-Za-z]+)+";
    const NUM: &'static str = r"\d+(?:[.,]\d+)+";
    const WORD: &'static str = r"[#@]?\w+";
    const URL: &'static str = r"(?:mailto:|ftp:|https?:|www\.)\S+";

    pub fn new(detect_compound_names: bool) -> Self {
        let mut alternatives = vec![
            format!("(?P<url>{})", Self::URL),
            format!("(?P<email>{})", Self::EMAIL),
            format!("(?P<num>{})", Self::NUM),
            format!("(?P<contraction>{})", Self::CONTRACTION),
        ];
        if detect_compound_names {
            alternatives.push(format!("(?P<name>{})", Self::NAME_COMPOUND));
        }
        alternatives.push(format!("(?P<word>{})", Self::WORD));

        let pattern = format!("{}|(?:{})", FRAME_BOUNDARY, alternatives.join("|"));
        let combined = Regex::new(&pattern).expect("static word tokenizer pattern is valid");
        let word_only = Regex::new(Self::WORD).expect("static word pattern is valid");

        WordTokenizer { combined, name_leadin_exclude: ["The ", "But "], word_only }
    }

    /// True if a matched compound-name span should instead be split into
    /// plain words, because it opens with an excluded lead-in like "The".
    fn excluded_name(&self, matched: &str) -> bool {
        self.name_leadin_exclude.iter().any(|prefix| matched.starts_with(prefix))
    }
}

impl Default for WordTokenizer {
    fn default() -> Self {
        WordTokenizer::new(true)
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;

        for m in self.combined.find_iter(text) {
            if m.as_str().starts_with(FRAME_BOUNDARY) && m.as_str().chars().count() == 1 {
                tokens.push(Token::frame_boundary(position));
                position += 1;
                continue;
            }

            let is_name = self
                .combined
                .captures_at(text, m.start())
                .map(|c| c.name("name").is_some())
                .unwrap_or(false);

            if is_name && self.excluded_name(m.as_str()) {
                for wm in self.word_only.find_iter(m.as_str()) {
                    let start = (m.start() + wm.start()) as u32;
                    let end = (m.start() + wm.end()) as u32;
                    tokens.push(Token::new(wm.as_str(), position, (start, end)));
                    position += 1;
                }
            } else {
                tokens.push(Token::new(m.as_str(), position, (m.start() as u32, m.end() as u32)));
                position += 1;
            }
        }

        tokens
    }

    fn name(&self) -> &str {
        "word"
    }
}

/// Returns the entire input as a single token. Used for identifier and
/// categorical-text fields, which are indexed whole rather than tokenized.
pub struct EverythingTokenizer;

impl Tokenizer for EverythingTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        vec![Token::new(text, 0, (0, text.len() as u32))]
    }

    fn name(&self) -> &str {
        "everything"
    }
}
