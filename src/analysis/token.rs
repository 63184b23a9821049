/// A single token produced by a `Tokenizer` and refined by a chain of
/// `TokenFilter`s.
///
/// `stopped` marks a token as a stop word rather than removing it: the
/// vocabulary and position stream still record it, but query evaluation
/// skips stopped terms during ranking. This mirrors the frame-relative
/// indexing scheme, where dropping tokens outright would shift every
/// subsequent position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: String,
    pub position: u32,
    pub span: (u32, u32),
    pub stopped: bool,
    pub frame_boundary: bool,
}

impl Token {
    pub fn new(value: impl Into<String>, position: u32, span: (u32, u32)) -> Self {
        Token { value: value.into(), position, span, stopped: false, frame_boundary: false }
    }

    pub fn frame_boundary(position: u32) -> Self {
        Token { value: String::new(), position, span: (0, 0), stopped: false, frame_boundary: true }
    }
}
