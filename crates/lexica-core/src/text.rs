// Text span types shared by the engines.

/// A slice of text located within a larger line or document.
///
/// `offset` is a byte offset from the start of the original input. Spans are
/// always aligned to `char` boundaries of the text they were cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOffset {
    /// The span's text.
    pub text: String,
    /// Byte offset of the span's first character.
    pub offset: usize,
}

impl TextOffset {
    /// Create a new span.
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
        }
    }

    /// Byte offset one past the end of the span.
    pub fn end_offset(&self) -> usize {
        self.offset + self.text.len()
    }

    /// `true` when the span contains no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A text span together with the dictionary verdict for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOffsetWithValid {
    pub text: String,
    pub offset: usize,
    /// `true` when the dictionary oracle accepted the span.
    pub is_found: bool,
}

impl TextOffsetWithValid {
    /// Byte offset one past the end of the span.
    pub fn end_offset(&self) -> usize {
        self.offset + self.text.len()
    }
}
