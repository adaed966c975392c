use std::fmt;

/// Axis-aligned region in image pixel coordinates, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedText {
    pub text: String,
    pub confidence: f32,
}

/// One detected word or phrase: where it is, and what the engine read there.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrEntry {
    pub bounds: BoundingBox,
    pub recognized: RecognizedText,
}

impl OcrEntry {
    pub fn new(text: String, confidence: f32, bounds: BoundingBox) -> Self {
        Self {
            bounds,
            recognized: RecognizedText { text, confidence },
        }
    }

    pub fn text(&self) -> &str {
        &self.recognized.text
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrLine {
    pub entries: Vec<OcrEntry>,
}

impl OcrLine {
    pub fn new(entries: Vec<OcrEntry>) -> Self {
        Self { entries }
    }
}

/// Lines in the order the engine returned them, each holding its entries in reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrResult {
    pub lines: Vec<OcrLine>,
}

impl OcrResult {
    pub fn new(lines: Vec<OcrLine>) -> Self {
        Self { lines }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines
            .iter()
            .flat_map(|line| line.entries.iter())
            .map(OcrEntry::text)
    }

    pub fn entry_count(&self) -> usize {
        self.lines.iter().map(|line| line.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

impl fmt::Display for OcrResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for text in self.texts() {
            writeln!(f, "{}", text)?;
        }
        Ok(())
    }
}
