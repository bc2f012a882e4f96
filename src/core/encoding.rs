//! Document encoding detection
//!
//! The scanner decodes UTF-8 only. A leading UTF-8 byte order mark is
//! stripped; UTF-16 input is recognised and rejected up front instead of
//! failing later with a confusing decode error.

/// Encoding of the input as seen from its first bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    /// UTF-8 with a three byte BOM in front
    Utf8Bom,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        if input.len() < 2 {
            return XmlEncoding::Utf8;
        }

        match (input[0], input[1]) {
            (0xFF, 0xFE) => XmlEncoding::Utf16Le,
            (0xFE, 0xFF) => XmlEncoding::Utf16Be,
            (0xEF, 0xBB) if input.len() >= 3 && input[2] == 0xBF => XmlEncoding::Utf8Bom,
            // No BOM - '<' next to a NUL byte means UTF-16
            (0x00, b'<') => XmlEncoding::Utf16Be,
            (b'<', 0x00) => XmlEncoding::Utf16Le,
            _ => XmlEncoding::Utf8,
        }
    }

    /// Human readable encoding label
    pub fn name(self) -> &'static str {
        match self {
            XmlEncoding::Utf8 | XmlEncoding::Utf8Bom => "UTF-8",
            XmlEncoding::Utf16Le => "UTF-16LE",
            XmlEncoding::Utf16Be => "UTF-16BE",
        }
    }
}
