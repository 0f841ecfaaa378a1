//! Field delimiters for delimited text files

/// Supported CSV delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// Get the character for this delimiter
    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
        }
    }

    pub fn byte(self) -> u8 {
        self.char() as u8
    }

    /// Detect delimiter from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Delimiter::Comma),
            "tsv" | "tab" => Some(Delimiter::Tab),
            "psv" => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Delimiter::from_extension("TSV"), Some(Delimiter::Tab));
        assert_eq!(Delimiter::from_extension("psv"), Some(Delimiter::Pipe));
        assert_eq!(Delimiter::from_extension("txt"), None);
    }
}
