use std::fmt;

/// A target language with a folder under the package root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
    Go,
    Java,
    JavaScript,
    Json,
    Python,
    Rust,
    TypeScript,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::C,
        Language::Cpp,
        Language::Go,
        Language::Java,
        Language::JavaScript,
        Language::Json,
        Language::Python,
        Language::Rust,
        Language::TypeScript,
    ];

    /// The token users type, which is also the folder name under the package root.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::Json => "json",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
        }
    }

    pub fn from_token(token: &str) -> Option<Language> {
        Self::ALL.into_iter().find(|lang| lang.as_str() == token)
    }

    pub fn is_language(token: &str) -> bool {
        Self::from_token(token).is_some()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
