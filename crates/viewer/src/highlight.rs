// StepView - Step-through Execution Viewer
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Syntax highlighting for lesson source
//!
//! Turns the displayed fragment into numbered, individually addressable lines.
//! Each line carries its syntax tokens plus two metadata lists (identifiers
//! and expressions appearing on the line), serialized with
//! [`STRING_SEPARATOR`] the same way front ends store them as attributes.

use regex::Regex;
use std::sync::OnceLock;

/// Separator used to serialize per-line metadata lists
pub const STRING_SEPARATOR: &str = "\u{1f}";

/// Token types for syntax highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Keyword,     // if, while, def, return, etc.
    Builtin,     // print, len, range, etc.
    String,      // String literals
    Number,      // Numeric literals
    Comment,     // Comments
    Identifier,  // Variable names, function names
    Operator,    // =, +, -, *, etc.
    Punctuation, // (, ), [, ], :, etc.
}

/// Syntax token with position and type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxToken {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset past the last character
    pub end: usize,
    /// Token category
    pub token_type: TokenType,
}

/// One displayed line, addressable by its public line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// 1-based public line number
    pub number: usize,
    /// Line text
    pub text: String,
    /// Syntax tokens sorted by position
    pub tokens: Vec<SyntaxToken>,
    /// Identifiers on this line, joined with [`STRING_SEPARATOR`]
    pub data_identifiers: String,
    /// Expressions on this line, joined with [`STRING_SEPARATOR`]
    pub data_expressions: String,
}

impl RenderedLine {
    /// Identifiers appearing on this line, in order of first appearance
    pub fn identifiers(&self) -> Vec<&str> {
        split_metadata(&self.data_identifiers)
    }

    /// Expressions appearing on this line
    pub fn expressions(&self) -> Vec<&str> {
        split_metadata(&self.data_expressions)
    }

    /// Source text covered by `token`
    pub fn token_text(&self, token: &SyntaxToken) -> &str {
        &self.text[token.start..token.end]
    }

    /// First identifier token named `name` on this line
    pub fn identifier(&self, name: &str) -> Option<&SyntaxToken> {
        self.tokens
            .iter()
            .find(|t| t.token_type == TokenType::Identifier && self.token_text(t) == name)
    }
}

/// Highlighted main fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSource {
    lines: Vec<RenderedLine>,
}

impl RenderedSource {
    /// Line with the given public number
    pub fn line(&self, number: usize) -> Option<&RenderedLine> {
        number.checked_sub(1).and_then(|index| self.lines.get(index))
    }

    /// All lines in order
    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there is nothing to display
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split a serialized metadata list, dropping blank entries
pub fn split_metadata(serialized: &str) -> Vec<&str> {
    serialized.split(STRING_SEPARATOR).filter(|item| !item.trim().is_empty()).collect()
}

/// Highlight `source` into numbered lines
pub fn highlight(source: &str) -> RenderedSource {
    let highlighter = Highlighter::new();
    let lines = source
        .split('\n')
        .enumerate()
        .map(|(index, text)| highlighter.render_line(index + 1, text))
        .collect();
    RenderedSource { lines }
}

/// Highlighter for the small imperative language used in lessons
#[derive(Debug)]
pub struct Highlighter {
    patterns: &'static Patterns,
}

/// Syntax patterns
struct Patterns {
    keywords: Regex,
    builtins: Regex,
    strings: Regex,
    numbers: Regex,
    comments: Regex,
    operators: Regex,
    punctuation: Regex,
    identifiers: Regex,
    condition: Regex,
    iteration: Regex,
    returned: Regex,
    assignment: Regex,
}

impl std::fmt::Debug for Patterns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Patterns").finish_non_exhaustive()
    }
}

impl Highlighter {
    /// Create a new highlighter
    pub fn new() -> Self {
        Self { patterns: get_patterns() }
    }

    /// Tokenize one line of code
    pub fn tokenize(&self, line: &str) -> Vec<SyntaxToken> {
        let mut tokens = Vec::new();

        // Higher precedence patterns claim their ranges first
        let patterns = [
            (&self.patterns.comments, TokenType::Comment),
            (&self.patterns.strings, TokenType::String),
            (&self.patterns.numbers, TokenType::Number),
            (&self.patterns.keywords, TokenType::Keyword),
            (&self.patterns.builtins, TokenType::Builtin),
            (&self.patterns.operators, TokenType::Operator),
            (&self.patterns.punctuation, TokenType::Punctuation),
        ];

        let mut covered_ranges: Vec<(usize, usize)> = Vec::new();

        for (pattern, token_type) in patterns {
            for mat in pattern.find_iter(line) {
                let (start, end) = (mat.start(), mat.end());
                let overlaps = covered_ranges.iter().any(|(s, e)| start < *e && end > *s);
                if !overlaps {
                    tokens.push(SyntaxToken { start, end, token_type });
                    covered_ranges.push((start, end));
                }
            }
        }

        for mat in self.patterns.identifiers.find_iter(line) {
            let (start, end) = (mat.start(), mat.end());
            let covered = covered_ranges.iter().any(|(s, e)| start < *e && end > *s);
            if !covered {
                tokens.push(SyntaxToken { start, end, token_type: TokenType::Identifier });
            }
        }

        tokens.sort_by_key(|t| t.start);
        tokens
    }

    /// Build the addressable record of one line
    pub fn render_line(&self, number: usize, text: &str) -> RenderedLine {
        let tokens = self.tokenize(text);

        let mut identifiers: Vec<&str> = Vec::new();
        for token in tokens.iter().filter(|t| t.token_type == TokenType::Identifier) {
            let name = &text[token.start..token.end];
            if !identifiers.contains(&name) {
                identifiers.push(name);
            }
        }

        // Metadata is extracted from code only
        let code = match tokens.iter().find(|t| t.token_type == TokenType::Comment) {
            Some(comment) => &text[..comment.start],
            None => text,
        };
        let expressions = self.expressions(code);

        RenderedLine {
            number,
            text: text.to_string(),
            data_identifiers: identifiers.join(STRING_SEPARATOR),
            data_expressions: expressions.join(STRING_SEPARATOR),
            tokens,
        }
    }

    /// Expressions a learner may want to inspect on a line of code
    fn expressions<'a>(&self, code: &'a str) -> Vec<&'a str> {
        let code = code.trim().trim_end_matches(';');
        let captured = [
            &self.patterns.condition,
            &self.patterns.iteration,
            &self.patterns.returned,
            &self.patterns.assignment,
        ]
        .iter()
        .find_map(|pattern| pattern.captures(code))
        .and_then(|caps| caps.name("expr"))
        .map(|m| m.as_str().trim());

        captured.filter(|expr| !expr.is_empty()).into_iter().collect()
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Get syntax patterns (cached)
fn get_patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        keywords: Regex::new(r"\b(def|function|class|let|const|var|if|elif|else|for|while|in|of|return|break|continue|pass|and|or|not|is|True|False|None|true|false|null|undefined|new)\b").unwrap(),
        builtins: Regex::new(r"\b(print|len|range|console|log|min|max|abs|append|push|pop|int|str|list)\b").unwrap(),
        strings: Regex::new(r#""([^"\\]|\\.)*"|'([^'\\]|\\.)*'"#).unwrap(),
        numbers: Regex::new(r"\b\d+(\.\d+)?\b").unwrap(),
        comments: Regex::new(r"(#|//).*$").unwrap(),
        operators: Regex::new(r"(==|!=|<=|>=|\+=|-=|\*=|/=|%=|\*\*|&&|\|\||[=<>+\-*/%!])").unwrap(),
        punctuation: Regex::new(r"[()\[\]{}:;,.]").unwrap(),
        identifiers: Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b").unwrap(),
        condition: Regex::new(r"^(?:if|elif|while)\b\s*(?P<expr>.+?)\s*[:{]?$").unwrap(),
        iteration: Regex::new(r"^for\b\s*\(?\s*(?:let|const|var)?\s*[A-Za-z_]\w*\s+(?:in|of)\s+(?P<expr>.+?)\)?\s*[:{]?$").unwrap(),
        returned: Regex::new(r"^return\b\s+(?P<expr>.+)$").unwrap(),
        assignment: Regex::new(r"^(?:(?:let|const|var)\s+)?[A-Za-z_][\w.\[\]]*\s*(?:\+|-|\*|/|%)?=\s*(?P<expr>[^=].*)$").unwrap(),
    })
}
