// crates/quality-gate-providers/src/search.rs
// ============================================================================
// Module: Regex Definition Search
// Description: Declaration-anchored function search over the source tree.
// Purpose: Resolve scenario test references to real function definitions.
// Dependencies: quality-gate-core, regex, walkdir
// ============================================================================

//! ## Overview
//! The search walks the configured source roots once, collects the name of
//! every `fn` declaration found at the start of a line (after optional
//! attributes, visibility, and qualifiers), and answers lookups from that
//! index. Mentions of a name in comments, strings, or call sites never count.
//!
//! Before matching, each file is passed through a small lexer that blanks the
//! contents of line and block comments (nested), string, byte string, raw
//! string, and character literals. Line breaks are kept, so a declaration
//! inside a multi-line comment or literal can no longer sit at a line start.
//!
//! `target` directories and hidden directories are skipped. Files larger
//! than the configured limit and files that are not UTF-8 are ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::OnceLock;

use quality_gate_core::DefinitionSearch;
use quality_gate_core::SearchError;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use walkdir::DirEntry;
use walkdir::WalkDir;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default source root searched for test definitions.
pub const DEFAULT_SOURCE_DIR: &str = "src";
/// Default source file extension.
pub const DEFAULT_SOURCE_EXTENSION: &str = "rs";
/// Default per-file read limit.
pub const DEFAULT_MAX_SOURCE_FILE_BYTES: usize = 4 * 1024 * 1024;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["target"];

/// Function declaration at line start; group 1 captures the name.
const DEFINITION_PATTERN: &str = r#"(?m)^[ \t]*(?:#\[[^\]]*\][ \t]*)*(?:pub(?:[ \t]*\([^)]*\))?[ \t]+)?(?:(?:const|async|unsafe)[ \t]+)*(?:extern[ \t]+"[^"]*"[ \t]+)?fn[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*[<(]"#;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the definition search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSearchConfig {
    /// Source roots to walk.
    pub roots: Vec<PathBuf>,
    /// File extensions considered source files (without the dot).
    pub extensions: Vec<String>,
    /// Files above this size are skipped.
    pub max_file_bytes: usize,
}

impl Default for SourceSearchConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(DEFAULT_SOURCE_DIR)],
            extensions: vec![DEFAULT_SOURCE_EXTENSION.to_string()],
            max_file_bytes: DEFAULT_MAX_SOURCE_FILE_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Search
// ============================================================================

/// Definition search backed by a lazily built declaration index.
pub struct RegexDefinitionSearch {
    /// Search configuration.
    config: SourceSearchConfig,
    /// Declared function names, built on first lookup.
    index: OnceLock<Result<BTreeSet<String>, SearchError>>,
}

impl RegexDefinitionSearch {
    /// Creates a search over the configured roots. Nothing is read until the
    /// first lookup.
    #[must_use]
    pub const fn new(config: SourceSearchConfig) -> Self {
        Self {
            config,
            index: OnceLock::new(),
        }
    }

    /// Returns the search configuration.
    #[must_use]
    pub const fn config(&self) -> &SourceSearchConfig {
        &self.config
    }

    /// Returns every declared function name found under the roots.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when a root is missing or the tree cannot be read.
    pub fn definitions(&self) -> Result<&BTreeSet<String>, SearchError> {
        self.index.get_or_init(|| build_index(&self.config)).as_ref().map_err(SearchError::clone)
    }
}

impl DefinitionSearch for RegexDefinitionSearch {
    fn find_definition(&self, name: &str) -> Result<bool, SearchError> {
        Ok(self.definitions()?.contains(name))
    }
}

// ============================================================================
// SECTION: Indexing
// ============================================================================

/// Walks every root and collects declared function names.
fn build_index(config: &SourceSearchConfig) -> Result<BTreeSet<String>, SearchError> {
    let pattern = Regex::new(DEFINITION_PATTERN)
        .map_err(|err| SearchError::Io(format!("invalid definition pattern: {err}")))?;
    let mut names = BTreeSet::new();
    for root in &config.roots {
        if !root.is_dir() {
            return Err(SearchError::SourceDirMissing(root.display().to_string()));
        }
        for entry in WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(is_searchable)
        {
            let entry = entry.map_err(|err| SearchError::Io(err.to_string()))?;
            if !entry.file_type().is_file() || !has_extension(entry.path(), &config.extensions) {
                continue;
            }
            let Some(text) = read_source(entry.path(), config.max_file_bytes)? else {
                continue;
            };
            let code = mask_non_code(&text);
            names.extend(declared_names(&pattern, &code));
        }
    }
    Ok(names)
}

/// Extracts declared function names from one source text.
fn declared_names<'a>(pattern: &'a Regex, text: &'a str) -> impl Iterator<Item = String> + 'a {
    pattern
        .captures_iter(text)
        .filter_map(|captures| captures.get(1).map(|name| name.as_str().to_string()))
}

/// Returns false for hidden directories and skipped build output.
fn is_searchable(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
}

/// Returns true when the path has one of the configured extensions.
fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
}

/// Reads a source file, returning `None` for oversized or non-UTF-8 files.
fn read_source(path: &Path, max_bytes: usize) -> Result<Option<String>, SearchError> {
    let metadata = fs::metadata(path)
        .map_err(|err| SearchError::Io(format!("{}: {err}", path.display())))?;
    if !usize::try_from(metadata.len()).is_ok_and(|len| len <= max_bytes) {
        return Ok(None);
    }
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::InvalidData => Ok(None),
        Err(err) => Err(SearchError::Io(format!("{}: {err}", path.display()))),
    }
}

// ============================================================================
// SECTION: Lexing
// ============================================================================

/// Returns `text` with comment and literal contents replaced by spaces.
///
/// Quote characters stay in place, as do line breaks, so line-anchored
/// patterns see the same line structure as the original file.
fn mask_non_code(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut index = 0;
    while let Some(&current) = chars.get(index) {
        let next = chars.get(index + 1).copied();
        let after_ident = index
            .checked_sub(1)
            .and_then(|prev| chars.get(prev))
            .is_some_and(|&prev| is_ident_char(prev));
        let end = match current {
            '/' if next == Some('/') => line_comment_end(&chars, index),
            '/' if next == Some('*') => block_comment_end(&chars, index),
            '"' => quoted_end(&chars, index + 1, '"'),
            '\'' => char_literal_end(&chars, index),
            'b' | 'r' if !after_ident => raw_or_byte_literal_end(&chars, index),
            _ => None,
        };
        match end {
            Some(end) => {
                let span = chars.get(index..end).unwrap_or_default();
                out.extend(span.iter().map(|&ch| mask_char(ch, span)));
                index = end;
            }
            None => {
                out.push(current);
                index += 1;
            }
        }
    }
    out
}

/// Keeps line breaks and delimiters of a masked span, blanking the rest.
fn mask_char(ch: char, span: &[char]) -> char {
    let is_delimiter = matches!(ch, '"' | '\'') && span.first() != Some(&'/');
    if ch == '\n' || is_delimiter { ch } else { ' ' }
}

/// Returns true for characters that continue an identifier.
fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// End of a `//` comment, exclusive of the line break.
fn line_comment_end(chars: &[char], start: usize) -> Option<usize> {
    let rest = chars.get(start..)?;
    Some(rest.iter().position(|&ch| ch == '\n').map_or(chars.len(), |offset| start + offset))
}

/// End of a possibly nested `/* */` comment; unterminated runs to the end.
fn block_comment_end(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut index = start;
    while let Some(&ch) = chars.get(index) {
        let next = chars.get(index + 1).copied();
        if ch == '/' && next == Some('*') {
            depth += 1;
            index += 2;
        } else if ch == '*' && next == Some('/') {
            depth -= 1;
            index += 2;
            if depth == 0 {
                return Some(index);
            }
        } else {
            index += 1;
        }
    }
    Some(chars.len())
}

/// End of an escaped literal whose body starts at `body`; unterminated runs
/// to the end.
fn quoted_end(chars: &[char], body: usize, quote: char) -> Option<usize> {
    let mut index = body;
    while let Some(&ch) = chars.get(index) {
        if ch == '\\' {
            index += 2;
        } else if ch == quote {
            return Some(index + 1);
        } else {
            index += 1;
        }
    }
    Some(chars.len())
}

/// End of a character literal, or `None` for a lifetime or label.
fn char_literal_end(chars: &[char], start: usize) -> Option<usize> {
    match chars.get(start + 1).copied()? {
        '\\' => quoted_end(chars, start + 1, '\''),
        '\n' | '\'' => None,
        _ => (chars.get(start + 2) == Some(&'\'')).then_some(start + 3),
    }
}

/// End of a `b"..."`, `b'.'`, `r"..."`, `r#"..."#`, or `br#"..."#` literal.
fn raw_or_byte_literal_end(chars: &[char], start: usize) -> Option<usize> {
    let mut index = start;
    if chars.get(index) == Some(&'b') {
        index += 1;
        match chars.get(index).copied() {
            Some('"') => return quoted_end(chars, index + 1, '"'),
            Some('\'') => return char_literal_end(chars, index),
            Some('r') => {}
            _ => return None,
        }
    }
    index += 1;
    let hashes = chars.get(index..)?.iter().take_while(|&&ch| ch == '#').count();
    index += hashes;
    if chars.get(index) != Some(&'"') {
        return None;
    }
    index += 1;
    while let Some(&ch) = chars.get(index) {
        let closes =
            ch == '"' && (1..=hashes).all(|offset| chars.get(index + offset) == Some(&'#'));
        if closes {
            return Some(index + 1 + hashes);
        }
        index += 1;
    }
    Some(chars.len())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
