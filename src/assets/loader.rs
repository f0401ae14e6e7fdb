//! Loading build configurations from disk.
//!
//! Three serialized forms are accepted, dispatched on file extension:
//! `.js`/`.cjs` (the native `module.exports = {...}` form Tailwind reads),
//! `.json`, and `.yaml`/`.yml`. The JS form is not evaluated; a small
//! single-pass reader extracts the exported object literal and rejects
//! anything outside that subset, so a config file can never run code here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::assets::schema::BuildConfig;
use crate::error::AssetsError;

/// Upper bound on accepted file size. A build config is a few hundred
/// bytes; anything near this limit is not one.
pub const MAX_ASSET_FILE_SIZE: u64 = 1024 * 1024;

/// Serialized form of a build configuration, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `module.exports` object literal (`.js`, `.cjs`).
    Js,
    /// Plain JSON (`.json`).
    Json,
    /// YAML (`.yaml`, `.yml`).
    Yaml,
}

impl SourceFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, AssetsError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "js" | "cjs" => Ok(Self::Js),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(AssetsError::UnsupportedFormat {
                path: path.display().to_string(),
                extension,
            }),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// A build configuration loaded from disk, frozen behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub config: Arc<BuildConfig>,
    pub format: SourceFormat,
    pub path: PathBuf,
}

/// Loads and parses a build configuration file.
pub fn load(path: &Path) -> Result<LoadedAsset, AssetsError> {
    let format = SourceFormat::from_path(path)?;
    let display = path.display().to_string();

    let metadata = std::fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            AssetsError::MissingFile {
                path: display.clone(),
            }
        } else {
            AssetsError::Io {
                path: display.clone(),
                source,
            }
        }
    })?;
    if metadata.len() > MAX_ASSET_FILE_SIZE {
        return Err(AssetsError::FileTooLarge {
            path: display,
            size: metadata.len(),
            max: MAX_ASSET_FILE_SIZE,
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|source| AssetsError::Io {
        path: display.clone(),
        source,
    })?;
    let config = parse_str(&raw, format, &display)?;
    Ok(LoadedAsset {
        config: Arc::new(config),
        format,
        path: path.to_path_buf(),
    })
}

/// Parses a build configuration from a string in the given form.
///
/// `origin` is the path (or other label) used in error messages.
pub fn parse_str(
    input: &str,
    format: SourceFormat,
    origin: &str,
) -> Result<BuildConfig, AssetsError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    match format {
        SourceFormat::Json => serde_json::from_str(input).map_err(|e| AssetsError::Parse {
            path: origin.to_owned(),
            line: e.line(),
            message: e.to_string(),
        }),
        SourceFormat::Yaml => serde_yaml::from_str(input).map_err(|e| AssetsError::Parse {
            path: origin.to_owned(),
            line: e.location().map_or(0, |l| l.line()),
            message: e.to_string(),
        }),
        SourceFormat::Js => {
            let value = extract_module_exports(input, origin)?;
            serde_json::from_value(value).map_err(|e| AssetsError::Schema {
                path: origin.to_owned(),
                message: e.to_string(),
            })
        }
    }
}

/// Extracts the object literal assigned to `module.exports`.
///
/// Accepted subset: comments, string/number/bool/null literals, arrays,
/// nested objects, trailing commas, and `require("pkg")` calls (mapped to
/// the package name string). Everything else is a parse error.
pub(crate) fn extract_module_exports(src: &str, origin: &str) -> Result<Value, AssetsError> {
    let mut reader = JsReader::new(src, origin);
    reader.skip_trivia()?;
    reader.expect_keyword("module")?;
    reader.expect_char('.')?;
    reader.expect_keyword("exports")?;
    reader.skip_trivia()?;
    reader.expect_char('=')?;
    reader.skip_trivia()?;
    let value = reader.parse_value()?;
    reader.skip_trivia()?;
    if reader.peek() == Some(';') {
        reader.bump();
        reader.skip_trivia()?;
    }
    if let Some(c) = reader.peek() {
        return Err(reader.err(format!("unexpected trailing input starting with {c:?}")));
    }
    Ok(value)
}

/// Character-level reader over a JS config file.
struct JsReader<'a> {
    origin: &'a str,
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl<'a> JsReader<'a> {
    fn new(src: &str, origin: &'a str) -> Self {
        Self {
            origin,
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn err(&self, message: impl Into<String>) -> AssetsError {
        AssetsError::Parse {
            path: self.origin.to_owned(),
            line: self.line,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Skips whitespace, `//` line comments, and `/* */` block comments.
    fn skip_trivia(&mut self) -> Result<(), AssetsError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(self.err("unterminated block comment")),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), AssetsError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.err(format!("expected {expected:?}, found {c:?}"))),
            None => Err(self.err(format!("expected {expected:?}, found end of input"))),
        }
    }

    fn read_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        ident
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), AssetsError> {
        let ident = self.read_ident();
        if ident == keyword {
            Ok(())
        } else if ident.is_empty() {
            Err(self.err(format!("expected `{keyword}`")))
        } else {
            Err(self.err(format!("expected `{keyword}`, found `{ident}`")))
        }
    }

    fn parse_value(&mut self) -> Result<Value, AssetsError> {
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some(q @ ('"' | '\'')) => {
                self.bump();
                self.parse_string(q).map(Value::String)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => self.parse_word(),
            Some(c) => Err(self.err(format!("unexpected character {c:?}"))),
            None => Err(self.err("unexpected end of input")),
        }
    }

    fn parse_object(&mut self) -> Result<Value, AssetsError> {
        self.expect_char('{')?;
        let mut map = serde_json::Map::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                Some(q @ ('"' | '\'')) => {
                    self.bump();
                    let key = self.parse_string(q)?;
                    self.parse_entry_into(&mut map, key)?;
                }
                Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                    let key = self.read_ident();
                    self.parse_entry_into(&mut map, key)?;
                }
                Some(c) => return Err(self.err(format!("expected object key, found {c:?}"))),
                None => return Err(self.err("unterminated object")),
            }
        }
    }

    fn parse_entry_into(
        &mut self,
        map: &mut serde_json::Map<String, Value>,
        key: String,
    ) -> Result<(), AssetsError> {
        self.skip_trivia()?;
        self.expect_char(':')?;
        self.skip_trivia()?;
        let value = self.parse_value()?;
        if map.insert(key.clone(), value).is_some() {
            return Err(self.err(format!("duplicate key `{key}`")));
        }
        self.skip_trivia()?;
        match self.peek() {
            Some(',') => {
                self.bump();
                Ok(())
            }
            Some('}') | None => Ok(()),
            Some(c) => Err(self.err(format!("expected `,` or `}}` after value, found {c:?}"))),
        }
    }

    fn parse_array(&mut self) -> Result<Value, AssetsError> {
        self.expect_char('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                Some(_) => {
                    items.push(self.parse_value()?);
                    self.skip_trivia()?;
                    match self.peek() {
                        Some(',') => {
                            self.bump();
                        }
                        Some(']') => {}
                        Some(c) => {
                            return Err(
                                self.err(format!("expected `,` or `]` in array, found {c:?}"))
                            );
                        }
                        None => return Err(self.err("unterminated array")),
                    }
                }
                None => return Err(self.err("unterminated array")),
            }
        }
    }

    /// Parses the remainder of a string literal, the opening quote already
    /// consumed.
    fn parse_string(&mut self, quote: char) -> Result<String, AssetsError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    Some('\'') => out.push('\''),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c) => return Err(self.err(format!("unsupported escape `\\{c}`"))),
                    None => return Err(self.err("unterminated string")),
                },
                Some('\n') => return Err(self.err("unterminated string")),
                Some(c) => out.push(c),
                None => return Err(self.err("unterminated string")),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, AssetsError> {
        let mut raw = String::new();
        if self.peek() == Some('-') {
            raw.push('-');
            self.bump();
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '+' || c == '-' {
                raw.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Ok(Value::from(n));
        }
        match raw.parse::<f64>() {
            Ok(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| self.err(format!("number out of range: {raw}"))),
            Err(_) => Err(self.err(format!("invalid number literal `{raw}`"))),
        }
    }

    /// Parses a bare word: `true`, `false`, `null`, or a `require(...)` call.
    fn parse_word(&mut self) -> Result<Value, AssetsError> {
        let word = self.read_ident();
        match word.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            "require" => {
                self.skip_trivia()?;
                self.expect_char('(')?;
                self.skip_trivia()?;
                let name = match self.bump() {
                    Some(q @ ('"' | '\'')) => self.parse_string(q)?,
                    _ => return Err(self.err("require() argument must be a string literal")),
                };
                self.skip_trivia()?;
                self.expect_char(')')?;
                Ok(Value::String(name))
            }
            "" => Err(self.err("unexpected end of input")),
            other => Err(self.err(format!("unsupported expression `{other}`"))),
        }
    }
}
