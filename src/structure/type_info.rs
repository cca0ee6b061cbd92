// Tue Jan 13 2026 - Alex

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{Nd}_]*$").unwrap());

/// Shape of a declared type, as far as layout is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    Pointer(Box<TypeDescriptor>),
    FixedArray(Box<TypeDescriptor>, u64),
    DynamicSequence(Box<TypeDescriptor>),
    Map,
    Channel,
    Interface,
    Function,
    /// Members are owned by the field node itself.
    Composite,
    /// `struct { ... }` nested inside another type expression, e.g. `[4]struct{ x int8 }`.
    AnonymousStruct(Vec<TypeDescriptor>),
    NamedReference(String),
    Unknown(String),
}

/// One member of a `struct{ ... }` type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructMember {
    /// Empty for embedded members.
    pub name: String,
    pub type_text: String,
    pub descriptor: TypeDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Int64,
    Uint64,
    Float64,
    Int,
    Uint,
    Uintptr,
    Complex64,
    Complex128,
    String,
}

impl ScalarKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "bool" => Self::Bool,
            "int8" => Self::Int8,
            "uint8" | "byte" => Self::Uint8,
            "int16" => Self::Int16,
            "uint16" => Self::Uint16,
            "int32" | "rune" => Self::Int32,
            "uint32" => Self::Uint32,
            "float32" => Self::Float32,
            "int64" => Self::Int64,
            "uint64" => Self::Uint64,
            "float64" => Self::Float64,
            "int" => Self::Int,
            "uint" => Self::Uint,
            "uintptr" => Self::Uintptr,
            "complex64" => Self::Complex64,
            "complex128" => Self::Complex128,
            "string" => Self::String,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Float32 => "float32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float64 => "float64",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Uintptr => "uintptr",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
        }
    }
}

/// Predeclared names that are never cached by name.
pub fn is_builtin_type_name(name: &str) -> bool {
    ScalarKind::from_name(name).is_some() || matches!(name, "error" | "any")
}

const KEYWORDS: &[&str] = &["struct", "interface", "map", "chan", "func"];

/// A plain identifier that is not predeclared, e.g. `Config` but not `int64`, `[]T` or `pkg.T`.
pub fn is_valid_custom_type_name(name: &str) -> bool {
    !is_builtin_type_name(name) && !KEYWORDS.contains(&name) && IDENTIFIER.is_match(name)
}

impl TypeDescriptor {
    /// Reads a Go-style type expression. Bare `struct` means the members are supplied separately.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut reader = TypeReader::new(text);
        let descriptor = reader.read_type()?;
        reader.skip_whitespace();
        if !reader.at_end() {
            return Err(format!("unexpected `{}` in `{}`", reader.rest(), text));
        }
        Ok(descriptor)
    }

    /// Like [`TypeDescriptor::parse`], but unreadable text becomes [`TypeDescriptor::Unknown`].
    pub fn parse_lossy(text: &str) -> Self {
        Self::parse(text).unwrap_or_else(|_| Self::Unknown(text.trim().to_string()))
    }

    /// Members of `text` when it is exactly one `struct{ ... }` expression.
    pub fn parse_struct_members(text: &str) -> Option<Vec<StructMember>> {
        let mut reader = TypeReader::new(text);
        if !reader.eat_keyword("struct") || !reader.eat("{") {
            return None;
        }
        let members = reader.read_struct_members().ok()?;
        reader.skip_whitespace();
        reader.at_end().then_some(members)
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    /// Fixed arrays and slices go to the tail when reordering.
    pub fn is_array_like(&self) -> bool {
        matches!(self, Self::FixedArray(..) | Self::DynamicSequence(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{}", kind.name()),
            Self::Pointer(inner) => write!(f, "*{}", inner),
            Self::FixedArray(elem, len) => write!(f, "[{}]{}", len, elem),
            Self::DynamicSequence(elem) => write!(f, "[]{}", elem),
            Self::Map => write!(f, "map"),
            Self::Channel => write!(f, "chan"),
            Self::Interface => write!(f, "interface{{}}"),
            Self::Function => write!(f, "func"),
            Self::Composite => write!(f, "struct{{...}}"),
            Self::AnonymousStruct(members) => {
                write!(f, "struct{{{}}}", members.iter().join("; "))
            }
            Self::NamedReference(name) => write!(f, "{}", name),
            Self::Unknown(text) => write!(f, "{}", text),
        }
    }
}

struct TypeReader<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TypeReader<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.text.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Matches a keyword only when it is not the prefix of a longer identifier.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let rest = self.rest();
        if !rest.starts_with(keyword) {
            return false;
        }
        let boundary = rest[keyword.len()..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
        if boundary {
            self.pos += keyword.len();
        }
        boundary
    }

    fn expect(&mut self, token: &str) -> Result<(), String> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(format!("expected `{}` at `{}`", token, self.rest()))
        }
    }

    fn read_type(&mut self) -> Result<TypeDescriptor, String> {
        self.skip_whitespace();
        if self.eat("*") {
            return Ok(TypeDescriptor::Pointer(Box::new(self.read_type()?)));
        }
        if self.eat("(") {
            let inner = self.read_type()?;
            self.expect(")")?;
            return Ok(inner);
        }
        if self.eat("<-") {
            if !self.eat_keyword("chan") {
                return Err(format!("expected `chan` at `{}`", self.rest()));
            }
            self.read_type()?;
            return Ok(TypeDescriptor::Channel);
        }
        if self.eat("[") {
            return self.read_array();
        }
        if self.eat_keyword("map") {
            self.expect("[")?;
            self.read_type()?;
            self.expect("]")?;
            self.read_type()?;
            return Ok(TypeDescriptor::Map);
        }
        if self.eat_keyword("chan") {
            self.eat("<-");
            self.read_type()?;
            return Ok(TypeDescriptor::Channel);
        }
        if self.eat_keyword("func") {
            self.skip_signature();
            return Ok(TypeDescriptor::Function);
        }
        if self.eat_keyword("interface") {
            self.expect("{")?;
            self.skip_balanced('{', '}')?;
            return Ok(TypeDescriptor::Interface);
        }
        if self.eat_keyword("struct") {
            if self.eat("{") {
                return self.read_struct_body();
            }
            return Ok(TypeDescriptor::Composite);
        }
        self.read_name()
    }

    fn read_array(&mut self) -> Result<TypeDescriptor, String> {
        if self.eat("]") {
            return Ok(TypeDescriptor::DynamicSequence(Box::new(self.read_type()?)));
        }
        self.skip_whitespace();
        let digits: String = self.rest().chars().take_while(|c| c.is_ascii_digit() || *c == '_').collect();
        if digits.is_empty() {
            return Err(format!("array length is not a literal at `{}`", self.rest()));
        }
        self.pos += digits.len();
        let len = digits
            .replace('_', "")
            .parse::<u64>()
            .map_err(|e| format!("bad array length `{}`: {}", digits, e))?;
        self.expect("]")?;
        Ok(TypeDescriptor::FixedArray(Box::new(self.read_type()?), len))
    }

    fn read_struct_body(&mut self) -> Result<TypeDescriptor, String> {
        let members = self.read_struct_members()?;
        Ok(TypeDescriptor::AnonymousStruct(
            members.into_iter().map(|member| member.descriptor).collect(),
        ))
    }

    /// Reads members up to and including the closing brace.
    fn read_struct_members(&mut self) -> Result<Vec<StructMember>, String> {
        let mut members = Vec::new();
        loop {
            if self.eat("}") {
                return Ok(members);
            }
            if self.eat(";") {
                continue;
            }
            self.skip_whitespace();
            let start = self.pos;
            if self.peek() == Some('*') {
                let descriptor = self.read_type()?;
                members.push(self.member_since(String::new(), start, descriptor));
                self.skip_tag()?;
                continue;
            }
            let first = self.read_name()?;
            // A lone name ending the line is an embedded member.
            if matches!(self.peek_inline(), None | Some(';') | Some('\n') | Some('}') | Some('`') | Some('"')) {
                members.push(self.member_since(String::new(), start, first));
                self.skip_tag()?;
                continue;
            }
            let mut names = vec![self.text[start..self.pos].to_string()];
            while self.eat(",") {
                self.skip_whitespace();
                let name_start = self.pos;
                self.read_name()?;
                names.push(self.text[name_start..self.pos].to_string());
            }
            self.skip_whitespace();
            let type_start = self.pos;
            let descriptor = self.read_type()?;
            for name in names {
                members.push(self.member_since(name, type_start, descriptor.clone()));
            }
            self.skip_tag()?;
        }
    }

    fn member_since(&self, name: String, start: usize, descriptor: TypeDescriptor) -> StructMember {
        StructMember {
            name,
            type_text: self.text[start..self.pos].trim().to_string(),
            descriptor,
        }
    }

    fn peek_inline(&self) -> Option<char> {
        self.rest().trim_start_matches([' ', '\t', '\r']).chars().next()
    }

    fn skip_tag(&mut self) -> Result<(), String> {
        let Some(quote) = self.peek_inline().filter(|c| *c == '`' || *c == '"') else {
            return Ok(());
        };
        self.skip_whitespace();
        self.pos += 1;
        match self.rest().find(quote) {
            Some(end) => {
                self.pos += end + 1;
                Ok(())
            }
            None => Err("unterminated struct tag".to_string()),
        }
    }

    fn read_name(&mut self) -> Result<TypeDescriptor, String> {
        self.skip_whitespace();
        let start = self.pos;
        for (idx, c) in self.rest().char_indices() {
            if !(c.is_alphanumeric() || c == '_' || c == '.') {
                self.pos = start + idx;
                break;
            }
            self.pos = start + idx + c.len_utf8();
        }
        if self.pos == start {
            return Err(format!("expected a type at `{}`", self.rest()));
        }
        let name = &self.text[start..self.pos];
        if self.rest().starts_with('[') {
            self.pos += 1;
            self.skip_balanced('[', ']')?;
            return Ok(TypeDescriptor::NamedReference(self.text[start..self.pos].to_string()));
        }
        Ok(match ScalarKind::from_name(name) {
            Some(kind) => TypeDescriptor::Scalar(kind),
            None if matches!(name, "error" | "any") => TypeDescriptor::Interface,
            None => TypeDescriptor::NamedReference(name.to_string()),
        })
    }

    /// Consumes up to and including the closing delimiter; the opener is already consumed.
    fn skip_balanced(&mut self, open: char, close: char) -> Result<(), String> {
        let mut depth = 1usize;
        for (idx, c) in self.rest().char_indices() {
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    self.pos += idx + c.len_utf8();
                    return Ok(());
                }
            }
        }
        Err(format!("unbalanced `{}`", open))
    }

    /// Skips a function signature up to the end of the enclosing member.
    fn skip_signature(&mut self) {
        let mut depth = 0usize;
        for (idx, c) in self.rest().char_indices() {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' if depth == 0 => {
                    self.pos += idx;
                    return;
                }
                ')' | ']' | '}' => depth -= 1,
                ';' | ',' | '\n' if depth == 0 => {
                    self.pos += idx;
                    return;
                }
                _ => {}
            }
        }
        self.pos = self.text.len();
    }
}
