//! Micro-grammar for Aleo plaintext values as rendered by the explorer.
//!
//! ```text
//! value    := struct | literal
//! struct   := '{'? member (',' member)* ','? '}'?
//! member   := ident ':' literal
//! literal  := digits ('u8'|'u16'|'u32'|'u64'|'u128')    -> Unsigned
//!           | '-'? digits ('i8'|'i16'|'i32'|'i64'|'i128') -> Signed
//!           | digits 'field'                           -> Field
//!           | 'true' | 'false'                         -> Bool
//!           | 'aleo1' [a-z0-9]+                        -> Address
//!           | anything else                            -> Other
//! ```
//!
//! Literals may carry a `.private` / `.public` visibility suffix, which is
//! dropped. Nested struct members are kept as `Other` with their raw text.
//! Members that do not have the `ident: literal` shape are skipped.

use crate::parsing::UintWidth;
use alloy::primitives::U256;

/// Typed plaintext literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Unsigned { value: u128, width: UintWidth },
    Signed { value: i128, width: u8 },
    Field(U256),
    Bool(bool),
    Address(String),
    Other(String),
}

impl Literal {
    /// Classify a single literal token.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let token = token
            .strip_suffix(".private")
            .or_else(|| token.strip_suffix(".public"))
            .unwrap_or(token);

        match token {
            "true" => return Literal::Bool(true),
            "false" => return Literal::Bool(false),
            _ => {}
        }

        if token.starts_with("aleo1")
            && token
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Literal::Address(token.to_string());
        }

        let (negative, unsigned) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let split = unsigned
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(unsigned.len());
        let (digits, suffix) = unsigned.split_at(split);
        if digits.is_empty() {
            return Literal::Other(token.to_string());
        }

        if !negative {
            if let Some(width) = UintWidth::from_suffix(suffix) {
                if let Ok(value) = digits.parse() {
                    return Literal::Unsigned { value, width };
                }
            }
            if suffix == "field" {
                if let Ok(value) = U256::from_str_radix(digits, 10) {
                    return Literal::Field(value);
                }
            }
        }

        if let Some(width) = suffix.strip_prefix('i').and_then(|w| w.parse::<u8>().ok()) {
            if matches!(width, 8 | 16 | 32 | 64 | 128) {
                if let Ok(value) = digits.parse::<i128>() {
                    let value = if negative { -value } else { value };
                    return Literal::Signed { value, width };
                }
            }
        }

        Literal::Other(token.to_string())
    }

    pub fn as_unsigned(&self) -> Option<u128> {
        match self {
            Literal::Unsigned { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<U256> {
        match self {
            Literal::Field(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&str> {
        match self {
            Literal::Address(value) => Some(value),
            _ => None,
        }
    }
}

/// Ordered `name -> literal` members of a plaintext struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaintextStruct {
    members: Vec<(String, Literal)>,
}

impl PlaintextStruct {
    /// Parse struct text. Never fails; unrecognised members are skipped.
    pub fn parse(raw: &str) -> Self {
        let body = raw.trim();
        let body = body.strip_prefix('{').unwrap_or(body);
        let body = body.strip_suffix('}').unwrap_or(body);

        let members = split_top_level(body)
            .into_iter()
            .filter_map(|member| {
                let (name, value) = member.split_once(':')?;
                let name = name.trim();
                if name.is_empty()
                    || !name
                        .bytes()
                        .all(|b| b.is_ascii_alphanumeric() || b == b'_')
                {
                    return None;
                }
                let value = value.trim();
                let literal = if value.starts_with('{') {
                    Literal::Other(value.to_string())
                } else {
                    Literal::parse(value)
                };
                Some((name.to_string(), literal))
            })
            .collect();

        Self { members }
    }

    /// First member named `name`.
    pub fn get(&self, name: &str) -> Option<&Literal> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, literal)| literal)
    }

    /// Unsigned member, only if it carries the expected width.
    pub fn uint(&self, name: &str, width: UintWidth) -> Option<u128> {
        match self.get(name)? {
            Literal::Unsigned { value, width: w } if *w == width => Some(*value),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    pub fn address(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_address()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.members.iter().map(|(name, lit)| (name.as_str(), lit))
    }
}

/// Split on commas that are not nested inside braces.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts.retain(|p| !p.trim().is_empty());
    parts
}
