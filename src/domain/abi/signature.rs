//! Function signatures in canonical text form

use std::fmt;

use alloy_primitives::{keccak256, Selector};
use serde::Serialize;

use crate::domain::InsightError;

/// A function signature such as `withdrawNFT(address,uint256)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FunctionSignature {
    text: String,
}

impl FunctionSignature {
    /// Parse a signature, dropping whitespace and anything after the parameter list
    /// (such as a `returns` clause).
    pub fn parse(text: &str) -> Result<Self, InsightError> {
        let mut normalized: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        let open = normalized
            .find('(')
            .ok_or_else(|| InsightError::Decode(format!("missing '(' in signature '{normalized}'")))?;
        if open == 0 {
            return Err(InsightError::Decode(format!(
                "missing function name in signature '{normalized}'"
            )));
        }
        let close = matching_paren(&normalized, open).ok_or_else(|| {
            InsightError::Decode(format!("unbalanced parentheses in signature '{normalized}'"))
        })?;

        normalized.truncate(close + 1);
        Ok(Self { text: normalized })
    }

    /// Wrap text that is already in canonical form
    pub(crate) fn from_canonical(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    /// Full signature text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Parameter types in declaration order.
    ///
    /// `f()` has no parameters. Commas inside tuple types do not split.
    pub fn parameter_types(&self) -> Vec<&str> {
        let (Some(open), Some(close)) = (self.text.find('('), self.text.rfind(')')) else {
            return Vec::new();
        };
        split_top_level(&self.text[open + 1..close])
    }

    /// 4-byte selector: the first bytes of keccak-256 over the text
    pub fn selector(&self) -> Selector {
        selector_of(&self.text)
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Compute the 4-byte function selector from a signature
pub fn selector_of(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    Selector::from_slice(&hash[..4])
}

/// Bare lowercase hex of a selector (no `0x`)
pub fn selector_hex(selector: &Selector) -> String {
    hex::encode(selector.as_slice())
}

/// Index of the `)` closing the `(` at `open`
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level(params: &str) -> Vec<&str> {
    if params.is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in params.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&params[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&params[start..]);
    parts
}
