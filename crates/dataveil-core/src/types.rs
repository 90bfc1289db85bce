use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// EntryId — positive, monotonically increasing, never reused after deletion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl EntryId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// FieldName — normalized (trimmed, lowercased) at construction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldName(String);

impl FieldName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FieldName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Raw entry: field name to raw string value.
pub type Entry = HashMap<FieldName, String>;

/// Masked entry: field name to transformed value, cached per entry id.
pub type MaskedEntry = HashMap<FieldName, String>;

// ---------------------------------------------------------------------------
// MaskCategory — semantic category for synthetic-value substitution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskCategory {
    Phone,
    Email,
    Address,
    CreditCard,
    Date,
    Generic,
}

impl MaskCategory {
    /// Lenient parse: unrecognized categories fall back to `Generic`
    /// rather than failing, since a generic substitute still satisfies
    /// the privacy property.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "phone" => MaskCategory::Phone,
            "email" => MaskCategory::Email,
            "address" => MaskCategory::Address,
            "credit card" | "credit_card" | "creditcard" => MaskCategory::CreditCard,
            "date" => MaskCategory::Date,
            _ => MaskCategory::Generic,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MaskCategory::Phone => "phone",
            MaskCategory::Email => "email",
            MaskCategory::Address => "address",
            MaskCategory::CreditCard => "credit_card",
            MaskCategory::Date => "date",
            MaskCategory::Generic => "generic",
        }
    }
}

impl fmt::Display for MaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldPolicy — the masking rule bound to one field name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FieldPolicy {
    /// Pass-through.
    None,
    /// Deterministic replacement derived from field name and entry id.
    Pseudonymize,
    /// One-way keyed digest of the raw value under a per-entry secret.
    Tokenize,
    /// Partial masking keeping the last `visible_suffix` characters.
    Redact { visible_suffix: usize },
    /// Replace with a synthetic value of the given semantic category.
    Mask { category: MaskCategory },
}

impl FieldPolicy {
    /// Parse the operator-facing configuration surface: a policy code plus
    /// an optional visible-suffix length (redact) or category (mask).
    ///
    /// Unknown codes and negative suffix lengths are rejected here, at
    /// configuration time — never discovered lazily during masking.
    pub fn from_code(
        code: &str,
        visible_suffix: Option<i64>,
        category: Option<&str>,
    ) -> CoreResult<Self> {
        if let Some(n) = visible_suffix {
            if n < 0 {
                return Err(CoreError::InvalidConfiguration(format!(
                    "visible suffix length must be non-negative, got {}",
                    n
                )));
            }
        }
        match code.trim().to_lowercase().as_str() {
            "none" => Ok(FieldPolicy::None),
            "pseudonymize" => Ok(FieldPolicy::Pseudonymize),
            "tokenize" => Ok(FieldPolicy::Tokenize),
            "redact" => Ok(FieldPolicy::Redact {
                // Show only the last 4 characters unless specified otherwise.
                visible_suffix: visible_suffix.unwrap_or(4) as usize,
            }),
            "mask" => Ok(FieldPolicy::Mask {
                category: category.map(MaskCategory::parse).unwrap_or(MaskCategory::Generic),
            }),
            other => Err(CoreError::InvalidConfiguration(format!(
                "unknown policy code: {}",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// PolicyMap — field name to policy, fixed once configuration finishes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyMap {
    policies: HashMap<FieldName, FieldPolicy>,
}

impl PolicyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FieldName, policy: FieldPolicy) {
        self.policies.insert(field, policy);
    }

    pub fn get(&self, field: &FieldName) -> Option<&FieldPolicy> {
        self.policies.get(field)
    }

    pub fn covers(&self, field: &FieldName) -> bool {
        self.policies.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldName> {
        self.policies.keys()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
