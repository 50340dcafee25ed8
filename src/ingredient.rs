//! Ingredient input type and name normalization.
//!
//! The normalized form is what every matching stage keys on: trimmed,
//! lowercased, inner whitespace collapsed. An [`Ingredient`] is immutable
//! once created.

/// A free-text ingredient name plus its normalized matching form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ingredient {
    name: String,
    normalized: String,
}

impl Ingredient {
    /// Creates an ingredient, deriving the normalized form from `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let normalized = normalize_name(&name);
        Self { name, normalized }
    }

    /// The name exactly as supplied by the caller.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized matching form.
    #[inline]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Normalized name split into words.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.normalized.split(' ')
    }

    /// The last normalized word, conventionally the head noun of a
    /// multi-word ingredient ("whole milk" -> "milk").
    pub fn main_word(&self) -> &str {
        self.normalized.rsplit(' ').next().unwrap_or("")
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Lowercases, trims, and collapses runs of whitespace to single spaces.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
