//! Text normalisation for grocery item names

use once_cell::sync::Lazy;
use regex::Regex;

static QUALIFIERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:organic|bio|fresh|local|regional)\b")
        .expect("QUALIFIERS should compile - this is a bug")
});

static QUANTITY_WITH_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+(?:[.,]\d+)?\s*(?:kg|g|l|ml|pcs?|pack|bunch)\b")
        .expect("QUANTITY_WITH_UNIT should compile - this is a bug")
});

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("PUNCTUATION should compile - this is a bug"));

static STANDALONE_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:kg|g|l|ml|pcs?|pack|bunch)\b")
        .expect("STANDALONE_UNIT should compile - this is a bug")
});

/// Canonical form of an item name used for similarity scoring.
///
/// Lower-cases, drops descriptive qualifiers, quantities with units,
/// punctuation and bare unit words, then collapses whitespace.
/// Idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let text = QUALIFIERS.replace_all(&lowered, " ");
    let text = QUANTITY_WITH_UNIT.replace_all(&text, " ");
    let text = PUNCTUATION.replace_all(&text, " ");
    let text = STANDALONE_UNIT.replace_all(&text, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
