use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Result of resolving one narrative value.
///
/// Structured items and unstructured fragments are kept in two separate
/// sequences, each in input order; they are never interleaved. Both may be
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    #[serde(default)]
    structured: Vec<StructuredNarrative>,
    #[serde(default)]
    unstructured: Vec<String>,
}

impl Narrative {
    /// An empty narrative.
    pub fn new() -> Self {
        Self::default()
    }

    /// Structured items in input order.
    pub fn structured_narratives(&self) -> &[StructuredNarrative] {
        &self.structured
    }

    /// Unstructured fragments in input order.
    pub fn unstructured_fragments(&self) -> &[String] {
        &self.unstructured
    }

    /// First structured item with the given codeword.
    pub fn structured(&self, codeword: &str) -> Option<&StructuredNarrative> {
        self.structured.iter().find(|s| s.codeword == codeword)
    }

    /// All structured items with the given codeword.
    pub fn structured_all<'a>(
        &'a self,
        codeword: &'a str,
    ) -> impl Iterator<Item = &'a StructuredNarrative> + 'a {
        self.structured.iter().filter(move |s| s.codeword == codeword)
    }

    /// Unstructured fragments joined with `delimiter`, or `None` if there are none.
    pub fn unstructured_text(&self, delimiter: &str) -> Option<String> {
        join_fragments(&self.unstructured, delimiter)
    }

    /// True when there are neither structured items nor unstructured fragments.
    pub fn is_empty(&self) -> bool {
        self.structured.is_empty() && self.unstructured.is_empty()
    }

    pub(crate) fn push_structured(&mut self, item: StructuredNarrative) {
        self.structured.push(item);
    }

    pub(crate) fn push_unstructured(&mut self, fragment: &str) {
        self.unstructured.push(fragment.to_string());
    }
}

/// One decoded codeword item.
///
/// Built with the `with_*` methods or by the engines; once part of a
/// [`Narrative`] it is only reachable through shared references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredNarrative {
    codeword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    amount: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    narrative_fragments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    supplement_fragments: Vec<String>,
}

impl StructuredNarrative {
    /// A new item with only a codeword.
    pub fn new(codeword: impl Into<String>) -> Self {
        Self {
            codeword: codeword.into(),
            country: None,
            currency: None,
            amount: None,
            narrative_fragments: Vec::new(),
            supplement_fragments: Vec::new(),
        }
    }

    /// Set the country code.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the currency code.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the amount.
    pub fn with_amount(mut self, amount: BigDecimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Append a narrative fragment (ignored when empty).
    pub fn with_narrative(mut self, fragment: &str) -> Self {
        self.push_narrative(fragment);
        self
    }

    /// Append a supplement fragment (ignored when empty).
    pub fn with_supplement(mut self, fragment: &str) -> Self {
        self.push_supplement(fragment);
        self
    }

    /// The codeword.
    pub fn codeword(&self) -> &str {
        &self.codeword
    }

    /// The country code, if any.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// The currency code, if any.
    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// The amount, if any.
    pub fn amount(&self) -> Option<&BigDecimal> {
        self.amount.as_ref()
    }

    /// Narrative fragments in input order.
    pub fn narrative_fragments(&self) -> &[String] {
        &self.narrative_fragments
    }

    /// Supplement fragments in input order.
    pub fn supplement_fragments(&self) -> &[String] {
        &self.supplement_fragments
    }

    /// Narrative fragments joined with `delimiter`.
    pub fn narrative_text(&self, delimiter: &str) -> Option<String> {
        join_fragments(&self.narrative_fragments, delimiter)
    }

    /// Supplement fragments joined with `delimiter`.
    pub fn supplement_text(&self, delimiter: &str) -> Option<String> {
        join_fragments(&self.supplement_fragments, delimiter)
    }

    pub(crate) fn set_country(&mut self, country: &str) {
        self.country = Some(country.to_string());
    }

    pub(crate) fn set_currency(&mut self, currency: String) {
        self.currency = Some(currency);
    }

    pub(crate) fn set_amount(&mut self, amount: BigDecimal) {
        self.amount = Some(amount);
    }

    pub(crate) fn push_narrative(&mut self, fragment: &str) {
        if !fragment.is_empty() {
            self.narrative_fragments.push(fragment.to_string());
        }
    }

    pub(crate) fn push_supplement(&mut self, fragment: &str) {
        if !fragment.is_empty() {
            self.supplement_fragments.push(fragment.to_string());
        }
    }
}

/// Human-readable rendering: `/CODE/` then `CC//`, currency and amount, then
/// the narrative fragments joined by a space, then `/` plus supplement
/// fragments. Not a standard-compliant field value (no line wrapping).
///
/// The narrative stays on the codeword line only after a country or an
/// amount. Otherwise it goes on a `//` continuation line, where it cannot be
/// read back as a country or currency.
impl std::fmt::Display for StructuredNarrative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/", self.codeword)?;
        if let Some(country) = &self.country {
            write!(f, "{country}//")?;
        }
        if let Some(currency) = &self.currency {
            f.write_str(currency)?;
        }
        if let Some(amount) = &self.amount {
            write!(f, "{amount}")?;
        }
        if let Some(text) = self.narrative_text(" ") {
            if self.amount.is_none() && self.country.is_none() {
                f.write_str("\n//")?;
            } else if self.amount.is_some() && starts_numeric(&text) {
                // keep narrative digits out of the amount
                f.write_str(" ")?;
            }
            f.write_str(&text)?;
        }
        if let Some(supplement) = self.supplement_text(" ") {
            write!(f, "/{supplement}")?;
        }
        Ok(())
    }
}

fn starts_numeric(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == ',')
}

fn join_fragments(fragments: &[String], delimiter: &str) -> Option<String> {
    (!fragments.is_empty()).then(|| fragments.join(delimiter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn empty_narrative() {
        let n = Narrative::new();
        assert!(n.is_empty());
        assert!(n.structured_narratives().is_empty());
        assert!(n.unstructured_fragments().is_empty());
        assert_eq!(n.unstructured_text("\n"), None);
    }

    #[test]
    fn lookup_by_codeword() {
        let mut n = Narrative::new();
        n.push_structured(StructuredNarrative::new("INS").with_narrative("first"));
        n.push_structured(StructuredNarrative::new("ACC").with_narrative("other"));
        n.push_structured(StructuredNarrative::new("INS").with_narrative("second"));

        assert_eq!(
            n.structured("INS").unwrap().narrative_fragments(),
            &["first".to_string()]
        );
        assert_eq!(n.structured_all("INS").count(), 2);
        assert!(n.structured("BNF").is_none());
    }

    #[test]
    fn empty_fragments_are_skipped() {
        let s = StructuredNarrative::new("X").with_narrative("").with_supplement("");
        assert!(s.narrative_fragments().is_empty());
        assert!(s.supplement_fragments().is_empty());
    }

    #[test]
    fn joined_text() {
        let s = StructuredNarrative::new("20")
            .with_narrative("a")
            .with_narrative("b")
            .with_supplement("c");
        assert_eq!(s.narrative_text(" ").as_deref(), Some("a b"));
        assert_eq!(s.supplement_text("|").as_deref(), Some("c"));
        assert_eq!(StructuredNarrative::new("20").narrative_text(" "), None);
    }

    #[test]
    fn display_renders_all_parts() {
        let s = StructuredNarrative::new("CHGS")
            .with_currency("USD")
            .with_amount(dec("12.50"))
            .with_narrative("late fee");
        assert_eq!(s.to_string(), "/CHGS/USD12.50late fee");

        let s = StructuredNarrative::new("REPORT")
            .with_country("DE")
            .with_narrative("text");
        assert_eq!(s.to_string(), "/REPORT/DE//text");

        let s = StructuredNarrative::new("20")
            .with_narrative("QUERY")
            .with_supplement("ONE")
            .with_supplement("TWO");
        assert_eq!(s.to_string(), "/20/\n//QUERY/ONE TWO");

        let s = StructuredNarrative::new("DEAL").with_narrative("REF");
        assert_eq!(s.to_string(), "/DEAL/\n//REF");

        let s = StructuredNarrative::new("20").with_supplement("ONLY");
        assert_eq!(s.to_string(), "/20//ONLY");
    }

    #[test]
    fn display_keeps_narrative_off_the_currency() {
        let s = StructuredNarrative::new("CHGS")
            .with_currency("late fee")
            .with_narrative("5 ITEMS");
        assert_eq!(s.to_string(), "/CHGS/late fee\n//5 ITEMS");
    }

    #[test]
    fn display_keeps_country_like_narrative_off_the_codeword_line() {
        let s = StructuredNarrative::new("REASON").with_narrative("DE");
        assert_eq!(s.to_string(), "/REASON/\n//DE");
    }

    #[test]
    fn display_separates_numeric_narrative_from_amount() {
        let s = StructuredNarrative::new("CHGS")
            .with_currency("EUR")
            .with_amount(dec("3"))
            .with_narrative("5 ITEMS");
        assert_eq!(s.to_string(), "/CHGS/EUR3 5 ITEMS");
    }

    #[test]
    fn serde_omits_absent_parts() {
        let s = StructuredNarrative::new("DEAL").with_narrative("REF");
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"codeword":"DEAL","narrative_fragments":["REF"]}"#);
    }

    #[test]
    fn serde_amount_is_string() {
        let s = StructuredNarrative::new("CHGS")
            .with_currency("USD")
            .with_amount(dec("12.50"));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["amount"], "12.50");
        let back: StructuredNarrative = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }
}
