//! Catalog filter construction.
//!
//! Turns the loosely-typed query parameters of a product search into a
//! conjunctive [`ProductFilter`]. Parameters that cannot be used (empty
//! category, non-numeric bounds) are dropped silently rather than rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::product::{Document, ProductField};

/// Raw product search parameters as they arrive on the query string.
///
/// Every value is kept as a string so that malformed numbers can be ignored
/// instead of failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearch {
    pub category: Option<String>,
    pub price_low: Option<String>,
    pub price_high: Option<String>,
    pub ratings_low: Option<String>,
    pub ratings_high: Option<String>,
}

/// A numeric range over one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericRange {
    /// `low <= value <= high`
    Between { low: f64, high: f64 },
    /// `value >= low`
    AtLeast(f64),
    /// `value <= high`
    AtMost(f64),
}

impl NumericRange {
    /// Combine two optional bounds.
    ///
    /// Both present yields a closed range, one present yields a one-sided
    /// range, neither yields `None`. Inverted bounds are kept as given.
    #[must_use]
    pub const fn from_bounds(low: Option<f64>, high: Option<f64>) -> Option<Self> {
        match (low, high) {
            (Some(low), Some(high)) => Some(Self::Between { low, high }),
            (Some(low), None) => Some(Self::AtLeast(low)),
            (None, Some(high)) => Some(Self::AtMost(high)),
            (None, None) => None,
        }
    }

    /// Lower bound, if any.
    #[must_use]
    pub const fn low(&self) -> Option<f64> {
        match *self {
            Self::Between { low, .. } | Self::AtLeast(low) => Some(low),
            Self::AtMost(_) => None,
        }
    }

    /// Upper bound, if any.
    #[must_use]
    pub const fn high(&self) -> Option<f64> {
        match *self {
            Self::Between { high, .. } | Self::AtMost(high) => Some(high),
            Self::AtLeast(_) => None,
        }
    }

    /// Whether `value` falls inside the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.low().is_none_or(|low| value >= low) && self.high().is_none_or(|high| value <= high)
    }
}

/// A single filter condition over a product document.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value (or is an array containing it).
    Equals { field: ProductField, value: Value },
    /// Field is a number inside the range.
    Range {
        field: ProductField,
        range: NumericRange,
    },
}

impl Condition {
    /// Evaluate the condition against a document body.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Equals { field, value } => doc.get(field.as_str()).is_some_and(|actual| {
                actual == value || matches!(actual, Value::Array(items) if items.contains(value))
            }),
            Self::Range { field, range } => doc
                .get(field.as_str())
                .and_then(Value::as_f64)
                .is_some_and(|n| range.contains(n)),
        }
    }
}

/// A conjunction of conditions.
///
/// An empty filter matches every document; callers that must not run an
/// unfiltered query check [`ProductFilter::is_empty`] first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    conditions: Vec<Condition>,
}

impl ProductFilter {
    /// A filter with no conditions.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Products currently on flash sale.
    #[must_use]
    pub fn flash_sale() -> Self {
        Self::all().with(Condition::Equals {
            field: ProductField::FlashSale,
            value: Value::Bool(true),
        })
    }

    /// Build the search filter from raw query parameters.
    ///
    /// Category equality comes first, then the price range, then the
    /// ratings range; each is added only when usable.
    #[must_use]
    pub fn from_search(search: &ProductSearch) -> Self {
        let mut filter = Self::all();

        if let Some(category) = search.category.as_deref().filter(|c| !c.is_empty()) {
            filter.push(Condition::Equals {
                field: ProductField::Category,
                value: Value::String(category.to_owned()),
            });
        }

        let bounds = [
            (ProductField::Price, &search.price_low, &search.price_high),
            (ProductField::Ratings, &search.ratings_low, &search.ratings_high),
        ];
        for (field, low, high) in bounds {
            let low = low.as_deref().and_then(parse_number);
            let high = high.as_deref().and_then(parse_number);
            if let Some(range) = NumericRange::from_bounds(low, high) {
                filter.push(Condition::Range { field, range });
            }
        }

        filter
    }

    /// Add a condition, builder style.
    #[must_use]
    pub fn with(mut self, condition: Condition) -> Self {
        self.push(condition);
        self
    }

    /// Add a condition.
    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// The conditions, in the order they were added.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether no condition was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether every condition holds for the document.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
    }
}

/// Parse the leading decimal number of a string.
///
/// Leading whitespace is skipped and anything after the longest numeric
/// prefix is ignored, so `"12abc"` reads as `12`. Accepts an optional sign,
/// digits with an optional fraction, an optional exponent, and the literal
/// `Infinity`. Returns `None` when there is no numeric prefix at all.
#[must_use]
pub fn parse_number(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let unsigned = s.get(end..)?;
    if unsigned.starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(bytes, end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(bytes, end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(bytes, exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s.get(..end)?.parse().ok()
}

fn count_digits(bytes: &[u8], start: usize) -> usize {
    bytes
        .get(start..)
        .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
}
