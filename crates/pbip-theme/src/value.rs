//! Literal value coercion.
//!
//! Report properties store constants inside an expression envelope, with the
//! constant itself encoded as a string:
//!
//! ```text
//! {"expr": {"Literal": {"Value": "'#FFFFFF'"}}}
//! {"expr": {"Literal": {"Value": "12D"}}}
//! {"expr": {"Literal": {"Value": "true"}}}
//! ```
//!
//! [`ValueCoercer`] unwraps the envelope and turns the encoded string into a
//! native JSON scalar. Parsing is handled by an ordered chain of
//! [`LiteralRule`]s: the first rule whose predicate accepts the (quote-stripped)
//! text converts it. Text that no rule accepts is kept as a string.
//!
//! Coercion never fails. A token that looks numeric but does not parse is
//! returned as the string it was.
//!
//! # Example
//!
//! ```
//! use pbip_theme::value::coerce;
//! use serde_json::json;
//!
//! let node = json!({"expr": {"Literal": {"Value": "14D"}}});
//! assert_eq!(coerce(&node), json!(14));
//!
//! let node = json!({"expr": {"Literal": {"Value": "'Segoe UI'"}}});
//! assert_eq!(coerce(&node), json!("Segoe UI"));
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use serde_json::{Map, Number, Value};

/// Quote character wrapping string literals.
const QUOTE: char = '\'';

/// Suffix tagging a decimal literal (`1.5D`).
pub const DECIMAL_SUFFIX: char = 'D';

/// Suffix tagging a long integer literal (`100L`).
pub const LONG_SUFFIX: char = 'L';

static DEFAULT_COERCER: Lazy<ValueCoercer> = Lazy::new(ValueCoercer::default);

/// Coerce a property node using the standard rule chain.
///
/// See [`ValueCoercer::coerce`].
pub fn coerce(node: &Value) -> Value {
    DEFAULT_COERCER.coerce(node)
}

/// One step of the literal parsing chain.
///
/// `applies` decides whether this rule owns the text; `convert` produces the
/// value. Once a rule applies, later rules are not consulted, so `convert`
/// carries its own string fallback.
#[derive(Clone, Copy)]
pub struct LiteralRule {
    name: &'static str,
    applies: fn(&str) -> bool,
    convert: fn(&str) -> Value,
}

impl LiteralRule {
    /// Create a rule from a predicate and a converter.
    pub const fn new(
        name: &'static str,
        applies: fn(&str) -> bool,
        convert: fn(&str) -> Value,
    ) -> Self {
        Self {
            name,
            applies,
            convert,
        }
    }

    /// `true`/`false` in any letter case.
    pub const BOOLEAN: LiteralRule = LiteralRule::new("boolean", is_boolean, to_boolean);

    /// Numbers tagged with a [`DECIMAL_SUFFIX`] or [`LONG_SUFFIX`].
    pub const SUFFIXED_NUMBER: LiteralRule =
        LiteralRule::new("suffixed number", has_type_suffix, to_suffixed_number);

    /// Untagged numbers: float when the text has a decimal point, integer otherwise.
    pub const BARE_NUMBER: LiteralRule = LiteralRule::new("bare number", always, to_bare_number);

    /// The rule's name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this rule handles `text`.
    pub fn applies(&self, text: &str) -> bool {
        (self.applies)(text)
    }

    /// Convert `text`. Only meaningful when [`applies`](Self::applies) is true.
    pub fn convert(&self, text: &str) -> Value {
        (self.convert)(text)
    }
}

impl fmt::Debug for LiteralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiteralRule")
            .field("name", &self.name)
            .finish()
    }
}

/// Converts report property nodes into native values.
///
/// The standard chain is boolean, then suffixed number, then bare number.
/// Extra rules can be placed ahead of the standard ones with
/// [`with_rule`](Self::with_rule).
#[derive(Debug, Clone)]
pub struct ValueCoercer {
    rules: Vec<LiteralRule>,
}

impl Default for ValueCoercer {
    fn default() -> Self {
        Self {
            rules: vec![
                LiteralRule::BOOLEAN,
                LiteralRule::SUFFIXED_NUMBER,
                LiteralRule::BARE_NUMBER,
            ],
        }
    }
}

impl ValueCoercer {
    /// Create a coercer with no rules. Every literal stays a string.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a coercer from an explicit rule list, tried in order.
    pub fn with_rules(rules: Vec<LiteralRule>) -> Self {
        Self { rules }
    }

    /// Insert a rule ahead of the existing ones.
    pub fn with_rule(mut self, rule: LiteralRule) -> Self {
        self.rules.insert(0, rule);
        self
    }

    /// The rules in the order they are tried.
    pub fn rules(&self) -> &[LiteralRule] {
        &self.rules
    }

    /// Coerce one property node.
    ///
    /// - A mapping holding a literal envelope becomes the literal's value,
    ///   parsed by the rule chain when it is a string and returned as-is otherwise.
    /// - Any other mapping is coerced value by value, keeping keys and order.
    /// - A sequence is coerced element by element.
    /// - Scalars are returned unchanged.
    pub fn coerce(&self, node: &Value) -> Value {
        match node {
            Value::Object(map) => match literal_of(map) {
                Some(Value::String(text)) => self.coerce_literal(text),
                Some(native) => native.clone(),
                None => Value::Object(
                    map.iter()
                        .map(|(key, value)| (key.clone(), self.coerce(value)))
                        .collect(),
                ),
            },
            Value::Array(items) => Value::Array(items.iter().map(|v| self.coerce(v)).collect()),
            scalar => scalar.clone(),
        }
    }

    /// Parse the string form of a literal.
    pub fn coerce_literal(&self, raw: &str) -> Value {
        let text = strip_quotes(raw);
        self.rules
            .iter()
            .find(|rule| rule.applies(text))
            .map(|rule| rule.convert(text))
            .unwrap_or_else(|| Value::String(text.to_string()))
    }
}

/// Returns the `Value` of a `{"expr": {"Literal": {"Value": ..}}}` envelope.
fn literal_of(map: &Map<String, Value>) -> Option<&Value> {
    map.get("expr")?
        .as_object()?
        .get("Literal")?
        .as_object()?
        .get("Value")
}

/// Remove one pair of surrounding single quotes.
pub fn strip_quotes(text: &str) -> &str {
    text.strip_prefix(QUOTE)
        .and_then(|rest| rest.strip_suffix(QUOTE))
        .unwrap_or(text)
}

fn is_boolean(text: &str) -> bool {
    text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false")
}

fn to_boolean(text: &str) -> Value {
    Value::Bool(text.eq_ignore_ascii_case("true"))
}

fn has_type_suffix(text: &str) -> bool {
    text.ends_with(DECIMAL_SUFFIX) || text.ends_with(LONG_SUFFIX)
}

fn to_suffixed_number(text: &str) -> Value {
    // Both suffixes are ASCII, so slicing off one byte stays on a char boundary.
    let digits = &text[..text.len() - 1];
    parse_integer(digits)
        .or_else(|| parse_float(digits))
        .unwrap_or_else(|| fallback(text))
}

fn always(_: &str) -> bool {
    true
}

fn to_bare_number(text: &str) -> Value {
    let parsed = if text.contains('.') {
        parse_float(text)
    } else {
        parse_integer(text)
    };
    parsed.unwrap_or_else(|| fallback(text))
}

fn parse_integer(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::from(n));
    }
    if let Ok(n) = text.parse::<u64>() {
        return Some(Value::from(n));
    }
    parse_big_integer(text)
}

/// Integers beyond 64 bits, kept exact as a JSON number.
fn parse_big_integer(text: &str) -> Option<Value> {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // JSON forbids leading zeros; anything zero-valued already fit in i64.
    let digits = digits.trim_start_matches('0');
    format!("{sign}{digits}")
        .parse::<Number>()
        .ok()
        .map(Value::Number)
}

fn parse_float(text: &str) -> Option<Value> {
    // Non-finite floats have no JSON representation.
    let f = text.parse::<f64>().ok()?;
    Number::from_f64(f).map(Value::Number)
}

fn fallback(text: &str) -> Value {
    log::trace!("literal {text:?} kept as string");
    Value::String(text.to_string())
}
