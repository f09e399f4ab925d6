//! Query filters.
//!
//! A filter is a JSON object mapping field paths to conditions. A condition is either a plain
//! value (equality) or an object made only of operators such as `{"$gt": 3}`. Paths use dots
//! to reach into nested objects and array positions (`"address.city"`, `"tags.0"`).

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::server::{db::Document, error::document::DocumentError};

/// Parsed filter, evaluated against decoded documents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

#[derive(Clone, Debug, PartialEq)]
struct Condition {
    path: String,
    predicate: Predicate,
}

#[derive(Clone, Debug, PartialEq)]
enum Predicate {
    Eq(Value),
    Ne(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
    Compare(Comparison, Value),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Comparison {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Filter {
    /// Parse a filter value.
    ///
    /// `null` and `{}` match every document.
    ///
    /// # Returns
    /// - `Ok(Filter)` - Parsed filter
    /// - `Err(DocumentError::InvalidFilter)` - Filter is not an object or an operator has a malformed operand
    /// - `Err(DocumentError::UnsupportedOperator)` - Filter uses an operator that isn't implemented
    pub fn parse(filter: &Value) -> Result<Self, DocumentError> {
        let object = match filter {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(DocumentError::InvalidFilter(format!(
                    "expected an object but got {}",
                    json_kind(other)
                )))
            }
        };

        let mut conditions = Vec::new();
        for (path, condition) in object {
            if path.starts_with('$') {
                return Err(DocumentError::UnsupportedOperator(path.clone()));
            }

            match condition {
                Value::Object(operators) if is_operator_object(operators) => {
                    for (operator, operand) in operators {
                        conditions.push(Condition {
                            path: path.clone(),
                            predicate: parse_operator(operator, operand)?,
                        });
                    }
                }
                value => conditions.push(Condition {
                    path: path.clone(),
                    predicate: Predicate::Eq(value.clone()),
                }),
            }
        }

        Ok(Self { conditions })
    }

    /// Returns true when the filter matches every document.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns true when every condition holds for the document.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|condition| {
            let field = lookup(document, &condition.path);
            condition.predicate.evaluate(field)
        })
    }
}

impl Predicate {
    fn evaluate(&self, field: Option<&Value>) -> bool {
        match self {
            Predicate::Eq(expected) => equals(field, expected),
            Predicate::Ne(expected) => !equals(field, expected),
            Predicate::In(candidates) => candidates.iter().any(|c| equals(field, c)),
            Predicate::Nin(candidates) => !candidates.iter().any(|c| equals(field, c)),
            Predicate::Exists(expected) => field.is_some() == *expected,
            Predicate::Compare(comparison, operand) => match field {
                Some(Value::Array(items)) => items
                    .iter()
                    .any(|item| compare(item, *comparison, operand)),
                Some(value) => compare(value, *comparison, operand),
                None => false,
            },
        }
    }
}

fn is_operator_object(object: &Document) -> bool {
    !object.is_empty() && object.keys().all(|key| key.starts_with('$'))
}

fn parse_operator(operator: &str, operand: &Value) -> Result<Predicate, DocumentError> {
    let predicate = match operator {
        "$eq" => Predicate::Eq(operand.clone()),
        "$ne" => Predicate::Ne(operand.clone()),
        "$in" => Predicate::In(array_operand(operator, operand)?),
        "$nin" => Predicate::Nin(array_operand(operator, operand)?),
        "$exists" => Predicate::Exists(match operand {
            Value::Bool(exists) => *exists,
            Value::Number(n) => n.as_f64() != Some(0.0),
            Value::Null => false,
            _ => true,
        }),
        "$gt" => Predicate::Compare(Comparison::Gt, operand.clone()),
        "$gte" => Predicate::Compare(Comparison::Gte, operand.clone()),
        "$lt" => Predicate::Compare(Comparison::Lt, operand.clone()),
        "$lte" => Predicate::Compare(Comparison::Lte, operand.clone()),
        other => return Err(DocumentError::UnsupportedOperator(other.to_string())),
    };

    Ok(predicate)
}

fn array_operand(operator: &str, operand: &Value) -> Result<Vec<Value>, DocumentError> {
    match operand {
        Value::Array(items) => Ok(items.clone()),
        other => Err(DocumentError::InvalidFilter(format!(
            "{} needs an array but got {}",
            operator,
            json_kind(other)
        ))),
    }
}

/// Resolve a dotted path inside a document.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Object(object) => object.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

// A missing field equals null, and an array field equals any of its elements.
fn equals(field: Option<&Value>, expected: &Value) -> bool {
    match field {
        None => expected.is_null(),
        Some(value) if values_equal(value, expected) => true,
        Some(Value::Array(items)) => items.iter().any(|item| values_equal(item, expected)),
        Some(_) => false,
    }
}

/// Structural equality where numbers compare by value, so `1` equals `1.0`.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => a == b,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }

    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Canonical form of a value, with integral floats rewritten as integers.
///
/// Two values equal under [`values_equal`] share one canonical form, which makes it usable as
/// a storage key.
pub(crate) fn canonical(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| Value::from(f as i64))
            .unwrap_or_else(|| value.clone()),
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        Value::Object(object) => Value::Object(
            object
                .iter()
                .map(|(key, value)| (key.clone(), canonical(value)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

fn compare(value: &Value, comparison: Comparison, operand: &Value) -> bool {
    let ordering = match (value, operand) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    };

    match (ordering, comparison) {
        (Some(Ordering::Greater), Comparison::Gt | Comparison::Gte) => true,
        (Some(Ordering::Equal), Comparison::Gte | Comparison::Lte) => true,
        (Some(Ordering::Less), Comparison::Lt | Comparison::Lte) => true,
        _ => false,
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
