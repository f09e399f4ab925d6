//! Update documents: `$set`, `$unset` and `$inc`.

use serde_json::{Map, Number, Value};

use crate::server::{
    db::{filter::json_kind, Document, ID_FIELD},
    error::document::DocumentError,
};

/// Parsed update, applied in place to decoded documents.
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    operations: Vec<Operation>,
}

#[derive(Clone, Debug, PartialEq)]
enum Operation {
    Set(String, Value),
    Unset(String),
    Inc(String, Number),
}

impl Update {
    /// Parse an update value.
    ///
    /// # Returns
    /// - `Ok(Update)` - Parsed update
    /// - `Err(DocumentError::InvalidUpdate)` - Update is empty, isn't an object, mixes plain fields
    ///   with operators, or `$inc` has a non-numeric operand
    /// - `Err(DocumentError::UnsupportedOperator)` - Unknown update operator
    /// - `Err(DocumentError::ImmutableId)` - Update targets the `_id` field
    pub fn parse(update: &Value) -> Result<Self, DocumentError> {
        let object = match update {
            Value::Object(object) if !object.is_empty() => object,
            Value::Object(_) => {
                return Err(DocumentError::InvalidUpdate(
                    "update document must not be empty".to_string(),
                ))
            }
            other => {
                return Err(DocumentError::InvalidUpdate(format!(
                    "expected an object but got {}",
                    json_kind(other)
                )))
            }
        };

        let mut operations = Vec::new();
        for (operator, fields) in object {
            if !operator.starts_with('$') {
                return Err(DocumentError::InvalidUpdate(format!(
                    "update document must only contain operators, found field '{}'",
                    operator
                )));
            }

            let fields = match fields {
                Value::Object(fields) => fields,
                other => {
                    return Err(DocumentError::InvalidUpdate(format!(
                        "{} needs an object but got {}",
                        operator,
                        json_kind(other)
                    )))
                }
            };

            for (path, value) in fields {
                if path == ID_FIELD || path.starts_with("_id.") {
                    return Err(DocumentError::ImmutableId);
                }

                let operation = match operator.as_str() {
                    "$set" => Operation::Set(path.clone(), value.clone()),
                    "$unset" => Operation::Unset(path.clone()),
                    "$inc" => match value {
                        Value::Number(n) => Operation::Inc(path.clone(), n.clone()),
                        other => {
                            return Err(DocumentError::InvalidUpdate(format!(
                                "cannot increment by {}",
                                json_kind(other)
                            )))
                        }
                    },
                    other => return Err(DocumentError::UnsupportedOperator(other.to_string())),
                };
                operations.push(operation);
            }
        }

        Ok(Self { operations })
    }

    /// Apply the update to a document.
    ///
    /// # Returns
    /// - `Ok(true)` - The document changed
    /// - `Ok(false)` - Every operation was a no-op
    /// - `Err(DocumentError::InvalidUpdate)` - A path crosses a non-object value or `$inc`
    ///   targets a non-numeric field
    pub fn apply(&self, document: &mut Document) -> Result<bool, DocumentError> {
        let mut modified = false;

        for operation in &self.operations {
            modified |= match operation {
                Operation::Set(path, value) => {
                    let (parent, key) = parent_mut(document, path, true)?;
                    let parent = match parent {
                        Some(parent) => parent,
                        None => continue,
                    };
                    if parent.get(key) == Some(value) {
                        false
                    } else {
                        parent.insert(key.to_string(), value.clone());
                        true
                    }
                }
                Operation::Unset(path) => match parent_mut(document, path, false)? {
                    (Some(parent), key) => parent.remove(key).is_some(),
                    (None, _) => false,
                },
                Operation::Inc(path, by) => {
                    let (parent, key) = parent_mut(document, path, true)?;
                    let parent = match parent {
                        Some(parent) => parent,
                        None => continue,
                    };
                    let incremented = match parent.get(key) {
                        None => Value::Number(by.clone()),
                        Some(Value::Number(current)) => Value::Number(add(current, by)?),
                        Some(other) => {
                            return Err(DocumentError::InvalidUpdate(format!(
                                "cannot apply $inc to field '{}' holding {}",
                                path,
                                json_kind(other)
                            )))
                        }
                    };
                    parent.insert(key.to_string(), incremented);
                    true
                }
            };
        }

        Ok(modified)
    }
}

// Walk to the object holding the last path segment, optionally creating missing objects.
fn parent_mut<'d, 'p>(
    document: &'d mut Document,
    path: &'p str,
    create: bool,
) -> Result<(Option<&'d mut Map<String, Value>>, &'p str), DocumentError> {
    let (parents, key) = match path.rsplit_once('.') {
        Some((parents, key)) => (Some(parents), key),
        None => (None, path),
    };

    let mut current = document;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            if !current.contains_key(segment) {
                if !create {
                    return Ok((None, key));
                }
                current.insert(segment.to_string(), Value::Object(Map::new()));
            }

            current = match current.get_mut(segment) {
                Some(Value::Object(object)) => object,
                Some(other) => {
                    return Err(DocumentError::InvalidUpdate(format!(
                        "cannot traverse field '{}' holding {} in path '{}'",
                        segment,
                        json_kind(other),
                        path
                    )))
                }
                None => return Ok((None, key)),
            };
        }
    }

    Ok((Some(current), key))
}

fn add(current: &Number, by: &Number) -> Result<Number, DocumentError> {
    if let (Some(a), Some(b)) = (current.as_i64(), by.as_i64()) {
        if let Some(sum) = a.checked_add(b) {
            return Ok(Number::from(sum));
        }
    }

    let sum = current.as_f64().unwrap_or_default() + by.as_f64().unwrap_or_default();
    Number::from_f64(sum).ok_or_else(|| {
        DocumentError::InvalidUpdate(format!("$inc produced a non-finite number: {}", sum))
    })
}
