use regex::Regex;

use crate::error::ConvertError;
use crate::value::{Mapping, Shape, Value};

#[derive(Debug, Clone)]
pub enum Constraint {
    /// Value must be truthy and of `shape`.
    Required {
        argument: &'static str,
        shape: Shape,
    },
    /// Mapping must hold a non-null `key` of one of `shapes`.
    RequiredKey {
        key: &'static str,
        shapes: &'static [Shape],
    },
    /// When `key` is set it must be one of `shapes`, and `exclusive_with`
    /// must then be absent.
    OptionalKey {
        key: &'static str,
        shapes: &'static [Shape],
        exclusive_with: Option<&'static str>,
    },
    /// Integer within `lower..=upper`.
    NumericBounds {
        argument: &'static str,
        lower: i64,
        upper: i64,
    },
    Pattern {
        argument: &'static str,
        regex: Regex,
    },
    /// Sequence or mapping with exactly `length` members.
    CollectionLength {
        argument: &'static str,
        length: usize,
    },
}

impl Constraint {
    pub const fn required(argument: &'static str, shape: Shape) -> Self {
        Self::Required { argument, shape }
    }

    pub const fn required_key(key: &'static str, shapes: &'static [Shape]) -> Self {
        Self::RequiredKey { key, shapes }
    }

    pub const fn optional_key(
        key: &'static str,
        shapes: &'static [Shape],
        exclusive_with: Option<&'static str>,
    ) -> Self {
        Self::OptionalKey {
            key,
            shapes,
            exclusive_with,
        }
    }

    pub const fn numeric_bounds(argument: &'static str, lower: i64, upper: i64) -> Self {
        Self::NumericBounds {
            argument,
            lower,
            upper,
        }
    }

    pub fn pattern(argument: &'static str, regex: Regex) -> Self {
        Self::Pattern { argument, regex }
    }

    pub const fn collection_length(argument: &'static str, length: usize) -> Self {
        Self::CollectionLength { argument, length }
    }

    pub const fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern { .. })
    }

    /// Rejects constraints that can never hold for a handler of `shape`.
    /// `after_pattern` is set when an earlier constraint already replaced the
    /// argument with captures.
    pub fn check_definition(
        &self,
        instruction: &str,
        shape: Shape,
        after_pattern: bool,
    ) -> Result<(), ConvertError> {
        let fail = |msg: String| -> Result<(), ConvertError> {
            Err(ConvertError::definition(instruction, msg))
        };

        if after_pattern {
            return fail(format!(
                "{} cannot follow a regex match constraint",
                self.describe()
            ));
        }

        match self {
            Self::Required {
                shape: required, ..
            } if *required != shape => fail(format!(
                "{} can never hold for a {shape} handler",
                self.describe()
            )),
            Self::RequiredKey { .. } | Self::OptionalKey { .. } if shape != Shape::Mapping => {
                fail(format!("{} needs a mapping handler", self.describe()))
            }
            Self::OptionalKey {
                key,
                exclusive_with: Some(other),
                ..
            } if key == other => fail(format!("key \"{key}\" cannot exclude itself")),
            Self::NumericBounds { .. } if shape != Shape::Integer => {
                fail(format!("{} needs an integer handler", self.describe()))
            }
            Self::NumericBounds { lower, upper, .. } if lower > upper => {
                fail(format!("empty bounds {lower}..={upper}"))
            }
            Self::Pattern { .. } if shape != Shape::String => {
                fail(format!("{} needs a string handler", self.describe()))
            }
            Self::CollectionLength { .. } if !shape.is_collection() => {
                fail(format!("{} needs a collection handler", self.describe()))
            }
            _ => Ok(()),
        }
    }

    pub fn apply<'a>(
        &self,
        instruction: &str,
        usage: &str,
        state: Validated<'a>,
    ) -> Result<Validated<'a>, ConvertError> {
        let value = state.value;
        match self {
            Self::Required { argument, shape } => {
                if !value.is_truthy() {
                    return Err(ConvertError::missing(instruction, *argument, usage));
                }
                if value.shape() != Some(*shape) {
                    return Err(ConvertError::type_mismatch(
                        instruction,
                        *argument,
                        shape.as_str(),
                        value.kind(),
                    ));
                }
            }
            Self::RequiredKey { key, shapes } => {
                let mapping = expect_mapping(instruction, key, value)?;
                match mapping.get(key) {
                    None | Some(Value::Null) => {
                        return Err(ConvertError::missing(instruction, *key, usage));
                    }
                    Some(found) => check_shapes(instruction, key, shapes, found)?,
                }
            }
            Self::OptionalKey {
                key,
                shapes,
                exclusive_with,
            } => {
                let mapping = expect_mapping(instruction, key, value)?;
                if let Some(found) = mapping.get(key).filter(|found| **found != Value::Null) {
                    check_shapes(instruction, key, shapes, found)?;
                    if let Some(other) = exclusive_with
                        && mapping.contains_key(other)
                    {
                        return Err(ConvertError::ArgumentDisjointed {
                            instruction: instruction.to_string(),
                            argument: key.to_string(),
                            other: other.to_string(),
                        });
                    }
                }
            }
            Self::NumericBounds {
                argument,
                lower,
                upper,
            } => {
                let number = value.as_integer().ok_or_else(|| {
                    ConvertError::type_mismatch(
                        instruction,
                        *argument,
                        Shape::Integer.as_str(),
                        value.kind(),
                    )
                })?;
                if number < *lower || number > *upper {
                    return Err(ConvertError::ArgumentNumericBounds {
                        instruction: instruction.to_string(),
                        argument: argument.to_string(),
                        value: number,
                        lower: *lower,
                        upper: *upper,
                    });
                }
            }
            Self::Pattern { argument, regex } => {
                let text = value.as_str().ok_or_else(|| {
                    ConvertError::type_mismatch(
                        instruction,
                        *argument,
                        Shape::String.as_str(),
                        value.kind(),
                    )
                })?;
                let captures = Captures::parse(regex, text).ok_or_else(|| {
                    ConvertError::ArgumentPattern {
                        instruction: instruction.to_string(),
                        argument: argument.to_string(),
                        value: text.to_string(),
                        pattern: regex.as_str().to_string(),
                    }
                })?;
                return Ok(Validated {
                    value,
                    captures: Some(captures),
                });
            }
            Self::CollectionLength { argument, length } => {
                let received = match value {
                    Value::Sequence(values) => values.len(),
                    Value::Mapping(mapping) => mapping.len(),
                    other => {
                        return Err(ConvertError::type_mismatch(
                            instruction,
                            *argument,
                            "sequence or mapping",
                            other.kind(),
                        ));
                    }
                };
                if received != *length {
                    return Err(ConvertError::ArgumentCollectionLength {
                        instruction: instruction.to_string(),
                        argument: argument.to_string(),
                        expected: *length,
                        received,
                    });
                }
            }
        }
        Ok(state)
    }

    fn describe(&self) -> String {
        match self {
            Self::Required { argument, shape } => format!("required {shape} \"{argument}\""),
            Self::RequiredKey { key, .. } => format!("required key \"{key}\""),
            Self::OptionalKey { key, .. } => format!("optional key \"{key}\""),
            Self::NumericBounds { argument, .. } => format!("numeric bounds on \"{argument}\""),
            Self::Pattern { argument, .. } => format!("regex match on \"{argument}\""),
            Self::CollectionLength { argument, .. } => {
                format!("collection length on \"{argument}\"")
            }
        }
    }
}

/// Argument state threaded through a constraint list.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<'a> {
    pub value: &'a Value,
    pub captures: Option<Captures>,
}

impl<'a> Validated<'a> {
    pub const fn new(value: &'a Value) -> Self {
        Self {
            value,
            captures: None,
        }
    }
}

/// Named capture groups that took part in a regex match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Captures {
    groups: Vec<(String, String)>,
}

impl Captures {
    fn parse(regex: &Regex, text: &str) -> Option<Self> {
        let found = regex.captures(text)?;
        let groups = regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                found
                    .name(name)
                    .map(|group| (name.to_string(), group.as_str().to_string()))
            })
            .collect();
        Some(Self { groups })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.groups
            .iter()
            .find_map(|(group, text)| (group == name).then_some(text.as_str()))
    }
}

fn expect_mapping<'a>(
    instruction: &str,
    key: &str,
    value: &'a Value,
) -> Result<&'a Mapping, ConvertError> {
    value.as_mapping().ok_or_else(|| {
        ConvertError::type_mismatch(instruction, key, Shape::Mapping.as_str(), value.kind())
    })
}

fn check_shapes(
    instruction: &str,
    key: &str,
    shapes: &[Shape],
    found: &Value,
) -> Result<(), ConvertError> {
    if found.shape().is_some_and(|shape| shapes.contains(&shape)) {
        return Ok(());
    }
    let expected = shapes
        .iter()
        .map(|shape| shape.as_str())
        .collect::<Vec<_>>()
        .join(" or ");
    Err(ConvertError::type_mismatch(
        instruction,
        key,
        expected,
        found.kind(),
    ))
}
