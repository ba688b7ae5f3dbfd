use crate::convert::Converter;
use crate::error::{ConvertError, Error};
use crate::value::{Mapping, Value};

pub const INSTRUCTIONS_KEY: &str = "instructions";
pub const VARIABLES_KEY: &str = "variables";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    extra: Mapping,
    instructions: Vec<Value>,
}

impl Document {
    pub fn from_yaml_str(text: &str) -> Result<Self, Error> {
        if text.trim().is_empty() {
            return Self::from_value(Value::Null);
        }
        let parsed: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|err| Error::document(format!("invalid YAML: {err}")))?;
        Self::from_value(Value::from_yaml(&parsed)?)
    }

    pub fn from_value(root: Value) -> Result<Self, Error> {
        match root {
            Value::Null => Ok(Self {
                extra: Mapping::new(),
                instructions: Vec::new(),
            }),
            Value::Sequence(instructions) => Ok(Self {
                extra: Mapping::new(),
                instructions,
            }),
            Value::Mapping(mapping) => {
                let mut extra = Mapping::new();
                let mut instructions = Vec::new();
                for (key, value) in mapping {
                    if key != INSTRUCTIONS_KEY {
                        extra.insert(key, value);
                        continue;
                    }
                    instructions = match value {
                        Value::Sequence(values) => values,
                        Value::Null => Vec::new(),
                        other => {
                            return Err(Error::document(format!(
                                "\"{INSTRUCTIONS_KEY}\" must be a sequence, got a {}",
                                other.kind()
                            )));
                        }
                    };
                }
                Ok(Self {
                    extra,
                    instructions,
                })
            }
            other => Err(Error::document(format!(
                "document root must be a sequence or a mapping, got a {}",
                other.kind()
            ))),
        }
    }

    pub fn instructions(&self) -> &[Value] {
        &self.instructions
    }

    pub fn extra(&self) -> &Mapping {
        &self.extra
    }

    /// Template context: the document keys, `instructions`, and `variables`.
    pub fn context(&self, variables: &Mapping) -> serde_json::Value {
        let mut context = serde_json::Map::new();
        for (key, value) in self.extra.iter() {
            context.insert(key.to_string(), value.to_json());
        }
        context.insert(
            INSTRUCTIONS_KEY.to_string(),
            serde_json::Value::Array(self.instructions.iter().map(Value::to_json).collect()),
        );
        context.insert(
            VARIABLES_KEY.to_string(),
            Value::Mapping(variables.clone()).to_json(),
        );
        serde_json::Value::Object(context)
    }

    /// One line per instruction, without a template.
    pub fn convert(&self, converter: &Converter) -> Result<Vec<String>, ConvertError> {
        converter.convert_all(&self.instructions)
    }
}

/// Parses a variables file. Blank input and a null root are empty.
pub fn load_variables(text: &str) -> Result<Mapping, Error> {
    if text.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let parsed: serde_yaml::Value = serde_yaml::from_str(text)
        .map_err(|err| Error::document(format!("invalid variables YAML: {err}")))?;
    match Value::from_yaml(&parsed)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(Error::document(format!(
            "variables must be a mapping, got a {}",
            other.kind()
        ))),
    }
}

/// Merges left to right. A later key replaces the value but keeps the
/// position where the key first appeared.
pub fn merge_mappings<'a, I>(layers: I) -> Mapping
where
    I: IntoIterator<Item = &'a Mapping>,
{
    let mut merged = Mapping::new();
    for layer in layers {
        for (key, value) in layer.iter() {
            merged.insert(key, value.clone());
        }
    }
    merged
}
