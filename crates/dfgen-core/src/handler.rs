use core::fmt;

use crate::constraint::{Captures, Constraint, Validated};
use crate::convert::Converter;
use crate::error::ConvertError;
use crate::value::{Shape, Value};

/// Computes the argument text of an instruction line from a validated call.
pub type Body = fn(&Call<'_>) -> Result<String, ConvertError>;

/// Dispatch key: upper-cased instruction name and accepted argument shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerKey {
    pub instruction: String,
    pub shape: Shape,
}

impl HandlerKey {
    pub fn new(instruction: &str, shape: Shape) -> Self {
        Self {
            instruction: instruction.to_ascii_uppercase(),
            shape,
        }
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.instruction, self.shape)
    }
}

/// Conversion routine for one (instruction, shape) pair.
#[derive(Clone)]
pub struct Handler {
    instruction: String,
    shape: Shape,
    usage: &'static str,
    constraints: Vec<Constraint>,
    reads_captures: bool,
    body: Body,
}

impl Handler {
    pub fn new(instruction: &str, shape: Shape, usage: &'static str, body: Body) -> Self {
        Self {
            instruction: instruction.to_ascii_uppercase(),
            shape,
            usage,
            constraints: Vec::new(),
            reads_captures: false,
            body,
        }
    }

    /// Appends a constraint; constraints run in the order they are added.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Marks the body as reading [`Call::captures`].
    pub fn reads_captures(mut self) -> Self {
        self.reads_captures = true;
        self
    }

    pub fn key(&self) -> HandlerKey {
        HandlerKey {
            instruction: self.instruction.clone(),
            shape: self.shape,
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub const fn shape(&self) -> Shape {
        self.shape
    }

    pub const fn usage(&self) -> &'static str {
        self.usage
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn check_definition(&self) -> Result<(), ConvertError> {
        if self.instruction.is_empty() || self.instruction.contains(char::is_whitespace) {
            return Err(ConvertError::definition(
                &self.instruction,
                "instruction name must be a single non-empty word",
            ));
        }

        let mut after_pattern = false;
        for constraint in &self.constraints {
            constraint.check_definition(&self.instruction, self.shape, after_pattern)?;
            after_pattern |= constraint.is_pattern();
        }

        if self.reads_captures && !after_pattern {
            return Err(ConvertError::definition(
                &self.instruction,
                "body reads captures but no regex match constraint produces them",
            ));
        }
        Ok(())
    }

    /// Validates `value` and renders the full `"<NAME> <body>"` line.
    pub fn invoke(&self, converter: &Converter, value: &Value) -> Result<String, ConvertError> {
        let mut state = Validated::new(value);
        for constraint in &self.constraints {
            state = constraint.apply(&self.instruction, self.usage, state)?;
        }

        let call = Call {
            instruction: &self.instruction,
            usage: self.usage,
            value: state.value,
            captures: state.captures,
            converter,
        };
        let body = (self.body)(&call)?;
        Ok(format!("{} {body}", self.instruction))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("instruction", &self.instruction)
            .field("shape", &self.shape)
            .field("usage", &self.usage)
            .field("constraints", &self.constraints)
            .field("reads_captures", &self.reads_captures)
            .finish_non_exhaustive()
    }
}

/// Everything a handler body can see.
pub struct Call<'a> {
    pub instruction: &'a str,
    pub usage: &'a str,
    pub value: &'a Value,
    captures: Option<Captures>,
    converter: &'a Converter,
}

impl Call<'_> {
    /// Captures recorded by a regex match constraint. Registration rejects
    /// handlers that read captures without one.
    pub fn captures(&self) -> Result<&Captures, ConvertError> {
        self.captures.as_ref().ok_or_else(|| {
            ConvertError::definition(self.instruction, "body reads captures but has no regex match")
        })
    }

    /// Converts an instruction embedded in this one and returns its full line.
    pub fn convert_nested(&self, name: &str, value: &Value) -> Result<String, ConvertError> {
        self.converter.convert_pair(name, value)
    }

    pub fn type_mismatch(&self, argument: &str, expected: &str, found: &Value) -> ConvertError {
        ConvertError::type_mismatch(self.instruction, argument, expected, found.kind())
    }
}
