use crate::value::Shape;

/// Failure converting one instruction object to an instruction line.
///
/// Every variant names the instruction it was raised for, so the message can
/// be traced back to the document entry that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("instruction \"{instruction}\" is missing argument \"{argument}\" (usage: {usage})")]
    ArgumentMissing {
        instruction: String,
        argument: String,
        usage: String,
    },
    #[error(
        "instruction \"{instruction}\" expects argument \"{argument}\" of type \"{expected}\" but got \"{received}\""
    )]
    ArgumentType {
        instruction: String,
        argument: String,
        expected: String,
        received: String,
    },
    #[error("instruction \"{instruction}\" supports \"{argument}\" or \"{other}\" arguments, not both")]
    ArgumentDisjointed {
        instruction: String,
        argument: String,
        other: String,
    },
    #[error(
        "instruction \"{instruction}\" expects argument \"{argument}\" within {lower}..={upper} but got {value}"
    )]
    ArgumentNumericBounds {
        instruction: String,
        argument: String,
        value: i64,
        lower: i64,
        upper: i64,
    },
    #[error(
        "instruction \"{instruction}\" has malformed argument \"{argument}\": {value:?} does not match {pattern}"
    )]
    ArgumentPattern {
        instruction: String,
        argument: String,
        value: String,
        pattern: String,
    },
    #[error(
        "instruction \"{instruction}\" expects argument \"{argument}\" with exactly {expected} member(s) but got {received}"
    )]
    ArgumentCollectionLength {
        instruction: String,
        argument: String,
        expected: usize,
        received: usize,
    },
    #[error("instruction \"{instruction}\" has an argument of unsupported kind \"{received}\"")]
    ArgumentUnknownShape {
        instruction: String,
        received: String,
    },
    #[error("instruction \"{instruction}\" cannot wrap a nested \"{nested}\" instruction")]
    ArgumentNesting { instruction: String, nested: String },
    #[error("no handler for instruction \"{instruction}\" with a {shape} argument")]
    HandlerNotFound { instruction: String, shape: Shape },
    #[error("malformed instruction object: {reason}")]
    MalformedInstructionObject { reason: String },
    #[error("invalid handler definition for \"{instruction}\": {msg}")]
    Definition { instruction: String, msg: String },
}

impl ConvertError {
    pub fn missing(
        instruction: impl Into<String>,
        argument: impl Into<String>,
        usage: impl Into<String>,
    ) -> Self {
        Self::ArgumentMissing {
            instruction: instruction.into(),
            argument: argument.into(),
            usage: usage.into(),
        }
    }

    pub fn type_mismatch(
        instruction: impl Into<String>,
        argument: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self::ArgumentType {
            instruction: instruction.into(),
            argument: argument.into(),
            expected: expected.into(),
            received: received.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInstructionObject {
            reason: reason.into(),
        }
    }

    pub fn definition(instruction: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Definition {
            instruction: instruction.into(),
            msg: msg.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),
    #[error("document error: {msg}")]
    Document { msg: String },
    #[error("template error: {msg}")]
    Template { msg: String },
    #[error("dockerfile parse error: {msg}")]
    DockerfileParse { msg: String },
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document { msg: msg.into() }
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template { msg: msg.into() }
    }

    pub fn dockerfile_parse(msg: impl Into<String>) -> Self {
        Self::DockerfileParse { msg: msg.into() }
    }

    pub fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}
