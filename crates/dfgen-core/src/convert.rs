use std::sync::Arc;

use tracing::trace;

use crate::error::ConvertError;
use crate::registry::Registry;
use crate::value::Value;

/// Converts instruction objects (`{"NAME": argument}`) to instruction lines.
///
/// Cloning shares the registry.
#[derive(Debug, Clone)]
pub struct Converter {
    registry: Arc<Registry>,
}

impl Converter {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn with_builtins() -> Result<Self, ConvertError> {
        Ok(Self::new(Arc::new(Registry::with_builtins()?)))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Converts one instruction object. The object must be a mapping with
    /// exactly one key.
    pub fn convert(&self, object: &Value) -> Result<String, ConvertError> {
        let Value::Mapping(mapping) = object else {
            return Err(ConvertError::malformed(format!(
                "expected a mapping with one instruction, got a {}",
                object.kind()
            )));
        };
        if mapping.len() != 1 {
            let keys = mapping.keys().collect::<Vec<_>>().join(", ");
            return Err(ConvertError::malformed(format!(
                "expected exactly one instruction key, got {} [{keys}]",
                mapping.len()
            )));
        }
        let (name, value) = mapping
            .first()
            .ok_or_else(|| ConvertError::malformed("instruction object is empty"))?;
        self.convert_pair(name, value)
    }

    /// Converts an already separated instruction name and argument.
    pub fn convert_pair(&self, name: &str, value: &Value) -> Result<String, ConvertError> {
        let shape = value
            .shape()
            .ok_or_else(|| ConvertError::ArgumentUnknownShape {
                instruction: name.to_ascii_uppercase(),
                received: value.kind().to_string(),
            })?;
        let handler = self.registry.lookup(name, shape)?;
        let line = handler.invoke(self, value)?;
        trace!(instruction = handler.instruction(), %shape, line = %line, "converted instruction");
        Ok(line)
    }

    /// Converts a list of instruction objects, stopping at the first failure.
    pub fn convert_all<'a, I>(&self, objects: I) -> Result<Vec<String>, ConvertError>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        objects.into_iter().map(|object| self.convert(object)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::convert::Converter;
    use crate::error::ConvertError;
    use crate::handler::{Call, Handler};
    use crate::registry::Registry;
    use crate::value::{Mapping, Shape, Value};

    fn object(name: &str, value: Value) -> Value {
        Value::Mapping([(name, value)].into_iter().collect::<Mapping>())
    }

    fn converter() -> Converter {
        Converter::with_builtins().expect("builtins should register")
    }

    #[test]
    fn converts_one_instruction_object() {
        let line = converter()
            .convert(&object("workdir", Value::from("/srv")))
            .expect("WORKDIR should convert");
        assert_eq!(line, "WORKDIR /srv");
    }

    #[test]
    fn objects_need_exactly_one_key() {
        let converter = converter();

        let error = converter
            .convert(&Value::Mapping(Mapping::new()))
            .expect_err("empty object should fail");
        assert!(matches!(error, ConvertError::MalformedInstructionObject { .. }));

        let two = Value::Mapping(
            [("USER", Value::from("app")), ("WORKDIR", Value::from("/"))]
                .into_iter()
                .collect::<Mapping>(),
        );
        let error = converter.convert(&two).expect_err("two keys should fail");
        assert_eq!(
            error.to_string(),
            "malformed instruction object: expected exactly one instruction key, got 2 [USER, WORKDIR]"
        );

        let error = converter
            .convert(&Value::from("FROM ubuntu"))
            .expect_err("bare strings are not objects");
        assert!(matches!(error, ConvertError::MalformedInstructionObject { .. }));
    }

    #[test]
    fn unshaped_values_fail_before_dispatch() {
        let error = converter()
            .convert(&object("expose", Value::Bool(true)))
            .expect_err("booleans have no shape");
        assert_eq!(
            error,
            ConvertError::ArgumentUnknownShape {
                instruction: "EXPOSE".to_string(),
                received: "boolean".to_string(),
            }
        );

        let error = converter()
            .convert(&object("USER", Value::Float(1.5)))
            .expect_err("floats have no shape");
        assert!(matches!(error, ConvertError::ArgumentUnknownShape { .. }));
    }

    #[test]
    fn unknown_instruction_is_handler_not_found() {
        let error = converter()
            .convert(&object("MAINTAINER", Value::from("me")))
            .expect_err("MAINTAINER is not registered");
        assert_eq!(
            error,
            ConvertError::HandlerNotFound {
                instruction: "MAINTAINER".to_string(),
                shape: Shape::String,
            }
        );
    }

    #[test]
    fn conversion_is_deterministic() {
        let converter = converter();
        let env = object(
            "ENV",
            Value::Mapping(
                [("B", Value::from("2")), ("A", Value::from(1))]
                    .into_iter()
                    .collect::<Mapping>(),
            ),
        );
        let first = converter.convert(&env).expect("ENV should convert");
        let second = converter.convert(&env).expect("ENV should convert again");
        assert_eq!(first, second);
        assert_eq!(first, "ENV B=2 \\\n    A=1");
    }

    #[test]
    fn registered_handlers_extend_dispatch() {
        fn maintainer(call: &Call<'_>) -> Result<String, ConvertError> {
            Ok(call.value.render_scalar().unwrap_or_default())
        }

        let registry = Registry::with_builtins().expect("builtins should register");
        registry
            .register(Handler::new("MAINTAINER", Shape::String, "<name>", maintainer))
            .expect("MAINTAINER should register");
        let converter = Converter::new(Arc::new(registry));

        let line = converter
            .convert(&object("maintainer", Value::from("ops@example.com")))
            .expect("custom handler should dispatch");
        assert_eq!(line, "MAINTAINER ops@example.com");
    }

    #[test]
    fn convert_all_stops_at_first_failure() {
        let converter = converter();
        let objects = [
            object("FROM", Value::from("alpine")),
            object("RUN", Value::from("apk add curl")),
        ];
        assert_eq!(
            converter.convert_all(&objects).expect("both should convert"),
            vec!["FROM alpine", "RUN apk add curl"]
        );

        let objects = [object("FROM", Value::from("alpine")), object("USER", Value::Null)];
        assert!(matches!(
            converter.convert_all(&objects),
            Err(ConvertError::HandlerNotFound { .. })
        ));
    }
}
