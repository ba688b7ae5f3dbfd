//! Built-in Dockerfile instruction handlers.

use regex::Regex;

use crate::constraint::Constraint;
use crate::error::ConvertError;
use crate::format::{
    DEFAULT_KEY_VALUE_DELIMITER, DEFAULT_LINE_BREAK, dict_with_conditional_line_breaks,
    json_array, list_with_conditional_line_breaks, str_join_with_conditional_delimiter,
};
use crate::handler::{Body, Call, Handler};
use crate::value::{Mapping, Shape, Value};

pub const FROM: &str = "FROM";
pub const RUN: &str = "RUN";
pub const CMD: &str = "CMD";
pub const LABEL: &str = "LABEL";
pub const EXPOSE: &str = "EXPOSE";
pub const ENV: &str = "ENV";
pub const ADD: &str = "ADD";
pub const COPY: &str = "COPY";
pub const ENTRYPOINT: &str = "ENTRYPOINT";
pub const VOLUME: &str = "VOLUME";
pub const USER: &str = "USER";
pub const WORKDIR: &str = "WORKDIR";
pub const ARG: &str = "ARG";
pub const ONBUILD: &str = "ONBUILD";
pub const STOPSIGNAL: &str = "STOPSIGNAL";
pub const HEALTHCHECK: &str = "HEALTHCHECK";
pub const SHELL: &str = "SHELL";

/// Instructions that may not appear under ONBUILD.
pub const NOT_NESTABLE: [&str; 2] = [ONBUILD, HEALTHCHECK];

const FROM_PATTERN: &str =
    r"^(?P<image>[^\s:@]+(?::[0-9]+/[^\s:@]+)?)(?:(?P<delimiter>[:@])(?P<reference>[^\s@]+))?$";
const ARG_PATTERN: &str = r"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?:=(?P<default>.*))?$";

const STRING: &[Shape] = &[Shape::String];
const SEQUENCE: &[Shape] = &[Shape::Sequence];
const MAPPING: &[Shape] = &[Shape::Mapping];

mod usage {
    pub const FROM_STR: &str = "<image>, <image>:<tag>, or <image>@<digest>";
    pub const FROM_MAPPING: &str =
        r#"{"image": "...", "tag": "..." | "digest": "...", "alias": "...", "platform": "..."}"#;
    pub const COMMAND_STR: &str = "<command>";
    pub const COMMAND_SEQUENCE: &str = r#"["<executable>", "<param1>", "<param2>"]"#;
    pub const COMMAND_MAPPING: &str = r#"{"executable": "...", "params": ["...", "..."]}"#;
    pub const PAIRS: &str = r#"{"<key>": "<value>", ...}"#;
    pub const ENV_STR: &str = "<key>=<value>";
    pub const PORT: &str = "<port>[/<protocol>]";
    pub const PORTS: &str = r#"["<port>[/<protocol>]", ...]"#;
    pub const PATHS_STR: &str = "<src>... <dest>";
    pub const PATHS_SEQUENCE: &str = r#"["<src>", ..., "<dest>"]"#;
    pub const VOLUME_STR: &str = "<path>";
    pub const VOLUME_SEQUENCE: &str = r#"["<path>", ...]"#;
    pub const USER_STR: &str = "<user>[:<group>]";
    pub const USER_INT: &str = "<uid>";
    pub const WORKDIR: &str = "<path>";
    pub const ARG_STR: &str = "<name>[=<default value>]";
    pub const ARG_MAPPING: &str = r#"{"<name>": "<default value>"}"#;
    pub const ONBUILD: &str = r#"{"<INSTRUCTION>": <argument>}"#;
    pub const SIGNAL_STR: &str = "<signal name>";
    pub const SIGNAL_INT: &str = "<signal number>";
    pub const HEALTHCHECK_NONE: &str = "null";
    pub const HEALTHCHECK_MAPPING: &str =
        r#"{"options": {"interval": "...", "retries": ...}, "cmd": <CMD argument>}"#;
    pub const SHELL_STR: &str = "<executable> <param>...";
    pub const SHELL_SEQUENCE: &str = r#"["<executable>", "<param>", ...]"#;
}

/// Every built-in handler, one per (instruction, shape) pair.
pub fn builtin() -> Result<Vec<Handler>, ConvertError> {
    let from_pattern = compile(FROM, FROM_PATTERN)?;
    let arg_pattern = compile(ARG, ARG_PATTERN)?;

    let mut handlers = vec![
        Handler::new(FROM, Shape::String, usage::FROM_STR, from_text)
            .with(Constraint::required("image", Shape::String))
            .with(Constraint::pattern("image", from_pattern))
            .reads_captures(),
        Handler::new(FROM, Shape::Mapping, usage::FROM_MAPPING, from_mapping)
            .with(Constraint::required_key("image", STRING))
            .with(Constraint::optional_key(
                "tag",
                &[Shape::String, Shape::Integer],
                Some("digest"),
            ))
            .with(Constraint::optional_key("digest", STRING, Some("tag")))
            .with(Constraint::optional_key("alias", STRING, None))
            .with(Constraint::optional_key("platform", STRING, None)),
    ];

    for name in [RUN, CMD, ENTRYPOINT] {
        let sequence_body: Body = if name == RUN {
            shell_lines
        } else {
            exec_sequence
        };
        handlers.extend([
            Handler::new(name, Shape::String, usage::COMMAND_STR, verbatim)
                .with(Constraint::required("command", Shape::String)),
            Handler::new(name, Shape::Sequence, usage::COMMAND_SEQUENCE, sequence_body)
                .with(Constraint::required("command", Shape::Sequence)),
            Handler::new(name, Shape::Mapping, usage::COMMAND_MAPPING, exec_mapping)
                .with(Constraint::required_key("executable", STRING))
                .with(Constraint::optional_key("params", SEQUENCE, None)),
        ]);
    }

    handlers.extend([
        Handler::new(LABEL, Shape::Mapping, usage::PAIRS, pairs)
            .with(Constraint::required("labels", Shape::Mapping)),
        Handler::new(EXPOSE, Shape::Integer, usage::PORT, integer)
            .with(Constraint::required("port", Shape::Integer)),
        Handler::new(EXPOSE, Shape::Sequence, usage::PORTS, space_separated)
            .with(Constraint::required("ports", Shape::Sequence)),
        Handler::new(ENV, Shape::String, usage::ENV_STR, verbatim)
            .with(Constraint::required("variables", Shape::String)),
        Handler::new(ENV, Shape::Mapping, usage::PAIRS, pairs)
            .with(Constraint::required("variables", Shape::Mapping)),
    ]);

    for name in [ADD, COPY] {
        handlers.extend([
            Handler::new(name, Shape::String, usage::PATHS_STR, verbatim)
                .with(Constraint::required("paths", Shape::String)),
            Handler::new(name, Shape::Sequence, usage::PATHS_SEQUENCE, exec_sequence)
                .with(Constraint::required("paths", Shape::Sequence)),
        ]);
    }

    handlers.extend([
        Handler::new(VOLUME, Shape::String, usage::VOLUME_STR, verbatim)
            .with(Constraint::required("path", Shape::String)),
        Handler::new(VOLUME, Shape::Sequence, usage::VOLUME_SEQUENCE, exec_sequence)
            .with(Constraint::required("paths", Shape::Sequence)),
        Handler::new(USER, Shape::String, usage::USER_STR, verbatim)
            .with(Constraint::required("user", Shape::String)),
        Handler::new(USER, Shape::Integer, usage::USER_INT, integer).with(
            Constraint::numeric_bounds("uid", 0, i64::from(u32::MAX)),
        ),
        Handler::new(WORKDIR, Shape::String, usage::WORKDIR, verbatim)
            .with(Constraint::required("path", Shape::String)),
        Handler::new(ARG, Shape::String, usage::ARG_STR, arg_text)
            .with(Constraint::required("name", Shape::String))
            .with(Constraint::pattern("name", arg_pattern))
            .reads_captures(),
        Handler::new(ARG, Shape::Mapping, usage::ARG_MAPPING, arg_mapping)
            .with(Constraint::collection_length("name", 1)),
        Handler::new(ONBUILD, Shape::Mapping, usage::ONBUILD, onbuild)
            .with(Constraint::collection_length("instruction", 1)),
        Handler::new(STOPSIGNAL, Shape::String, usage::SIGNAL_STR, verbatim)
            .with(Constraint::required("signal", Shape::String)),
        Handler::new(STOPSIGNAL, Shape::Integer, usage::SIGNAL_INT, integer)
            .with(Constraint::numeric_bounds("signal", 0, 64)),
        Handler::new(HEALTHCHECK, Shape::Null, usage::HEALTHCHECK_NONE, empty),
        Handler::new(HEALTHCHECK, Shape::Mapping, usage::HEALTHCHECK_MAPPING, healthcheck)
            .with(Constraint::required_key(
                "cmd",
                &[Shape::String, Shape::Sequence, Shape::Mapping],
            ))
            .with(Constraint::optional_key("options", MAPPING, None)),
        Handler::new(SHELL, Shape::String, usage::SHELL_STR, shell_words)
            .with(Constraint::required("command", Shape::String)),
        Handler::new(SHELL, Shape::Sequence, usage::SHELL_SEQUENCE, exec_sequence)
            .with(Constraint::required("command", Shape::Sequence)),
    ]);

    Ok(handlers)
}

fn compile(instruction: &str, pattern: &str) -> Result<Regex, ConvertError> {
    Regex::new(pattern).map_err(|err| ConvertError::definition(instruction, err.to_string()))
}

fn verbatim(call: &Call<'_>) -> Result<String, ConvertError> {
    text(call).map(str::to_string)
}

fn integer(call: &Call<'_>) -> Result<String, ConvertError> {
    call.value
        .as_integer()
        .map(|value| value.to_string())
        .ok_or_else(|| call.type_mismatch("argument", Shape::Integer.as_str(), call.value))
}

fn empty(_call: &Call<'_>) -> Result<String, ConvertError> {
    Ok(String::new())
}

fn from_text(call: &Call<'_>) -> Result<String, ConvertError> {
    let captures = call.captures()?;
    Ok(str_join_with_conditional_delimiter(
        [captures.get("image"), captures.get("reference")],
        captures.get("delimiter").unwrap_or_default(),
    ))
}

fn from_mapping(call: &Call<'_>) -> Result<String, ConvertError> {
    let mapping = mapping(call)?;
    let image = mapping.get("image").and_then(Value::as_str);
    let tag = match mapping.get("tag") {
        Some(Value::Null) | None => None,
        Some(tag) => Some(scalar(call, "tag", tag)?),
    };
    let digest = mapping.get("digest").and_then(Value::as_str);

    let reference = match tag.as_deref() {
        Some(tag) => str_join_with_conditional_delimiter([image, Some(tag)], ":"),
        None => str_join_with_conditional_delimiter([image, digest], "@"),
    };
    let platform = mapping
        .get("platform")
        .and_then(Value::as_str)
        .map(|platform| format!("--platform={platform}"));
    let alias = mapping
        .get("alias")
        .and_then(Value::as_str)
        .map(|alias| format!("AS {alias}"));

    Ok(str_join_with_conditional_delimiter(
        [platform.as_deref(), Some(reference.as_str()), alias.as_deref()],
        " ",
    ))
}

fn shell_lines(call: &Call<'_>) -> Result<String, ConvertError> {
    let lines = scalars(call, "command", sequence(call)?)?;
    Ok(list_with_conditional_line_breaks(
        lines,
        DEFAULT_LINE_BREAK,
        call.instruction.len() + 1,
        true,
    ))
}

fn exec_sequence(call: &Call<'_>) -> Result<String, ConvertError> {
    Ok(json_array(sequence(call)?))
}

fn exec_mapping(call: &Call<'_>) -> Result<String, ConvertError> {
    let mapping = mapping(call)?;
    let mut items = Vec::new();
    if let Some(executable) = mapping.get("executable") {
        items.push(executable.clone());
    }
    if let Some(Value::Sequence(params)) = mapping.get("params") {
        items.extend(params.iter().cloned());
    }
    Ok(json_array(&items))
}

fn pairs(call: &Call<'_>) -> Result<String, ConvertError> {
    let pairs = mapping(call)?
        .iter()
        .map(|(key, value)| -> Result<_, ConvertError> { Ok((key, scalar(call, key, value)?)) })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(dict_with_conditional_line_breaks(
        pairs,
        DEFAULT_KEY_VALUE_DELIMITER,
        DEFAULT_LINE_BREAK,
        call.instruction.len() + 1,
        false,
    ))
}

fn space_separated(call: &Call<'_>) -> Result<String, ConvertError> {
    Ok(scalars(call, "ports", sequence(call)?)?.join(" "))
}

fn arg_text(call: &Call<'_>) -> Result<String, ConvertError> {
    let captures = call.captures()?;
    Ok(str_join_with_conditional_delimiter(
        [captures.get("name"), captures.get("default")],
        DEFAULT_KEY_VALUE_DELIMITER,
    ))
}

fn arg_mapping(call: &Call<'_>) -> Result<String, ConvertError> {
    let (name, default) = sole_pair(call, "name")?;
    let default = match default {
        Value::Null => None,
        other => Some(scalar(call, name, other)?),
    };
    Ok(str_join_with_conditional_delimiter(
        [Some(name), default.as_deref()],
        DEFAULT_KEY_VALUE_DELIMITER,
    ))
}

fn onbuild(call: &Call<'_>) -> Result<String, ConvertError> {
    let (name, nested) = sole_pair(call, "instruction")?;
    let nested_name = name.to_ascii_uppercase();
    if NOT_NESTABLE.contains(&nested_name.as_str()) {
        return Err(ConvertError::ArgumentNesting {
            instruction: call.instruction.to_string(),
            nested: nested_name,
        });
    }
    call.convert_nested(name, nested)
}

fn healthcheck(call: &Call<'_>) -> Result<String, ConvertError> {
    let mapping = mapping(call)?;
    let options = match mapping.get("options") {
        Some(Value::Mapping(options)) => healthcheck_options(call, options)?,
        _ => String::new(),
    };
    let command = match mapping.get("cmd") {
        Some(cmd) => call.convert_nested(CMD, cmd)?,
        None => return Err(ConvertError::missing(call.instruction, "cmd", call.usage)),
    };
    Ok(str_join_with_conditional_delimiter(
        [Some(options.as_str()), Some(command.as_str())],
        " ",
    ))
}

fn healthcheck_options(call: &Call<'_>, options: &Mapping) -> Result<String, ConvertError> {
    let flags = options
        .iter()
        .map(|(key, value)| -> Result<String, ConvertError> {
            let value = scalar(call, key, value)?;
            Ok(if key.starts_with("--") {
                format!("{key}={value}")
            } else {
                format!("--{key}={value}")
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(flags.join(" "))
}

fn shell_words(call: &Call<'_>) -> Result<String, ConvertError> {
    let words = text(call)?
        .split_whitespace()
        .map(Value::from)
        .collect::<Vec<_>>();
    Ok(json_array(&words))
}

fn text<'a>(call: &Call<'a>) -> Result<&'a str, ConvertError> {
    call.value
        .as_str()
        .ok_or_else(|| call.type_mismatch("argument", Shape::String.as_str(), call.value))
}

fn sequence<'a>(call: &Call<'a>) -> Result<&'a [Value], ConvertError> {
    call.value
        .as_sequence()
        .ok_or_else(|| call.type_mismatch("argument", Shape::Sequence.as_str(), call.value))
}

fn mapping<'a>(call: &Call<'a>) -> Result<&'a Mapping, ConvertError> {
    call.value
        .as_mapping()
        .ok_or_else(|| call.type_mismatch("argument", Shape::Mapping.as_str(), call.value))
}

fn sole_pair<'a>(call: &Call<'a>, argument: &str) -> Result<(&'a str, &'a Value), ConvertError> {
    mapping(call)?
        .first()
        .ok_or_else(|| ConvertError::missing(call.instruction, argument, call.usage))
}

fn scalar(call: &Call<'_>, argument: &str, value: &Value) -> Result<String, ConvertError> {
    value
        .render_scalar()
        .ok_or_else(|| call.type_mismatch(argument, "scalar", value))
}

fn scalars(call: &Call<'_>, argument: &str, values: &[Value]) -> Result<Vec<String>, ConvertError> {
    values
        .iter()
        .map(|value| scalar(call, argument, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::convert::Converter;
    use crate::error::ConvertError;
    use crate::value::Value;

    fn convert(yaml: &str) -> Result<String, ConvertError> {
        let parsed: serde_yaml::Value = serde_yaml::from_str(yaml).expect("yaml should parse");
        let object = Value::from_yaml(&parsed).expect("yaml should convert");
        Converter::with_builtins()
            .expect("builtins should register")
            .convert(&object)
    }

    fn line(yaml: &str) -> String {
        convert(yaml).expect("instruction should convert")
    }

    #[test]
    fn from_string_forms() {
        assert_eq!(line("FROM: ubuntu:18.04"), "FROM ubuntu:18.04");
        assert_eq!(line("FROM: ubuntu"), "FROM ubuntu");
        assert_eq!(
            line("FROM: 'ubuntu@sha256:abc123'"),
            "FROM ubuntu@sha256:abc123"
        );
        assert_eq!(
            line("FROM: localhost:5000/app:1.0"),
            "FROM localhost:5000/app:1.0"
        );

        let error = convert("FROM: 'ubuntu:'").expect_err("dangling delimiter should fail");
        assert!(matches!(error, ConvertError::ArgumentPattern { ref argument, .. } if argument == "image"));

        let error = convert("FROM: 'ubuntu:18.04@sha256:abc'")
            .expect_err("tag and digest together should fail");
        assert!(matches!(error, ConvertError::ArgumentPattern { ref value, .. } if value == "ubuntu:18.04@sha256:abc"));

        let error = convert("FROM: ''").expect_err("empty image should fail");
        assert!(matches!(error, ConvertError::ArgumentMissing { .. }));
    }

    #[test]
    fn from_mapping_forms() {
        assert_eq!(
            line("FROM: {image: ubuntu, digest: 'sha256:abc'}"),
            "FROM ubuntu@sha256:abc"
        );
        assert_eq!(line("FROM: {image: ubuntu, tag: '18.04'}"), "FROM ubuntu:18.04");
        assert_eq!(line("FROM: {image: python, tag: 3}"), "FROM python:3");
        assert_eq!(
            line("FROM: {image: golang, tag: '1.22', alias: build, platform: linux/amd64}"),
            "FROM --platform=linux/amd64 golang:1.22 AS build"
        );

        let error = convert("FROM: {image: ubuntu, tag: x, digest: y}")
            .expect_err("tag and digest are exclusive");
        assert!(matches!(error, ConvertError::ArgumentDisjointed { .. }));

        let error = convert("FROM: {tag: x}").expect_err("image is required");
        assert!(matches!(error, ConvertError::ArgumentMissing { ref argument, .. } if argument == "image"));

        let error = convert("FROM: {image: ubuntu, tag: 18.04}").expect_err("float tag");
        assert!(matches!(error, ConvertError::ArgumentType { ref received, .. } if received == "float"));
    }

    #[test]
    fn command_forms() {
        assert_eq!(line("RUN: make install"), "RUN make install");
        assert_eq!(
            line("RUN: {executable: echo, params: [hi]}"),
            r#"RUN ["echo", "hi"]"#
        );
        assert_eq!(
            line("ENTRYPOINT: {executable: /entrypoint.sh}"),
            r#"ENTRYPOINT ["/entrypoint.sh"]"#
        );
        assert_eq!(
            line("CMD: [nginx, -g, 'daemon off;']"),
            r#"CMD ["nginx", "-g", "daemon off;"]"#
        );
        assert_eq!(
            line("RUN: [apt-get update, apt-get install -y curl]"),
            "RUN \"apt-get update\" \\\n    \"apt-get install -y curl\""
        );
        assert_eq!(line("RUN: [make]"), "RUN \"make\"");

        let error = convert("CMD: {params: [x]}").expect_err("executable is required");
        assert!(matches!(error, ConvertError::ArgumentMissing { ref argument, .. } if argument == "executable"));

        let error = convert("CMD: []").expect_err("empty list is missing");
        assert!(matches!(error, ConvertError::ArgumentMissing { .. }));
    }

    #[test]
    fn pair_forms_keep_document_order() {
        assert_eq!(
            line("LABEL: {version: 1, maintainer: ops}"),
            "LABEL version=1 \\\n      maintainer=ops"
        );
        assert_eq!(
            line("ENV: {PATH: /usr/local/bin, DEBUG: 1}"),
            "ENV PATH=/usr/local/bin \\\n    DEBUG=1"
        );
        assert_eq!(line("ENV: {LANG: C.UTF-8}"), "ENV LANG=C.UTF-8");
        assert_eq!(line("ENV: LANG=C.UTF-8"), "ENV LANG=C.UTF-8");

        let error = convert("LABEL: {nested: {a: b}}").expect_err("nested values fail");
        assert!(matches!(error, ConvertError::ArgumentType { ref argument, .. } if argument == "nested"));
    }

    #[test]
    fn expose_forms() {
        assert_eq!(line("EXPOSE: 80"), "EXPOSE 80");
        assert_eq!(line("EXPOSE: [80, 443/tcp]"), "EXPOSE 80 443/tcp");

        let error = convert("EXPOSE: {a: 1}").expect_err("mapping is unsupported");
        assert_eq!(
            error,
            ConvertError::HandlerNotFound {
                instruction: "EXPOSE".to_string(),
                shape: crate::value::Shape::Mapping,
            }
        );
    }

    #[test]
    fn path_forms() {
        assert_eq!(line("COPY: . /app"), "COPY . /app");
        assert_eq!(
            line("ADD: [a.tar.gz, b, /dest/]"),
            r#"ADD ["a.tar.gz", "b", "/dest/"]"#
        );
        assert_eq!(line("VOLUME: /data"), "VOLUME /data");
        assert_eq!(line("VOLUME: [/data, /logs]"), r#"VOLUME ["/data", "/logs"]"#);
        assert_eq!(line("WORKDIR: /app"), "WORKDIR /app");
    }

    #[test]
    fn user_bounds() {
        assert_eq!(line("USER: 4294967295"), "USER 4294967295");
        assert_eq!(line("USER: 0"), "USER 0");
        assert_eq!(line("USER: nobody:nogroup"), "USER nobody:nogroup");

        let error = convert("USER: 4294967296").expect_err("2^32 is out of bounds");
        assert!(matches!(
            error,
            ConvertError::ArgumentNumericBounds {
                value: 4294967296,
                lower: 0,
                upper: 4294967295,
                ..
            }
        ));
        assert!(convert("USER: -1").is_err());
    }

    #[test]
    fn arg_forms() {
        assert_eq!(line("ARG: VERSION=1.0"), "ARG VERSION=1.0");
        assert_eq!(line("ARG: VERSION"), "ARG VERSION");
        assert_eq!(line("ARG: {VERSION: '1.0'}"), "ARG VERSION=1.0");
        assert_eq!(line("ARG: {VERSION: null}"), "ARG VERSION");
        assert_eq!(line("ARG: {BUILD: 7}"), "ARG BUILD=7");

        let error = convert("ARG: {A: 1, B: 2}").expect_err("two pairs should fail");
        assert!(matches!(
            error,
            ConvertError::ArgumentCollectionLength {
                expected: 1,
                received: 2,
                ..
            }
        ));
        let error = convert("ARG: '=1'").expect_err("missing name should fail");
        assert!(matches!(error, ConvertError::ArgumentPattern { .. }));
    }

    #[test]
    fn onbuild_wraps_one_instruction() {
        assert_eq!(
            line("ONBUILD: {WORKDIR: /app}"),
            "ONBUILD WORKDIR /app"
        );
        assert_eq!(
            line("ONBUILD: {run: [make]}"),
            "ONBUILD RUN \"make\""
        );

        let error = convert("ONBUILD: {ONBUILD: {WORKDIR: /app}}").expect_err("no self nesting");
        assert_eq!(
            error,
            ConvertError::ArgumentNesting {
                instruction: "ONBUILD".to_string(),
                nested: "ONBUILD".to_string(),
            }
        );
        let error = convert("ONBUILD: {healthcheck: null}").expect_err("no healthcheck");
        assert!(matches!(error, ConvertError::ArgumentNesting { .. }));

        let error = convert("ONBUILD: {EXPOSE: {a: 1}}").expect_err("nested errors propagate");
        assert!(matches!(error, ConvertError::HandlerNotFound { .. }));
    }

    #[test]
    fn stopsignal_forms() {
        assert_eq!(line("STOPSIGNAL: SIGTERM"), "STOPSIGNAL SIGTERM");
        assert_eq!(line("STOPSIGNAL: 64"), "STOPSIGNAL 64");
        assert!(matches!(
            convert("STOPSIGNAL: 65"),
            Err(ConvertError::ArgumentNumericBounds { .. })
        ));
    }

    #[test]
    fn healthcheck_forms() {
        assert_eq!(line("HEALTHCHECK: null"), "HEALTHCHECK ");
        assert_eq!(line("HEALTHCHECK:"), "HEALTHCHECK ");
        assert_eq!(
            line("HEALTHCHECK: {options: {interval: 5m, --retries: 3}, cmd: 'curl -f http://localhost/'}"),
            "HEALTHCHECK --interval=5m --retries=3 CMD curl -f http://localhost/"
        );
        assert_eq!(
            line("HEALTHCHECK: {cmd: [curl, -f, 'http://localhost/']}"),
            r#"HEALTHCHECK CMD ["curl", "-f", "http://localhost/"]"#
        );
        assert_eq!(
            line("HEALTHCHECK: {options: {timeout: 3s}, cmd: {executable: /bin/check, params: [--quiet]}}"),
            r#"HEALTHCHECK --timeout=3s CMD ["/bin/check", "--quiet"]"#
        );

        let error = convert("HEALTHCHECK: {options: {retries: 3}}").expect_err("cmd required");
        assert!(matches!(error, ConvertError::ArgumentMissing { ref argument, .. } if argument == "cmd"));
        let error = convert("HEALTHCHECK: {cmd: 5}").expect_err("integer cmd");
        assert!(matches!(error, ConvertError::ArgumentType { ref argument, .. } if argument == "cmd"));
    }

    #[test]
    fn shell_forms() {
        assert_eq!(
            line("SHELL: powershell -command"),
            r#"SHELL ["powershell", "-command"]"#
        );
        assert_eq!(line("SHELL: [/bin/bash, -c]"), r#"SHELL ["/bin/bash", "-c"]"#);
    }
}
