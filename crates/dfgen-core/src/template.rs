use std::collections::{BTreeMap, HashMap};
use std::error::Error as StdError;
use std::fs;
use std::path::Path;

use tera::{Context, Tera};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::convert::Converter;
use crate::document::{Document, VARIABLES_KEY};
use crate::error::{ConvertError, Error};
use crate::value::{Mapping, Value};

pub const DEFAULT_TEMPLATE_NAME: &str = "Dockerfile";
pub const INSTRUCTION_FUNCTION: &str = "docker_instruction";
pub const INSTRUCTION_ARGUMENT: &str = "instruction";

const BUILTIN_TEMPLATE: &str = include_str!("../templates/Dockerfile.tera");

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Loads every file under each search directory. When two directories
    /// hold the same relative path the earlier directory wins; the built-in
    /// `Dockerfile` template is used when no directory provides one.
    pub fn new<P: AsRef<Path>>(converter: Converter, search_paths: &[P]) -> Result<Self, Error> {
        let mut sources = BTreeMap::new();
        for directory in search_paths {
            collect_templates(directory.as_ref(), &mut sources)?;
        }
        if !sources.contains_key(DEFAULT_TEMPLATE_NAME) {
            sources.insert(DEFAULT_TEMPLATE_NAME.to_string(), BUILTIN_TEMPLATE.to_string());
        }

        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.add_raw_templates(sources.iter().map(|(name, body)| (name.as_str(), body.as_str())))
            .map_err(template_error)?;
        tera.register_function(INSTRUCTION_FUNCTION, DockerInstruction { converter });

        Ok(Self { tera })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|known| known == name)
    }

    pub fn template_names(&self) -> Vec<&str> {
        let mut names = self.tera.get_template_names().collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn render(
        &self,
        template: &str,
        document: &Document,
        variables: &Mapping,
    ) -> Result<String, Error> {
        if !self.has_template(template) {
            return Err(Error::template(format!(
                "template \"{template}\" not found in the search path"
            )));
        }
        let context = Context::from_value(document.context(variables)).map_err(template_error)?;
        info!(
            template,
            instructions = document.instructions().len(),
            "rendering dockerfile"
        );
        self.tera.render(template, &context).map_err(render_error)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("templates", &self.template_names())
            .finish()
    }
}

/// Renders raw document text as a template before it is parsed as YAML.
/// Variables are visible both by name and under `variables`.
pub fn render_source(source: &str, variables: &Mapping) -> Result<String, Error> {
    let mut context = Context::new();
    for (key, value) in variables.iter() {
        context.insert(key, &value.to_json());
    }
    context.insert(VARIABLES_KEY, &Value::Mapping(variables.clone()).to_json());
    Tera::one_off(source, &context, false).map_err(render_error)
}

fn collect_templates(directory: &Path, sources: &mut BTreeMap<String, String>) -> Result<(), Error> {
    if !directory.is_dir() {
        warn!(path = %directory.display(), "template search path is not a directory, skipping");
        return Ok(());
    }

    for entry in WalkDir::new(directory).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            Error::template(format!(
                "cannot scan template directory {}: {err}",
                directory.display()
            ))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(directory) else {
            continue;
        };
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if sources.contains_key(&name) {
            debug!(template = %name, path = %entry.path().display(), "template shadowed by an earlier search path");
            continue;
        }
        let body = fs::read_to_string(entry.path()).map_err(Error::io)?;
        debug!(template = %name, path = %entry.path().display(), "loaded template");
        sources.insert(name, body);
    }
    Ok(())
}

struct DockerInstruction {
    converter: Converter,
}

impl tera::Function for DockerInstruction {
    fn call(&self, args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
        let instruction = args.get(INSTRUCTION_ARGUMENT).ok_or_else(|| {
            tera::Error::msg(format!(
                "{INSTRUCTION_FUNCTION} needs the argument '{INSTRUCTION_ARGUMENT}'"
            ))
        })?;
        let object = Value::from_json(instruction).map_err(|err| tera::Error::msg(err.to_string()))?;
        let line = self
            .converter
            .convert(&object)
            .map_err(|err| tera::Error::chain(err.to_string(), err))?;
        Ok(tera::Value::String(line))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// Pulls a [`ConvertError`] back out of a render failure, or describes the
/// whole error chain as a template error.
fn render_error(err: tera::Error) -> Error {
    let mut source: Option<&(dyn StdError + 'static)> = Some(&err);
    while let Some(current) = source {
        if let Some(convert) = current.downcast_ref::<ConvertError>() {
            return Error::Convert(convert.clone());
        }
        source = current.source();
    }
    template_error(err)
}

fn template_error(err: tera::Error) -> Error {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(current) = source {
        message.push_str(": ");
        message.push_str(&current.to_string());
        source = current.source();
    }
    Error::template(message)
}
