use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum, error::ErrorKind};
use clap_complete::{
    generate,
    shells::{Bash, Fish, Zsh},
};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dfgen_core::exit_code::ExitCode;
use dfgen_core::{
    Converter, DEFAULT_TEMPLATE_NAME, Document, Error, Mapping, Registry, Renderer,
    load_variables, merge_mappings, render_source, verify_dockerfile,
};

const LONG_ABOUT: &str = "Generate a Dockerfile from a YAML document of instruction objects.\n\nEach instruction object is a single-key mapping such as {FROM: ubuntu:18.04} or {RUN: [apt-get update, apt-get install -y curl]}. The document is first rendered as a template with --template-variables, then parsed, then fed to a Dockerfile template that converts every instruction object to an instruction line.";

const AFTER_HELP: &str = "Examples:\n  dfgen app.yml\n  dfgen app.yml -o Dockerfile --verify\n  dfgen --template-variables vars.yml app.yml\n  dfgen -s templates -t service.tera app.yml\n  cat app.yml | dfgen --stdin\n  dfgen instructions";

fn main() {
    let code = match run() {
        Ok(()) => ExitCode::Success,
        Err(app_error) => {
            if !app_error.message.is_empty() {
                eprintln!("{}", app_error.message);
            }
            app_error.code
        }
    };
    std::process::exit(code.as_i32());
}

#[derive(Debug)]
struct AppError {
    code: ExitCode,
    message: String,
}

impl AppError {
    fn usage(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Usage,
            message: message.into(),
        }
    }

    fn at_path(path: &Path, error: Error) -> Self {
        Self {
            code: ExitCode::from(&error),
            message: format!("{}: {error}", path.display()),
        }
    }
}

impl From<Error> for AppError {
    fn from(value: Error) -> Self {
        Self {
            code: ExitCode::from(&value),
            message: value.to_string(),
        }
    }
}

impl From<dfgen_core::ConvertError> for AppError {
    fn from(value: dfgen_core::ConvertError) -> Self {
        Error::from(value).into()
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(value_enum, value_name = "SHELL")]
        shell: CompletionShell,
    },
    #[command(about = "List supported instructions and argument shapes")]
    Instructions,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Debug, Parser)]
#[command(
    name = "dfgen",
    version,
    about = "Generate Dockerfiles from YAML",
    long_about = LONG_ABOUT,
    after_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(
        value_name = "DOCUMENT",
        help = "YAML document to convert",
        long_help = "YAML document to convert. Its root is a list of instruction objects, or a mapping with that list under `instructions`."
    )]
    document: Option<PathBuf>,

    #[arg(
        long = "stdin",
        help = "Read the YAML document from stdin",
        long_help = "Read the YAML document from stdin. This conflicts with DOCUMENT."
    )]
    stdin: bool,

    #[arg(
        long = "template-variables",
        value_name = "PATH",
        help = "YAML mapping of template variables",
        long_help = "YAML mapping of variables used to render the document itself before it is parsed. They are also visible to the Dockerfile template as `variables`."
    )]
    template_variables: Option<PathBuf>,

    #[arg(
        short = 'b',
        long = "build-variables",
        value_name = "PATH",
        help = "YAML mapping of build variables",
        long_help = "YAML mapping of variables merged over the template variables and exposed to the Dockerfile template as `variables`."
    )]
    build_variables: Option<PathBuf>,

    #[arg(
        short = 't',
        long = "template",
        value_name = "NAME",
        default_value = DEFAULT_TEMPLATE_NAME,
        help = "Template used to build the Dockerfile",
        long_help = "Name of the template used to build the Dockerfile, relative to a search path. The built-in `Dockerfile` template is used unless a search path provides one."
    )]
    template: String,

    #[arg(
        short = 's',
        long = "search-path",
        value_name = "DIR",
        help = "Directory to search for templates",
        long_help = "Directory to search for templates. Repeat the flag as needed; earlier directories take precedence."
    )]
    search_paths: Vec<PathBuf>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Write the Dockerfile to PATH",
        long_help = "Write the generated Dockerfile to PATH instead of stdout."
    )]
    output: Option<PathBuf>,

    #[arg(
        long = "verify",
        help = "Parse the generated Dockerfile before writing it",
        long_help = "Parse the generated Dockerfile before writing it and fail if it is not a valid Dockerfile."
    )]
    verify: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help = "Log more details to stderr",
        long_help = "Log more details to stderr. Repeat for more (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence."
    )]
    verbose: u8,
}

fn run() -> Result<(), AppError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                print!("{err}");
                return Ok(());
            }
            return Err(AppError::usage(err.to_string()));
        }
    };

    init_logging(cli.verbose);
    execute(cli)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .try_init();
}

fn execute(cli: Cli) -> Result<(), AppError> {
    if let Some(command) = cli.command {
        return execute_command(command);
    }

    validate_cli(&cli)?;

    let source = read_document(&cli)?;
    let template_variables = read_variables(cli.template_variables.as_deref())?;
    let build_variables = read_variables(cli.build_variables.as_deref())?;
    let variables = merge_mappings([&template_variables, &build_variables]);

    let source = render_source(&source, &template_variables)?;
    let document = Document::from_yaml_str(&source)?;
    debug!(
        instructions = document.instructions().len(),
        "parsed document"
    );

    let renderer = Renderer::new(Converter::with_builtins()?, &cli.search_paths)?;
    let dockerfile = renderer.render(&cli.template, &document, &variables)?;

    if cli.verify {
        let verification = verify_dockerfile(&dockerfile)?;
        info!(
            instructions = verification.instructions.len(),
            stages = verification.stages,
            "generated dockerfile verified"
        );
    }

    write_output(cli.output.as_deref(), &dockerfile)
}

fn execute_command(command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Completion { shell } => write_completion(shell),
        Commands::Instructions => write_instructions(),
    }
}

fn write_completion(shell: CompletionShell) -> Result<(), AppError> {
    let mut command = Cli::command();
    let mut stdout = std::io::stdout().lock();
    match shell {
        CompletionShell::Bash => generate(Bash, &mut command, "dfgen", &mut stdout),
        CompletionShell::Zsh => generate(Zsh, &mut command, "dfgen", &mut stdout),
        CompletionShell::Fish => generate(Fish, &mut command, "dfgen", &mut stdout),
    }
    stdout.flush().map_err(Error::from).map_err(AppError::from)
}

fn write_instructions() -> Result<(), AppError> {
    let registry = Registry::with_builtins()?;
    let mut stdout = std::io::stdout().lock();
    for handler in registry.handlers() {
        writeln!(
            stdout,
            "{:<12} {:<9} {}",
            handler.instruction(),
            handler.shape().as_str(),
            handler.usage()
        )
        .map_err(Error::from)?;
    }
    stdout.flush().map_err(Error::from).map_err(AppError::from)
}

fn validate_cli(cli: &Cli) -> Result<(), AppError> {
    if cli.stdin && cli.document.is_some() {
        return Err(AppError::usage("--stdin is mutually exclusive with DOCUMENT"));
    }
    if !cli.stdin && cli.document.is_none() {
        return Err(AppError::usage(
            "the following required arguments were not provided:\n  <DOCUMENT>",
        ));
    }
    Ok(())
}

fn read_document(cli: &Cli) -> Result<String, AppError> {
    if cli.stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(Error::from)?;
        return Ok(input);
    }

    match cli.document.as_deref() {
        Some(path) => read_text(path),
        None => Err(AppError::usage(
            "the following required arguments were not provided:\n  <DOCUMENT>",
        )),
    }
}

fn read_variables(path: Option<&Path>) -> Result<Mapping, AppError> {
    let Some(path) = path else {
        return Ok(Mapping::new());
    };
    let text = read_text(path)?;
    load_variables(&text).map_err(|error| AppError::at_path(path, error))
}

fn read_text(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|error| AppError::at_path(path, Error::from(error)))
}

fn write_output(path: Option<&Path>, dockerfile: &str) -> Result<(), AppError> {
    if let Some(path) = path {
        std::fs::write(path, dockerfile)
            .map_err(|error| AppError::at_path(path, Error::from(error)))?;
        info!(path = %path.display(), "wrote dockerfile");
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(dockerfile.as_bytes())
        .map_err(Error::from)?;
    stdout.flush().map_err(Error::from).map_err(AppError::from)
}
