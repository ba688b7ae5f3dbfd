use dockerfile_parser::{Dockerfile, Instruction as ParsedInstruction};
use tracing::debug;

use crate::error::Error;

/// Outcome of re-parsing a rendered Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub instructions: Vec<VerifiedInstruction>,
    pub stages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedInstruction {
    pub keyword: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Parses rendered output the way `docker build` would see it.
pub fn verify_dockerfile(input: &str) -> Result<Verification, Error> {
    let dockerfile =
        Dockerfile::parse(input).map_err(|err| Error::dockerfile_parse(format!("{err}")))?;
    let line_index = LineIndex::new(&dockerfile.content);

    let instructions = dockerfile
        .instructions
        .iter()
        .map(|instruction| verified_instruction(instruction, &line_index))
        .collect::<Vec<_>>();
    let stages = dockerfile.stages().iter().count();

    debug!(
        instructions = instructions.len(),
        stages, "rendered dockerfile parsed"
    );
    Ok(Verification {
        instructions,
        stages,
    })
}

fn verified_instruction(instruction: &ParsedInstruction, line_index: &LineIndex) -> VerifiedInstruction {
    let span = instruction.span();
    let keyword = match instruction {
        ParsedInstruction::From(_) => "FROM".to_string(),
        ParsedInstruction::Arg(_) => "ARG".to_string(),
        ParsedInstruction::Label(_) => "LABEL".to_string(),
        ParsedInstruction::Run(_) => "RUN".to_string(),
        ParsedInstruction::Entrypoint(_) => "ENTRYPOINT".to_string(),
        ParsedInstruction::Cmd(_) => "CMD".to_string(),
        ParsedInstruction::Copy(_) => "COPY".to_string(),
        ParsedInstruction::Env(_) => "ENV".to_string(),
        ParsedInstruction::Misc(misc) => misc.instruction.content.to_ascii_uppercase(),
    };

    let start_line = line_index.line_for_offset(span.start);
    let end_line = if span.end > span.start {
        line_index.line_for_offset(span.end - 1)
    } else {
        start_line
    };

    VerifiedInstruction {
        keyword,
        start_line,
        end_line,
    }
}

struct LineIndex {
    newline_offsets: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        let newline_offsets = content
            .bytes()
            .enumerate()
            .filter_map(|(index, byte)| (byte == b'\n').then_some(index))
            .collect();
        Self { newline_offsets }
    }

    fn line_for_offset(&self, offset: usize) -> usize {
        self.newline_offsets
            .partition_point(|value| *value < offset)
            + 1
    }
}
