use std::io::{self, IsTerminal, Stdin, Write};

use log::debug;
pub use rustyline::error::ReadlineError;
use rustyline::history::MemHistory;
use rustyline::{CompletionType, Config as RLConfig, Editor};

use crate::shell::reader::LineReader;
use crate::utils::config::Config;

enum Source {
    Editor(Box<Editor<(), MemHistory>>),
    Plain(LineReader<Stdin>),
}

/// Reads input lines either through a line editor (interactive terminals)
/// or straight from standard input.
pub struct ReadlineManager {
    source: Source,
}

impl ReadlineManager {
    pub fn new(config: &Config) -> Result<Self, ReadlineError> {
        let source = if config.use_editor() && io::stdin().is_terminal() {
            let rl_config = RLConfig::builder()
                .history_ignore_space(true)
                .completion_type(CompletionType::List)
                .edit_mode(config.get_edit_mode())
                .build();
            debug!("using line editor ({:?} mode)", config.get_edit_mode());
            Source::Editor(Box::new(Editor::with_history(rl_config, MemHistory::new())?))
        } else {
            debug!("reading plain lines from standard input");
            Source::Plain(LineReader::new(io::stdin()))
        };
        Ok(Self { source })
    }

    /// Prompts for and returns one line. End of input is reported as
    /// [`ReadlineError::Eof`].
    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        match &mut self.source {
            Source::Editor(editor) => editor.readline(prompt),
            Source::Plain(reader) => {
                let mut stdout = io::stdout();
                stdout.write_all(prompt.as_bytes())?;
                stdout.flush()?;
                reader.read_line()?.ok_or(ReadlineError::Eof)
            }
        }
    }

    pub fn add_history(&mut self, line: &str) -> Result<bool, ReadlineError> {
        match &mut self.source {
            Source::Editor(editor) => editor.add_history_entry(line),
            Source::Plain(_) => Ok(false),
        }
    }
}
