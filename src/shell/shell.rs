use log::{debug, error, warn};
use std::error::Error;
use std::io::{ErrorKind, Write};
use std::ops::ControlFlow;

use crate::shell::executor::{Executor, Outcome};
use crate::shell::parser::{parse, CommandLine};
use crate::shell::readline::{ReadlineError, ReadlineManager};
use crate::utils::config::Config;
use crate::utils::theme::Theme;

const QUIT_COMMANDS: [&str; 3] = ["quit", "q", "exit"];

pub struct Shell {
    theme: Theme,
    readline: ReadlineManager,
    executor: Executor,
}

impl Shell {
    pub fn new(config: &Config, theme: Theme) -> Result<Self, ReadlineError> {
        Ok(Self {
            theme,
            readline: ReadlineManager::new(config)?,
            executor: Executor::new(),
        })
    }

    /// Runs the read loop until end of input or a quit command.
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        debug!("minish ready");
        self.run_loop()?;
        debug!("leaving minish");
        Ok(())
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn Error>> {
        loop {
            self.report_finished_jobs();
            std::io::stdout().flush()?;

            match self.readline.readline(&self.theme.prompt) {
                Ok(line) => {
                    if self.handle_input(&line).is_break() {
                        println!("{}", self.theme.exit_message);
                        break;
                    }
                }
                Err(err) => match err {
                    ReadlineError::Eof => {
                        debug!("end of input");
                        println!("{}", self.theme.eof_message);
                        break;
                    }
                    ReadlineError::Interrupted => {
                        warn!("interrupted at the prompt");
                        println!("{}", self.theme.interrupt_message);
                    }
                    ReadlineError::Io(e) if e.kind() == ErrorKind::InvalidData => {
                        debug!("skipping undecodable line: {}", e);
                        let message = format!("error: input is not valid UTF-8: {}", e);
                        eprintln!("{}", (self.theme.error_style)(message));
                    }
                    err => {
                        error!("cannot read input: {}", err);
                        return Err(err.into());
                    }
                },
            }
        }
        std::io::stdout().flush()?;
        Ok(())
    }

    fn handle_input(&mut self, line: &str) -> ControlFlow<()> {
        let command = match parse(line) {
            Ok(command) => command,
            Err(e) => {
                debug!("syntax error in {:?}: {}", line, e);
                eprintln!("{}", (self.theme.error_style)(format!("error: {}", e)));
                return ControlFlow::Continue(());
            }
        };
        if command.is_empty() {
            return ControlFlow::Continue(());
        }

        if let Err(e) = self.readline.add_history(line) {
            warn!("cannot add history entry: {}", e);
        }
        if is_quit(&command) {
            return ControlFlow::Break(());
        }

        if let Some(input) = &command.input {
            debug!("in: {}", input);
        }
        if let Some(output) = &command.output {
            debug!("out: {}", output);
        }

        match self.executor.execute(&command) {
            Ok(Outcome::Foreground(state)) => debug!("status {}", state.code()),
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}", (self.theme.error_style)(format!("minish: {}", e)));
            }
        }
        ControlFlow::Continue(())
    }

    fn report_finished_jobs(&mut self) {
        for job in self.executor.reap_background() {
            println!("{}", (self.theme.notice_style)(job.to_string()));
        }
    }
}

fn is_quit(command: &CommandLine) -> bool {
    command.stages.len() == 1
        && command.input.is_none()
        && command.output.is_none()
        && QUIT_COMMANDS.contains(&command.stages[0].program.as_str())
}
