use std::mem;

use thiserror::Error;

use super::ast::{CommandLine, Stage};
use super::lexer::{Lexer, Token};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("only one input file supported")]
    DuplicateInput,
    #[error("only one output file supported")]
    DuplicateOutput,
    #[error("filename missing for input redirection")]
    MissingInputFile,
    #[error("filename missing for output redirection")]
    MissingOutputFile,
    #[error("misplaced pipe")]
    MisplacedPipe,
    #[error("only one background operator supported")]
    DuplicateBackground,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Input,
    Output,
}

enum State {
    Collecting,
    Done,
    Failed(SyntaxError),
}

/// Builds a [`CommandLine`] out of one input line.
///
/// Words accumulate into the current stage until a pipe closes it. The first
/// violation stops the parse; the remaining tokens are never looked at and
/// everything built so far is dropped along with the parser.
pub struct Parser<'a> {
    tokens: Lexer<'a>,
    current: Vec<String>,
    line: CommandLine,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            tokens: Lexer::new(input),
            current: Vec::new(),
            line: CommandLine::default(),
        }
    }

    pub fn parse(mut self) -> Result<CommandLine, SyntaxError> {
        let mut state = State::Collecting;
        loop {
            state = match state {
                State::Collecting => match self.tokens.next() {
                    Some(token) => self.step(token),
                    None => State::Done,
                },
                State::Done => return self.finish(),
                State::Failed(err) => return Err(err),
            };
        }
    }

    fn step(&mut self, token: Token) -> State {
        match token {
            Token::Word(word) => {
                self.current.push(word);
                State::Collecting
            }
            Token::RedirectIn => self.redirect(Direction::Input),
            Token::RedirectOut => self.redirect(Direction::Output),
            Token::Pipe => match Stage::from_words(mem::take(&mut self.current)) {
                Some(stage) => {
                    self.line.stages.push(stage);
                    State::Collecting
                }
                None => State::Failed(SyntaxError::MisplacedPipe),
            },
            Token::Background => {
                if self.line.background {
                    return State::Failed(SyntaxError::DuplicateBackground);
                }
                self.line.background = true;
                State::Collecting
            }
        }
    }

    fn redirect(&mut self, direction: Direction) -> State {
        let (slot, duplicate, missing) = match direction {
            Direction::Input => (
                &mut self.line.input,
                SyntaxError::DuplicateInput,
                SyntaxError::MissingInputFile,
            ),
            Direction::Output => (
                &mut self.line.output,
                SyntaxError::DuplicateOutput,
                SyntaxError::MissingOutputFile,
            ),
        };

        if slot.is_some() {
            return State::Failed(duplicate);
        }
        match self.tokens.next() {
            Some(Token::Word(filename)) => {
                *slot = Some(filename);
                State::Collecting
            }
            _ => State::Failed(missing),
        }
    }

    fn finish(mut self) -> Result<CommandLine, SyntaxError> {
        match Stage::from_words(self.current) {
            Some(stage) => self.line.stages.push(stage),
            None if !self.line.stages.is_empty() => return Err(SyntaxError::MisplacedPipe),
            None => {}
        }
        Ok(self.line)
    }
}

/// Parses one raw line.
pub fn parse(line: &str) -> Result<CommandLine, SyntaxError> {
    Parser::new(line).parse()
}
