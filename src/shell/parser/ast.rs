use std::fmt;

/// One program invocation inside a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub program: String,
    pub arguments: Vec<String>,
}

impl Stage {
    /// Builds a stage from its words; `None` when there are no words.
    pub fn from_words(words: Vec<String>) -> Option<Self> {
        let mut words = words.into_iter();
        let program = words.next()?;
        Some(Self {
            program,
            arguments: words.collect(),
        })
    }

    /// Program name followed by its arguments, as passed to the new image.
    pub fn argv(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.arguments.iter().map(String::as_str))
    }
}

/// A parsed input line.
///
/// Zero stages means the line was blank. The input redirect applies to the
/// first stage and the output redirect to the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    pub stages: Vec<Stage>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub background: bool,
}

impl CommandLine {
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn is_pipeline(&self) -> bool {
        self.stages.len() > 1
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for word in self.argv() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(word)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", stage)?;
        }
        if let Some(input) = &self.input {
            write!(f, " < {}", input)?;
        }
        if let Some(output) = &self.output {
            write!(f, " > {}", output)?;
        }
        if self.background {
            f.write_str(" &")?;
        }
        Ok(())
    }
}
