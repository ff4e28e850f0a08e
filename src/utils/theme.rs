use colored::Colorize;
use std::io::{self, IsTerminal};

pub struct Theme {
    pub prompt: String,
    pub exit_message: String,
    pub eof_message: String,
    pub interrupt_message: String,
    pub error_style: Box<dyn Fn(String) -> String>,
    pub notice_style: Box<dyn Fn(String) -> String>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            prompt: "minish> ".bright_cyan().to_string(),
            exit_message: "bye".bright_blue().to_string(),
            eof_message: "exit".to_string(),
            interrupt_message: "^C".yellow().to_string(),
            error_style: Box::new(|s| s.bright_red().to_string()),
            notice_style: Box::new(|s| s.bright_magenta().to_string()),
        }
    }
}

impl Theme {
    pub fn load_theme(theme_name: &str) -> Theme {
        // Escape codes would end up in files and pipes.
        if !io::stdout().is_terminal() {
            colored::control::set_override(false);
        }

        match theme_name {
            "dark" => Theme {
                prompt: "minish ➤ ".bright_purple().to_string(),
                exit_message: "bye".bright_purple().to_string(),
                eof_message: "exit".to_string(),
                interrupt_message: "^C".purple().to_string(),
                error_style: Box::new(|s| s.red().to_string()),
                notice_style: Box::new(|s| s.magenta().to_string()),
            },
            _ => Theme::default(),
        }
    }
}
