use dotenv::dotenv;
use rustyline::EditMode;
use std::env;
use std::path::PathBuf;

pub struct Config {
    pub name: String,
    pub theme: String,
    pub editor_mode: String,
    pub logger_level: String,
    pub logger_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name: String::from(env!("CARGO_PKG_NAME")),
            theme: String::from("default"),
            editor_mode: String::from("emacs"),
            logger_level: String::from("warn"),
            logger_dir: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        // .env files first, real environment variables override them
        if cfg!(debug_assertions) {
            dotenv::from_filename(".env.development").ok();
        } else {
            dotenv().ok();
        }

        let mut config = Config::default();

        if let Ok(theme) = env::var("MINISH_THEME") {
            config.theme = theme;
        }

        if let Ok(editor) = env::var("MINISH_EDITOR") {
            config.editor_mode = editor;
        }

        if let Ok(level) = env::var("MINISH_LOG_LEVEL") {
            config.logger_level = level;
        }

        if let Ok(dir) = env::var("MINISH_LOG_DIR") {
            if !dir.is_empty() {
                config.logger_dir = Some(PathBuf::from(dir));
            }
        }

        config
    }

    /// `plain` turns the line editor off even on a terminal.
    pub fn use_editor(&self) -> bool {
        !self.editor_mode.eq_ignore_ascii_case("plain")
    }

    pub fn get_edit_mode(&self) -> EditMode {
        match self.editor_mode.to_lowercase().as_str() {
            "vi" => EditMode::Vi,
            _ => EditMode::Emacs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_modes() {
        let mut config = Config::default();
        assert!(config.use_editor());
        assert_eq!(config.get_edit_mode(), EditMode::Emacs);

        config.editor_mode = "VI".to_string();
        assert_eq!(config.get_edit_mode(), EditMode::Vi);

        config.editor_mode = "Plain".to_string();
        assert!(!config.use_editor());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.name, "minish");
        assert_eq!(config.theme, "default");
        assert_eq!(config.logger_level, "warn");
        assert!(config.logger_dir.is_none());
    }
}
