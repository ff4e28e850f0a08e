use log::debug;
use minish::shell::Shell;
use minish::utils::config::Config;
use minish::utils::log::init_logger;
use minish::utils::theme::Theme;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new();
    init_logger(&config);
    debug!("configuration loaded (theme {}, editor {})", config.theme, config.editor_mode);
    let theme = Theme::load_theme(&config.theme);

    let mut shell = Shell::new(&config, theme)?;
    shell.run()
}
