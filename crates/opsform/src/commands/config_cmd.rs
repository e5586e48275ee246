//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Both text formats print the file as it would be written.
impl output::Document for Config {
    fn table_text(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|e| format!("# {e}"))
    }

    fn plain_text(&self) -> String {
        self.table_text()
    }
}

pub fn handle(args: ConfigArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color_mode());

    match args.command {
        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config(&Config::default())?;
            if !global.quiet {
                let message = format!("wrote {}", path.display());
                eprintln!("{}", output::status_line(true, &message, color));
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let out = output::render_document(&global.format(), cfg);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut file_cfg = config::load_config()?;
            file_cfg.set_value(&key, &value)?;
            config::save_config(&file_cfg)?;
            if !global.quiet {
                eprintln!("{}", output::status_line(true, &format!("{key} = {value}"), color));
            }
            Ok(())
        }
    }
}
