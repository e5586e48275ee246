//! CLI configuration: thin wrapper around `opsform_config` shared types.
//!
//! Re-exports the shared types and folds config-file defaults into the
//! global flags the user didn't pass.

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

// ── Re-exports from shared crate ────────────────────────────────────

pub use opsform_config::{Config, config_path, load_config, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Fill unset global flags from the config file.
///
/// Flag and env values always win; unparseable config values are ignored
/// with a warning so a stale file never blocks a command.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) {
    if global.output.is_none() {
        global.output = parse_enum::<OutputFormat>("defaults.output", &cfg.defaults.output);
    }
    if global.color.is_none() {
        global.color = parse_enum::<ColorMode>("defaults.color", &cfg.defaults.color);
    }
    if global.site.is_none() {
        global.site.clone_from(&cfg.session.site);
    }
    if global.region.is_none() {
        global.region.clone_from(&cfg.session.region);
    }
}

fn parse_enum<T: ValueEnum>(key: &str, raw: &str) -> Option<T> {
    match T::from_str(raw, true) {
        Ok(value) => Some(value),
        Err(reason) => {
            tracing::warn!(key, value = raw, %reason, "ignoring config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["opsform"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn config_fills_unset_flags() {
        let mut cli = parse(&["entities"]);
        let mut cfg = Config::default();
        cfg.defaults.output = "json".into();
        cfg.session.site = Some("hq".into());

        apply_defaults(&mut cli.global, &cfg);
        assert!(matches!(cli.global.output, Some(OutputFormat::Json)));
        assert_eq!(cli.global.site.as_deref(), Some("hq"));
    }

    #[test]
    fn flags_beat_config() {
        let mut cli = parse(&["--output", "yaml", "--site", "branch", "entities"]);
        let mut cfg = Config::default();
        cfg.defaults.output = "json".into();
        cfg.session.site = Some("hq".into());

        apply_defaults(&mut cli.global, &cfg);
        assert!(matches!(cli.global.output, Some(OutputFormat::Yaml)));
        assert_eq!(cli.global.site.as_deref(), Some("branch"));
    }
}
