use crate::config::{Config, ConfigError, ConfigPaths};
use clap::Args;
use std::process::Command;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Print config with secrets redacted
    #[arg(long)]
    pub print: bool,

    /// Edit config in $EDITOR
    #[arg(long)]
    pub edit: bool,

    /// Set a config value (dotted key=value)
    #[arg(long, value_name = "key=value")]
    pub set: Vec<String>,
}

pub fn run(args: &ConfigArgs, paths: &ConfigPaths) -> Result<(), ConfigError> {
    if args.edit && (!args.set.is_empty() || args.print) {
        return Err(ConfigError::Validation(
            "--edit cannot be combined with --set or --print".into(),
        ));
    }

    let mut config = Config::load_or_create(paths)?;

    if args.edit {
        edit_config(paths)?;
        config = Config::load(paths)?;
        config.validate()?;
        return Ok(());
    }

    if !args.set.is_empty() {
        for assignment in &args.set {
            apply_set(&mut config, assignment)?;
        }
        config.validate()?;
        Config::write(paths, &config)?;
    }

    if args.print || args.set.is_empty() {
        let redacted = config.redacted();
        let output = toml::to_string_pretty(&redacted)?;
        println!("{output}");
    }

    Ok(())
}

fn edit_config(paths: &ConfigPaths) -> Result<(), ConfigError> {
    let editor = std::env::var("EDITOR").unwrap_or_default();
    let argv = editor_argv(&editor)?;
    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .arg(&paths.config_path)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{} exited with {status}",
            argv[0]
        )))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Quote {
    Bare,
    Single,
    Double,
}

/// Shell-like split of `$EDITOR`, so `code --wait` and quoted paths work.
fn editor_argv(editor: &str) -> Result<Vec<String>, ConfigError> {
    let mut argv: Vec<String> = Vec::new();
    let mut word: Option<String> = None;
    let mut quote = Quote::Bare;
    let mut chars = editor.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Quote::Bare, ch) if ch.is_whitespace() => argv.extend(word.take()),
            (Quote::Bare, '\'') => quote = Quote::Single,
            (Quote::Bare, '"') => quote = Quote::Double,
            (Quote::Single, '\'') | (Quote::Double, '"') => quote = Quote::Bare,
            (Quote::Bare | Quote::Double, '\\') => {
                let escaped = chars.next().unwrap_or('\\');
                word.get_or_insert_default().push(escaped);
            }
            (_, ch) => word.get_or_insert_default().push(ch),
        }
        if quote != Quote::Bare {
            word.get_or_insert_default();
        }
    }

    if quote != Quote::Bare {
        return Err(ConfigError::Validation(
            "$EDITOR has an unterminated quote".into(),
        ));
    }
    argv.extend(word);
    if argv.is_empty() {
        return Err(ConfigError::Validation(
            "$EDITOR is not set; use --set instead".into(),
        ));
    }
    Ok(argv)
}

fn apply_set(config: &mut Config, assignment: &str) -> Result<(), ConfigError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| ConfigError::Validation("expected key=value for --set".into()))?;
    let value = value.trim();
    match key.trim() {
        "chunking.size" => {
            config.chunking.size = parse_number(value, key)?;
        }
        "chunking.overlap" => {
            config.chunking.overlap = parse_number(value, key)?;
        }
        "chunking.auto_shrink" => {
            config.chunking.auto_shrink = parse_bool(value, key)?;
        }
        "chunking.workers" => {
            config.chunking.workers = parse_number(value, key)?;
        }
        "summarize.active" => {
            config.summarize.active = value.to_string();
        }
        "summarize.temperature" => {
            config.summarize.temperature = parse_number(value, key)?;
        }
        "summarize.max_tokens" => {
            config.summarize.max_tokens = parse_number(value, key)?;
        }
        "summarize.local.provider" => {
            config.summarize.local.provider = value.to_string();
        }
        "summarize.local.model" => {
            config.summarize.local.model = value.to_string();
        }
        "summarize.local.api_key" => {
            config.summarize.local.api_key = value.to_string();
        }
        "summarize.cloud.provider" => {
            config.summarize.cloud.provider = value.to_string();
        }
        "summarize.cloud.model" => {
            config.summarize.cloud.model = value.to_string();
        }
        "summarize.cloud.api_key" => {
            config.summarize.cloud.api_key = value.to_string();
        }
        "summarize.model" => {
            let active = config.summarize.active.clone();
            set_active_value(
                "summarize.model",
                &active,
                value,
                &mut config.summarize.local.model,
                &mut config.summarize.cloud.model,
            )?;
        }
        "summarize.api_key" => {
            let active = config.summarize.active.clone();
            set_active_value(
                "summarize.api_key",
                &active,
                value,
                &mut config.summarize.local.api_key,
                &mut config.summarize.cloud.api_key,
            )?;
        }
        "output.highlight" => {
            config.output.highlight = value.to_string();
        }
        _ => {
            return Err(ConfigError::Validation(format!(
                "unknown config key: {key}"
            )));
        }
    }
    Ok(())
}

fn set_active_value(
    label: &str,
    active: &str,
    value: &str,
    local: &mut String,
    cloud: &mut String,
) -> Result<(), ConfigError> {
    match active {
        "local" => {
            *local = value.to_string();
            Ok(())
        }
        "cloud" => {
            *cloud = value.to_string();
            Ok(())
        }
        _ => Err(ConfigError::Validation(format!(
            "{label} cannot be set because active profile is invalid"
        ))),
    }
}

fn parse_bool(value: &str, key: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::Validation(format!(
            "{key} expects true or false"
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{key} expects a number")))
}

#[cfg(test)]
mod tests {
    use super::{apply_set, editor_argv};
    use crate::config::Config;

    #[test]
    fn apply_set_updates_chunking() {
        let mut config = Config::default();
        apply_set(&mut config, "chunking.size=800").unwrap();
        apply_set(&mut config, "chunking.overlap = 80").unwrap();
        apply_set(&mut config, "chunking.auto_shrink=false").unwrap();
        assert_eq!(config.chunking.size, 800);
        assert_eq!(config.chunking.overlap, 80);
        assert!(!config.chunking.auto_shrink);
    }

    #[test]
    fn apply_set_targets_active_profile() {
        let mut config = Config::default();
        apply_set(&mut config, "summarize.model=mistral").unwrap();
        assert_eq!(config.summarize.local.model, "mistral");
        apply_set(&mut config, "summarize.active=cloud").unwrap();
        apply_set(&mut config, "summarize.api_key=sk-test").unwrap();
        assert_eq!(config.summarize.cloud.api_key, "sk-test");
    }

    #[test]
    fn apply_set_rejects_unknown_keys_and_bad_values() {
        let mut config = Config::default();
        assert!(apply_set(&mut config, "nope=1").is_err());
        assert!(apply_set(&mut config, "chunking.size=big").is_err());
        assert!(apply_set(&mut config, "chunking.auto_shrink=yes").is_err());
        assert!(apply_set(&mut config, "chunking.size").is_err());
    }

    #[test]
    fn editor_argv_handles_quotes() {
        let argv = editor_argv(r#"code --wait "my dir/x""#).unwrap();
        assert_eq!(argv, vec!["code", "--wait", "my dir/x"]);
        let argv = editor_argv(r"vim -c 'set ft=toml' a\ b").unwrap();
        assert_eq!(argv, vec!["vim", "-c", "set ft=toml", "a b"]);
    }

    #[test]
    fn editor_argv_keeps_empty_quoted_words() {
        assert_eq!(editor_argv(r#"ed "" x"#).unwrap(), vec!["ed", "", "x"]);
    }

    #[test]
    fn editor_argv_rejects_bad_input() {
        assert!(editor_argv("vim 'oops").is_err());
        assert!(editor_argv("   ").is_err());
        assert!(editor_argv("").is_err());
    }
}
