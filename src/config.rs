//! Configuration file support for formkit.
//!
//! Configuration is loaded from `~/.config/formkit/config.toml`, or from the
//! path in `FORMKIT_CONFIG` when that variable is set.
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.config/formkit/config.toml
//! mask = "•"
//!
//! [keys]
//! activate = ["enter", "space"]
//! cancel = ["esc", "ctrl-g"]
//! up = ["up", "k"]
//! down = ["down", "j"]
//!
//! [[selectors]]
//! name = "Filesystem"
//! index = 1
//! options = [["Local disks", false], "ext4", "xfs", ["btrfs", true, "btrfs-subvol"]]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::keys::{Command, CommandMap};
use crate::widgets::{OptionSpec, Selector};

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Glyph used to mask password fields
    pub mask: Option<char>,

    /// Key binding overrides
    pub keys: KeyBindings,

    /// Selectors whose options come from the config file
    pub selectors: Vec<SelectorConfig>,
}

/// Key binding overrides. A present list replaces every default binding of
/// that command.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct KeyBindings {
    pub activate: Option<Vec<String>>,
    pub cancel: Option<Vec<String>>,
    pub up: Option<Vec<String>>,
    pub down: Option<Vec<String>>,
}

/// A data-driven selector.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Caption shown next to the selector
    pub name: String,

    /// Raw options: strings or `[label, selectable, value]` arrays
    pub options: Vec<toml::Value>,

    /// Initially selected option
    #[serde(default)]
    pub index: usize,
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default configuration if file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}", e);
                Self::default()
            }
        }
    }

    /// Load and parse a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        std::env::var("FORMKIT_CONFIG")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::config_dir().join("config.toml"))
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("formkit")
    }

    /// Password mask glyph, `*` unless configured.
    pub fn mask(&self) -> char {
        self.mask.unwrap_or('*')
    }

    /// Default command map with the configured overrides applied.
    pub fn command_map(&self) -> ConfigResult<CommandMap> {
        let mut map = CommandMap::default();
        let overrides = [
            (Command::Activate, &self.keys.activate),
            (Command::Cancel, &self.keys.cancel),
            (Command::CursorUp, &self.keys.up),
            (Command::CursorDown, &self.keys.down),
        ];

        for (command, names) in overrides {
            if let Some(names) = names {
                map.unbind_command(command);
                for name in names {
                    map.bind_name(name, command)?;
                }
            }
        }
        Ok(map)
    }

    /// Build every configured selector, paired with its caption.
    pub fn selectors(&self, command_map: &CommandMap) -> ConfigResult<Vec<(String, Selector<toml::Value>)>> {
        self.selectors
            .iter()
            .map(|sc| {
                let to_config_error = |e| ConfigError::Selector(sc.name.clone(), e);
                let options = sc
                    .options
                    .iter()
                    .map(|raw| OptionSpec::from_toml(raw)?.normalize())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(to_config_error)?;
                let selector = Selector::from_options(options, sc.index)
                    .map_err(to_config_error)?
                    .with_command_map(command_map.clone());
                Ok((sc.name.clone(), selector))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SelectorError;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.mask.is_none());
        assert_eq!(config.mask(), '*');
        assert!(config.selectors.is_empty());
        assert_eq!(config.command_map().unwrap(), CommandMap::default());
    }

    #[test]
    fn test_parse_config() {
        let config = Config::parse(
            r#"
            mask = "•"

            [keys]
            cancel = ["esc", "ctrl-g"]
            down = ["j"]

            [[selectors]]
            name = "Filesystem"
            index = 1
            options = [["Local disks", false], "ext4", ["btrfs", true, 3]]
            "#,
        )
        .unwrap();

        assert_eq!(config.mask(), '•');

        let map = config.command_map().unwrap();
        let ctrl_g = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert!(map.is(&ctrl_g, Command::Cancel));
        assert!(map.is(&KeyEvent::from(KeyCode::Char('j')), Command::CursorDown));
        assert_eq!(map.command(&KeyEvent::from(KeyCode::Down)), None);
        assert!(map.is(&KeyEvent::from(KeyCode::Enter), Command::Activate));

        let selectors = config.selectors(&map).unwrap();
        assert_eq!(selectors.len(), 1);
        let (name, selector) = &selectors[0];
        assert_eq!(name, "Filesystem");
        assert_eq!(selector.index(), 1);
        assert_eq!(selector.value(), &toml::Value::String("ext4".into()));
        assert!(!selector.options()[0].selectable);
        assert_eq!(selector.options()[2].value, toml::Value::Integer(3));
    }

    #[test]
    fn test_unknown_key_name() {
        let config = Config::parse(
            r#"
            [keys]
            activate = ["warp"]
            "#,
        )
        .unwrap();
        assert!(matches!(config.command_map(), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_invalid_selector_option() {
        let config = Config::parse(
            r#"
            [[selectors]]
            name = "Broken"
            options = ["ok", ["a", true, 1, 2]]
            "#,
        )
        .unwrap();

        match config.selectors(&CommandMap::default()) {
            Err(ConfigError::Selector(name, SelectorError::InvalidOption(_))) => {
                assert_eq!(name, "Broken")
            }
            other => panic!("unexpected {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_selector_index_out_of_range() {
        let config = Config::parse(
            r#"
            [[selectors]]
            name = "Tiny"
            index = 3
            options = ["only"]
            "#,
        )
        .unwrap();

        assert!(matches!(
            config.selectors(&CommandMap::default()),
            Err(ConfigError::Selector(_, SelectorError::IndexOutOfRange { index: 3, len: 1 }))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(Config::parse("mask = ["), Err(ConfigError::Parse(_))));
    }
}
