use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Config group the host files the plugin's own settings under.
pub const PLUGIN_CONFIG_GROUP: &str = "fixedresizablehybrid";

pub fn config_file() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("fixed-hybrid.toml")
}

/// Host-side names of the plugin's settings, as delivered in config change
/// notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, AsRefStr)]
pub enum ConfigKey {
    #[strum(serialize = "aspectRatioResize")]
    AspectRatioResize,
    #[strum(serialize = "resizeBy")]
    ResizeBy,
    #[strum(serialize = "aspectRatioWidthResize")]
    AspectRatioWidth,
    #[strum(serialize = "aspectRatioHeightResize")]
    AspectRatioHeight,
    #[strum(serialize = "orbsPosition")]
    OrbsPosition,
    #[strum(serialize = "useGapBorders")]
    UseGapBorders,
    #[strum(serialize = "isWideChatbox")]
    WideChatbox,
    #[strum(serialize = "chatboxViewportCentering")]
    ChatboxViewportCentering,
    #[strum(serialize = "centerChatboxButtons")]
    CenterChatboxButtons,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizeBy {
    Height,
    #[default]
    Width,
}

/// Minimap orb arrangement.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrbsPosition {
    /// 1:1 replica of the fixed layout.
    #[default]
    FixedMode,
    /// Run and special attack orbs pushed outwards so their corners do not
    /// click through to the minimap.
    MoreClearance,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Config {
    pub settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub aspect_ratio_resize: bool,
    #[serde(default)]
    pub resize_by: ResizeBy,
    #[serde(default = "default_aspect_ratio_width")]
    pub aspect_ratio_width: i32,
    #[serde(default = "default_aspect_ratio_height")]
    pub aspect_ratio_height: i32,
    #[serde(default)]
    pub orbs_position: OrbsPosition,
    #[serde(default = "yes")]
    pub use_gap_borders: bool,
    #[serde(default)]
    pub wide_chatbox: bool,
    /// Only meaningful with `wide_chatbox`. Forced off while the host's
    /// chatbox is transparent.
    #[serde(default = "yes")]
    pub chatbox_viewport_centering: bool,
    #[serde(default = "yes")]
    pub center_chatbox_buttons: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            aspect_ratio_resize: false,
            resize_by: ResizeBy::default(),
            aspect_ratio_width: default_aspect_ratio_width(),
            aspect_ratio_height: default_aspect_ratio_height(),
            orbs_position: OrbsPosition::default(),
            use_gap_borders: true,
            wide_chatbox: false,
            chatbox_viewport_centering: true,
            center_chatbox_buttons: true,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.aspect_ratio_width < 1 {
            issues.push(format!(
                "aspect_ratio_width must be at least 1, got {}",
                self.aspect_ratio_width
            ));
        }

        if self.aspect_ratio_height < 1 {
            issues.push(format!(
                "aspect_ratio_height must be at least 1, got {}",
                self.aspect_ratio_height
            ));
        }

        issues
    }

    /// Applies a setting change delivered by the host in its string form
    /// ("true", "16", "WIDTH", "MORE_CLEARANCE").
    pub fn apply_host_value(&mut self, key: ConfigKey, value: &str) -> anyhow::Result<()> {
        let flag = || -> anyhow::Result<bool> {
            value.parse().with_context(|| format!("{} expects true or false, got {value:?}", key.as_ref()))
        };
        let number = || -> anyhow::Result<i32> {
            value.parse().with_context(|| format!("{} expects a number, got {value:?}", key.as_ref()))
        };
        match key {
            ConfigKey::AspectRatioResize => self.aspect_ratio_resize = flag()?,
            ConfigKey::ResizeBy => {
                self.resize_by = match value {
                    "WIDTH" => ResizeBy::Width,
                    "HEIGHT" => ResizeBy::Height,
                    _ => bail!("unknown resizeBy value {value:?}"),
                }
            }
            ConfigKey::AspectRatioWidth => self.aspect_ratio_width = number()?,
            ConfigKey::AspectRatioHeight => self.aspect_ratio_height = number()?,
            ConfigKey::OrbsPosition => {
                self.orbs_position = match value {
                    "FIXED_MODE" => OrbsPosition::FixedMode,
                    "MORE_CLEARANCE" => OrbsPosition::MoreClearance,
                    _ => bail!("unknown orbsPosition value {value:?}"),
                }
            }
            ConfigKey::UseGapBorders => self.use_gap_borders = flag()?,
            ConfigKey::WideChatbox => self.wide_chatbox = flag()?,
            ConfigKey::ChatboxViewportCentering => self.chatbox_viewport_centering = flag()?,
            ConfigKey::CenterChatboxButtons => self.center_chatbox_buttons = flag()?,
        }
        Ok(())
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.aspect_ratio_width < 1 {
            self.aspect_ratio_width = default_aspect_ratio_width();
            fixes += 1;
        }

        if self.aspect_ratio_height < 1 {
            self.aspect_ratio_height = default_aspect_ratio_height();
            fixes += 1;
        }

        fixes
    }
}

fn yes() -> bool { true }

fn default_aspect_ratio_width() -> i32 { 16 }

fn default_aspect_ratio_height() -> i32 { 9 }

impl Default for Config {
    fn default() -> Config { Config { settings: Settings::default() } }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&buf)
    }

    /// The shipped default file, parsed. Kept in sync with `Default`.
    pub fn shipped() -> anyhow::Result<Config> {
        Self::parse(include_str!("../../fixed-hybrid.default.toml"))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let config_file = ConfigFile { settings: self.settings.clone() };
        let toml_string = toml::to_string_pretty(&config_file)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    /// Attempts to fix configuration values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        let c: ConfigFile = toml::from_str(buf)?;
        Ok(Config { settings: c.settings })
    }
}
