//! Component configuration.
//!
//! Every field is optional for the host; `#[serde(default)]` fills in the
//! same defaults as [`CropConfig::default`]. Dialog text is resolved once,
//! at construction time, into a [`DialogText`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::FillColor;
use crate::geometry::{Bounds, CropShape, GeometryError};

/// Configuration validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Quality factor outside `[0, 1]`
    #[error("quality must be within [0, 1], got {0}")]
    Quality(f32),

    /// A default value lies outside its own bounds
    #[error("default {name} ({value}) is outside [{min}, {max}]")]
    DefaultOutOfBounds {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error(transparent)]
    Bounds(#[from] GeometryError),
}

/// Languages with built-in dialog text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh-CN")]
    SimplifiedChinese,
}

impl Locale {
    /// Map a BCP 47 tag to a supported locale. Only an exact `zh-CN` match
    /// selects Chinese; everything else is English.
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("zh-CN") {
            Locale::SimplifiedChinese
        } else {
            Locale::English
        }
    }

    /// Read the operating system locale.
    pub fn detect() -> Self {
        sys_locale::get_locale()
            .map(|tag| Locale::from_tag(&tag))
            .unwrap_or_default()
    }
}

/// Resolved dialog strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogText {
    pub title: String,
    pub ok: String,
    pub cancel: String,
    pub reset: String,
}

impl DialogText {
    /// Built-in strings for a locale.
    pub fn for_locale(locale: Locale) -> Self {
        let (title, ok, cancel, reset) = match locale {
            Locale::English => ("Edit image", "OK", "Cancel", "Reset"),
            Locale::SimplifiedChinese => ("编辑图片", "确定", "取消", "重置"),
        };
        Self {
            title: title.to_string(),
            ok: ok.to_string(),
            cancel: cancel.to_string(),
            reset: reset.to_string(),
        }
    }
}

/// Options handed through to the dialog unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalOptions {
    /// Width as a CSS length or pixel count, e.g. `"520px"`.
    pub width: Option<String>,
    /// Extra class names for the dialog wrapper.
    pub class_name: Option<String>,
    /// Free-form presentation options.
    pub extra: BTreeMap<String, String>,
}

/// Configuration for the crop-before-upload component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Lossy output quality in `[0, 1]`.
    pub quality: f32,
    /// Background for overhang and rotation corners.
    pub fill_color: FillColor,

    pub crop_shape: CropShape,
    pub show_grid: bool,

    pub zoom_enabled: bool,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,

    pub rotation_enabled: bool,

    pub aspect_adjustable: bool,
    pub aspect: f64,
    pub min_aspect: f64,
    pub max_aspect: f64,

    pub show_reset: bool,

    /// `None` means "ask the operating system once".
    pub locale: Option<Locale>,
    pub title: Option<String>,
    pub ok_text: Option<String>,
    pub cancel_text: Option<String>,
    pub reset_text: Option<String>,

    pub modal: ModalOptions,

    /// Accept filter handed to the file picker.
    pub accept: String,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            quality: 0.4,
            fill_color: FillColor::WHITE,
            crop_shape: CropShape::Rect,
            show_grid: false,
            zoom_enabled: true,
            zoom: 1.0,
            min_zoom: 1.0,
            max_zoom: 3.0,
            rotation_enabled: false,
            aspect_adjustable: false,
            aspect: 1.0,
            min_aspect: 0.5,
            max_aspect: 2.0,
            show_reset: false,
            locale: None,
            title: None,
            ok_text: None,
            cancel_text: None,
            reset_text: None,
            modal: ModalOptions::default(),
            accept: "image/*".to_string(),
        }
    }
}

impl CropConfig {
    pub fn zoom_bounds(&self) -> Bounds {
        Bounds::new(self.min_zoom, self.max_zoom)
    }

    pub fn aspect_bounds(&self) -> Bounds {
        Bounds::new(self.min_aspect, self.max_aspect)
    }

    /// Check ranges and that defaults sit inside their bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(ConfigError::Quality(self.quality));
        }

        for (name, bounds, value) in [
            ("zoom", self.zoom_bounds(), self.zoom),
            ("aspect", self.aspect_bounds(), self.aspect),
        ] {
            bounds.validate(name)?;
            if !bounds.contains(value) {
                return Err(ConfigError::DefaultOutOfBounds {
                    name,
                    value,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        Ok(())
    }

    /// Resolve the locale, consulting the OS only when none is configured.
    pub fn resolve_locale(&self) -> Locale {
        self.locale.unwrap_or_else(Locale::detect)
    }

    /// Resolve dialog strings: explicit text wins over locale defaults.
    pub fn resolve_text(&self, locale: Locale) -> DialogText {
        let defaults = DialogText::for_locale(locale);
        DialogText {
            title: self.title.clone().unwrap_or(defaults.title),
            ok: self.ok_text.clone().unwrap_or(defaults.ok),
            cancel: self.cancel_text.clone().unwrap_or(defaults.cancel),
            reset: self.reset_text.clone().unwrap_or(defaults.reset),
        }
    }
}
