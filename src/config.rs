use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    annotate::{FontChoice, OverlaySpec},
    foundation::{
        core::Rgb8,
        error::{ShotError, ShotResult},
    },
};

pub const DEFAULT_WATERMARK: &str = "@soupDeVeLops";
pub const DEFAULT_COPYRIGHT: &str = "© 2025 Screenshot Pro App";

/// Everything a request needs that is not part of the request itself.
///
/// All fields are optional in JSON; missing ones take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    pub watermark: String,
    pub copyright: String,
    /// Explicit overlay font. When unset, well-known system fonts are tried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    pub font_size_px: f32,
    pub text_color: Rgb8,
    pub shadow_color: Rgb8,
    pub shadow_offset: (i32, i32),
    /// Overrides the user's home directory. Must be absolute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<PathBuf>,
    /// Searched for bare folder names after the platform roots.
    pub extra_roots: Vec<PathBuf>,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            watermark: DEFAULT_WATERMARK.to_string(),
            copyright: DEFAULT_COPYRIGHT.to_string(),
            font_path: None,
            font_size_px: 12.0,
            text_color: Rgb8::WHITE,
            shadow_color: Rgb8::BLACK,
            shadow_offset: (1, 1),
            home_dir: None,
            extra_roots: Vec::new(),
        }
    }
}

impl ShotConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> ShotResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ShotError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ShotResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ShotError::config(format!("open config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> ShotResult<()> {
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ShotError::config(format!(
                "font_size_px must be finite and > 0, got {}",
                self.font_size_px
            )));
        }
        if let Some(home) = &self.home_dir
            && !home.is_absolute()
        {
            return Err(ShotError::config(format!(
                "home_dir must be absolute, got '{}'",
                home.display()
            )));
        }
        if let Some(root) = self.extra_roots.iter().find(|r| !r.is_absolute()) {
            return Err(ShotError::config(format!(
                "extra_roots entries must be absolute, got '{}'",
                root.display()
            )));
        }
        Ok(())
    }

    /// The configured home override, else the platform's home directory.
    pub fn home_dir(&self) -> ShotResult<PathBuf> {
        match &self.home_dir {
            Some(home) => Ok(home.clone()),
            None => dirs::home_dir()
                .ok_or_else(|| ShotError::config("cannot determine home directory")),
        }
    }

    pub fn font_choice(&self) -> FontChoice {
        FontChoice {
            path: self.font_path.clone(),
            size_px: self.font_size_px,
        }
    }

    /// Overlay texts and styling for a request made at `now`.
    pub fn overlay_spec<Tz>(&self, now: &chrono::DateTime<Tz>) -> OverlaySpec
    where
        Tz: chrono::TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        OverlaySpec {
            font: self.font_choice(),
            text_color: self.text_color,
            shadow_color: self.shadow_color,
            shadow_offset: self.shadow_offset,
            ..OverlaySpec::new(self.watermark.clone(), self.copyright.clone(), now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = ShotConfig::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(cfg, ShotConfig::default());
        assert_eq!(cfg.watermark, "@soupDeVeLops");
        assert_eq!(cfg.font_size_px, 12.0);
    }

    #[test]
    fn partial_json_overrides_only_given_fields() {
        let cfg = ShotConfig::from_reader(
            r#"{ "watermark": "acme", "text_color": [255, 0, 0], "shadow_offset": [2, 3] }"#
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(cfg.watermark, "acme");
        assert_eq!(cfg.text_color, Rgb8::new(255, 0, 0));
        assert_eq!(cfg.shadow_offset, (2, 3));
        assert_eq!(cfg.copyright, DEFAULT_COPYRIGHT);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for json in [
            r#"{ "font_size_px": 0 }"#,
            r#"{ "font_size_px": -4.5 }"#,
            r#"{ "home_dir": "relative/home" }"#,
            r#"{ "extra_roots": ["mnt"] }"#,
            r#"{ "watermark": 7 }"#,
            "not json",
        ] {
            let err = ShotConfig::from_reader(json.as_bytes()).unwrap_err();
            assert!(matches!(err, ShotError::Config(_)), "{json}: {err}");
        }
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = ShotConfig::from_json_file("/no/such/shotmark.json").unwrap_err();
        assert!(matches!(err, ShotError::Config(_)));
    }

    #[test]
    fn home_override_wins() {
        let home = std::env::temp_dir();
        let cfg = ShotConfig {
            home_dir: Some(home.clone()),
            ..ShotConfig::default()
        };
        assert_eq!(cfg.home_dir().unwrap(), home);
    }

    #[test]
    fn overlay_spec_carries_styling() {
        let cfg = ShotConfig {
            font_size_px: 20.0,
            shadow_offset: (2, 2),
            ..ShotConfig::default()
        };
        let now = chrono::DateTime::parse_from_rfc3339("2025-06-07T08:09:10+02:00").unwrap();
        let spec = cfg.overlay_spec(&now);
        assert_eq!(spec.timestamp, "2025-06-07 08:09");
        assert_eq!(spec.font.size_px, 20.0);
        assert_eq!(spec.shadow_offset, (2, 2));
        assert_eq!(spec.watermark, DEFAULT_WATERMARK);
    }
}
