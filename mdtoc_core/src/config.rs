use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::MdtocError;
use crate::MdtocResult;
use crate::heading::MAX_HEADING_LEVEL;

/// Caption inserted above the generated list when none is configured.
pub const DEFAULT_TOC_CAPTION: &str = "## Table of Contents";

/// Deepest heading level included when none is configured.
pub const DEFAULT_TOC_MAX_LEVEL: u8 = 3;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["mdtoc.toml", ".mdtoc.toml", ".config/mdtoc.toml"];

/// Key under which editors nest mdtoc settings in a configuration payload.
pub const SETTINGS_SECTION: &str = "mdtoc";

/// Contents written by `mdtoc init`.
pub const SAMPLE_CONFIG: &str = "# mdtoc configuration\n\n# Raw markdown inserted above the \
                                 generated list. Set to \"\" to omit.\ntoc_caption = \"## Table \
                                 of Contents\"\n\n# Deepest heading level (1-6) included in the \
                                 table of contents.\ntoc_max_level = 3\n";

/// Settings for table of contents generation.
///
/// Loaded from `mdtoc.toml`:
///
/// ```toml
/// toc_caption = "## Contents"
/// toc_max_level = 2
/// ```
///
/// Editor settings payloads may use the camel case names `tocCaption` and
/// `tocMaxLevel` instead.
///
/// A value is a snapshot: hosts that receive live updates replace the whole
/// value rather than mutating one in place.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TocSettings {
	/// Raw markdown prepended verbatim to the generated list. May be empty.
	#[serde(default = "default_toc_caption", alias = "tocCaption")]
	pub toc_caption: String,
	/// Inclusive heading depth cutoff, `1..=6`.
	#[serde(default = "default_toc_max_level", alias = "tocMaxLevel")]
	pub toc_max_level: u8,
}

impl Default for TocSettings {
	fn default() -> Self {
		Self {
			toc_caption: default_toc_caption(),
			toc_max_level: default_toc_max_level(),
		}
	}
}

fn default_toc_caption() -> String {
	DEFAULT_TOC_CAPTION.to_string()
}

fn default_toc_max_level() -> u8 {
	DEFAULT_TOC_MAX_LEVEL
}

impl TocSettings {
	/// Check that `toc_max_level` is a real heading depth.
	pub fn validate(self) -> MdtocResult<Self> {
		if (1..=MAX_HEADING_LEVEL).contains(&self.toc_max_level) {
			Ok(self)
		} else {
			Err(MdtocError::InvalidMaxLevel(i64::from(self.toc_max_level)))
		}
	}

	/// Replace individual fields, e.g. from command line flags.
	pub fn with_overrides(
		mut self,
		caption: Option<String>,
		max_level: Option<u8>,
	) -> MdtocResult<Self> {
		if let Some(caption) = caption {
			self.toc_caption = caption;
		}
		if let Some(max_level) = max_level {
			self.toc_max_level = max_level;
		}
		self.validate()
	}

	/// Parse an editor settings payload. Accepts either the settings object
	/// itself or an object holding it under the `mdtoc` key.
	pub fn from_json(value: &serde_json::Value) -> MdtocResult<Self> {
		let section = value.get(SETTINGS_SECTION).unwrap_or(value);
		let settings: TocSettings = serde_json::from_value(section.clone())
			.map_err(|e| MdtocError::Settings(e.to_string()))?;
		settings.validate()
	}

	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load settings from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> MdtocResult<Option<TocSettings>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let settings: TocSettings =
			toml::from_str(&content).map_err(|e| MdtocError::ConfigParse(e.to_string()))?;

		settings.validate().map(Some)
	}

	/// Like [`TocSettings::load`], but never fails: a missing config yields
	/// the defaults, and a broken one is logged and also yields the defaults.
	pub fn load_or_default(root: &Path) -> TocSettings {
		match Self::load(root) {
			Ok(Some(settings)) => settings,
			Ok(None) => TocSettings::default(),
			Err(e) => {
				tracing::error!(
					root = %root.display(),
					error = %e,
					"failed to load settings, using defaults"
				);
				TocSettings::default()
			}
		}
	}
}
