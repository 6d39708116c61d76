use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::MdtabError;
use crate::MdtabResult;
use crate::NormalizeOptions;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// File extensions processed when no config overrides them.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["mdtab.toml", ".mdtab.toml", ".config/mdtab.toml"];

/// Configuration loaded from an `mdtab.toml` file.
///
/// ```toml
/// extensions = ["md", "mdx"]
/// max_file_size = 10485760
/// disable_gitignore = false
///
/// [exclude]
/// patterns = ["build/", "*.generated.md"]
///
/// [include]
/// patterns = ["docs/**/*.markdown"]
///
/// [normalize]
/// respect_code_fences = true
/// field_reference = false
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MdtabConfig {
	/// Extensions (without the leading dot) of the files to normalize when
	/// walking a directory.
	#[serde(default = "default_extensions")]
	pub extensions: Vec<String>,
	/// Files larger than this many bytes are reported as failures instead of
	/// being read. Defaults to 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` rules are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
	#[serde(default)]
	pub exclude: ExcludeConfig,
	#[serde(default)]
	pub include: IncludeConfig,
	#[serde(default)]
	pub normalize: NormalizeConfig,
}

impl Default for MdtabConfig {
	fn default() -> Self {
		Self {
			extensions: default_extensions(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
			exclude: ExcludeConfig::default(),
			include: IncludeConfig::default(),
			normalize: NormalizeConfig::default(),
		}
	}
}

/// Configuration for excluding files and directories from the walk.
///
/// Patterns follow gitignore syntax and are applied on top of any
/// `.gitignore` rules. Negation (`!pattern`) and directory markers (trailing
/// `/`) are supported.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Additional glob patterns, relative to the target directory, for files to
/// normalize regardless of their extension.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct IncludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Pipeline options.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct NormalizeConfig {
	#[serde(default = "default_true")]
	pub respect_code_fences: bool,
	#[serde(default)]
	pub field_reference: bool,
}

impl Default for NormalizeConfig {
	fn default() -> Self {
		Self {
			respect_code_fences: true,
			field_reference: false,
		}
	}
}

impl From<NormalizeConfig> for NormalizeOptions {
	fn from(config: NormalizeConfig) -> Self {
		Self {
			respect_code_fences: config.respect_code_fences,
			field_reference: config.field_reference,
		}
	}
}

pub(crate) fn default_extensions() -> Vec<String> {
	DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

fn default_true() -> bool {
	true
}

impl MdtabConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file for `target`.
	/// A file target is looked up from its parent directory. Returns `None`
	/// if no config file exists.
	pub fn load(target: &Path) -> MdtabResult<Option<MdtabConfig>> {
		let root = if target.is_file() {
			target.parent().unwrap_or(target)
		} else {
			target
		};

		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: MdtabConfig =
			toml::from_str(&content).map_err(|e| MdtabError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Load the config for `target`, falling back to the defaults.
	pub fn load_or_default(target: &Path) -> MdtabResult<MdtabConfig> {
		Ok(Self::load(target)?.unwrap_or_default())
	}
}
