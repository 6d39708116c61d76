use std::collections::HashSet;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use serde::Serialize;

use crate::MdtabError;
use crate::MdtabResult;
use crate::NormalizeOptions;
use crate::PassKind;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::config::MdtabConfig;
use crate::config::default_extensions;
use crate::normalize;

/// Suffix appended to a file's name for its backup copy.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Options controlling which files are collected.
///
/// Use [`ScanOptions::default()`] for sensible defaults or
/// [`ScanOptions::from_config`] to construct from an [`MdtabConfig`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Descend into subdirectories.
	pub recursive: bool,
	/// Gitignore-style patterns to exclude.
	pub exclude_patterns: Vec<String>,
	/// Files matching these globs are collected whatever their extension.
	pub include_set: GlobSet,
	/// Extensions, without the dot, of the files to collect.
	pub extensions: Vec<String>,
	/// Maximum file size to process in bytes.
	pub max_file_size: u64,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			recursive: true,
			exclude_patterns: Vec::new(),
			include_set: GlobSet::empty(),
			extensions: default_extensions(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

impl ScanOptions {
	/// Construct [`ScanOptions`] from an [`MdtabConfig`].
	pub fn from_config(config: &MdtabConfig, recursive: bool) -> MdtabResult<Self> {
		Ok(Self {
			recursive,
			exclude_patterns: config.exclude.patterns.clone(),
			include_set: build_glob_set(&config.include.patterns)?,
			extensions: config.extensions.clone(),
			max_file_size: config.max_file_size,
			disable_gitignore: config.disable_gitignore,
		})
	}
}

/// Options controlling what happens to each collected file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
	/// Copy the original to `<file>.backup` before overwriting it.
	pub backup: bool,
	/// Compute the changes without writing anything.
	pub dry_run: bool,
	/// Largest file, in bytes, that will be read.
	pub max_file_size: Option<u64>,
	pub normalize: NormalizeOptions,
}

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
#[allow(variant_size_differences)]
pub enum FileStatus {
	/// The pipeline changed the file. In a dry run nothing was written.
	Modified,
	Unchanged,
	/// The file could not be read, normalized or written.
	Failed { message: String },
}

/// The content of a modified file before and after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
	pub before: String,
	pub after: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
	pub path: PathBuf,
	#[serde(flatten)]
	pub status: FileStatus,
	/// Passes that changed the file.
	pub passes: Vec<PassKind>,
	/// Where the original was copied, when a backup was written.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub backup: Option<PathBuf>,
	#[serde(skip)]
	pub change: Option<ContentChange>,
}

impl FileReport {
	fn failed(path: &Path, error: &MdtabError) -> Self {
		Self {
			path: path.to_path_buf(),
			status: FileStatus::Failed {
				message: error.to_string(),
			},
			passes: Vec::new(),
			backup: None,
			change: None,
		}
	}

	pub fn is_modified(&self) -> bool {
		self.status == FileStatus::Modified
	}

	pub fn is_failed(&self) -> bool {
		matches!(self.status, FileStatus::Failed { .. })
	}
}

/// Reports for every file a run touched, in path order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
	pub files: Vec<FileReport>,
}

impl RunSummary {
	pub fn modified_count(&self) -> usize {
		self.files.iter().filter(|file| file.is_modified()).count()
	}

	pub fn failed_count(&self) -> usize {
		self.files.iter().filter(|file| file.is_failed()).count()
	}

	pub fn modified(&self) -> impl Iterator<Item = &FileReport> {
		self.files.iter().filter(|file| file.is_modified())
	}
}

/// Normalize every matching file under `root`.
///
/// A missing `root` is an error. Failures for individual files are logged and
/// recorded in the summary without stopping the run.
pub fn process_path(
	root: &Path,
	scan: &ScanOptions,
	options: &RunOptions,
) -> MdtabResult<RunSummary> {
	if !root.exists() {
		return Err(MdtabError::PathNotFound(root.display().to_string()));
	}

	let options = RunOptions {
		max_file_size: options.max_file_size.or(Some(scan.max_file_size)),
		..*options
	};
	let mut summary = RunSummary::default();

	for path in collect_files(root, scan)? {
		let report = process_file(&path, &options).unwrap_or_else(|error| {
			tracing::warn!(path = %path.display(), %error, "failed to process file");
			FileReport::failed(&path, &error)
		});
		summary.files.push(report);
	}

	Ok(summary)
}

/// Normalize a single file and write it back when the pipeline changed it.
pub fn process_file(path: &Path, options: &RunOptions) -> MdtabResult<FileReport> {
	let limit = options.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE);
	let size = std::fs::metadata(path)?.len();
	if size > limit {
		return Err(MdtabError::FileTooLarge {
			path: path.display().to_string(),
			size,
			limit,
		});
	}

	let bytes = std::fs::read(path)?;
	let content =
		String::from_utf8(bytes).map_err(|_| MdtabError::NotUtf8(path.display().to_string()))?;
	let normalized = normalize(&content, &options.normalize);

	if !normalized.changed {
		return Ok(FileReport {
			path: path.to_path_buf(),
			status: FileStatus::Unchanged,
			passes: Vec::new(),
			backup: None,
			change: None,
		});
	}

	let mut backup = None;
	if !options.dry_run {
		if options.backup {
			let backup_path = backup_path(path);
			std::fs::copy(path, &backup_path)?;
			backup = Some(backup_path);
		}

		write_atomically(path, &normalized.content)?;
		tracing::info!(
			path = %path.display(),
			passes = normalized.passes.len(),
			"normalized tables"
		);
	}

	Ok(FileReport {
		path: path.to_path_buf(),
		status: FileStatus::Modified,
		passes: normalized.passes,
		backup,
		change: Some(ContentChange {
			before: content,
			after: normalized.content,
		}),
	})
}

/// The path of the backup copy for `path`: the same name with `.backup`
/// appended.
pub fn backup_path(path: &Path) -> PathBuf {
	let mut name = OsString::from(path.as_os_str());
	name.push(BACKUP_SUFFIX);
	PathBuf::from(name)
}

/// Write to a sibling temp file and rename it over `path`.
fn write_atomically(path: &Path, content: &str) -> MdtabResult<()> {
	let file_name = path
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default();
	let temp_path = path.with_file_name(format!(
		".{file_name}.tmp-{}-{}",
		std::process::id(),
		std::time::SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |duration| duration.as_nanos())
	));

	std::fs::write(&temp_path, content)?;
	if let Err(error) = std::fs::rename(&temp_path, path) {
		let _ = std::fs::remove_file(&temp_path);
		return Err(error.into());
	}

	Ok(())
}

/// Build a `GlobSet` from the `[include]` patterns.
fn build_glob_set(patterns: &[String]) -> MdtabResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			MdtabError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| {
		MdtabError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the `[exclude]` patterns. These follow
/// `.gitignore` syntax and are applied on top of any `.gitignore` rules.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> MdtabResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			MdtabError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}

	builder.build().map_err(|e| {
		MdtabError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the root `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}

	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

/// Collect the files to normalize.
///
/// A file `root` is its own only target, whatever its extension. A directory
/// is walked, recursively unless disabled, skipping hidden directories,
/// `node_modules` and `target` as well as anything matched by `.gitignore`
/// or the exclude patterns. A directory reached through several symlinks is
/// walked once, and a symlink back to one of its own ancestors is skipped
/// with a warning. The result is sorted.
pub fn collect_files(root: &Path, options: &ScanOptions) -> MdtabResult<Vec<PathBuf>> {
	if root.is_file() {
		return Ok(vec![root.to_path_buf()]);
	}

	if !root.is_dir() {
		return Err(MdtabError::PathNotFound(root.display().to_string()));
	}

	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, &options.exclude_patterns)?;
	let walker = Walker {
		root,
		options,
		gitignore: &gitignore,
		custom_exclude: &custom_exclude,
	};

	let mut files = Vec::new();
	let mut visits = DirVisits::default();
	walker.walk_dir(root, &mut files, &mut visits)?;
	files.sort();
	Ok(files)
}

/// Canonical directories seen during a walk.
#[derive(Default)]
struct DirVisits {
	/// Directories on the current descent path.
	ancestors: Vec<PathBuf>,
	/// Every directory walked so far.
	walked: HashSet<PathBuf>,
}

struct Walker<'a> {
	root: &'a Path,
	options: &'a ScanOptions,
	gitignore: &'a Gitignore,
	custom_exclude: &'a Gitignore,
}

impl Walker<'_> {
	fn walk_dir(
		&self,
		dir: &Path,
		files: &mut Vec<PathBuf>,
		visits: &mut DirVisits,
	) -> MdtabResult<()> {
		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

		// A link back to a directory still being walked is a cycle.
		if visits.ancestors.contains(&canonical) {
			let error = MdtabError::SymlinkCycle {
				path: dir.display().to_string(),
			};
			tracing::warn!(%error, "skipping directory");
			return Ok(());
		}

		// Several links may lead to the same directory.
		if !visits.walked.insert(canonical.clone()) {
			tracing::debug!(path = %dir.display(), "directory already walked, skipping");
			return Ok(());
		}

		visits.ancestors.push(canonical);
		let result = self.walk_entries(dir, files, visits);
		visits.ancestors.pop();
		result
	}

	fn walk_entries(
		&self,
		dir: &Path,
		files: &mut Vec<PathBuf>,
		visits: &mut DirVisits,
	) -> MdtabResult<()> {
		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();
			let is_dir = path.is_dir();

			if is_dir
				&& path
					.file_name()
					.and_then(|name| name.to_str())
					.is_some_and(is_ignored_directory_name)
			{
				continue;
			}

			if self.gitignore.matched(&path, is_dir).is_ignore()
				|| self.custom_exclude.matched(&path, is_dir).is_ignore()
			{
				continue;
			}

			if is_dir {
				if self.options.recursive {
					self.walk_dir(&path, files, visits)?;
				}
			} else if self.is_target_file(&path) {
				files.push(path);
			}
		}

		Ok(())
	}

	fn is_target_file(&self, path: &Path) -> bool {
		let has_extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| {
				self.options
					.extensions
					.iter()
					.any(|wanted| wanted.eq_ignore_ascii_case(ext))
			});

		has_extension
			|| path
				.strip_prefix(self.root)
				.is_ok_and(|relative| self.options.include_set.is_match(relative))
	}
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}
