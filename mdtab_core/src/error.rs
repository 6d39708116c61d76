use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MdtabError {
	#[error(transparent)]
	#[diagnostic(code(mdtab::io_error))]
	Io(#[from] std::io::Error),

	#[error("path does not exist: `{0}`")]
	#[diagnostic(
		code(mdtab::path_not_found),
		help("pass an existing markdown file or a directory containing markdown files")
	)]
	PathNotFound(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdtab::config_parse),
		help("check that mdtab.toml is valid TOML with [exclude], [include] and [normalize] sections")
	)]
	ConfigParse(String),

	#[error("invalid pattern `{pattern}`: {reason}")]
	#[diagnostic(code(mdtab::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(mdtab::file_too_large),
		help("increase `max_file_size` in mdtab.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("file is not valid utf-8: `{0}`")]
	#[diagnostic(code(mdtab::not_utf8))]
	NotUtf8(String),

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(mdtab::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

pub type MdtabResult<T> = Result<T, MdtabError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
