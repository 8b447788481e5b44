use miette::Diagnostic;
use thiserror::Error;

use crate::Dialect;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MdvizError {
	#[error(transparent)]
	#[diagnostic(code(mdviz::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdviz::config_parse),
		help("check that mdviz.toml is valid TOML with optional [exclude] and [report] sections")
	)]
	ConfigParse(String),

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(mdviz::invalid_exclude_pattern),
		help("exclude patterns use .gitignore syntax")
	)]
	InvalidExcludePattern { pattern: String, reason: String },

	#[error("posts directory not found: `{0}`")]
	#[diagnostic(
		code(mdviz::posts_dir_missing),
		help("set `posts_dir` in mdviz.toml or pass `--posts-dir`")
	)]
	PostsDirMissing(String),

	#[error("invalid {} JSON configuration: {reason}", .dialect.label())]
	#[diagnostic(
		code(mdviz::invalid_payload),
		help("fix the JSON inside the fenced block; it is left unchanged until then")
	)]
	InvalidPayload { dialect: Dialect, reason: String },

	#[error("{} configuration must be a JSON object", .dialect.label())]
	#[diagnostic(
		code(mdviz::payload_not_object),
		help("wrap the configuration in `{{ ... }}`")
	)]
	PayloadNotObject { dialect: Dialect },

	#[error("failed to serialize report: {0}")]
	#[diagnostic(code(mdviz::report_serialize))]
	ReportSerialize(String),
}

pub type MdvizResult<T> = Result<T, MdvizError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
