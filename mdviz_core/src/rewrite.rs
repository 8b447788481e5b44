use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::Dialect;
use crate::DialectCounts;
use crate::MARKER_CLASS;
use crate::MdvizError;
use crate::MdvizResult;
use crate::patterns;
use crate::patterns::Segment;

/// A fenced block whose payload could not be converted. The block is kept
/// verbatim in the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadDiagnostic {
	pub dialect: Dialect,
	/// 1-indexed line of the opening fence.
	pub line: usize,
	pub message: String,
}

/// Outcome of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
	pub text: String,
	/// Whether `text` differs from the input.
	pub changed: bool,
	/// Fenced chart blocks replaced by inline containers.
	pub converted: DialectCounts,
	/// Pre-existing containers that received the marker class.
	pub normalized: usize,
	pub diagnostics: Vec<PayloadDiagnostic>,
}

/// What happens to a single fenced block.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BlockRewrite {
	Keep,
	Normalize(String),
	Convert(String),
}

/// Rewrite every visualization block in `text`.
///
/// Chart fences become inline containers, mermaid fences are normalized, and
/// pre-existing chart containers gain the marker class. A malformed payload
/// is reported as a diagnostic and its block left untouched; it never stops
/// the rest of the document from being rewritten. Applying `rewrite` to its
/// own output changes nothing.
pub fn rewrite(text: &str) -> Rewrite {
	let mut output = String::with_capacity(text.len());
	let mut converted = DialectCounts::default();
	let mut normalized = 0;
	let mut diagnostics = Vec::new();

	for segment in patterns::segments(text) {
		match segment {
			Segment::Prose(prose) => {
				normalized += normalize_containers(prose, &mut output);
			}
			Segment::Fence(fence) => {
				let source = &text[fence.range.clone()];
				let Some(dialect) = fence.dialect() else {
					output.push_str(source);
					continue;
				};

				match rewrite_block(dialect, fence.payload) {
					Ok(BlockRewrite::Keep) => output.push_str(source),
					Ok(BlockRewrite::Normalize(block)) => output.push_str(&block),
					Ok(BlockRewrite::Convert(container)) => {
						output.push_str(&container);
						converted.increment(dialect);
					}
					Err(error) => {
						let line = patterns::line_of(text, fence.range.start);
						tracing::warn!(%dialect, line, "{error}");
						diagnostics.push(PayloadDiagnostic {
							dialect,
							line,
							message: error.to_string(),
						});
						output.push_str(source);
					}
				}
			}
		}
	}

	let changed = output != text;

	Rewrite {
		text: output,
		changed,
		converted,
		normalized,
		diagnostics,
	}
}

fn rewrite_block(dialect: Dialect, payload: Option<&str>) -> MdvizResult<BlockRewrite> {
	let raw = payload.map_or("", str::trim);

	match dialect {
		Dialect::Mermaid => {
			// A leading fence in the trimmed payload would start a new block
			// on the next pass.
			if payload.is_none() || raw.starts_with("```") {
				return Ok(BlockRewrite::Keep);
			}
			Ok(BlockRewrite::Normalize(format!("```mermaid\n{raw}\n```")))
		}
		Dialect::Echarts => {
			parse_payload(dialect, raw)?;
			Ok(BlockRewrite::Convert(container(
				dialect,
				&[Attribute::single("data-option", raw)],
			)))
		}
		Dialect::Chartjs => {
			let config = parse_object(dialect, raw)?;
			let chart_type = match config.get("type") {
				None | Some(Value::Null) => "line".to_string(),
				Some(Value::String(chart_type)) => chart_type.clone(),
				Some(other) => other.to_string(),
			};
			Ok(BlockRewrite::Convert(container(
				dialect,
				&[
					Attribute::double("data-type", &chart_type),
					Attribute::single("data-config", raw),
				],
			)))
		}
		Dialect::Plotly => {
			let config = parse_object(dialect, raw)?;
			let data = config
				.get("data")
				.map_or_else(|| "[]".to_string(), Value::to_string);
			let layout = config
				.get("layout")
				.map_or_else(|| "{}".to_string(), Value::to_string);
			Ok(BlockRewrite::Convert(container(
				dialect,
				&[
					Attribute::single("data-plotly-data", &data),
					Attribute::single("data-plotly-layout", &layout),
				],
			)))
		}
	}
}

fn parse_payload(dialect: Dialect, raw: &str) -> MdvizResult<Value> {
	serde_json::from_str(raw).map_err(|e| {
		MdvizError::InvalidPayload {
			dialect,
			reason: e.to_string(),
		}
	})
}

fn parse_object(dialect: Dialect, raw: &str) -> MdvizResult<Map<String, Value>> {
	match parse_payload(dialect, raw)? {
		Value::Object(config) => Ok(config),
		_ => Err(MdvizError::PayloadNotObject { dialect }),
	}
}

struct Attribute<'a> {
	name: &'static str,
	value: &'a str,
	single_quoted: bool,
}

impl<'a> Attribute<'a> {
	fn single(name: &'static str, value: &'a str) -> Self {
		Self {
			name,
			value,
			single_quoted: true,
		}
	}

	fn double(name: &'static str, value: &'a str) -> Self {
		Self {
			name,
			value,
			single_quoted: false,
		}
	}
}

/// Build the inline container for a chart dialect. Emitted containers carry
/// the marker class already so normalization leaves them alone.
fn container(dialect: Dialect, attributes: &[Attribute<'_>]) -> String {
	let class = dialect.container_class().unwrap_or_default();
	let mut html = format!("<div class=\"{class} {MARKER_CLASS}\"");

	for attribute in attributes {
		let name = attribute.name;
		if attribute.single_quoted {
			let value = patterns::escape_single_quoted(attribute.value);
			html.push_str(&format!(" {name}='{value}'"));
		} else {
			let value = patterns::escape_double_quoted(attribute.value);
			html.push_str(&format!(" {name}=\"{value}\""));
		}
	}

	html.push_str("></div>");
	html
}

/// Copy `prose` into `output`, appending the marker class to every chart
/// container missing it. Returns how many containers were touched.
fn normalize_containers(prose: &str, output: &mut String) -> usize {
	let mut cursor = 0;
	let mut normalized = 0;

	for div in patterns::opening_divs(prose) {
		let Some(class) = div.class() else {
			continue;
		};
		let value = class.value.unwrap_or_default();
		let is_chart = Dialect::CHARTS.into_iter().any(|dialect| {
			dialect
				.container_class()
				.is_some_and(|name| patterns::has_class_token(value, name))
		});

		if !is_chart || patterns::has_class_token(value, MARKER_CLASS) {
			continue;
		}

		let separator = if value.is_empty() || value.ends_with(char::is_whitespace) {
			""
		} else {
			" "
		};

		if class.quoted {
			output.push_str(&prose[cursor..class.value_range.end]);
			output.push_str(separator);
			output.push_str(MARKER_CLASS);
		} else {
			output.push_str(&prose[cursor..class.value_range.start]);
			output.push('"');
			output.push_str(value);
			output.push_str(separator);
			output.push_str(MARKER_CLASS);
			output.push('"');
		}

		cursor = class.value_range.end;
		normalized += 1;
	}

	output.push_str(&prose[cursor..]);
	normalized
}
