//! Redirect URI match configuration shared with the authorization flow.
//!
//! A [`RedirectUriMatchConfig`] pairs a domain rule with a path rule. Both rules are validated
//! and any `regex` pattern is compiled when the config is constructed, so matching itself
//! cannot fail.

// crates.io
use regex::Regex;
// self
use crate::_prelude::*;

/// Errors raised while constructing a [`RedirectUriMatchConfig`].
#[derive(Debug, ThisError)]
pub enum RedirectMatchError {
	/// Domain pattern is empty.
	#[error("Redirect URI match domain is empty.")]
	EmptyDomain,
	/// Path pattern is empty.
	#[error("Redirect URI match path is empty.")]
	EmptyPath,
	/// Match type is not one of `exact`, `partial`, `prefix`, `suffix`, `regex`.
	#[error("Redirect URI match type `{match_type}` is unsupported.")]
	UnsupportedMatchType {
		/// Raw match type.
		match_type: String,
	},
	/// A `regex` pattern failed to compile.
	#[error("Redirect URI match pattern `{pattern}` is invalid.")]
	InvalidPattern {
		/// Raw pattern text.
		pattern: String,
		/// Underlying compilation failure.
		#[source]
		source: regex::Error,
	},
}

/// How a pattern is compared with the candidate value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
	/// Whole-value equality.
	Exact,
	/// Substring containment.
	Partial,
	/// Candidate starts with the pattern.
	Prefix,
	/// Candidate ends with the pattern.
	Suffix,
	/// Candidate matches the regular expression.
	Regex,
}
impl MatchType {
	/// Returns the configuration label for this match type.
	pub const fn as_str(self) -> &'static str {
		match self {
			MatchType::Exact => "exact",
			MatchType::Partial => "partial",
			MatchType::Prefix => "prefix",
			MatchType::Suffix => "suffix",
			MatchType::Regex => "regex",
		}
	}
}
impl Display for MatchType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for MatchType {
	type Err = RedirectMatchError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"exact" => Ok(MatchType::Exact),
			"partial" => Ok(MatchType::Partial),
			"prefix" => Ok(MatchType::Prefix),
			"suffix" => Ok(MatchType::Suffix),
			"regex" => Ok(MatchType::Regex),
			other => Err(RedirectMatchError::UnsupportedMatchType { match_type: other.to_owned() }),
		}
	}
}

/// Validated redirect URI match rule.
#[derive(Clone, Debug, Serialize)]
pub struct RedirectUriMatchConfig {
	/// Domain comparison mode.
	pub domain_match_type: MatchType,
	/// Domain pattern.
	pub domain: String,
	/// Path comparison mode.
	pub path_match_type: MatchType,
	/// Path pattern.
	pub path: String,
	#[serde(skip)]
	domain_regex: Option<Regex>,
	#[serde(skip)]
	path_regex: Option<Regex>,
}
impl RedirectUriMatchConfig {
	/// Validates the four inputs and compiles any regular expressions.
	pub fn new(
		domain_match_type: &str,
		domain: &str,
		path_match_type: &str,
		path: &str,
	) -> Result<Self, RedirectMatchError> {
		if domain.is_empty() {
			return Err(RedirectMatchError::EmptyDomain);
		}
		if path.is_empty() {
			return Err(RedirectMatchError::EmptyPath);
		}

		let domain_match_type = MatchType::from_str(domain_match_type)?;
		let path_match_type = MatchType::from_str(path_match_type)?;

		Ok(Self {
			domain_regex: compile(domain_match_type, domain)?,
			path_regex: compile(path_match_type, path)?,
			domain_match_type,
			domain: domain.to_owned(),
			path_match_type,
			path: path.to_owned(),
		})
	}

	/// Returns true when both the host and the path of `url` satisfy their rules.
	pub fn matches(&self, url: &Url) -> bool {
		let Some(host) = url.host_str() else {
			return false;
		};

		is_match(self.domain_match_type, &self.domain, self.domain_regex.as_ref(), host)
			&& is_match(self.path_match_type, &self.path, self.path_regex.as_ref(), url.path())
	}
}

fn compile(match_type: MatchType, pattern: &str) -> Result<Option<Regex>, RedirectMatchError> {
	if match_type != MatchType::Regex {
		return Ok(None);
	}

	Regex::new(pattern)
		.map(Some)
		.map_err(|source| RedirectMatchError::InvalidPattern { pattern: pattern.to_owned(), source })
}

fn is_match(match_type: MatchType, pattern: &str, regex: Option<&Regex>, candidate: &str) -> bool {
	match match_type {
		MatchType::Exact => candidate == pattern,
		MatchType::Partial => candidate.contains(pattern),
		MatchType::Prefix => candidate.starts_with(pattern),
		MatchType::Suffix => candidate.ends_with(pattern),
		MatchType::Regex => regex.is_some_and(|regex| regex.is_match(candidate)),
	}
}
