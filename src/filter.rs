//! Compiled inclusion filters deciding which upstream identifiers become groups.
//!
//! A [`FilterSet`] is an ordered list of regular expressions; a candidate is admitted when any
//! of them matches. An empty set does not mean "match all": it disables the enrichment step
//! that would consult it, so no request is issued for that axis.

// crates.io
use regex::Regex;
// self
use crate::_prelude::*;

/// Filter axes consulted during group enrichment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterAxis {
	/// Organization logins (organization-style providers).
	Organizations,
	/// Group paths or guild identifiers.
	Groups,
}
impl FilterAxis {
	/// Returns a stable label suitable for errors and log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FilterAxis::Organizations => "organization",
			FilterAxis::Groups => "group",
		}
	}
}
impl Display for FilterAxis {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Pattern that failed to compile.
#[derive(Clone, Debug, ThisError)]
#[error("Invalid {axis} filter pattern `{pattern}`.")]
pub struct FilterError {
	/// Axis the pattern was configured for.
	pub axis: FilterAxis,
	/// Raw pattern text.
	pub pattern: String,
	/// Underlying compilation failure.
	#[source]
	pub source: regex::Error,
}

/// Ordered set of compiled matchers for one axis.
#[derive(Clone, Debug, Default)]
pub struct FilterSet(Vec<Regex>);
impl FilterSet {
	/// Compiles every pattern, failing on the first invalid one.
	pub fn compile<I, S>(axis: FilterAxis, patterns: I) -> Result<Self, FilterError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut matchers = Vec::new();

		for pattern in patterns {
			let pattern = pattern.as_ref();
			let regex = Regex::new(pattern).map_err(|source| FilterError {
				axis,
				pattern: pattern.to_owned(),
				source,
			})?;

			matchers.push(regex);
		}

		Ok(Self(matchers))
	}

	/// Returns true when the axis has at least one matcher.
	pub fn is_enabled(&self) -> bool {
		!self.0.is_empty()
	}

	/// Returns true if any matcher accepts the candidate.
	pub fn admits(&self, candidate: &str) -> bool {
		self.0.iter().any(|matcher| matcher.is_match(candidate))
	}
}

/// Both filter axes, compiled once at configuration load.
#[derive(Clone, Debug, Default)]
pub struct FilterAxes {
	/// Organization axis.
	pub organizations: FilterSet,
	/// Group/guild axis.
	pub groups: FilterSet,
}
impl FilterAxes {
	/// Returns the set configured for `axis`.
	pub fn axis(&self, axis: FilterAxis) -> &FilterSet {
		match axis {
			FilterAxis::Organizations => &self.organizations,
			FilterAxis::Groups => &self.groups,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_set_is_disabled_and_admits_nothing() {
		let set = FilterSet::default();

		assert!(!set.is_enabled());
		assert!(!set.admits("anything"));
	}

	#[test]
	fn any_matcher_admits() {
		let set = FilterSet::compile(FilterAxis::Organizations, ["^acme$", "^contoso"])
			.expect("Filter fixture should compile.");

		assert!(set.is_enabled());
		assert!(set.admits("acme"));
		assert!(set.admits("contoso-labs"));
		assert!(!set.admits("acme-corp"));
	}

	#[test]
	fn invalid_pattern_names_axis() {
		let err = FilterSet::compile(FilterAxis::Groups, ["ok", "(unclosed"])
			.expect_err("Unbalanced group must be rejected.");

		assert_eq!(err.axis, FilterAxis::Groups);
		assert_eq!(err.pattern, "(unclosed");
		assert_eq!(err.to_string(), "Invalid group filter pattern `(unclosed`.");
	}

	#[test]
	fn axes_lookup_returns_matching_set() {
		let axes = FilterAxes {
			organizations: FilterSet::default(),
			groups: FilterSet::compile(FilterAxis::Groups, [".*"])
				.expect("Filter fixture should compile."),
		};

		assert!(!axes.axis(FilterAxis::Organizations).is_enabled());
		assert!(axes.axis(FilterAxis::Groups).is_enabled());
	}
}
