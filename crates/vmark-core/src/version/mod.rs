//! Semantic version model.
//!
//! [`SemVer`] is the value type: parsing, formatting and precedence
//! ordering. [`VersionMutator`] owns one value and applies the increment,
//! pre-release and build transitions that the bump and set commands need.

pub mod channel;
pub mod mutator;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use channel::Channel;
pub use mutator::VersionMutator;

/// Errors from version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    /// The input is not `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`.
    #[error("invalid version format: {input}")]
    InvalidFormat {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        #[source]
        source: semver::Error,
    },

    /// The version has no pre-release ending in a numeric identifier.
    #[error("{version} has no numeric pre-release to increment")]
    NoPreReleaseToIncrement {
        /// The version the increment was attempted on.
        version: String,
    },

    /// Build metadata contains characters outside `[0-9A-Za-z-.]`.
    #[error("invalid build metadata: {input}")]
    InvalidBuildMetadata {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        #[source]
        source: semver::Error,
    },

    /// A major, minor or patch increment would exceed `u64::MAX`.
    #[error("cannot increment {component} of {version}: already at the maximum")]
    ComponentOverflow {
        /// The version the increment was attempted on.
        version: String,
        /// `major`, `minor` or `patch`.
        component: &'static str,
    },
}

/// Result alias for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// A semantic version.
///
/// Equality and ordering follow semver precedence, so two values that differ
/// only in build metadata compare equal. Use [`SemVer::build`] when the
/// metadata itself matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemVer(Version);

impl SemVer {
    /// Parse a version string, accepting an optional leading `v`.
    ///
    /// Surrounding whitespace is rejected.
    pub fn parse(text: &str) -> VersionResult<Self> {
        let bare = text.strip_prefix('v').unwrap_or(text);
        Version::parse(bare)
            .map(Self)
            .map_err(|source| VersionError::InvalidFormat {
                input: text.to_string(),
                source,
            })
    }

    /// Canonical string form, without any `v` prefix.
    pub fn format(&self) -> String {
        self.0.to_string()
    }

    /// Precedence comparison. Build metadata is ignored.
    pub fn compare(&self, other: &Self) -> Ordering {
        (self.0.major, self.0.minor, self.0.patch, &self.0.pre).cmp(&(
            other.0.major,
            other.0.minor,
            other.0.patch,
            &other.0.pre,
        ))
    }

    /// `self > other`
    pub fn gt(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Greater
    }

    /// `self >= other`
    pub fn gte(&self, other: &Self) -> bool {
        self.compare(other) != Ordering::Less
    }

    /// `self < other`
    pub fn lt(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }

    /// `self <= other`
    pub fn lte(&self, other: &Self) -> bool {
        self.compare(other) != Ordering::Greater
    }

    /// Same precedence as `other`.
    #[allow(clippy::should_implement_trait)]
    pub fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// Different precedence from `other`.
    pub fn neq(&self, other: &Self) -> bool {
        !self.eq(other)
    }

    /// Major component.
    pub const fn major(&self) -> u64 {
        self.0.major
    }

    /// Minor component.
    pub const fn minor(&self) -> u64 {
        self.0.minor
    }

    /// Patch component.
    pub const fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Pre-release identifiers, e.g. `alpha.1`.
    pub fn pre_release(&self) -> Option<&str> {
        (!self.0.pre.is_empty()).then(|| self.0.pre.as_str())
    }

    /// Build metadata, e.g. `build.123`.
    pub fn build(&self) -> Option<&str> {
        (!self.0.build.is_empty()).then(|| self.0.build.as_str())
    }

    /// Whether a pre-release is attached.
    pub fn is_pre_release(&self) -> bool {
        !self.0.pre.is_empty()
    }

    /// Whether this is a stable release (no pre-release).
    pub fn is_stable(&self) -> bool {
        self.0.pre.is_empty()
    }

    /// Whether build metadata is attached.
    pub fn has_build(&self) -> bool {
        !self.0.build.is_empty()
    }

    /// Borrow the underlying [`semver::Version`].
    pub const fn as_version(&self) -> &Version {
        &self.0
    }
}

/// `1.0.0`, the version a fresh project starts at.
impl Default for SemVer {
    fn default() -> Self {
        Self(Version::new(1, 0, 0))
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SemVer {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SemVer {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SemVer> for String {
    fn from(value: SemVer) -> Self {
        value.format()
    }
}

impl From<Version> for SemVer {
    fn from(value: Version) -> Self {
        Self(value)
    }
}

impl PartialEq for SemVer {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for SemVer {}

impl PartialOrd for SemVer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemVer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SemVer {
        SemVer::parse(s).unwrap()
    }

    #[test]
    fn parse_core_only() {
        let version = v("1.2.3");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.patch(), 3);
        assert!(version.pre_release().is_none());
        assert!(version.build().is_none());
    }

    #[test]
    fn parse_with_pre_release_and_build() {
        let version = v("2.0.0-rc.1+build.123");
        assert_eq!(version.pre_release(), Some("rc.1"));
        assert_eq!(version.build(), Some("build.123"));
        assert!(version.is_pre_release());
        assert!(!version.is_stable());
        assert!(version.has_build());
    }

    #[test]
    fn parse_with_v_prefix() {
        assert_eq!(v("v1.2.3").format(), "1.2.3");
    }

    #[test]
    fn parse_rejects_invalid_input() {
        for input in [
            "",
            "1",
            "1.2",
            "1.2.3.4",
            "01.2.3",
            "1.2.3-01",
            "1.2.3-",
            "1.2.3+",
            " 1.2.3",
            "1.2.3 ",
            "not-a-version",
            "vv1.2.3",
            "-1.2.3",
        ] {
            let err = SemVer::parse(input).unwrap_err();
            assert!(
                matches!(&err, VersionError::InvalidFormat { input: got, .. } if got == input),
                "{input:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn format_round_trips_every_field() {
        for input in [
            "0.0.0",
            "1.2.3",
            "1.2.3-alpha.1",
            "1.2.3+build.7",
            "10.20.30-rc.1.x-y+exp.sha.5114f85",
        ] {
            let parsed = v(input);
            let reparsed = v(&parsed.format());
            assert_eq!(parsed.format(), input);
            assert_eq!(reparsed.pre_release(), parsed.pre_release());
            assert_eq!(reparsed.build(), parsed.build());
            assert_eq!(reparsed, parsed);
        }
    }

    #[test]
    fn build_metadata_is_ignored_by_ordering() {
        assert!(v("1.0.0+x").eq(&v("1.0.0+y")));
        assert_eq!(v("1.0.0+x"), v("1.0.0"));
        assert!(!v("1.0.0+x").neq(&v("1.0.0+y")));
    }

    #[test]
    fn pre_release_sorts_below_stable() {
        assert!(v("1.0.0-rc.1").lt(&v("1.0.0")));
        assert!(v("1.0.0-alpha.1").lt(&v("1.0.0-beta.1")));
        assert!(v("1.0.0").gt(&v("1.0.0-rc.99")));
    }

    #[test]
    fn pre_release_precedence_chain() {
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
        ];
        for pair in chain.windows(2) {
            assert!(v(pair[0]).lt(&v(pair[1])), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn core_components_compare_numerically() {
        assert!(v("1.10.0").gt(&v("1.9.0")));
        assert!(v("2.0.0").gt(&v("1.99.99")));
        assert!(v("1.0.10").gte(&v("1.0.9")));
        assert!(v("1.0.9").lte(&v("1.0.9+meta")));
    }

    #[test]
    fn exactly_one_relation_holds() {
        let samples = ["1.0.0", "1.0.0-alpha.1", "1.0.0+b", "0.9.9", "1.0.1-rc.1"];
        for a in samples {
            for b in samples {
                let (a, b) = (v(a), v(b));
                let held = [a.lt(&b), a.eq(&b), a.gt(&b)]
                    .iter()
                    .filter(|x| **x)
                    .count();
                assert_eq!(held, 1, "{a} vs {b}");
                assert_eq!(a.eq(&b), b.eq(&a));
            }
        }
    }

    #[test]
    fn ordering_is_transitive() {
        let samples = ["1.0.0", "1.0.0-alpha.1", "1.0.0+b", "0.9.9", "1.0.1-rc.1"];
        for a in samples {
            for b in samples {
                for c in samples {
                    let (a, b, c) = (v(a), v(b), v(c));
                    if a.lt(&b) && b.lt(&c) {
                        assert!(a.lt(&c), "{a} < {b} < {c}");
                    }
                    if a.eq(&b) && b.eq(&c) {
                        assert!(a.eq(&c), "{a} = {b} = {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn sorting_uses_precedence() {
        let mut versions = vec![v("2.0.0+build.123"), v("1.0.0"), v("2.0.0-alpha.1")];
        versions.sort();
        let formatted: Vec<String> = versions.iter().map(SemVer::format).collect();
        assert_eq!(formatted, ["1.0.0", "2.0.0-alpha.1", "2.0.0+build.123"]);
    }

    #[test]
    fn default_is_one_zero_zero() {
        assert_eq!(SemVer::default().format(), "1.0.0");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&v("1.2.3-beta.2")).unwrap();
        assert_eq!(json, "\"1.2.3-beta.2\"");

        let back: SemVer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.format(), "1.2.3-beta.2");

        assert!(serde_json::from_str::<SemVer>("\"nope\"").is_err());
    }
}
