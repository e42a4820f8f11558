//! In-place version transitions.

use semver::{BuildMetadata, Prerelease};
use tracing::debug;

use super::{Channel, SemVer, VersionError, VersionResult};

/// Owns one [`SemVer`] and applies transitions to it.
///
/// Every operation returns `&mut Self` (or a `Result` of it) so calls can be
/// chained. Fallible operations leave the value untouched on error.
///
/// ```
/// use vmark_core::version::{Channel, SemVer, VersionMutator};
///
/// let mut mutator = VersionMutator::new(SemVer::parse("1.2.3").unwrap());
/// mutator.increment_minor().unwrap().advance_pre_release(Channel::Beta).unwrap();
/// assert_eq!(mutator.current().format(), "1.3.0-beta.1");
/// ```
#[derive(Debug, Clone)]
pub struct VersionMutator {
    current: SemVer,
}

impl VersionMutator {
    /// Take ownership of `version`.
    pub const fn new(version: SemVer) -> Self {
        Self { current: version }
    }

    /// The current value.
    pub const fn current(&self) -> &SemVer {
        &self.current
    }

    /// Give the value back.
    pub fn into_inner(self) -> SemVer {
        self.current
    }

    /// `X.y.z` to `(X+1).0.0`, dropping pre-release and build.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::ComponentOverflow`] when major is already
    /// `u64::MAX`. The value is unchanged.
    pub fn increment_major(&mut self) -> VersionResult<&mut Self> {
        let major = self.bumped(self.current.0.major, "major")?;
        let v = &mut self.current.0;
        v.major = major;
        v.minor = 0;
        v.patch = 0;
        Ok(self.reset_suffixes())
    }

    /// `x.Y.z` to `x.(Y+1).0`, dropping pre-release and build.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::ComponentOverflow`] when minor is already
    /// `u64::MAX`. The value is unchanged.
    pub fn increment_minor(&mut self) -> VersionResult<&mut Self> {
        let minor = self.bumped(self.current.0.minor, "minor")?;
        let v = &mut self.current.0;
        v.minor = minor;
        v.patch = 0;
        Ok(self.reset_suffixes())
    }

    /// `x.y.Z` to `x.y.(Z+1)`, dropping pre-release and build.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::ComponentOverflow`] when patch is already
    /// `u64::MAX`. The value is unchanged.
    pub fn increment_patch(&mut self) -> VersionResult<&mut Self> {
        self.current.0.patch = self.bumped(self.current.0.patch, "patch")?;
        Ok(self.reset_suffixes())
    }

    /// Bump the trailing numeric identifier of the pre-release.
    ///
    /// Only the last dot-separated identifier is considered, so
    /// `alpha.beta.1` becomes `alpha.beta.2`. A pre-release made of a single
    /// identifier (`alpha`, `7`) or ending in a non-numeric one (`alpha.x`)
    /// cannot be incremented. Build metadata is kept.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::NoPreReleaseToIncrement`] when there is no
    /// such identifier.
    pub fn increment_pre_release(&mut self) -> VersionResult<&mut Self> {
        let next = next_pre_release(&self.current.0.pre).ok_or_else(|| {
            VersionError::NoPreReleaseToIncrement {
                version: self.current.format(),
            }
        })?;
        self.current.0.pre = next;
        Ok(self)
    }

    /// Set the pre-release to `<channel>.<number>`.
    ///
    /// Core numbers and build metadata are not touched.
    ///
    /// # Errors
    ///
    /// Propagates a parse failure of the rendered identifier, which cannot
    /// happen for the known channels.
    pub fn enter_pre_release(&mut self, channel: Channel, number: u64) -> VersionResult<&mut Self> {
        self.current.0.pre = channel_pre_release(channel, number)?;
        Ok(self)
    }

    /// Shorthand for `enter_pre_release(Channel::Alpha, number)`.
    ///
    /// # Errors
    ///
    /// See [`Self::enter_pre_release`].
    pub fn alpha(&mut self, number: u64) -> VersionResult<&mut Self> {
        self.enter_pre_release(Channel::Alpha, number)
    }

    /// Shorthand for `enter_pre_release(Channel::Beta, number)`.
    ///
    /// # Errors
    ///
    /// See [`Self::enter_pre_release`].
    pub fn beta(&mut self, number: u64) -> VersionResult<&mut Self> {
        self.enter_pre_release(Channel::Beta, number)
    }

    /// Shorthand for `enter_pre_release(Channel::Rc, number)`.
    ///
    /// # Errors
    ///
    /// See [`Self::enter_pre_release`].
    pub fn rc(&mut self, number: u64) -> VersionResult<&mut Self> {
        self.enter_pre_release(Channel::Rc, number)
    }

    /// Advance within `channel`, or start it at 1.
    ///
    /// If the current pre-release already belongs to `channel` (it starts
    /// with `"<channel>."`), its trailing number is incremented. Anything
    /// else, including a different channel or no pre-release at all, resets
    /// to `<channel>.1`. `beta.2` asked for `alpha` becomes `alpha.1`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::NoPreReleaseToIncrement`] when the same-channel
    /// pre-release has no numeric tail, e.g. `alpha.x`.
    pub fn advance_pre_release(&mut self, channel: Channel) -> VersionResult<&mut Self> {
        let prefix = format!("{channel}.");
        if self.current.0.pre.as_str().starts_with(&prefix) {
            debug!(%channel, pre = %self.current.0.pre, "advancing pre-release");
            self.increment_pre_release()
        } else {
            debug!(%channel, pre = %self.current.0.pre, "starting pre-release channel");
            self.enter_pre_release(channel, 1)
        }
    }

    /// Drop the pre-release, keeping core numbers and build metadata.
    pub fn stable(&mut self) -> &mut Self {
        self.current.0.pre = Prerelease::EMPTY;
        self
    }

    /// Replace the build metadata. `None` or an empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::InvalidBuildMetadata`] for text that is not a
    /// dot-separated list of `[0-9A-Za-z-]` identifiers.
    pub fn set_build(&mut self, build: Option<&str>) -> VersionResult<&mut Self> {
        self.current.0.build = match build {
            None | Some("") => BuildMetadata::EMPTY,
            Some(text) => {
                BuildMetadata::new(text).map_err(|source| VersionError::InvalidBuildMetadata {
                    input: text.to_string(),
                    source,
                })?
            }
        };
        Ok(self)
    }

    /// Remove the build metadata.
    pub fn clear_build(&mut self) -> &mut Self {
        self.current.0.build = BuildMetadata::EMPTY;
        self
    }

    /// Replace the whole value with `text` parsed as a version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::InvalidFormat`] and keeps the previous value
    /// when `text` does not parse.
    pub fn set(&mut self, text: &str) -> VersionResult<&mut Self> {
        self.current = SemVer::parse(text)?;
        Ok(self)
    }

    fn bumped(&self, value: u64, component: &'static str) -> VersionResult<u64> {
        value
            .checked_add(1)
            .ok_or_else(|| VersionError::ComponentOverflow {
                version: self.current.format(),
                component,
            })
    }

    fn reset_suffixes(&mut self) -> &mut Self {
        self.current.0.pre = Prerelease::EMPTY;
        self.current.0.build = BuildMetadata::EMPTY;
        self
    }
}

fn channel_pre_release(channel: Channel, number: u64) -> VersionResult<Prerelease> {
    let text = format!("{channel}.{number}");
    Prerelease::new(&text).map_err(|source| VersionError::InvalidFormat {
        input: text,
        source,
    })
}

/// `head.N` to `head.(N+1)`; `None` without a dotted numeric tail.
fn next_pre_release(pre: &Prerelease) -> Option<Prerelease> {
    let (head, tail) = pre.as_str().rsplit_once('.')?;
    if !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let next = tail.parse::<u64>().ok()?.checked_add(1)?;
    Prerelease::new(&format!("{head}.{next}")).ok()
}
