/// Prefix marking a semantic version in a descriptor's `version` field.
pub const SEMVER_PREFIX: &str = "semver|";

/// Build the conventional `semver|MAJOR.MINOR.PATCH` version string.
///
/// # Examples
///
/// ```
/// assert_eq!(mound_types::semver(1, 0, 0), "semver|1.0.0");
/// ```
pub fn semver(major: u64, minor: u64, patch: u64) -> String {
    format!("{SEMVER_PREFIX}{major}.{minor}.{patch}")
}

/// Split a `semver|MAJOR.MINOR.PATCH` string back into its parts.
///
/// Returns `None` for free-form version strings.
pub fn parse_semver(version: &str) -> Option<(u64, u64, u64)> {
    let rest = version.strip_prefix(SEMVER_PREFIX)?;
    let mut parts = rest.splitn(3, '.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    Some((major, minor, patch))
}
