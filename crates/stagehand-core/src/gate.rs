use semver::Version;

/// Parse a `MAJOR.MINOR.PATCH[-prerelease]` version string, tolerating a
/// leading `v`/`V` and surrounding whitespace. Anything else unparseable
/// yields `None`, which gates the affected stage out entirely.
pub fn parse_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Source of the running automation-core version string. Injected so the
/// native query can be substituted in tests and on the command line.
pub trait CoreVersionProvider {
    fn core_version(&self) -> String;
}

/// Fixed version string, used by the CLI flag and in tests.
#[derive(Debug, Clone)]
pub struct StaticVersion(pub String);

impl CoreVersionProvider for StaticVersion {
    fn core_version(&self) -> String {
        self.0.clone()
    }
}
