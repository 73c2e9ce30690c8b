//! npm-style semver range matching and version ordering
//!
//! Supports the range grammar used on the npm registry:
//! - `1.2.3`, `=1.2.3` - exact match
//! - `1`, `1.2`, `1.x`, `1.2.x`, `*` - X-ranges (partial versions match the whole line)
//! - `^1.2.3`, `~1.2.3` - caret and tilde ranges
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `1.0.0 - 2.0.0` - hyphen ranges
//! - `>=1.0.0 <2.0.0` - intersections (space separated)
//! - `^1.0.0 || ^2.0.0` - unions
//!
//! Prerelease versions only match a comparator set that names a prerelease of
//! the same `major.minor.patch`.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use semver::{Prerelease, Version};
use thiserror::Error;

static OPERATOR_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(>=|<=|>|<|=|\^|~)\s+").expect("valid regex"));

static HYPHEN_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").expect("valid regex"));

/// Largest accepted version component (2^53 - 1, as on the npm registry);
/// ceilings add one to a component, so this keeps them in `u64`
const MAX_COMPONENT: u64 = (1 << 53) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid semver range {range:?}: {reason}")]
pub struct RangeParseError {
    pub range: String,
    pub reason: String,
}

fn strip_version_prefix(version: &str) -> &str {
    version.trim_start_matches(['v', '='])
}

/// Order two version strings by semver precedence.
///
/// Unparsable versions order before every parsable one and lexically among
/// themselves.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parsed_a = Version::parse(strip_version_prefix(a.trim())).ok();
    let parsed_b = Version::parse(strip_version_prefix(b.trim())).ok();

    match (parsed_a, parsed_b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn matches(&self, version: &Version) -> bool {
        match self.op {
            Op::Eq => version == &self.version,
            Op::Gt => version > &self.version,
            Op::Gte => version >= &self.version,
            Op::Lt => version < &self.version,
            Op::Lte => version <= &self.version,
        }
    }
}

/// A version with possibly missing trailing components (`1`, `1.2`, `1.x`)
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(text: &str) -> Option<Self> {
        let text = strip_version_prefix(text);
        if let Ok(version) = Version::parse(text) {
            if [version.major, version.minor, version.patch]
                .iter()
                .any(|&n| n > MAX_COMPONENT)
            {
                return None;
            }
            return Some(Self {
                major: Some(version.major),
                minor: Some(version.minor),
                patch: Some(version.patch),
                pre: version.pre,
            });
        }

        let parts: Vec<&str> = text.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return None;
        }

        let mut components = [None; 3];
        let mut wildcard_seen = false;
        for (slot, part) in components.iter_mut().zip(&parts) {
            if matches!(*part, "x" | "X" | "*" | "") {
                wildcard_seen = true;
                continue;
            }
            if wildcard_seen {
                return None;
            }
            *slot = Some(part.parse::<u64>().ok().filter(|&n| n <= MAX_COMPONENT)?);
        }

        Some(Self {
            major: components[0],
            minor: components[1],
            patch: components[2],
            pre: Prerelease::EMPTY,
        })
    }

    /// Lowest version covered by this partial
    fn floor(&self) -> Version {
        let mut version = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        version.pre = self.pre.clone();
        version
    }

    /// First version past the range covered by this partial, `None` for `*`
    fn ceiling(&self) -> Option<Version> {
        match (self.major, self.minor, self.patch) {
            (None, _, _) => None,
            (Some(major), None, _) => Some(Version::new(major + 1, 0, 0)),
            (Some(major), Some(minor), None) => Some(Version::new(major, minor + 1, 0)),
            (Some(_), Some(_), Some(_)) => None,
        }
    }

    fn is_full(&self) -> bool {
        self.patch.is_some()
    }

    fn is_any(&self) -> bool {
        self.major.is_none()
    }
}

/// A parsed npm range: a union of comparator sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    alternatives: Vec<Vec<Comparator>>,
}

impl VersionRange {
    /// Check whether `version` satisfies this range; unparsable versions never do
    pub fn satisfies(&self, version: &str) -> bool {
        let Ok(version) = Version::parse(strip_version_prefix(version.trim())) else {
            return false;
        };
        self.alternatives
            .iter()
            .any(|set| set_satisfies(set, &version))
    }
}

fn set_satisfies(set: &[Comparator], version: &Version) -> bool {
    if !set.iter().all(|c| c.matches(version)) {
        return false;
    }
    if version.pre.is_empty() {
        return true;
    }
    set.iter().any(|c| {
        !c.version.pre.is_empty()
            && c.version.major == version.major
            && c.version.minor == version.minor
            && c.version.patch == version.patch
    })
}

impl FromStr for VersionRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: &str| RangeParseError {
            range: s.to_string(),
            reason: reason.to_string(),
        };

        let alternatives = s
            .split("||")
            .map(|part| parse_comparator_set(part).ok_or_else(|| error("unrecognized comparator")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { alternatives })
    }
}

fn parse_comparator_set(set: &str) -> Option<Vec<Comparator>> {
    let set = OPERATOR_SPACING.replace_all(set.trim(), "$1");

    if let Some(captures) = HYPHEN_RANGE.captures(&set) {
        return parse_hyphen(&captures[1], &captures[2]);
    }

    let mut comparators = Vec::new();
    for token in set.split_whitespace() {
        comparators.extend(parse_simple(token)?);
    }
    Some(comparators)
}

fn parse_hyphen(from: &str, to: &str) -> Option<Vec<Comparator>> {
    let from = Partial::parse(from)?;
    let to = Partial::parse(to)?;

    let mut comparators = Vec::new();
    if !from.is_any() {
        comparators.push(Comparator::new(Op::Gte, from.floor()));
    }
    if to.is_full() {
        comparators.push(Comparator::new(Op::Lte, to.floor()));
    } else if let Some(ceiling) = to.ceiling() {
        comparators.push(Comparator::new(Op::Lt, ceiling));
    }
    Some(comparators)
}

/// Desugar a single token (`^1.2`, `>=1`, `1.x`, ...) into primitive comparators
fn parse_simple(token: &str) -> Option<Vec<Comparator>> {
    let (op, rest) = split_operator(token);
    let partial = Partial::parse(rest)?;

    let comparators = match op {
        "^" => caret(&partial),
        "~" => tilde(&partial),
        "" | "=" => x_range(&partial),
        ">=" if partial.is_any() => Vec::new(),
        ">=" => vec![Comparator::new(Op::Gte, partial.floor())],
        // nothing is below `*`
        "<" if partial.is_any() => vec![Comparator::new(Op::Lt, Version::new(0, 0, 0))],
        "<" => vec![Comparator::new(Op::Lt, partial.floor())],
        ">" => match (partial.is_full(), partial.ceiling()) {
            (true, _) => vec![Comparator::new(Op::Gt, partial.floor())],
            (false, Some(ceiling)) => vec![Comparator::new(Op::Gte, ceiling)],
            (false, None) => vec![Comparator::new(Op::Lt, Version::new(0, 0, 0))],
        },
        "<=" => match (partial.is_full(), partial.ceiling()) {
            (true, _) => vec![Comparator::new(Op::Lte, partial.floor())],
            (false, Some(ceiling)) => vec![Comparator::new(Op::Lt, ceiling)],
            (false, None) => Vec::new(),
        },
        _ => return None,
    };
    Some(comparators)
}

fn split_operator(token: &str) -> (&str, &str) {
    for op in [">=", "<=", ">", "<", "=", "^", "~"] {
        if let Some(rest) = token.strip_prefix(op) {
            return (op, rest);
        }
    }
    ("", token)
}

fn x_range(partial: &Partial) -> Vec<Comparator> {
    if partial.is_full() {
        return vec![Comparator::new(Op::Eq, partial.floor())];
    }
    match partial.ceiling() {
        Some(ceiling) => vec![
            Comparator::new(Op::Gte, partial.floor()),
            Comparator::new(Op::Lt, ceiling),
        ],
        None => Vec::new(),
    }
}

fn caret(partial: &Partial) -> Vec<Comparator> {
    let Some(major) = partial.major else {
        return Vec::new();
    };
    let ceiling = match (major, partial.minor, partial.patch) {
        (0, Some(0), Some(patch)) => Version::new(0, 0, patch + 1),
        (0, Some(minor), _) => Version::new(0, minor + 1, 0),
        (major, _, _) => Version::new(major + 1, 0, 0),
    };
    vec![
        Comparator::new(Op::Gte, partial.floor()),
        Comparator::new(Op::Lt, ceiling),
    ]
}

fn tilde(partial: &Partial) -> Vec<Comparator> {
    let Some(major) = partial.major else {
        return Vec::new();
    };
    let ceiling = match partial.minor {
        Some(minor) => Version::new(major, minor + 1, 0),
        None => Version::new(major + 1, 0, 0),
    };
    vec![
        Comparator::new(Op::Gte, partial.floor()),
        Comparator::new(Op::Lt, ceiling),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn satisfies(version: &str, range: &str) -> bool {
        range.parse::<VersionRange>().unwrap().satisfies(version)
    }

    #[rstest]
    #[case("1.0.0", "1.0.0", true)]
    #[case("1.0.1", "1.0.0", false)]
    #[case("1.0.0", "=1.0.0", true)]
    #[case("1.0.0", "v1.0.0", true)]
    fn exact_versions(#[case] version: &str, #[case] range: &str, #[case] expected: bool) {
        assert_eq!(satisfies(version, range), expected);
    }

    #[rstest]
    // partial versions cover the whole release line
    #[case("1.2.3", "1", true)]
    #[case("2.2.4", "1", false)]
    #[case("1.2.9", "1.2", true)]
    #[case("1.3.0", "1.2", false)]
    #[case("1.9.9", "1.x", true)]
    #[case("2.0.0", "1.x", false)]
    #[case("1.2.5", "1.2.X", true)]
    #[case("0.0.1", "*", true)]
    #[case("42.0.0", "", true)]
    fn x_ranges(#[case] version: &str, #[case] range: &str, #[case] expected: bool) {
        assert_eq!(satisfies(version, range), expected);
    }

    #[rstest]
    #[case("1.3.0", "^1.2.3", true)]
    #[case("1.2.2", "^1.2.3", false)]
    #[case("2.0.0", "^1.2.3", false)]
    #[case("0.2.9", "^0.2.3", true)]
    #[case("0.3.0", "^0.2.3", false)]
    #[case("0.0.3", "^0.0.3", true)]
    #[case("0.0.4", "^0.0.3", false)]
    #[case("0.14.5", "^0.14", true)]
    #[case("0.15.0", "^0.14", false)]
    #[case("1.9.0", "^1", true)]
    fn caret_ranges(#[case] version: &str, #[case] range: &str, #[case] expected: bool) {
        assert_eq!(satisfies(version, range), expected);
    }

    #[rstest]
    #[case("1.2.9", "~1.2.3", true)]
    #[case("1.3.0", "~1.2.3", false)]
    #[case("1.2.2", "~1.2.3", false)]
    #[case("1.2.0", "~1.2", true)]
    #[case("1.9.0", "~1", true)]
    #[case("2.0.0", "~1", false)]
    fn tilde_ranges(#[case] version: &str, #[case] range: &str, #[case] expected: bool) {
        assert_eq!(satisfies(version, range), expected);
    }

    #[rstest]
    #[case("1.0.0", ">=1.0.0", true)]
    #[case("0.9.9", ">=1.0.0", false)]
    #[case("1.0.0", ">1.0.0", false)]
    #[case("1.0.1", "> 1.0.0", true)]
    #[case("1.9.0", ">1", false)]
    #[case("2.0.0", ">1", true)]
    #[case("1.9.9", "<=1", true)]
    #[case("2.0.0", "<=1", false)]
    #[case("0.9.9", "<1.0.0", true)]
    #[case("1.1.9", ">=1.2", false)]
    fn comparison_operators(#[case] version: &str, #[case] range: &str, #[case] expected: bool) {
        assert_eq!(satisfies(version, range), expected);
    }

    #[rstest]
    #[case("1.5.0", ">=1.0.0 <2.0.0", true)]
    #[case("2.0.0", ">=1.0.0 <2.0.0", false)]
    #[case("2.0.0", "1.0.0 - 2.0.0", true)]
    #[case("2.0.1", "1.0.0 - 2.0.0", false)]
    #[case("2.3.9", "1.2.3 - 2.3", true)]
    #[case("2.4.0", "1.2.3 - 2.3", false)]
    #[case("1.2.3", "1.2.3 || 2.2.4", true)]
    #[case("2.2.4", "1.2.3 || 2.2.4", true)]
    #[case("3.0.0", "1.2.3 || 2.2.4", false)]
    #[case("1.6.0", ">=1.0.0 <1.5.0 || >=2.0.0", false)]
    fn compound_ranges(#[case] version: &str, #[case] range: &str, #[case] expected: bool) {
        assert_eq!(satisfies(version, range), expected);
    }

    #[rstest]
    #[case("2.0.0-beta.1", "^1.0.0", false)]
    #[case("1.5.0-beta.1", "^1.0.0", false)]
    #[case("1.2.3-beta.2", ">=1.2.3-beta.1", true)]
    #[case("1.2.4-beta.2", ">=1.2.3-beta.1", false)]
    #[case("1.2.3-beta.2", "*", false)]
    fn prerelease_versions_need_matching_comparator(
        #[case] version: &str,
        #[case] range: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(satisfies(version, range), expected);
    }

    #[test]
    fn largest_component_is_accepted() {
        assert!(satisfies("9007199254740991.0.0", "^9007199254740991"));
    }

    #[test]
    fn unparsable_version_never_satisfies() {
        assert!(!satisfies("latest", "*"));
    }

    #[rstest]
    #[case("not a range")]
    #[case("^abc")]
    #[case("1.x.2")]
    #[case("18446744073709551615")]
    #[case("^18446744073709551615.0.0")]
    #[case("~1.18446744073709551615")]
    #[case(">1.9007199254740992")]
    fn invalid_ranges_are_rejected(#[case] range: &str) {
        assert!(range.parse::<VersionRange>().is_err());
    }

    #[rstest]
    #[case("2.2.4", "1.2.3", Ordering::Greater)]
    #[case("1.10.0", "1.9.0", Ordering::Greater)]
    #[case("1.0.0-beta", "1.0.0", Ordering::Less)]
    #[case("1.0.0", "1.0.0", Ordering::Equal)]
    #[case("garbage", "0.0.1", Ordering::Less)]
    #[case("a", "b", Ordering::Less)]
    fn compare_versions_uses_semver_precedence(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_versions(a, b), expected);
    }
}
