// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

//! Normalizing free-form version strings into something we can compare.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Stands in for a version component that isn't a number.
///
/// Garbage in a version string sorts as "arbitrarily new", so it never causes
/// a report to be classified as out of date.
pub const MAX_COMPONENT: u64 = u64::MAX;

/// A version as a sequence of numeric components, most significant first.
///
/// Ordering is the usual tuple ordering: components are compared pairwise, and if
/// one version is a prefix of the other the longer one is greater, so
/// `(5, 1) < (5, 1, 3)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedVersion(Vec<u64>);

impl NormalizedVersion {
    pub fn new(components: &[u64]) -> NormalizedVersion {
        NormalizedVersion(components.to_vec())
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }

    /// Parse a Windows `os_ver`, e.g. "5.1.2600 Service Pack 3" => (5, 1, 3).
    ///
    /// Only major and minor are kept from the dotted part. The service pack, if
    /// the string names one, becomes the third component.
    pub fn from_windows(version: &str) -> NormalizedVersion {
        let (numeric, rest) = split_first_word(version);
        let mut components = dotted_components(numeric);
        if components.len() >= 2 {
            components.truncate(2);
            if let Some(service_pack) = service_pack(rest) {
                components.push(service_pack);
            }
        }
        NormalizedVersion(components)
    }

    /// Parse a Mac OS `os_ver`, e.g. "10.4.8 8L2127" => (10, 4).
    pub fn from_mac(version: &str) -> NormalizedVersion {
        let (numeric, _) = split_first_word(version);
        let mut components = dotted_components(numeric);
        components.truncate(2);
        NormalizedVersion(components)
    }

    /// Parse an application version like "16.0.2" or "17.0b3".
    ///
    /// Takes the leading run of numeric dotted components: "17.0b3" => (17, 0),
    /// "16.0a1.5" => (16, 0). Returns `None` if the string doesn't start with a digit.
    pub fn from_dotted(version: &str) -> Option<NormalizedVersion> {
        let mut components = vec![];
        for part in version.trim().split('.') {
            let digits_len = part
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(part.len());
            if digits_len == 0 {
                break;
            }
            components.push(part[..digits_len].parse().unwrap_or(MAX_COMPONENT));
            if digits_len != part.len() {
                break;
            }
        }
        if components.is_empty() {
            None
        } else {
            Some(NormalizedVersion(components))
        }
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if *component == MAX_COMPONENT {
                f.write_str("max")?;
            } else {
                write!(f, "{}", component)?;
            }
        }
        Ok(())
    }
}

fn split_first_word(version: &str) -> (&str, &str) {
    let version = version.trim_start();
    version
        .split_once(char::is_whitespace)
        .unwrap_or((version, ""))
}

fn dotted_components(numeric: &str) -> Vec<u64> {
    numeric
        .split('.')
        .map(|part| part.parse().unwrap_or(MAX_COMPONENT))
        .collect()
}

fn service_pack(text: &str) -> Option<u64> {
    static SERVICE_PACK: OnceLock<Regex> = OnceLock::new();
    let re = SERVICE_PACK.get_or_init(|| {
        Regex::new(r"Service Pack (\d+)").expect("service pack regex is valid")
    });
    let number = re.captures(text)?.get(1)?.as_str();
    Some(number.parse().unwrap_or(MAX_COMPONENT))
}
