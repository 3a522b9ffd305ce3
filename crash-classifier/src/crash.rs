// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

//! The crash records that rules read and annotate.
//!
//! These mirror the JSON the crash pipeline passes around. Only the fields the rules
//! care about are named; everything else is kept in an `extra` map so that
//! deserializing and re-serializing a record doesn't lose anything.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The crash report as it was submitted by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCrash {
    /// The name of the crashing product, e.g. "Firefox".
    #[serde(rename = "ProductName", default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// The version of the crashing application (not of the OS), e.g. "16.0.2".
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dump name => path of the uploaded dump file.
///
/// Rules receive these but none of them look inside.
pub type RawDumps = BTreeMap<String, PathBuf>;

/// A crash record that's partway through processing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedCrash {
    /// The stackwalker's analysis of the main dump.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_dump: Option<JsonDump>,
    /// Verdicts written by classification rules.
    ///
    /// `None` until the first rule writes something.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifications: Option<Classifications>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessedCrash {
    /// The `system_info` section of the dump analysis, if there is one.
    pub fn system_info(&self) -> Option<&SystemInfo> {
        self.json_dump.as_ref()?.system_info.as_ref()
    }

    /// The modules loaded in the crashing process, if known.
    pub fn modules(&self) -> Option<&[Module]> {
        self.json_dump.as_ref()?.modules.as_deref()
    }

    /// The current `support` classification, if any rule has written one.
    ///
    /// A record without a `classification` label doesn't count.
    pub fn support_classification(&self) -> Option<&ClassificationRecord> {
        self.classifications
            .as_ref()?
            .support
            .as_ref()
            .filter(|record| !record.classification.is_empty())
    }
}

/// The stackwalker output embedded in a processed crash.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonDump {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_info: Option<SystemInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<Module>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Information about the system that produced the dump.
///
/// All of these are free-form strings straight out of the minidump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Linux | Windows NT | Mac OS X
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// A string identifying the version of the operating system
    ///
    /// This may look like "5.1.2600 Service Pack 2" or "10.4.8 8L2127", if present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_ver: Option<String>,
    /// x86 | amd64 | arm | ppc | sparc
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_arch: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An executable or shared library loaded in the crashing process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Module {
    pub fn new(filename: &str) -> Module {
        Module {
            filename: Some(filename.to_owned()),
            extra: Map::new(),
        }
    }
}

/// Classification category name => verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<ClassificationRecord>,
    /// Categories written by rules outside this crate.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single verdict written by a rule.
///
/// Records written elsewhere in the pipeline may have missing or null fields;
/// those read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// The message identifier, e.g. "update-firefox-latest-version".
    #[serde(default, deserialize_with = "null_as_empty")]
    pub classification: String,
    /// Rule-specific extra information (often empty).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub classification_data: String,
    /// The version of the rule that produced this record.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub classification_version: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// An error encountered while loading a crash record.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("couldn't read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't parse crash record JSON")]
    Json(#[from] serde_json::Error),
}

impl LoadError {
    /// Returns just the name of the error, as a more human-friendly version of
    /// an error-code for error logging.
    pub fn name(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => "IoError",
            LoadError::Json(_) => "JsonError",
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    from_reader(BufReader::new(file))
}

fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load a raw crash from a JSON file.
pub fn load_raw_crash(path: &Path) -> Result<RawCrash, LoadError> {
    read_json(path)
}

/// Load a processed crash from a JSON file.
pub fn load_processed_crash(path: &Path) -> Result<ProcessedCrash, LoadError> {
    read_json(path)
}

/// Parse a processed crash from any reader (e.g. stdin).
pub fn read_processed_crash<R: Read>(reader: R) -> Result<ProcessedCrash, LoadError> {
    from_reader(reader)
}
