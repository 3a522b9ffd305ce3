// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

use std::collections::BTreeMap;

use crate::NormalizedVersion;

/// An error in the classifier configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("out-of-date threshold {version:?} for {product} is not a dotted version number")]
    InvalidThreshold { product: String, version: String },
}

/// Read-only configuration shared by every rule invocation.
#[derive(Debug, Clone, Default)]
pub struct ProcessingContext {
    /// product name => latest known-good version
    out_of_date_versions: BTreeMap<String, String>,
}

impl ProcessingContext {
    pub fn new() -> ProcessingContext {
        Default::default()
    }

    /// Set the version below which crashes from `product` count as out of date.
    pub fn with_out_of_date_version(
        mut self,
        product: &str,
        version: &str,
    ) -> Result<ProcessingContext, ConfigError> {
        if NormalizedVersion::from_dotted(version).is_none() {
            return Err(ConfigError::InvalidThreshold {
                product: product.to_owned(),
                version: version.to_owned(),
            });
        }
        self.out_of_date_versions
            .insert(product.to_owned(), version.to_owned());
        Ok(self)
    }

    /// The configured threshold string for `product`, if any.
    pub fn out_of_date_version(&self, product: &str) -> Option<&str> {
        self.out_of_date_versions.get(product).map(String::as_str)
    }

    /// The configured threshold for `product`, parsed.
    pub fn out_of_date_threshold(&self, product: &str) -> Option<NormalizedVersion> {
        NormalizedVersion::from_dotted(self.out_of_date_version(product)?)
    }
}
