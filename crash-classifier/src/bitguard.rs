// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

use tracing::trace;

use crate::{ProcessedCrash, ProcessingContext, RawCrash, RawDumps, SupportClassificationRule};

/// Flags crashes in processes that have the Bitguard malware loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitguardClassifier;

impl BitguardClassifier {
    pub const MODULE_FILENAME: &'static str = "bitguard.dll";
    pub const CLASSIFICATION: &'static str = "bitguard";
}

impl SupportClassificationRule for BitguardClassifier {
    fn name(&self) -> &'static str {
        "bitguard"
    }

    fn version(&self) -> &'static str {
        "1.0"
    }

    fn action(
        &self,
        _raw_crash: &RawCrash,
        _raw_dumps: &RawDumps,
        processed_crash: &mut ProcessedCrash,
        _context: &ProcessingContext,
    ) -> bool {
        let found = processed_crash.modules().is_some_and(|modules| {
            modules
                .iter()
                .any(|module| module.filename.as_deref() == Some(Self::MODULE_FILENAME))
        });
        if !found {
            trace!("bitguard: {} not loaded", Self::MODULE_FILENAME);
            return false;
        }
        self.record_classification(processed_crash, Self::CLASSIFICATION, "")
    }
}
