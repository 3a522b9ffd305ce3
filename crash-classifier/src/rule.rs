// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

//! The contract every support classification rule follows.

use tracing::debug;

use crate::{ClassificationRecord, ProcessedCrash, ProcessingContext, RawCrash, RawDumps};

/// What happened when a rule was run against a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The predicate didn't hold, the action was never run.
    NotApplicable,
    /// The predicate held but the action found nothing to classify.
    Declined,
    /// A classification was written.
    Classified,
}

/// A rule that may write a `support` classification into a processed crash.
///
/// Rules are split into a side-effect free [`predicate`][Self::predicate] and an
/// [`action`][Self::action] that does the actual classifying. Neither may panic on
/// malformed or missing data; they report "not applicable" instead.
pub trait SupportClassificationRule: Send + Sync {
    /// A short name for logging.
    fn name(&self) -> &'static str;

    /// The revision of this rule's logic, stored in every record it writes.
    fn version(&self) -> &'static str;

    /// Whether this rule should run on this crash.
    ///
    /// By default a rule only applies if nothing has claimed the `support`
    /// category yet.
    fn predicate(
        &self,
        _raw_crash: &RawCrash,
        _raw_dumps: &RawDumps,
        processed_crash: &ProcessedCrash,
        _context: &ProcessingContext,
    ) -> bool {
        processed_crash.support_classification().is_none()
    }

    /// Classify the crash. Returns true if a classification was written.
    ///
    /// When this returns false `processed_crash` is left untouched.
    fn action(
        &self,
        raw_crash: &RawCrash,
        raw_dumps: &RawDumps,
        processed_crash: &mut ProcessedCrash,
        context: &ProcessingContext,
    ) -> bool;

    /// Run [`predicate`][Self::predicate] and, if it holds, [`action`][Self::action].
    fn act(
        &self,
        raw_crash: &RawCrash,
        raw_dumps: &RawDumps,
        processed_crash: &mut ProcessedCrash,
        context: &ProcessingContext,
    ) -> RuleOutcome {
        if !self.predicate(raw_crash, raw_dumps, processed_crash, context) {
            return RuleOutcome::NotApplicable;
        }
        if self.action(raw_crash, raw_dumps, processed_crash, context) {
            RuleOutcome::Classified
        } else {
            RuleOutcome::Declined
        }
    }

    /// Overwrite `classifications.support` with a record from this rule.
    ///
    /// Creates the `classifications` section if this is the first write.
    fn record_classification(
        &self,
        processed_crash: &mut ProcessedCrash,
        classification: &str,
        classification_data: &str,
    ) -> bool {
        debug!(
            "{} {}: classified as {}",
            self.name(),
            self.version(),
            classification
        );
        processed_crash
            .classifications
            .get_or_insert_with(Default::default)
            .support = Some(ClassificationRecord {
            classification: classification.to_owned(),
            classification_data: classification_data.to_owned(),
            classification_version: self.version().to_owned(),
        });
        true
    }
}
