// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

use tracing::debug;

use crate::{
    BitguardClassifier, OutOfDateClassifier, ProcessedCrash, ProcessingContext, RawCrash,
    RawDumps, RuleOutcome, SupportClassificationRule,
};

/// An ordered list of rules, run one after the other over each crash.
///
/// Every rule gets to look at every crash, but since the default predicate refuses
/// to overwrite an existing `support` classification, the first rule to classify
/// a crash wins.
#[derive(Default)]
pub struct ClassifierRuleSet {
    rules: Vec<Box<dyn SupportClassificationRule>>,
}

impl ClassifierRuleSet {
    pub fn new() -> ClassifierRuleSet {
        Default::default()
    }

    /// The standard support classifiers, in priority order.
    pub fn default_rules() -> ClassifierRuleSet {
        let mut rules = ClassifierRuleSet::new();
        rules.add(Box::new(BitguardClassifier));
        rules.add(Box::new(OutOfDateClassifier::new()));
        rules
    }

    pub fn add(&mut self, rule: Box<dyn SupportClassificationRule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule over the crash, returning each rule's name and outcome.
    pub fn classify(
        &self,
        raw_crash: &RawCrash,
        raw_dumps: &RawDumps,
        processed_crash: &mut ProcessedCrash,
        context: &ProcessingContext,
    ) -> Vec<(&'static str, RuleOutcome)> {
        self.rules
            .iter()
            .map(|rule| {
                let outcome = rule.act(raw_crash, raw_dumps, processed_crash, context);
                debug!("{} {}: {:?}", rule.name(), rule.version(), outcome);
                (rule.name(), outcome)
            })
            .collect()
    }
}
