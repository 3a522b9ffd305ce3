// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

use super::*;
use crate::{JsonDump, SystemInfo};

struct TestFixture {
    pub raw_crash: RawCrash,
    pub raw_dumps: RawDumps,
    pub processed_crash: ProcessedCrash,
    pub context: ProcessingContext,
}

impl TestFixture {
    pub fn new() -> TestFixture {
        TestFixture {
            raw_crash: RawCrash {
                product_name: Some("Firefox".to_owned()),
                version: Some("16".to_owned()),
                ..Default::default()
            },
            raw_dumps: RawDumps::new(),
            processed_crash: ProcessedCrash {
                json_dump: Some(JsonDump {
                    system_info: Some(SystemInfo::default()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            context: ProcessingContext::new()
                .with_out_of_date_version("Firefox", "17")
                .unwrap(),
        }
    }

    pub fn system(mut self, os: &str, os_ver: &str, cpu_arch: &str) -> TestFixture {
        self.processed_crash.json_dump.as_mut().unwrap().system_info = Some(SystemInfo {
            os: Some(os.to_owned()),
            os_ver: Some(os_ver.to_owned()),
            cpu_arch: Some(cpu_arch.to_owned()),
            ..Default::default()
        });
        self
    }

    pub fn predicate(&self, classifier: &OutOfDateClassifier) -> bool {
        classifier.predicate(
            &self.raw_crash,
            &self.raw_dumps,
            &self.processed_crash,
            &self.context,
        )
    }

    pub fn action(&mut self, classifier: &OutOfDateClassifier) -> bool {
        classifier.action(
            &self.raw_crash,
            &self.raw_dumps,
            &mut self.processed_crash,
            &self.context,
        )
    }

    /// Run the classifier's action and return the classification it wrote.
    pub fn classify(mut self) -> String {
        let classifier = OutOfDateClassifier::with_threshold(NormalizedVersion::new(&[17]));
        assert!(self.action(&classifier));
        let support = self.processed_crash.support_classification().unwrap();
        assert_eq!(support.classification_version, "1.0");
        assert_eq!(support.classification_data, "");
        support.classification.clone()
    }
}

#[test]
fn test_predicate() {
    let mut f = TestFixture::new();
    let classifier = OutOfDateClassifier::new();
    assert!(f.predicate(&classifier));

    f.raw_crash.version = Some("19".to_owned());
    assert!(!f.predicate(&classifier));

    f.raw_crash.version = Some("17".to_owned());
    assert!(!f.predicate(&classifier));

    f.raw_crash.version = Some("12".to_owned());
    f.raw_crash.product_name = Some("NotFireFox".to_owned());
    assert!(!f.predicate(&classifier));
}

#[test]
fn test_predicate_multi_component_versions() {
    let mut f = TestFixture::new();
    f.context = ProcessingContext::new()
        .with_out_of_date_version("Firefox", "17.0.1")
        .unwrap();
    let classifier = OutOfDateClassifier::new();

    f.raw_crash.version = Some("17.0".to_owned());
    assert!(f.predicate(&classifier));

    // Numeric, not lexicographic.
    f.raw_crash.version = Some("9.0".to_owned());
    assert!(f.predicate(&classifier));

    f.raw_crash.version = Some("17.0.1".to_owned());
    assert!(!f.predicate(&classifier));

    f.raw_crash.version = Some("100.0b3".to_owned());
    assert!(!f.predicate(&classifier));
}

#[test]
fn test_predicate_missing_data() {
    let mut f = TestFixture::new();
    let classifier = OutOfDateClassifier::new();

    f.raw_crash.version = None;
    assert!(!f.predicate(&classifier));

    f.raw_crash.version = Some("nightly".to_owned());
    assert!(!f.predicate(&classifier));

    f.raw_crash.version = Some("16".to_owned());
    f.raw_crash.product_name = None;
    assert!(!f.predicate(&classifier));

    // No threshold configured at all.
    f.raw_crash.product_name = Some("Firefox".to_owned());
    f.context = ProcessingContext::new();
    assert!(!f.predicate(&classifier));
}

#[test]
fn test_predicate_explicit_threshold_wins() {
    let mut f = TestFixture::new();
    f.raw_crash.version = Some("18".to_owned());
    assert!(!f.predicate(&OutOfDateClassifier::new()));
    assert!(f.predicate(&OutOfDateClassifier::with_threshold(NormalizedVersion::new(&[20]))));
}

#[test]
fn test_predicate_already_classified() {
    let mut f = TestFixture::new().system("Windows NT", "6.1.7601 Service Pack 1", "x86");
    let classifier = OutOfDateClassifier::new();
    assert!(f.predicate(&classifier));
    assert!(f.action(&classifier));
    assert!(!f.predicate(&classifier));
}

#[test]
fn test_windows_action() {
    let classify = |os_ver| {
        TestFixture::new()
            .system("Windows NT", os_ver, "x86")
            .classify()
    };
    assert_eq!(
        classify("5.1.2600 Service Pack 2"),
        "firefox-no-longer-works-some-versions-windows-xp"
    );
    assert_eq!(
        classify("5.0 Service Pack 23"),
        "firefox-no-longer-works-windows-2000"
    );
    assert_eq!(
        classify("5.1.2600 Service Pack 3"),
        "update-firefox-latest-version"
    );
}

#[test]
fn test_windows_action_more_versions() {
    let classify = |os_ver| {
        TestFixture::new()
            .system("Windows NT", os_ver, "x86")
            .classify()
    };
    // XP with no service pack at all.
    assert_eq!(
        classify("5.1.2600"),
        "firefox-no-longer-works-some-versions-windows-xp"
    );
    assert_eq!(classify("5.0"), "firefox-no-longer-works-windows-2000");
    assert_eq!(
        classify("4.0.1381"),
        "firefox-no-longer-works-some-versions-windows-xp"
    );
    assert_eq!(
        classify("6.1.7601 Service Pack 1"),
        "update-firefox-latest-version"
    );
    assert_eq!(classify("10.0.19045"), "update-firefox-latest-version");
    // Garbage sorts as new.
    assert_eq!(classify("5.x"), "update-firefox-latest-version");
}

#[test]
fn test_osx_action() {
    let classify = |os_ver, cpu_arch| {
        TestFixture::new()
            .system("Mac OS X", os_ver, cpu_arch)
            .classify()
    };
    assert_eq!(
        classify("10.1", "ppc"),
        "firefox-no-longer-works-mac-os-10-4-or-powerpc"
    );
    assert_eq!(
        classify("10.5", "ppc"),
        "firefox-no-longer-works-mac-os-10-4-or-powerpc"
    );
    assert_eq!(
        classify("10.5", "x86"),
        "firefox-no-longer-works-mac-os-x-10-5"
    );
    assert_eq!(classify("10.99", "x86"), "update-firefox-latest-version");
}

#[test]
fn test_osx_action_more_versions() {
    let classify = |os_ver, cpu_arch| {
        TestFixture::new()
            .system("Mac OS X", os_ver, cpu_arch)
            .classify()
    };
    assert_eq!(
        classify("10.4.11 8S2167", "x86"),
        "firefox-no-longer-works-mac-os-10-4-or-powerpc"
    );
    assert_eq!(
        classify("10.5.8 9L31a", "x86"),
        "firefox-no-longer-works-mac-os-x-10-5"
    );
    assert_eq!(
        classify("10.6.8 10K549", "ppc"),
        "firefox-no-longer-works-mac-os-10-4-or-powerpc"
    );
    assert_eq!(classify("10.6.8 10K549", "amd64"), "update-firefox-latest-version");
    assert_eq!(classify("10", "x86"), "firefox-no-longer-works-mac-os-10-4-or-powerpc");
    assert_eq!(classify("10.dwight", "x86"), "update-firefox-latest-version");
}

#[test]
fn test_osx_action_no_cpu_arch() {
    let mut f = TestFixture::new().system("Mac OS X", "10.5", "");
    f.processed_crash
        .json_dump
        .as_mut()
        .unwrap()
        .system_info
        .as_mut()
        .unwrap()
        .cpu_arch = None;
    assert_eq!(f.classify(), "firefox-no-longer-works-mac-os-x-10-5");
}

#[test]
fn test_action() {
    let mut f = TestFixture::new().system("Mac OS X", "10.1", "ppc");
    let classifier = OutOfDateClassifier::with_threshold(NormalizedVersion::new(&[17]));
    assert!(f.action(&classifier));
    assert_eq!(
        f.processed_crash.support_classification().unwrap().classification,
        "firefox-no-longer-works-mac-os-10-4-or-powerpc"
    );

    let mut f = f.system("Windows NT", "5.1.2600 Service Pack 3", "x86");
    assert!(f.action(&classifier));
    assert_eq!(
        f.processed_crash.support_classification().unwrap().classification,
        "update-firefox-latest-version"
    );
}

#[test]
fn test_action_other_platforms() {
    assert_eq!(
        TestFixture::new()
            .system("Linux", "0.0.0 Linux 3.2.0-4-686-pae", "x86")
            .classify(),
        "update-firefox-latest-version"
    );
    assert_eq!(
        TestFixture::new().system("", "", "").classify(),
        "update-firefox-latest-version"
    );
}

#[test]
fn test_action_missing_system_info() {
    let classifier = OutOfDateClassifier::new();

    let mut f = TestFixture::new();
    f.processed_crash = ProcessedCrash::default();
    assert!(!f.action(&classifier));
    assert!(f.processed_crash.classifications.is_none());

    // system_info without an os
    let mut f = TestFixture::new();
    assert!(!f.action(&classifier));
    assert!(f.processed_crash.classifications.is_none());

    for os in ["Windows NT", "Mac OS X"] {
        let mut f = TestFixture::new().system(os, "", "x86");
        f.processed_crash
            .json_dump
            .as_mut()
            .unwrap()
            .system_info
            .as_mut()
            .unwrap()
            .os_ver = None;
        assert!(!f.action(&classifier));
        assert!(f.processed_crash.classifications.is_none());
    }
}

#[test]
fn test_classifications_helpers() {
    assert_eq!(
        OutOfDateClassifier::windows_classification("5.1.2600 Service Pack 2"),
        NO_LONGER_WORKS_WINDOWS_XP
    );
    assert_eq!(
        OutOfDateClassifier::osx_classification("10.5", Some("x86")),
        NO_LONGER_WORKS_MAC_10_5
    );
    assert_eq!(
        OutOfDateClassifier::osx_classification("10.5", None),
        NO_LONGER_WORKS_MAC_10_5
    );
}
