// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

//! Telling users of old Firefox builds that they need to update, and telling
//! users on dead platforms that updating won't help.

use tracing::{debug, trace, warn};

use crate::{
    NormalizedVersion, ProcessedCrash, ProcessingContext, RawCrash, RawDumps,
    SupportClassificationRule,
};

pub const FIREFOX_PRODUCT_NAME: &str = "Firefox";

pub const UPDATE_FIREFOX: &str = "update-firefox-latest-version";
pub const NO_LONGER_WORKS_WINDOWS_XP: &str = "firefox-no-longer-works-some-versions-windows-xp";
pub const NO_LONGER_WORKS_WINDOWS_2000: &str = "firefox-no-longer-works-windows-2000";
pub const NO_LONGER_WORKS_MAC_10_4_OR_PPC: &str = "firefox-no-longer-works-mac-os-10-4-or-powerpc";
pub const NO_LONGER_WORKS_MAC_10_5: &str = "firefox-no-longer-works-mac-os-x-10-5";

/// Classifies crashes from Firefox builds older than the configured latest version.
///
/// Windows XP (before SP3), Windows 2000, Mac OS X 10.4 and 10.5, and PowerPC Macs
/// can't run current Firefox, so those users get a platform-specific message.
/// Everyone else is told to update.
#[derive(Debug, Clone, Default)]
pub struct OutOfDateClassifier {
    /// Overrides the Firefox threshold from the [`ProcessingContext`].
    pub out_of_date_threshold: Option<NormalizedVersion>,
}

impl OutOfDateClassifier {
    pub fn new() -> OutOfDateClassifier {
        Default::default()
    }

    /// A classifier with a fixed threshold, ignoring the context's configuration.
    pub fn with_threshold(threshold: NormalizedVersion) -> OutOfDateClassifier {
        OutOfDateClassifier {
            out_of_date_threshold: Some(threshold),
        }
    }

    fn threshold(&self, context: &ProcessingContext) -> Option<NormalizedVersion> {
        self.out_of_date_threshold
            .clone()
            .or_else(|| context.out_of_date_threshold(FIREFOX_PRODUCT_NAME))
    }

    /// Whether this is a Firefox crash from a version older than the threshold.
    pub fn is_out_of_date(&self, raw_crash: &RawCrash, context: &ProcessingContext) -> bool {
        if raw_crash.product_name.as_deref() != Some(FIREFOX_PRODUCT_NAME) {
            return false;
        }
        let Some(threshold) = self.threshold(context) else {
            trace!("out_of_date: no threshold configured for {}", FIREFOX_PRODUCT_NAME);
            return false;
        };
        let Some(version) = raw_crash
            .version
            .as_deref()
            .and_then(NormalizedVersion::from_dotted)
        else {
            debug!(
                "out_of_date: unusable product version {:?}",
                raw_crash.version
            );
            return false;
        };
        trace!("out_of_date: version {} vs threshold {}", version, threshold);
        version < threshold
    }

    /// Pick the message for a Windows crash from its `os_ver`.
    pub fn windows_classification(os_ver: &str) -> &'static str {
        let version = NormalizedVersion::from_windows(os_ver);
        trace!("out_of_date: windows version {}", version);
        let components = version.components();
        if components.len() >= 2 && components[..2] == [5, 0] {
            NO_LONGER_WORKS_WINDOWS_2000
        } else if version < NormalizedVersion::new(&[5, 1, 3]) {
            NO_LONGER_WORKS_WINDOWS_XP
        } else {
            UPDATE_FIREFOX
        }
    }

    /// Pick the message for a Mac crash from its `os_ver` and `cpu_arch`.
    pub fn osx_classification(os_ver: &str, cpu_arch: Option<&str>) -> &'static str {
        let version = NormalizedVersion::from_mac(os_ver);
        trace!("out_of_date: mac version {} on {:?}", version, cpu_arch);
        if version <= NormalizedVersion::new(&[10, 4]) || cpu_arch == Some("ppc") {
            NO_LONGER_WORKS_MAC_10_4_OR_PPC
        } else if version <= NormalizedVersion::new(&[10, 5]) {
            NO_LONGER_WORKS_MAC_10_5
        } else {
            UPDATE_FIREFOX
        }
    }

    fn windows_action(&self, processed_crash: &mut ProcessedCrash) -> bool {
        let Some(os_ver) = processed_crash.system_info().and_then(|sys| sys.os_ver.clone()) else {
            warn!("out_of_date: windows crash without os_ver");
            return false;
        };
        let classification = Self::windows_classification(&os_ver);
        self.record_classification(processed_crash, classification, "")
    }

    fn osx_action(&self, processed_crash: &mut ProcessedCrash) -> bool {
        let Some(sys) = processed_crash.system_info() else {
            return false;
        };
        let Some(os_ver) = sys.os_ver.as_deref() else {
            warn!("out_of_date: mac crash without os_ver");
            return false;
        };
        let classification = Self::osx_classification(os_ver, sys.cpu_arch.as_deref());
        self.record_classification(processed_crash, classification, "")
    }
}

impl SupportClassificationRule for OutOfDateClassifier {
    fn name(&self) -> &'static str {
        "out_of_date"
    }

    fn version(&self) -> &'static str {
        "1.0"
    }

    fn predicate(
        &self,
        raw_crash: &RawCrash,
        _raw_dumps: &RawDumps,
        processed_crash: &ProcessedCrash,
        context: &ProcessingContext,
    ) -> bool {
        processed_crash.support_classification().is_none()
            && self.is_out_of_date(raw_crash, context)
    }

    fn action(
        &self,
        _raw_crash: &RawCrash,
        _raw_dumps: &RawDumps,
        processed_crash: &mut ProcessedCrash,
        _context: &ProcessingContext,
    ) -> bool {
        let Some(os) = processed_crash.system_info().and_then(|sys| sys.os.as_deref()) else {
            warn!("out_of_date: no system_info.os, can't pick a message");
            return false;
        };
        if os.contains("Windows") {
            self.windows_action(processed_crash)
        } else if os.contains("Mac OS X") {
            self.osx_action(processed_crash)
        } else {
            self.record_classification(processed_crash, UPDATE_FIREFOX, "")
        }
    }
}

#[cfg(test)]
mod out_of_date_unittest;
