//! Static crisis-help resources.
//!
//! The bundles are small and change rarely, so they are compiled in
//! rather than loaded from configuration.

use crate::i18n::Locale;
use crate::types::{HelpResponse, HotlineInfo};

/// A hotline entry as compiled into the binary.
struct Hotline {
    name: &'static str,
    phone: &'static str,
    website: &'static str,
    note: &'static str,
}

/// One locale's help bundle.
struct HelpBundle {
    language: Locale,
    crisis_disclaimer: &'static str,
    hotlines: &'static [Hotline],
}

const ZH_CN_BUNDLE: HelpBundle = HelpBundle {
    language: Locale::ZhCn,
    crisis_disclaimer: "如果你觉得自己非常不安全或有立即的危险，请优先联系当地的紧急电话或可信任的大人：",
    hotlines: &[Hotline {
        name: "北京心理危机干预中心热线",
        phone: "800-810-1117 / 010-8295-1332",
        website: "http://www.crisis.org.cn/",
        note: "24 小时心理危机干预热线",
    }],
};

const EN_BUNDLE: HelpBundle = HelpBundle {
    language: Locale::En,
    crisis_disclaimer: "If you feel unsafe or in crisis, consider reaching out to:",
    hotlines: &[Hotline {
        name: "Samaritans of Singapore (SOS)",
        phone: "+65 1767",
        website: "https://www.sos.org.sg/",
        note: "24/7 crisis hotline",
    }],
};

/// Serves the compiled-in help bundles.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelpService;

impl HelpService {
    pub fn new() -> Self {
        Self
    }

    /// Returns the help bundle for `locale`. Chinese gets the mainland
    /// bundle; every other locale gets the English one.
    pub fn get_help(&self, locale: Locale) -> HelpResponse {
        let bundle = match locale {
            Locale::ZhCn => &ZH_CN_BUNDLE,
            Locale::En => &EN_BUNDLE,
        };

        HelpResponse {
            language: bundle.language,
            crisis_disclaimer: bundle.crisis_disclaimer.to_string(),
            hotlines: bundle
                .hotlines
                .iter()
                .map(|h| HotlineInfo {
                    name: h.name.to_string(),
                    phone: h.phone.to_string(),
                    website: h.website.to_string(),
                    note: h.note.to_string(),
                })
                .collect(),
        }
    }
}
