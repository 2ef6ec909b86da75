//! Localized card strings.
//!
//! Each locale is a Fluent bundle built from the `.ftl` files under `i18n/`,
//! embedded at compile time. Lookups fall back to `en`, then to the message
//! id itself; the render path never fails on a lookup.

use fluent::{FluentBundle, FluentResource};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

pub const FALLBACK_LOCALE: &str = "en";

pub const CARD_TITLE: &str = "card-title";
pub const NO_ACTIVITY: &str = "card-no-activity";

/// Messages every locale must define to be selectable.
const MESSAGE_IDS: [&str; 2] = [CARD_TITLE, NO_ACTIVITY];

const SOURCES: [(&str, &str); 6] = [
    ("en", include_str!("../i18n/en/statcard.ftl")),
    ("cn", include_str!("../i18n/cn/statcard.ftl")),
    ("de", include_str!("../i18n/de/statcard.ftl")),
    ("es", include_str!("../i18n/es/statcard.ftl")),
    ("fr", include_str!("../i18n/fr/statcard.ftl")),
    ("pt-br", include_str!("../i18n/pt-br/statcard.ftl")),
];

type Bundle = FluentBundle<FluentResource>;

/// Immutable message bundles injected into the renderer, keyed by locale tag.
pub struct Locales {
    bundles: HashMap<String, Bundle>,
}

impl Default for Locales {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Locales {
    /// The locales shipped with the binary.
    pub fn builtin() -> Self {
        let mut locales = Self {
            bundles: HashMap::new(),
        };
        for (tag, source) in SOURCES {
            locales.add(tag, source);
        }
        locales
    }

    /// Parses `source` into a bundle for `tag`. Malformed entries are logged
    /// and skipped; the rest of the resource is kept.
    pub fn add(&mut self, tag: &str, source: &str) {
        let langid: LanguageIdentifier = match tag.parse() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Skipping locale {:?}: {}", tag, e);
                return;
            }
        };

        let resource = FluentResource::try_new(source.to_string()).unwrap_or_else(|(res, errors)| {
            tracing::warn!("Locale {:?} has {} malformed entries", tag, errors.len());
            res
        });

        let mut bundle = FluentBundle::new(vec![langid]);
        bundle.set_use_isolating(false);
        if let Err(errors) = bundle.add_resource(resource) {
            tracing::warn!("Locale {:?} has duplicate messages: {:?}", tag, errors);
        }
        self.bundles.insert(tag.to_string(), bundle);
    }

    /// Returns true if `locale` defines every card message.
    pub fn is_available(&self, locale: &str) -> bool {
        self.bundles
            .get(locale)
            .is_some_and(|bundle| MESSAGE_IDS.iter().all(|id| bundle.has_message(id)))
    }

    /// Looks up `key` for `locale`, falling back to English, then to the key itself.
    pub fn get(&self, key: &str, locale: &str) -> String {
        [locale, FALLBACK_LOCALE]
            .iter()
            .filter_map(|tag| self.bundles.get(*tag))
            .find_map(|bundle| format_message(bundle, key))
            .unwrap_or_else(|| {
                tracing::warn!("Missing message {:?}", key);
                key.to_string()
            })
    }
}

fn format_message(bundle: &Bundle, key: &str) -> Option<String> {
    let pattern = bundle.get_message(key)?.value()?;
    let mut errors = Vec::new();
    let text = bundle.format_pattern(pattern, None, &mut errors);
    if !errors.is_empty() {
        tracing::warn!("Formatting {:?} failed: {:?}", key, errors);
    }
    Some(text.into_owned())
}
