//! Message catalog for user-facing text.
//!
//! Every response message is looked up by `(key, Locale)`. The English and
//! Arabic Fluent bundles are compiled into the binary.

use anyhow::Result;
use axum::http::{header::ACCEPT_LANGUAGE, HeaderMap};
use fluent::FluentResource;
use fluent_bundle::{concurrent::FluentBundle, FluentArgs};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Response language negotiated from `Accept-Language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    English,
    Arabic,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Arabic => "ar",
        }
    }

    /// Arabic if any listed language tag has the primary subtag `ar`,
    /// English otherwise (including when the header is absent).
    pub fn from_accept_language(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::English;
        };

        let wants_arabic = header
            .split(',')
            .filter_map(|item| item.split(';').next())
            .filter_map(|tag| tag.trim().split(['-', '_']).next())
            .any(|primary| primary.eq_ignore_ascii_case("ar"));

        if wants_arabic {
            Self::Arabic
        } else {
            Self::English
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_accept_language(headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()))
    }
}

pub struct I18nManager {
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
    default_locale: Locale,
}

impl I18nManager {
    pub fn new(default_locale: Locale) -> Self {
        info!("Initializing message catalog (default: {})", default_locale.code());

        Self { bundles: HashMap::new(), default_locale }
    }

    pub fn load_language(&mut self, locale: Locale, content: &str) -> Result<()> {
        debug!("Loading language: {}", locale.code());

        let resource = FluentResource::try_new(content.to_string())
            .map_err(|(_, errors)| anyhow::anyhow!("Failed to parse Fluent resource: {:?}", errors))?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale
            .code()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid language code: {}", e))?]);
        bundle.set_use_isolating(false);

        bundle
            .add_resource(resource)
            .map_err(|e| anyhow::anyhow!("Failed to add resource to bundle: {:?}", e))?;

        self.bundles.insert(locale, bundle);
        Ok(())
    }

    pub fn get_text(&self, locale: Locale, key: &str, args: Option<&FluentArgs>) -> String {
        let bundle = self.bundles.get(&locale).or_else(|| self.bundles.get(&self.default_locale));

        let Some(bundle) = bundle else {
            warn!("Language '{}' not loaded, fallback to key", locale.code());
            return key.to_string();
        };

        let Some(pattern) = bundle.get_message(key).and_then(|message| message.value()) else {
            warn!("Message '{}' not found in language '{}'", key, locale.code());
            return key.to_string();
        };

        let mut errors = vec![];
        let result = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!("Errors formatting message '{}': {:?}", key, errors);
        }

        result.to_string()
    }

    pub fn is_language_supported(&self, locale: Locale) -> bool {
        self.bundles.contains_key(&locale)
    }
}

pub fn init_default_languages() -> Result<I18nManager> {
    let mut manager = I18nManager::new(Locale::English);
    manager.load_language(Locale::English, include_str!("bundled/en.ftl"))?;
    manager.load_language(Locale::Arabic, include_str!("bundled/ar.ftl"))?;
    Ok(manager)
}

static CATALOG: Lazy<I18nManager> = Lazy::new(|| {
    init_default_languages().unwrap_or_else(|e| {
        error!("Failed to load bundled messages, serving message keys: {}", e);
        I18nManager::new(Locale::English)
    })
});

/// Localized text for `key`.
pub fn message(key: &str, locale: Locale) -> String {
    CATALOG.get_text(locale, key, None)
}
