//! Translation
//!
//! Catalogs are flat JSON objects of `key -> text`, embedded at build time.
//! Lookup tries the current language, then English, then returns the key
//! itself, so a missing string never blanks the screen. `{{name}}`
//! placeholders are filled from the supplied parameters.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::error::TranslationError;
use crate::storage::{KeyValueStore, LANGUAGE_KEY};
use crate::types::Language;

/// Language used when nothing else is known, and for missing keys
pub const FALLBACK_LANGUAGE: Language = Language::English;

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("Invalid placeholder regex"));

type Catalog = HashMap<String, String>;

fn embedded_catalog(language: Language) -> Option<&'static str> {
    match language {
        Language::English => Some(include_str!("../assets/translations/en.json")),
        Language::Spanish => Some(include_str!("../assets/translations/es.json")),
        Language::French => Some(include_str!("../assets/translations/fr.json")),
        Language::Arabic => Some(include_str!("../assets/translations/ar.json")),
        Language::Chinese | Language::Urdu | Language::Polish => None,
    }
}

/// Parse the catalog for a language
pub fn load_catalog(language: Language) -> Result<HashMap<String, String>, TranslationError> {
    let raw = embedded_catalog(language).ok_or(TranslationError::MissingCatalog(language))?;
    serde_json::from_str(raw).map_err(|e| TranslationError::InvalidCatalog {
        lang: language,
        reason: e.to_string(),
    })
}

/// Languages that ship a catalog, in declaration order
pub fn available_languages() -> Vec<Language> {
    Language::iter()
        .filter(|language| embedded_catalog(*language).is_some())
        .collect()
}

/// Replace `{{name}}` with the matching parameter. Unknown names stay as written.
pub fn interpolate(text: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return text.to_string();
    }
    PLACEHOLDER_REGEX
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map_or_else(|| caps[0].to_string(), |(_, value)| (*value).to_string())
        })
        .into_owned()
}

/// Active language plus its catalog and the English fallback
#[derive(Debug, Clone)]
pub struct Translator {
    language: Language,
    current: Catalog,
    fallback: Catalog,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(FALLBACK_LANGUAGE)
    }
}

impl Translator {
    /// Translator for `language`, falling back to English when its catalog
    /// cannot be loaded
    pub fn new(language: Language) -> Self {
        let fallback = load_catalog(FALLBACK_LANGUAGE).unwrap_or_else(|e| {
            warn!("Fallback catalog unavailable: {}", e);
            Catalog::new()
        });
        let mut translator = Self {
            language: FALLBACK_LANGUAGE,
            current: Catalog::new(),
            fallback,
        };
        if let Err(e) = translator.set_language(language) {
            warn!("{}; using {}", e, FALLBACK_LANGUAGE);
        }
        translator
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_rtl(&self) -> bool {
        self.language.is_rtl()
    }

    /// Switch language. On failure the translator is left on English.
    pub fn set_language(&mut self, language: Language) -> Result<(), TranslationError> {
        if language == FALLBACK_LANGUAGE {
            self.language = language;
            self.current = Catalog::new();
            return Ok(());
        }

        match load_catalog(language) {
            Ok(catalog) => {
                info!("Language set to {}", language);
                self.language = language;
                self.current = catalog;
                Ok(())
            }
            Err(e) => {
                self.language = FALLBACK_LANGUAGE;
                self.current = Catalog::new();
                Err(e)
            }
        }
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.current
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map(String::as_str)
    }

    /// Translate `key` and fill its placeholders
    pub fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        interpolate(self.lookup(key).unwrap_or(key), params)
    }

    /// Translate `key`, or return `default` when no catalog has it
    pub fn t_or(&self, key: &str, default: &str) -> String {
        self.lookup(key).unwrap_or(default).to_string()
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }
}

/// Language for a locale string such as `es_ES.UTF-8` or `fr-CA`
pub fn locale_language(locale: &str) -> Option<Language> {
    let primary = locale
        .split(['_', '-', '.', '@'])
        .next()?
        .to_ascii_lowercase();
    primary.parse::<Language>().ok()
}

/// Locale from the environment, `LC_ALL` taking precedence over `LANG`
pub fn system_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
}

/// Saved language preference, if any
pub fn saved_language<S: KeyValueStore>(store: &S) -> Option<Language> {
    match store.get(LANGUAGE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw)
            .map_err(|e| debug!("Ignoring saved language '{}': {}", raw, e))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            warn!("Could not read language preference: {}", e);
            None
        }
    }
}

/// Persist the language preference. Returns `false` on failure.
pub fn save_language<S: KeyValueStore>(store: &mut S, language: Language) -> bool {
    let result = serde_json::to_string(&language)
        .map_err(|e| e.to_string())
        .and_then(|json| store.set(LANGUAGE_KEY, &json).map_err(|e| e.to_string()));
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not save language preference: {}", e);
            false
        }
    }
}

/// Pick the UI language: explicit parameter, then saved preference, then
/// system locale, then English. Unsupported values are skipped.
pub fn detect_language<S: KeyValueStore>(
    param: Option<&str>,
    store: &S,
    locale: Option<&str>,
) -> Language {
    let from_param = param.and_then(|p| p.trim().to_ascii_lowercase().parse::<Language>().ok());
    if let Some(language) = from_param {
        debug!("Language from parameter: {}", language);
        return language;
    }
    if let Some(language) = saved_language(store) {
        debug!("Language from saved preference: {}", language);
        return language;
    }
    if let Some(language) = locale.and_then(locale_language) {
        debug!("Language from system locale: {}", language);
        return language;
    }
    FALLBACK_LANGUAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_lookup_falls_back_to_english_then_key() {
        let translator = Translator::new(Language::Spanish);
        assert_eq!(translator.language(), Language::Spanish);
        assert_eq!(translator.t("navigation.next", &[]), "Siguiente");
        assert_eq!(translator.t("fields.addressLine1", &[]), "Address Line 1");
        assert_eq!(translator.t("no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn test_interpolation() {
        let translator = Translator::new(Language::English);
        assert_eq!(
            translator.t("banner.progress", &[("completed", "3"), ("total", "18")]),
            "3/18 fields completed"
        );
        assert_eq!(
            interpolate("{{a}} and {{b}}", &[("a", "x")]),
            "x and {{b}}"
        );
    }

    #[test]
    fn test_missing_catalog_falls_back() {
        let mut translator = Translator::new(Language::Polish);
        assert_eq!(translator.language(), Language::English);
        assert_eq!(translator.t("navigation.next", &[]), "Next");

        let err = translator.set_language(Language::Chinese).unwrap_err();
        assert_eq!(err, TranslationError::MissingCatalog(Language::Chinese));
        assert_eq!(translator.language(), Language::English);
    }

    #[test]
    fn test_embedded_catalogs_parse() {
        for language in Language::iter() {
            match load_catalog(language) {
                Ok(catalog) => assert!(!catalog.is_empty(), "{language} catalog is empty"),
                Err(TranslationError::MissingCatalog(_)) => {}
                Err(e) => panic!("{e}"),
            }
        }
    }

    #[test]
    fn test_available_languages() {
        assert_eq!(
            available_languages(),
            [Language::English, Language::Spanish, Language::French, Language::Arabic]
        );
    }

    #[test]
    fn test_rtl() {
        assert!(Translator::new(Language::Arabic).is_rtl());
        assert!(!Translator::new(Language::French).is_rtl());
    }

    #[test]
    fn test_locale_language() {
        assert_eq!(locale_language("es_ES.UTF-8"), Some(Language::Spanish));
        assert_eq!(locale_language("fr-CA"), Some(Language::French));
        assert_eq!(locale_language("PL"), Some(Language::Polish));
        assert_eq!(locale_language("de_DE"), None);
        assert_eq!(locale_language("C"), None);
    }

    #[test]
    fn test_detection_order() {
        let mut store = MemoryStore::new();
        assert_eq!(detect_language(None, &store, None), Language::English);
        assert_eq!(detect_language(None, &store, Some("ur_PK")), Language::Urdu);

        assert!(save_language(&mut store, Language::French));
        assert_eq!(saved_language(&store), Some(Language::French));
        assert_eq!(detect_language(None, &store, Some("ur_PK")), Language::French);

        assert_eq!(detect_language(Some("es"), &store, None), Language::Spanish);
        assert_eq!(detect_language(Some("xx"), &store, None), Language::French);
    }

    #[test]
    fn test_unavailable_store_does_not_block_detection() {
        let mut store = MemoryStore::unavailable();
        assert!(!save_language(&mut store, Language::Spanish));
        assert_eq!(detect_language(None, &store, Some("es")), Language::Spanish);
    }
}
