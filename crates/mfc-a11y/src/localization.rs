//! Localized Text
//!
//! Flat key → translations registry. Lookups fall back from the current
//! language to English, then to the caller's fallback, then to the key.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::A11yError;

/// Translations of one string; English is mandatory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ta: Option<String>,
}

impl LocalizedText {
    pub fn new(en: &str, zh: &str, ms: &str, ta: &str) -> Self {
        Self {
            en: en.to_string(),
            zh: Some(zh.to_string()),
            ms: Some(ms.to_string()),
            ta: Some(ta.to_string()),
        }
    }

    pub fn english(en: &str) -> Self {
        Self { en: en.to_string(), zh: None, ms: None, ta: None }
    }

    /// Translation for `language` only, without fallback
    pub fn get(&self, language: Language) -> Option<&str> {
        match language {
            Language::En => Some(self.en.as_str()),
            Language::Zh => self.zh.as_deref(),
            Language::Ms => self.ms.as_deref(),
            Language::Ta => self.ta.as_deref(),
        }
        .filter(|s| !s.is_empty())
    }
}

/// Localized string registry
#[derive(Debug, Clone, Default)]
pub struct TextRegistry {
    entries: HashMap<String, LocalizedText>,
}

impl TextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the clinic's shared strings
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults = [
            ("appointment_booking", LocalizedText::new("Appointment Booking", "预约挂号", "Tempahan Janji Temu", "சந்திப்பு முன்பதிவு")),
            ("find_doctor", LocalizedText::new("Find a Doctor", "查找医生", "Cari Doktor", "மருத்துவரைத் தேடுங்கள்")),
            ("clinic_hours", LocalizedText::new("Clinic Hours", "诊所营业时间", "Waktu Operasi Klinik", "மருத்துவமனை நேரம்")),
            ("skip_to_main", LocalizedText::new("Skip to main content", "跳至主要内容", "Langkau ke kandungan utama", "முதன்மை உள்ளடக்கத்திற்குச் செல்லவும்")),
            ("dialog_closed", LocalizedText::new("Dialog closed", "对话框已关闭", "Dialog ditutup", "உரையாடல் மூடப்பட்டது")),
            ("language_changed", LocalizedText::new("Language changed to {language}", "语言已切换为{language}", "Bahasa ditukar kepada {language}", "மொழி {language} ஆக மாற்றப்பட்டது")),
            ("landmark_focused", LocalizedText::new("{name} region", "{name}区域", "Kawasan {name}", "{name} பகுதி")),
            ("no_landmarks", LocalizedText::english("No landmarks on this page")),
            ("no_headings", LocalizedText::english("No headings on this page")),
        ];
        for (key, text) in defaults {
            registry.insert(key, text);
        }
        registry
    }

    pub fn insert(&mut self, key: &str, text: LocalizedText) -> Option<LocalizedText> {
        self.entries.insert(key.to_string(), text)
    }

    /// Merge a JSON object of `{ key: { en, zh?, ms?, ta? } }` records.
    /// Returns the number of records read.
    pub fn extend_from_json(&mut self, json: &str) -> Result<usize, A11yError> {
        let records: HashMap<String, LocalizedText> = serde_json::from_str(json)?;
        let count = records.len();
        self.entries.extend(records);
        tracing::debug!(count, "localized text records loaded");
        Ok(count)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current language → English → `fallback` → `key`
    pub fn lookup(&self, key: &str, language: Language, fallback: Option<&str>) -> String {
        let entry = self.entries.get(key);
        entry
            .and_then(|t| t.get(language))
            .or_else(|| entry.and_then(|t| t.get(Language::En)))
            .or(fallback)
            .unwrap_or(key)
            .to_string()
    }
}
