//! Language and Cultural Adaptation
//!
//! The four supported interface languages, their formatting conventions,
//! speech-voice selection and the document attributes they drive.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use mfc_dom::{Document, DomError, NodeId};
use serde::{Deserialize, Serialize};

use crate::host::Voice;
use crate::A11yError;

/// Region preferred when choosing voices and locale tags
pub const PREFERRED_REGION: &str = "SG";

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
    Ms,
    Ta,
}

/// Text direction (`dir` attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

impl Language {
    pub const ALL: [Language; 4] = [Self::En, Self::Zh, Self::Ms, Self::Ta];

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
            Self::Ms => "ms",
            Self::Ta => "ta",
        }
    }

    /// Parse one of the supported codes (`en`, `zh`, `ms`, `ta`)
    pub fn parse(code: &str) -> Result<Self, A11yError> {
        Self::ALL
            .into_iter()
            .find(|lang| code.trim().eq_ignore_ascii_case(lang.code()))
            .ok_or_else(|| A11yError::UnsupportedLanguage(code.to_string()))
    }

    /// Name of the language in itself
    pub fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Zh => "中文",
            Self::Ms => "Bahasa Melayu",
            Self::Ta => "தமிழ்",
        }
    }

    pub fn direction(&self) -> TextDirection {
        TextDirection::Ltr
    }

    /// BCP 47 tag in the preferred region, e.g. `zh-SG`
    pub fn locale_tag(&self) -> String {
        format!("{}-{}", self.code(), PREFERRED_REGION)
    }

    pub fn cultural_format(&self) -> CulturalFormat {
        let base = CulturalFormat {
            date_pattern: "%d/%m/%Y",
            time_24h: false,
            currency_symbol: "S$",
            currency_position: CurrencyPosition::Before,
            decimal_separator: '.',
            group_separator: ',',
        };
        match self {
            Self::En => base,
            Self::Zh => CulturalFormat { date_pattern: "%Y年%m月%d日", time_24h: true, ..base },
            Self::Ms => CulturalFormat { time_24h: true, ..base },
            Self::Ta => CulturalFormat { date_pattern: "%d-%m-%Y", ..base },
        }
    }
}

impl FromStr for Language {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPosition {
    Before,
    After,
}

/// Locale formatting conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CulturalFormat {
    /// chrono format string
    pub date_pattern: &'static str,
    pub time_24h: bool,
    pub currency_symbol: &'static str,
    pub currency_position: CurrencyPosition,
    pub decimal_separator: char,
    pub group_separator: char,
}

impl CulturalFormat {
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(self.date_pattern).to_string()
    }

    pub fn format_time(&self, time: NaiveTime) -> String {
        let pattern = if self.time_24h { "%H:%M" } else { "%-I:%M %p" };
        time.format(pattern).to_string()
    }

    pub fn format_number(&self, value: f64, decimals: usize) -> String {
        let formatted = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match formatted.split_once('.') {
            Some((int_part, frac)) => (int_part, Some(frac)),
            None => (formatted.as_str(), None),
        };

        let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
        if value < 0.0 && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            out.push('-');
        }
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(ch);
        }
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }

    pub fn format_currency(&self, amount: f64) -> String {
        let number = self.format_number(amount, 2);
        let (sign, digits) = match number.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", number.as_str()),
        };
        match self.currency_position {
            CurrencyPosition::Before => format!("{sign}{}{digits}", self.currency_symbol),
            CurrencyPosition::After => format!("{sign}{digits} {}", self.currency_symbol),
        }
    }

    /// Format a raw `data-value` according to its `data-format` kind
    pub fn format_value(&self, kind: &str, raw: &str) -> Option<String> {
        let raw = raw.trim();
        match kind {
            "date" => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(|d| self.format_date(d)),
            "time" => NaiveTime::parse_from_str(raw, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
                .ok()
                .map(|t| self.format_time(t)),
            "currency" => parse_finite(raw).map(|v| self.format_currency(v)),
            "number" => {
                let decimals = decimal_places(raw)?;
                parse_finite(raw).map(|v| self.format_number(v, decimals))
            }
            _ => None,
        }
    }

    /// Rewrite the text of every element carrying `data-format` and
    /// `data-value`. Returns the number of elements formatted.
    pub fn apply(&self, doc: &mut Document) -> usize {
        let targets: Vec<(NodeId, String)> = doc
            .tree
            .descendants(doc.tree.root())
            .filter_map(|id| {
                let kind = doc.tree.attribute(id, "data-format")?;
                let raw = doc.tree.attribute(id, "data-value")?;
                let text = self.format_value(kind, raw);
                if text.is_none() {
                    tracing::debug!(node = %id, kind, raw, "value not formattable");
                }
                text.map(|t| (id, t))
            })
            .collect();

        targets
            .into_iter()
            .filter(|(id, text)| doc.tree.set_text_content(*id, text).is_ok())
            .count()
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Fraction digits of a plain decimal literal; `None` for exponent
/// notation or anything else that is not `[+-]digits[.digits]`.
fn decimal_places(raw: &str) -> Option<usize> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    (!(int.is_empty() && frac.is_empty()) && all_digits(int) && all_digits(frac)).then_some(frac.len())
}

fn normalized_tag(voice: &Voice) -> String {
    voice.lang.to_ascii_lowercase().replace('_', "-")
}

/// Voice for `language`: a voice tagged for the preferred region if any,
/// else the first voice with a matching language prefix.
pub fn preferred_voice(voices: &[Voice], language: Language) -> Option<Voice> {
    let code = language.code();
    let region_suffix = format!("-{}", PREFERRED_REGION.to_ascii_lowercase());

    let matching: Vec<&Voice> = voices
        .iter()
        .filter(|v| {
            let tag = normalized_tag(v);
            tag == code || tag.starts_with(&format!("{code}-"))
        })
        .collect();

    matching
        .iter()
        .find(|v| normalized_tag(v).ends_with(&region_suffix))
        .or(matching.first())
        .map(|v| (*v).clone())
}

/// Current interface language and the voice chosen for it
#[derive(Debug, Clone, Default)]
pub struct LanguageState {
    current: Language,
    voice: Option<Voice>,
}

impl LanguageState {
    pub fn new(language: Language) -> Self {
        Self { current: language, voice: None }
    }

    pub fn current(&self) -> Language {
        self.current
    }

    pub fn voice(&self) -> Option<&Voice> {
        self.voice.as_ref()
    }

    /// Switch language: root `lang`/`dir`, voice, cultural formatting.
    /// Returns the number of elements reformatted.
    pub fn apply(&mut self, doc: &mut Document, language: Language, voices: &[Voice]) -> Result<usize, DomError> {
        self.current = language;

        let root = doc.document_element();
        if doc.tree.element(root).is_some() {
            doc.tree.set_attribute(root, "lang", language.code())?;
            doc.tree.set_attribute(root, "dir", language.direction().as_str())?;
        }

        self.voice = preferred_voice(voices, language);
        if self.voice.is_none() && !voices.is_empty() {
            tracing::debug!(language = %language, "no speech voice for language");
        }

        Ok(language.cultural_format().apply(doc))
    }
}
