//! Numerus rules: map a quantity to the index of a translated form.
//!
//! Qt stores plural translations positionally: a `<message numerus="yes">`
//! carries one `<numerusform>` per grammatical form of the target language,
//! in the order the language's rule enumerates them. A rule is therefore a
//! function `quantity -> form index` together with the number of forms it
//! expects.
//!
//! [`PluralRule`] is the capability the catalog applies; it never computes
//! plural arithmetic itself. [`PluralFamily`] provides the built-in rules,
//! one per locale family, selected by locale tag.
//!
//! # Invariants
//!
//! - `form_index(n) < form_count()` for every built-in family and every `n`.
//! - Negative quantities are classified by their absolute value.

use std::fmt;

/// Capability mapping a quantity to a numerus form index.
///
/// Implement this to inject a rule for a language the built-in families do
/// not cover.
pub trait PluralRule: fmt::Debug + Send + Sync {
    /// Number of forms a complete translation carries.
    fn form_count(&self) -> usize;

    /// Index of the form to use for `quantity`.
    fn form_index(&self, quantity: i64) -> usize;
}

/// Built-in numerus rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralFamily {
    /// One form for every quantity (Japanese, Chinese, Korean, ...).
    Single,
    /// `1` is singular, everything else plural (English, German, ...).
    English,
    /// `0` and `1` are singular (French, Brazilian Portuguese).
    French,
    /// Russian, Ukrainian, Belarusian, Croatian, Serbian, Bosnian:
    /// one / few / many.
    EastSlavic,
    /// Polish: one / few / many.
    Polish,
    /// Czech, Slovak: one / few (2..=4) / other.
    Czech,
    /// Arabic: zero / one / two / few / many / other.
    Arabic,
    /// Lithuanian: one / few / many.
    Lithuanian,
    /// Latvian: one / other / zero.
    Latvian,
    /// Slovenian: one / two / few / other, by `n % 100`.
    Slovenian,
    /// Romanian: one / few / other.
    Romanian,
    /// Irish: one / two / other.
    Irish,
    /// Welsh: one / two / eight-and-eleven / other.
    Welsh,
}

impl PluralFamily {
    /// Every built-in family.
    pub const ALL: [PluralFamily; 13] = [
        Self::Single,
        Self::English,
        Self::French,
        Self::EastSlavic,
        Self::Polish,
        Self::Czech,
        Self::Arabic,
        Self::Lithuanian,
        Self::Latvian,
        Self::Slovenian,
        Self::Romanian,
        Self::Irish,
        Self::Welsh,
    ];

    /// Select the family for a locale tag such as `"en_US"`, `"pt-BR"` or
    /// `"ru"`.
    ///
    /// Matching is case-insensitive on the language subtag. Returns `None`
    /// for tags no built-in family covers.
    #[must_use]
    pub fn for_locale(tag: &str) -> Option<Self> {
        let normalized = tag.trim().to_ascii_lowercase().replace('_', "-");
        let base = normalized
            .split(['.', '@'])
            .next()
            .unwrap_or_default();
        if base == "pt-br" {
            return Some(Self::French);
        }
        let lang = base.split('-').next().unwrap_or_default();

        let family = match lang {
            "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "lo" | "my" | "km" => Self::Single,
            "en" | "de" | "nl" | "sv" | "da" | "nb" | "nn" | "no" | "fi" | "it" | "es" | "pt"
            | "el" | "hu" | "et" | "eo" | "bg" | "ca" | "eu" | "gl" | "he" | "tr" | "af"
            | "sq" | "fo" | "fy" | "is" | "la" | "lb" | "mn" | "ne" | "sw" | "ur"
            | "hi" | "bn" | "ta" | "te" | "ml" | "mr" | "kn" | "gu" | "pa" | "fa" | "az"
            | "ka" | "kk" | "ky" | "uz" => Self::English,
            "fr" | "hy" | "ak" | "am" | "ln" | "oc" | "ti" | "tl" | "wa" => Self::French,
            "ru" | "uk" | "be" | "hr" | "sr" | "bs" => Self::EastSlavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            "ar" => Self::Arabic,
            "lt" => Self::Lithuanian,
            "lv" => Self::Latvian,
            "sl" => Self::Slovenian,
            "ro" | "mo" => Self::Romanian,
            "ga" => Self::Irish,
            "cy" => Self::Welsh,
            _ => return None,
        };
        Some(family)
    }

    /// Short family name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::English => "english",
            Self::French => "french",
            Self::EastSlavic => "east-slavic",
            Self::Polish => "polish",
            Self::Czech => "czech",
            Self::Arabic => "arabic",
            Self::Lithuanian => "lithuanian",
            Self::Latvian => "latvian",
            Self::Slovenian => "slovenian",
            Self::Romanian => "romanian",
            Self::Irish => "irish",
            Self::Welsh => "welsh",
        }
    }
}

impl PluralRule for PluralFamily {
    fn form_count(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::English | Self::French => 2,
            Self::EastSlavic
            | Self::Polish
            | Self::Czech
            | Self::Lithuanian
            | Self::Latvian
            | Self::Romanian
            | Self::Irish => 3,
            Self::Slovenian | Self::Welsh => 4,
            Self::Arabic => 6,
        }
    }

    fn form_index(&self, quantity: i64) -> usize {
        let n = quantity.unsigned_abs();
        let n10 = n % 10;
        let n100 = n % 100;
        match self {
            Self::Single => 0,
            Self::English => usize::from(n != 1),
            Self::French => usize::from(n > 1),
            Self::EastSlavic => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Arabic => match n {
                0 => 0,
                1 => 1,
                2 => 2,
                _ if (3..=10).contains(&n100) => 3,
                _ if n100 >= 11 => 4,
                _ => 5,
            },
            Self::Lithuanian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && !(10..=19).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            Self::Latvian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            Self::Slovenian => match n100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=19).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            Self::Irish => match n {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            Self::Welsh => match n {
                1 => 0,
                2 => 1,
                8 | 11 => 2,
                _ => 3,
            },
        }
    }
}

impl fmt::Display for PluralFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
