use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Active UI language. Catalog content lives with the view layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Locale {
    #[default]
    #[strum(to_string = "eng", serialize = "en", serialize = "english")]
    #[serde(rename = "eng")]
    English,
    #[strum(to_string = "vie", serialize = "vi", serialize = "vietnamese")]
    #[serde(rename = "vie")]
    Vietnamese,
}

impl Locale {
    pub const PRIMARY: Self = Self::English;
    pub const SECONDARY: Self = Self::Vietnamese;

    /// Persisted language code.
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "eng",
            Self::Vietnamese => "vie",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Vietnamese => "Tiếng Việt",
        }
    }

    /// The other language, for a two-way switcher.
    pub fn toggled(self) -> Self {
        match self {
            Self::English => Self::Vietnamese,
            Self::Vietnamese => Self::English,
        }
    }
}

/// Loads the translation catalog for a locale. Invoked before a locale
/// change is published.
pub trait CatalogLoader: Send + Sync {
    fn load(&self, locale: Locale);
}

impl<F> CatalogLoader for F
where
    F: Fn(Locale) + Send + Sync,
{
    fn load(&self, locale: Locale) {
        self(locale);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        assert_eq!(Locale::English.to_string(), "eng");
        assert_eq!("vie".parse::<Locale>().unwrap(), Locale::Vietnamese);
        assert_eq!("VI".parse::<Locale>().unwrap(), Locale::Vietnamese);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::PRIMARY);
    }

    #[test]
    fn serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Locale::Vietnamese).unwrap(), "\"vie\"");
    }
}
