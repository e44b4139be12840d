//! Conversation styles and the characters the bot can play.

use strum::{Display, EnumString};

/// Characters available in kyemode. Names match Discord user names exactly.
pub const CHARACTERS: [&str; 7] = [
    "arumu_sama",
    "kyenohito",
    "king_desu.",
    "pikushi_jan",
    "irreplaceablenihyakuyenlife",
    ".naikun",
    "kigensaradaba",
];

/// How the bot talks to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Style {
    /// Polite generic assistant
    #[default]
    #[strum(to_string = "normal", serialize = "n")]
    Normal,
    /// In-character emulation of the selected persona
    #[strum(to_string = "kyemode", serialize = "k")]
    Kyemode,
}

/// Look up a character by exact name.
#[must_use]
pub fn find_character(name: &str) -> Option<&'static str> {
    CHARACTERS.iter().copied().find(|character| *character == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_parses_long_and_short_names() {
        assert_eq!("normal".parse::<Style>(), Ok(Style::Normal));
        assert_eq!("n".parse::<Style>(), Ok(Style::Normal));
        assert_eq!("kyemode".parse::<Style>(), Ok(Style::Kyemode));
        assert_eq!("k".parse::<Style>(), Ok(Style::Kyemode));
    }

    #[test]
    fn style_parsing_ignores_case() {
        assert_eq!("NORMAL".parse::<Style>(), Ok(Style::Normal));
        assert_eq!("KyeMode".parse::<Style>(), Ok(Style::Kyemode));
        assert_eq!("K".parse::<Style>(), Ok(Style::Kyemode));
    }

    #[test]
    fn style_rejects_unknown_names() {
        assert!("polite".parse::<Style>().is_err());
        assert!("".parse::<Style>().is_err());
    }

    #[test]
    fn style_displays_long_name() {
        assert_eq!(Style::Normal.to_string(), "normal");
        assert_eq!(Style::Kyemode.to_string(), "kyemode");
    }

    #[test]
    fn character_lookup_is_exact() {
        assert_eq!(find_character(".naikun"), Some(".naikun"));
        assert_eq!(find_character("naikun"), None);
        assert_eq!(find_character("Kyenohito"), None);
    }
}
