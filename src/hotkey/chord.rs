//! Key chord definitions and parsing.
//!
//! Chords are written as `+`-separated tokens, modifiers first by
//! convention: `Alt+Shift+P`, `Ctrl+Win+F9`. Keys are stored as Windows
//! virtual-key codes.

use super::HotkeyError;
use std::fmt;
use std::str::FromStr;

/// Modifier keys held for a chord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    pub win: bool,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        !self.control && !self.alt && !self.shift && !self.win
    }
}

/// A global key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub modifiers: Modifiers,

    /// Windows virtual-key code
    pub key: u32,
}

const VK_SPACE: u32 = 0x20;
const VK_F1: u32 = 0x70;

impl Chord {
    pub const fn new(modifiers: Modifiers, key: u32) -> Self {
        Self { modifiers, key }
    }

    /// Alt+Shift+`letter`.
    pub const fn alt_shift(letter: char) -> Self {
        Self::new(
            Modifiers {
                control: false,
                alt: true,
                shift: true,
                win: false,
            },
            letter.to_ascii_uppercase() as u32,
        )
    }

    fn parse_key(token: &str) -> Option<u32> {
        let upper = token.to_ascii_uppercase();
        let mut chars = upper.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return c.is_ascii_alphanumeric().then_some(c as u32);
        }
        if upper == "SPACE" {
            return Some(VK_SPACE);
        }
        let n: u32 = upper.strip_prefix('F')?.parse().ok()?;
        (1..=24).contains(&n).then(|| VK_F1 + n - 1)
    }

    fn key_name(key: u32) -> String {
        match key {
            VK_SPACE => "Space".to_string(),
            k if (VK_F1..VK_F1 + 24).contains(&k) => format!("F{}", k - VK_F1 + 1),
            k => char::from_u32(k)
                .filter(char::is_ascii_alphanumeric)
                .map(String::from)
                .unwrap_or_else(|| format!("0x{k:02X}")),
        }
    }
}

impl FromStr for Chord {
    type Err = HotkeyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| HotkeyError::InvalidChord {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let mut modifiers = Modifiers::default();
        let mut key = None;

        for token in input.split('+').map(str::trim) {
            let flag = match token.to_ascii_lowercase().as_str() {
                "" => return Err(invalid("empty key name")),
                "ctrl" | "control" => &mut modifiers.control,
                "alt" => &mut modifiers.alt,
                "shift" => &mut modifiers.shift,
                "win" | "super" | "meta" => &mut modifiers.win,
                _ => {
                    if key.is_some() {
                        return Err(invalid("more than one non-modifier key"));
                    }
                    key = Some(Self::parse_key(token).ok_or_else(|| invalid("unknown key"))?);
                    continue;
                }
            };
            if *flag {
                return Err(invalid("modifier repeated"));
            }
            *flag = true;
        }

        let key = key.ok_or_else(|| invalid("missing key"))?;
        if modifiers.is_empty() {
            return Err(invalid("at least one modifier is required"));
        }
        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (held, name) in [
            (m.control, "Ctrl"),
            (m.alt, "Alt"),
            (m.shift, "Shift"),
            (m.win, "Win"),
        ] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&Self::key_name(self.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_chords() {
        assert_eq!("Alt+Shift+P".parse::<Chord>().unwrap(), Chord::alt_shift('P'));
        assert_eq!(" alt + shift + o ".parse::<Chord>().unwrap(), Chord::alt_shift('o'));
    }

    #[test]
    fn parses_function_keys_and_aliases() {
        let chord: Chord = "Control+Win+F9".parse().unwrap();
        assert!(chord.modifiers.control && chord.modifiers.win);
        assert!(!chord.modifiers.alt && !chord.modifiers.shift);
        assert_eq!(chord.key, 0x78);

        let chord: Chord = "ctrl+space".parse().unwrap();
        assert_eq!(chord.key, 0x20);
        assert_eq!("shift+7".parse::<Chord>().unwrap().key, '7' as u32);
    }

    #[test]
    fn rejects_malformed_chords() {
        for input in [
            "", "P", "Alt+", "Alt+Shift", "Alt+P+O", "Alt+Alt+P", "Alt+F25", "Alt+Tab", "Alt++P",
        ] {
            assert!(
                matches!(input.parse::<Chord>(), Err(HotkeyError::InvalidChord { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn display_is_canonical() {
        let chord: Chord = "shift+alt+p".parse().unwrap();
        assert_eq!(chord.to_string(), "Alt+Shift+P");
        let chord: Chord = "win+ctrl+f12".parse().unwrap();
        assert_eq!(chord.to_string(), "Ctrl+Win+F12");
        assert_eq!(chord.to_string().parse::<Chord>().unwrap(), chord);
    }
}
