use serde::Deserialize;

///
/// EscapeCharacter
///
/// Character used to escape LIKE wildcards inside bound pattern values.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct EscapeCharacter(char);

impl EscapeCharacter {
    pub const DEFAULT: Self = Self('\\');

    #[must_use]
    pub const fn of(escape: char) -> Self {
        Self(escape)
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        self.0
    }

    /// Escape `_`, `%` and the escape character itself.
    #[must_use]
    pub fn escape(self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for ch in value.chars() {
            if ch == '_' || ch == '%' || ch == self.0 {
                escaped.push(self.0);
            }
            escaped.push(ch);
        }

        escaped
    }
}

impl Default for EscapeCharacter {
    fn default() -> Self {
        Self::DEFAULT
    }
}
