//! Validated primitive types shared across the hpms workspace.
//!
//! These types push input validation to the boundary: once a value exists it
//! is known to be well-formed, so the registry core never has to re-check
//! required fields.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
}

/// Errors that can occur when creating an [`Age`].
#[derive(Debug, thiserror::Error)]
pub enum AgeError {
    /// The input was not a number at all
    #[error("age must be a number")]
    NotANumber,
    /// The number fell outside the accepted range
    #[error("age must be between {min} and {max}, got {value}", min = Age::MIN, max = Age::MAX)]
    OutOfRange {
        /// The rejected value.
        value: u16,
    },
}

/// A string type that guarantees non-empty content.
///
/// Wraps a `String` and ensures it contains at least one non-whitespace
/// character. The input is trimmed of leading and trailing whitespace during
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the
    /// trimmed result is empty, `TextError::Empty` is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value and returns the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NonEmptyText::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A patient age validated to lie in a plausible human range.
///
/// An age of zero or above 150 is rejected at construction, so an `Age`
/// held anywhere in the registry is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Age(u8);

impl Age {
    /// Lowest accepted age in years.
    pub const MIN: u16 = 1;
    /// Highest accepted age in years.
    pub const MAX: u16 = 150;

    /// Creates a new `Age`, rejecting values outside `MIN..=MAX`.
    pub fn new(years: u16) -> Result<Self, AgeError> {
        if !(Self::MIN..=Self::MAX).contains(&years) {
            return Err(AgeError::OutOfRange { value: years });
        }
        Ok(Self(years as u8))
    }

    /// Returns the age in years.
    pub fn years(&self) -> u16 {
        u16::from(self.0)
    }
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Age {
    type Err = AgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let years: u16 = s.trim().parse().map_err(|_| AgeError::NotANumber)?;
        Age::new(years)
    }
}

impl serde::Serialize for Age {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.years())
    }
}

impl<'de> serde::Deserialize<'de> for Age {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let years = u16::deserialize(deserializer)?;
        Age::new(years).map_err(serde::de::Error::custom)
    }
}
