//! Fixed-width numeric encodings for values that cross the native boundary.

/// Result of reading a raw numeric value that came across the boundary.
///
/// A value outside the known table is kept verbatim in `Unrecognized` so that
/// additions on the native side stay visible to the reader instead of being
/// coerced into some default symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoded<T, R> {
    /// The raw value maps to a known symbol.
    Known(T),
    /// The raw value is not part of the known table.
    Unrecognized(R),
}

impl<T, R> Decoded<T, R> {
    /// Returns the symbol, or `None` if the raw value was not recognized.
    #[must_use]
    pub fn known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unrecognized(_) => None,
        }
    }

    /// Whether the raw value fell outside the known table.
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized(_))
    }

    /// Converts into a `Result`, with the raw value on the error side.
    ///
    /// # Errors
    /// Returns the raw value if it was not recognized.
    pub fn into_result(self) -> Result<T, R> {
        match self {
            Self::Known(value) => Ok(value),
            Self::Unrecognized(raw) => Err(raw),
        }
    }
}

/// A closed enumeration with a fixed numeric encoding on the wire.
///
/// Implementors list every variant in [`WireEnum::VARIANTS`] and spell out
/// the numeric value of each one in [`WireEnum::encode`]. Decoding is derived
/// from that single table, so the two directions can never drift apart.
pub trait WireEnum: Sized + Copy + 'static {
    /// The fixed-width integer used on the wire.
    type Raw: Copy + PartialEq;

    /// Every variant of the enumeration.
    const VARIANTS: &'static [Self];

    /// Returns the literal wire value of this variant.
    fn encode(self) -> Self::Raw;

    /// Maps a wire value back to its variant.
    fn decode(raw: Self::Raw) -> Decoded<Self, Self::Raw> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.encode() == raw)
            .map_or(Decoded::Unrecognized(raw), Decoded::Known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoded_accessors() {
        let known: Decoded<&str, u8> = Decoded::Known("a");
        assert_eq!(known.known(), Some("a"));
        assert!(!known.is_unrecognized());
        assert_eq!(known.into_result(), Ok("a"));

        let unknown: Decoded<&str, u8> = Decoded::Unrecognized(9);
        assert_eq!(unknown.known(), None);
        assert!(unknown.is_unrecognized());
        assert_eq!(unknown.into_result(), Err(9));
    }
}
