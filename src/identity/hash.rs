use std::fmt::{self, Display};

/// Signed 32-bit string digest used to seed name and color selection.
///
/// Not a cryptographic hash. Arithmetic wraps at 32 bits after every step so
/// the result matches other implementations bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub i32);

impl Digest {
    /// `acc = acc * 31 + unit` over the UTF-16 code units of `input`.
    pub fn of(input: &str) -> Self {
        let acc = input.encode_utf16().fold(0i32, |acc, unit| {
            (acc << 5).wrapping_sub(acc).wrapping_add(i32::from(unit))
        });
        Digest(acc)
    }

    /// Absolute value, widened so `i32::MIN` maps to `2^31` instead of overflowing.
    pub fn magnitude(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Index into a table of `len` entries.
    pub(crate) fn pick(self, len: usize) -> usize {
        self.magnitude() as usize % len
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
