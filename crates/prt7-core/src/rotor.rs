//! Rotating substitution cipher.
//!
//! The rotor is the alphabet laid out as a ring with a movable head. Rotation
//! only moves the head index, so it is O(1) regardless of the amount; the ring
//! itself is never reordered.
//!
//! ```text
//!            head
//!             v
//! ring:  A B [C] D E ... Z   (after rotate(2))
//! map('A') = ring[head + 0] = 'C'
//! map('B') = ring[head + 1] = 'D'
//! ```

use std::fmt;

/// The fixed rotor alphabet, in ring order.
pub const ALPHABET: [u8; 26] = *b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const RING_SIZE: usize = ALPHABET.len();

/// How [`Rotor::map`] turns an input letter into an output letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mapping {
    /// Letter at the input's alphabet position counted forward from the head.
    ///
    /// With the head on `C`, `A` decodes to `C`, `B` to `D` and `Z` to `B`.
    #[default]
    Shift,

    /// Legacy lookup: find the input letter by walking forward from the head,
    /// then walk the same number of steps from the head again.
    ///
    /// Both walks land on the input letter, so every letter decodes to
    /// itself whatever the rotation. Kept for replaying output of decoders
    /// that shipped this lookup.
    Literal,
}

/// Cipher state: the alphabet ring and its current head.
///
/// # Invariants
///
/// - The ring always holds each of the 26 letters exactly once, in alphabet
///   order. Only `head` changes.
/// - `head < 26`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    ring: [u8; RING_SIZE],
    head: usize,
    mapping: Mapping,
}

impl Default for Rotor {
    fn default() -> Self {
        Self::new(Mapping::default())
    }
}

impl Rotor {
    /// Create a rotor with its head on `A`.
    pub fn new(mapping: Mapping) -> Self {
        Self { ring: ALPHABET, head: 0, mapping }
    }

    /// Ring position currently acting as the head, in `0..26`.
    pub fn head_index(&self) -> usize {
        self.head
    }

    /// Letter under the head.
    pub fn head(&self) -> u8 {
        self.ring[self.head]
    }

    /// Mapping mode this rotor was created with.
    pub fn mapping(&self) -> Mapping {
        self.mapping
    }

    /// Move the head `amount` positions forward (backward if negative).
    ///
    /// Any amount is valid; it is reduced with floored modulo so the head
    /// always stays in `0..26`.
    pub fn rotate(&mut self, amount: i64) {
        let step = amount.rem_euclid(RING_SIZE as i64) as usize;
        self.head = (self.head + step) % RING_SIZE;

        debug_assert!(self.head < RING_SIZE);
    }

    /// Decode one byte under the current rotation.
    ///
    /// Bytes other than `A`..=`Z` (including space) pass through unchanged.
    /// The result depends only on the input and the current head.
    pub fn map(&self, input: u8) -> u8 {
        if input == b' ' || !input.is_ascii_uppercase() {
            return input;
        }

        match self.mapping {
            Mapping::Shift => {
                let position = usize::from(input - b'A');
                self.ring[(self.head + position) % RING_SIZE]
            },
            Mapping::Literal => {
                let steps = (0..RING_SIZE).find(|&k| self.ring[(self.head + k) % RING_SIZE] == input);
                match steps {
                    Some(k) => self.ring[(self.head + k) % RING_SIZE],
                    None => input,
                }
            },
        }
    }

    /// Debug view: the ring starting at the head, annotated with the head
    /// letter.
    pub fn render(&self) -> String {
        let letters: Vec<String> = (0..RING_SIZE)
            .map(|k| char::from(self.ring[(self.head + k) % RING_SIZE]).to_string())
            .collect();
        format!("Rotor: [{}] (head at '{}')", letters.join(" "), char::from(self.head()))
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_a() {
        let rotor = Rotor::default();
        assert_eq!(rotor.head_index(), 0);
        assert_eq!(rotor.head(), b'A');
        assert_eq!(rotor.mapping(), Mapping::Shift);
    }

    #[test]
    fn rotate_wraps_both_directions() {
        let mut rotor = Rotor::default();
        rotor.rotate(-1);
        assert_eq!(rotor.head(), b'Z');
        rotor.rotate(27);
        assert_eq!(rotor.head(), b'A');
        rotor.rotate(-53);
        assert_eq!(rotor.head(), b'Z');
        rotor.rotate(i64::MIN);
        assert_eq!(rotor.head_index(), (25 + i64::MIN.rem_euclid(26) as usize) % 26);
    }

    #[test]
    fn rotate_by_multiple_of_ring_is_noop() {
        let mut rotor = Rotor::default();
        rotor.rotate(5);
        rotor.rotate(26 * 1000);
        rotor.rotate(-26);
        rotor.rotate(0);
        assert_eq!(rotor.head(), b'F');
    }

    #[test]
    fn shift_mapping() {
        let mut rotor = Rotor::new(Mapping::Shift);
        assert_eq!(rotor.map(b'A'), b'A');
        rotor.rotate(2);
        assert_eq!(rotor.map(b'A'), b'C');
        assert_eq!(rotor.map(b'B'), b'D');
        assert_eq!(rotor.map(b'Y'), b'A');
        assert_eq!(rotor.map(b'Z'), b'B');
    }

    #[test]
    fn literal_mapping_is_identity() {
        let mut rotor = Rotor::new(Mapping::Literal);
        for amount in [0, 2, -2, 13, 25] {
            rotor.rotate(amount);
            for letter in ALPHABET {
                assert_eq!(rotor.map(letter), letter);
            }
        }
    }

    #[test]
    fn non_letters_pass_through() {
        let mut rotor = Rotor::default();
        rotor.rotate(7);
        for byte in [b' ', b'a', b'z', b'0', b'@', b'[', b'\n', 0x00, 0xFF] {
            assert_eq!(rotor.map(byte), byte);
        }
    }

    #[test]
    fn render_starts_at_head() {
        let mut rotor = Rotor::default();
        insta::assert_snapshot!(
            rotor.render(),
            @"Rotor: [A B C D E F G H I J K L M N O P Q R S T U V W X Y Z] (head at 'A')"
        );

        rotor.rotate(3);
        insta::assert_snapshot!(
            rotor.to_string(),
            @"Rotor: [D E F G H I J K L M N O P Q R S T U V W X Y Z A B C] (head at 'D')"
        );
    }
}
