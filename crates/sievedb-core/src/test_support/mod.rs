//! Deterministic cursor fixtures for unit tests and examples.

use crate::{
    db::cursor::{CursorError, SeekableCursor},
    value::Value,
};

///
/// DigitsCursor
///
/// Enumerates every length-`width` sequence of decimal digits in
/// lexicographic order; the row is the digit tuple and the key is the tuple
/// itself. `seek` computes the requested prefix successor arithmetically,
/// so positioning is exact and cheap, and the `seeks`/`steps` counters let
/// tests assert progress bounds instead of trusting them.
///

#[derive(Clone, Debug)]
pub struct DigitsCursor {
    width: usize,
    digits: Vec<u8>,
    positioned: bool,
    exhausted: bool,
    seeks: u64,
    steps: u64,
}

impl DigitsCursor {
    #[must_use]
    pub fn new(width: usize) -> Self {
        assert!(width > 0, "digit cursor needs at least one column");
        Self {
            width,
            digits: vec![0; width],
            positioned: false,
            exhausted: false,
            seeks: 0,
            steps: 0,
        }
    }

    /// Number of `seek` calls observed since construction.
    #[must_use]
    pub const fn seeks(&self) -> u64 {
        self.seeks
    }

    /// Number of `advance` calls observed since construction.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    fn place(&mut self, digits: Vec<u8>) {
        self.digits = digits;
        self.positioned = true;
        self.exhausted = false;
    }
}

impl SeekableCursor for DigitsCursor {
    type Row = Vec<u8>;

    fn advance(&mut self) -> Result<bool, CursorError> {
        self.steps += 1;
        if self.exhausted {
            return Ok(false);
        }
        if !self.positioned {
            self.place(vec![0; self.width]);
            return Ok(true);
        }

        for slot in self.digits.iter_mut().rev() {
            if *slot < 9 {
                *slot += 1;
                return Ok(true);
            }
            *slot = 0;
        }

        self.exhausted = true;
        Ok(false)
    }

    fn current(&self) -> Option<&Vec<u8>> {
        (self.positioned && !self.exhausted).then_some(&self.digits)
    }

    fn column_value(&self, ordinal: usize) -> Result<Value, CursorError> {
        if ordinal >= self.width {
            return Err(CursorError::ColumnOutOfRange {
                ordinal,
                arity: self.width,
            });
        }
        if !self.positioned || self.exhausted {
            return Err(CursorError::NotPositioned);
        }

        Ok(Value::Int(i64::from(self.digits[ordinal])))
    }

    fn seek(
        &mut self,
        prefix_len: usize,
        key: &[Value],
        following: bool,
    ) -> Result<bool, CursorError> {
        self.seeks += 1;
        if prefix_len > self.width {
            return Err(CursorError::SeekPrefixOutOfRange {
                len: prefix_len,
                arity: self.width,
            });
        }
        if prefix_len > key.len() {
            return Err(CursorError::Underlying {
                message: format!(
                    "seek key carries {} values for prefix length {prefix_len}",
                    key.len()
                ),
            });
        }

        if prefix_len == 0 {
            // Every row matches the empty prefix, so nothing is strictly
            // after it.
            if following {
                self.exhausted = true;
                return Ok(false);
            }
            self.place(vec![0; self.width]);
            return Ok(true);
        }

        let mut requested = Vec::with_capacity(prefix_len);
        for value in &key[..prefix_len] {
            let Some(component) = value.as_int() else {
                return Err(CursorError::Underlying {
                    message: format!("non-integer seek component: {value}"),
                });
            };
            requested.push(component);
        }

        let Some(prefix) = smallest_prefix_at_or_after(&requested, following) else {
            self.exhausted = true;
            return Ok(false);
        };

        let mut digits = prefix;
        digits.resize(self.width, 0);
        self.place(digits);
        Ok(true)
    }

    fn reset(&mut self) {
        self.positioned = false;
        self.exhausted = false;
    }
}

/// Fold a digit row into one integer, for compact ordering assertions.
#[must_use]
pub fn row_number(row: &[u8]) -> u64 {
    row.iter().fold(0, |acc, digit| acc * 10 + u64::from(*digit))
}

// Smallest in-domain digit prefix at-or-after (or strictly after) the
// requested components, which may lie outside 0..=9.
fn smallest_prefix_at_or_after(requested: &[i64], following: bool) -> Option<Vec<u8>> {
    let mut digits = vec![0u8; requested.len()];
    for (position, &component) in requested.iter().enumerate() {
        if component < 0 {
            // Zero here already exceeds the request; the tail stays zero.
            return Some(digits);
        }
        if component > 9 {
            // No digit reaches the request at this position; carry into the
            // equal prefix built so far.
            if !increment_in_place(&mut digits[..position]) {
                return None;
            }
            return Some(digits);
        }
        digits[position] = component as u8;
    }

    if following && !increment_in_place(&mut digits) {
        return None;
    }
    Some(digits)
}

fn increment_in_place(digits: &mut [u8]) -> bool {
    for digit in digits.iter_mut().rev() {
        if *digit < 9 {
            *digit += 1;
            return true;
        }
        *digit = 0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::{DigitsCursor, row_number};
    use crate::{db::cursor::SeekableCursor, value::Value};

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Int).collect()
    }

    #[test]
    fn enumerates_in_lexicographic_order() {
        let mut cursor = DigitsCursor::new(2);
        let mut seen = Vec::new();
        while cursor.advance().unwrap() {
            seen.push(row_number(cursor.current().unwrap()));
        }

        let expected: Vec<u64> = (0..100).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn seek_positions_at_the_prefix_lower_bound() {
        let mut cursor = DigitsCursor::new(3);
        assert!(cursor.seek(1, &ints(&[4]), false).unwrap());
        assert_eq!(cursor.current().unwrap(), &vec![4, 0, 0]);

        assert!(cursor.seek(2, &ints(&[4, 7]), true).unwrap());
        assert_eq!(cursor.current().unwrap(), &vec![4, 8, 0]);
    }

    #[test]
    fn seek_carries_past_exhausted_prefixes() {
        let mut cursor = DigitsCursor::new(2);
        assert!(cursor.seek(2, &ints(&[3, 9]), true).unwrap());
        assert_eq!(cursor.current().unwrap(), &vec![4, 0]);

        assert!(!cursor.seek(1, &ints(&[9]), true).unwrap());
    }

    #[test]
    fn seek_normalizes_out_of_domain_components() {
        let mut cursor = DigitsCursor::new(2);
        assert!(cursor.seek(1, &ints(&[-3]), false).unwrap());
        assert_eq!(cursor.current().unwrap(), &vec![0, 0]);

        assert!(cursor.seek(2, &ints(&[3, 12]), false).unwrap());
        assert_eq!(cursor.current().unwrap(), &vec![4, 0]);

        assert!(!cursor.seek(1, &ints(&[10]), false).unwrap());
    }

    #[test]
    fn empty_prefix_seek_follows_the_contract() {
        let mut cursor = DigitsCursor::new(2);
        assert!(cursor.seek(0, &[], false).unwrap());
        assert_eq!(cursor.current().unwrap(), &vec![0, 0]);

        assert!(!cursor.seek(0, &[], true).unwrap());
    }
}
