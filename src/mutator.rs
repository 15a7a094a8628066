//! Applying edits to an immutable reference sequence.
//!
//! The `Mutator` keeps the original sequence untouched, records the applied
//! edits, and materializes the mutated sequence by walking the edit list.
//! All edit positions are 1-based and given in the coordinate system of the
//! original sequence; the shift map translates them to positions in the
//! mutated sequence.

pub use crate::mutator::error::Error;
use crate::sequences::{is_dna, revcomp};
use crate::Sequence;

mod error {
    /// Error type for sequence mutation.
    #[derive(thiserror::Error, Debug, Clone)]
    pub enum Error {
        #[error("position range {0}_{1} falls outside the reference sequence of length {2}")]
        OutOfRange(i32, i32, usize),
        #[error("sequence argument is not valid DNA: {0}")]
        InvalidSequence(String),
    }
}

/// Configuration for the mutator.
#[derive(Debug, Clone)]
pub struct Config {
    /// Sequences longer than this render as `(length)` in messages.
    pub max_vis_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_vis_size: 25 }
    }
}

/// One applied edit, in original-sequence coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Substitute { position: i32, nt: u8 },
    Delete { first: i32, last: i32 },
    Duplicate { first: i32, last: i32 },
    Invert { first: i32, last: i32 },
    Insert { before: i32, seq: Sequence },
    Delins { first: i32, last: i32, seq: Sequence },
}

impl Edit {
    /// Ordering key for materialization: interbase edits sort between the
    /// flanking bases.
    fn sort_key(&self) -> i64 {
        match self {
            Edit::Substitute { position, .. } => 2 * *position as i64,
            Edit::Delete { first, .. }
            | Edit::Invert { first, .. }
            | Edit::Delins { first, .. } => 2 * *first as i64,
            Edit::Insert { before, .. } => 2 * *before as i64 + 1,
            Edit::Duplicate { last, .. } => 2 * *last as i64 + 1,
        }
    }
}

/// Applies edits on an original sequence to produce a mutated one.
#[derive(Debug, Clone)]
pub struct Mutator {
    config: Config,
    /// The original sequence; never modified.
    pub orig: Sequence,
    mutated: Sequence,
    edits: Vec<Edit>,
    /// Shift map entries `(first affected original position, delta)`.
    shifts: Vec<(i32, i32)>,
}

impl Mutator {
    pub fn new(orig: Sequence, config: Config) -> Self {
        let mutated = orig.clone();
        Self {
            config,
            orig,
            mutated,
            edits: Vec::new(),
            shifts: Vec::new(),
        }
    }

    /// The mutated sequence as it stands after the applied edits.
    pub fn mutated(&self) -> &Sequence {
        &self.mutated
    }

    fn check_range(&self, first: i32, last: i32) -> Result<(), Error> {
        if first < 1 || last < first || last as usize > self.orig.len() {
            return Err(Error::OutOfRange(first, last, self.orig.len()));
        }
        Ok(())
    }

    fn check_dna(seq: &[u8]) -> Result<(), Error> {
        if !is_dna(seq) {
            return Err(Error::InvalidSequence(
                String::from_utf8_lossy(seq).to_string(),
            ));
        }
        Ok(())
    }

    fn apply(&mut self, edit: Edit, shift: Option<(i32, i32)>) {
        self.edits.push(edit);
        if let Some(entry) = shift {
            self.shifts.push(entry);
        }
        self.materialize();
    }

    /// Replace the base at `position` with `nt`.
    pub fn substitute(&mut self, position: i32, nt: u8) -> Result<(), Error> {
        self.check_range(position, position)?;
        Self::check_dna(&[nt])?;
        self.apply(Edit::Substitute { position, nt }, None);
        Ok(())
    }

    /// Delete the closed range `[first, last]`.
    pub fn delete(&mut self, first: i32, last: i32) -> Result<(), Error> {
        self.check_range(first, last)?;
        self.apply(
            Edit::Delete { first, last },
            Some((first + 1, -(last - first + 1))),
        );
        Ok(())
    }

    /// Insert a copy of `[first, last]` directly after `last`.
    pub fn duplicate(&mut self, first: i32, last: i32) -> Result<(), Error> {
        self.check_range(first, last)?;
        self.apply(
            Edit::Duplicate { first, last },
            Some((last + 1, last - first + 1)),
        );
        Ok(())
    }

    /// Replace the closed range `[first, last]` with its reverse complement.
    pub fn invert(&mut self, first: i32, last: i32) -> Result<(), Error> {
        self.check_range(first, last)?;
        self.apply(Edit::Invert { first, last }, None);
        Ok(())
    }

    /// Insert `seq` between positions `before` and `before + 1`.
    pub fn insert(&mut self, before: i32, seq: &[u8]) -> Result<(), Error> {
        if before < 1 || before as usize >= self.orig.len() {
            return Err(Error::OutOfRange(before, before + 1, self.orig.len()));
        }
        Self::check_dna(seq)?;
        self.apply(
            Edit::Insert {
                before,
                seq: seq.to_vec(),
            },
            Some((before + 1, seq.len() as i32)),
        );
        Ok(())
    }

    /// Replace the closed range `[first, last]` with `seq`.
    pub fn delins(&mut self, first: i32, last: i32, seq: &[u8]) -> Result<(), Error> {
        self.check_range(first, last)?;
        Self::check_dna(seq)?;
        let delta = seq.len() as i32 - (last - first + 1);
        self.apply(
            Edit::Delins {
                first,
                last,
                seq: seq.to_vec(),
            },
            Some((last + 1, delta)),
        );
        Ok(())
    }

    /// Map a position in the original sequence to the mutated sequence.
    pub fn shift_pos(&self, position: i32) -> i32 {
        let mut result = position;
        for (first, delta) in &self.shifts {
            if position >= *first {
                result += delta;
            }
        }
        result
    }

    /// Apply [`Mutator::shift_pos`] to every element of a position list.
    pub fn shift_sites(&self, sites: &[i32]) -> Vec<i32> {
        sites.iter().map(|site| self.shift_pos(*site)).collect()
    }

    /// Render a sequence for a diagnostic message, eliding long ones.
    pub fn visualise(&self, seq: &[u8]) -> String {
        if seq.len() > self.config.max_vis_size {
            format!("({})", seq.len())
        } else {
            String::from_utf8_lossy(seq).to_string()
        }
    }

    /// Rebuild `mutated` from `orig` by walking the applied edits in
    /// position order (stable on ties, so same-point edits keep their
    /// application order).
    fn materialize(&mut self) {
        let mut order: Vec<usize> = (0..self.edits.len()).collect();
        order.sort_by_key(|i| self.edits[*i].sort_key());

        let mut out = Sequence::with_capacity(self.orig.len());
        let mut cursor = 0usize;
        for i in order {
            match &self.edits[i] {
                Edit::Substitute { position, nt } => {
                    let p = (*position - 1) as usize;
                    if p >= cursor {
                        out.extend_from_slice(&self.orig[cursor..p]);
                        out.push(*nt);
                        cursor = p + 1;
                    }
                }
                Edit::Delete { first, last } => {
                    let f = (*first - 1) as usize;
                    if f >= cursor {
                        out.extend_from_slice(&self.orig[cursor..f]);
                    }
                    cursor = cursor.max(*last as usize);
                }
                Edit::Invert { first, last } => {
                    let (f, l) = ((*first - 1) as usize, *last as usize);
                    if f >= cursor {
                        out.extend_from_slice(&self.orig[cursor..f]);
                        out.extend_from_slice(&revcomp(&self.orig[f..l]));
                        cursor = l;
                    }
                }
                Edit::Delins { first, last, seq } => {
                    let (f, l) = ((*first - 1) as usize, *last as usize);
                    if f >= cursor {
                        out.extend_from_slice(&self.orig[cursor..f]);
                        out.extend_from_slice(seq);
                        cursor = l;
                    }
                }
                Edit::Insert { before, seq } => {
                    let b = *before as usize;
                    if b >= cursor {
                        out.extend_from_slice(&self.orig[cursor..b]);
                        cursor = b;
                    }
                    out.extend_from_slice(seq);
                }
                Edit::Duplicate { first, last } => {
                    let l = *last as usize;
                    if l >= cursor {
                        out.extend_from_slice(&self.orig[cursor..l]);
                        cursor = l;
                    }
                    out.extend_from_slice(&self.orig[(*first - 1) as usize..*last as usize]);
                }
            }
        }
        out.extend_from_slice(&self.orig[cursor..]);
        self.mutated = out;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;

    fn mutator() -> Mutator {
        Mutator::new(b"AAACCCGGGTTT".to_vec(), Config::default())
    }

    #[test]
    fn substitution() {
        let mut m = mutator();
        m.substitute(5, b'T').unwrap();
        assert_eq!(m.mutated(), &b"AAACTCGGGTTT".to_vec());
        assert_eq!(m.orig, b"AAACCCGGGTTT".to_vec());
        assert_eq!(m.shift_pos(7), 7);
    }

    #[test]
    fn deletion() {
        let mut m = mutator();
        m.delete(4, 6).unwrap();
        assert_eq!(m.mutated(), &b"AAAGGGTTT".to_vec());
        assert_eq!(m.shift_pos(3), 3);
        assert_eq!(m.shift_pos(7), 4);
        assert_eq!(m.shift_sites(&[1, 3, 7, 12]), vec![1, 3, 4, 9]);
    }

    #[test]
    fn duplication() {
        let mut m = mutator();
        m.duplicate(4, 6).unwrap();
        assert_eq!(m.mutated(), &b"AAACCCCCCGGGTTT".to_vec());
        assert_eq!(m.shift_pos(6), 6);
        assert_eq!(m.shift_pos(7), 10);
    }

    #[test]
    fn inversion() {
        let mut m = mutator();
        m.invert(4, 9).unwrap();
        assert_eq!(m.mutated(), &b"AAACCCGGGTTT".to_vec());
        m.invert(1, 3).unwrap();
        assert_eq!(m.mutated(), &b"TTTCCCGGGTTT".to_vec());
    }

    #[test]
    fn insertion() {
        let mut m = mutator();
        m.insert(6, b"TT").unwrap();
        assert_eq!(m.mutated(), &b"AAACCCTTGGGTTT".to_vec());
        assert_eq!(m.shift_pos(6), 6);
        assert_eq!(m.shift_pos(7), 9);
    }

    #[test]
    fn deletion_insertion() {
        let mut m = mutator();
        m.delins(4, 9, b"T").unwrap();
        assert_eq!(m.mutated(), &b"AAATTTT".to_vec());
        assert_eq!(m.shift_pos(10), 5);
    }

    #[test]
    fn length_algebra() {
        let mut m = mutator();
        m.delete(4, 6).unwrap();
        m.insert(9, b"AC").unwrap();
        m.substitute(1, b'C').unwrap();
        assert_eq!(m.mutated().len(), 12 - 3 + 2);
    }

    #[test]
    fn allele_composition() {
        // Later edits are given in original coordinates and compose through
        // the shift map.
        let mut m = mutator();
        m.delete(4, 6).unwrap();
        m.substitute(10, b'A').unwrap();
        assert_eq!(m.mutated(), &b"AAAGGGATT".to_vec());
    }

    #[test]
    fn range_errors() {
        let mut m = mutator();
        assert!(m.delete(0, 3).is_err());
        assert!(m.delete(10, 13).is_err());
        assert!(m.delete(6, 4).is_err());
        assert!(m.substitute(13, b'A').is_err());
        assert!(m.insert(12, b"A").is_err());
        assert!(m.substitute(5, b'U').is_err());
        assert!(m.insert(5, b"ANA").is_err());
        assert_eq!(m.mutated(), &m.orig);
    }

    #[test]
    fn visualisation() {
        let m = mutator();
        assert_eq!(m.visualise(b"ACGT"), "ACGT");
        assert_eq!(m.visualise(&[b'A'; 30]), "(30)");
    }
}

// <LICENSE>
// Copyright 2023 hgvs-checker Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// </LICENSE>
