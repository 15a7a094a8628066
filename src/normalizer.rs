//! Variant normalization: 3'-rule rolling with splice-site clipping and
//! reclassification of mis-typed variants.

use crate::sequences::{palindrome_snoop, revcomp, roll, trim_common};
use crate::Sequence;

/// Result of rolling an interval, with splice-site clipping applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roll {
    /// How far the interval can move to the left (5' on the forward strand).
    pub back: i32,
    /// The unclipped 3' roll.
    pub forward: i32,
    /// The 3' roll after clipping at splice sites; this is the shift the
    /// canonical name uses.  When it is smaller than `forward` the roll was
    /// cut short at an exon boundary.
    pub shift: i32,
}

/// Roll the closed interval `[first, last]` of `seq` per the 3'-rule.
///
/// When `splice_sites` is given (an RNA reference with a spliced
/// transcript), a roll that would carry the interval across an exon boundary
/// is clipped to end flush with that boundary.  Acceptor and donor sites
/// both point at exon bases, so they sit on different sides of their
/// boundaries.
pub fn splice_aware_shift(seq: &[u8], first: i32, last: i32, splice_sites: Option<&[i32]>) -> Roll {
    let (back, forward) = roll(seq, first as usize, last as usize);
    let (back, forward) = (back as i32, forward as i32);

    let mut shift = forward;
    if let Some(sites) = splice_sites {
        for pair in sites.chunks_exact(2) {
            let (acceptor, donor) = (pair[0], pair[1]);
            if last < acceptor && last + forward >= acceptor {
                shift = acceptor - 1 - last;
                break;
            }
            if last <= donor && last + forward > donor {
                shift = donor - last;
                break;
            }
        }
    }

    Roll {
        back,
        forward,
        shift,
    }
}

/// What an inversion of a given segment really is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InversionAssessment {
    /// The whole segment is its own reverse complement; nothing changes.
    Palindrome,
    /// The outermost `k` bases are palindromic; the interval shrinks by `k`
    /// on both sides.
    Trim(i32),
    /// The inversion is already minimal.
    AsIs,
}

pub fn assess_inversion(segment: &[u8]) -> InversionAssessment {
    match palindrome_snoop(segment) {
        -1 => InversionAssessment::Palindrome,
        0 => InversionAssessment::AsIs,
        k => InversionAssessment::Trim(k),
    }
}

/// What a delins really is, after trimming the common prefix and suffix of
/// its deleted and inserted sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelinsClassification {
    /// Deleted and inserted sequences are identical; nothing changes.
    NoChange,
    /// Nothing is deleted: an insertion of `inserted` after `first+lcp-1`.
    Insertion { lcp: i32, inserted: Sequence },
    /// One base for one base: a substitution at `first+lcp`.
    Substitution { lcp: i32, deleted: u8, inserted: u8 },
    /// Nothing is inserted: a deletion of `[first+lcp, last-lcs]`.
    Deletion { lcp: i32, lcs: i32 },
    /// Inserted is the reverse complement of deleted: an inversion of
    /// `[first+lcp, last-lcs]`.
    Inversion { lcp: i32, lcs: i32 },
    /// Still a delins, on the trimmed interval with the trimmed insert.
    Delins {
        lcp: i32,
        lcs: i32,
        inserted: Sequence,
    },
}

pub fn classify_delins(deleted: &[u8], inserted: &[u8]) -> DelinsClassification {
    if deleted == inserted {
        return DelinsClassification::NoChange;
    }

    let (deleted_trimmed, inserted_trimmed, lcp, lcs) = trim_common(deleted, inserted);
    let (lcp, lcs) = (lcp as i32, lcs as i32);

    if deleted_trimmed.is_empty() {
        return DelinsClassification::Insertion {
            lcp,
            inserted: inserted_trimmed,
        };
    }
    if deleted_trimmed.len() == 1 && inserted_trimmed.len() == 1 {
        return DelinsClassification::Substitution {
            lcp,
            deleted: deleted_trimmed[0],
            inserted: inserted_trimmed[0],
        };
    }
    if inserted_trimmed.is_empty() {
        return DelinsClassification::Deletion { lcp, lcs };
    }
    if revcomp(&deleted_trimmed) == inserted_trimmed {
        return DelinsClassification::Inversion { lcp, lcs };
    }

    DelinsClassification::Delins {
        lcp,
        lcs,
        inserted: inserted_trimmed,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn shift_without_splice_sites() {
        let r = splice_aware_shift(b"AAAAAA", 5, 5, None);
        assert_eq!(
            r,
            Roll {
                back: 4,
                forward: 1,
                shift: 1
            }
        );

        let r = splice_aware_shift(b"AAACCCGGGTTT", 4, 6, None);
        assert_eq!(
            r,
            Roll {
                back: 0,
                forward: 0,
                shift: 0
            }
        );
    }

    #[test]
    fn shift_clipped_at_acceptor() {
        // Rolling 2_2 of TAAAAT right would reach position 4; the acceptor
        // at 4 starts a new exon, so the roll stops at 3.
        let r = splice_aware_shift(b"TAAAAT", 2, 2, Some(&[4, 6]));
        assert_eq!(r.forward, 3);
        assert_eq!(r.shift, 1);
    }

    #[test]
    fn shift_clipped_at_donor() {
        // The donor at 3 ends the exon; rolling past it is clipped flush.
        let r = splice_aware_shift(b"TAAAAT", 2, 2, Some(&[1, 3]));
        assert_eq!(r.forward, 3);
        assert_eq!(r.shift, 1);
    }

    #[test]
    fn shift_not_clipped_inside_exon() {
        let r = splice_aware_shift(b"TAAAAT", 2, 2, Some(&[1, 6]));
        assert_eq!(r.forward, 3);
        assert_eq!(r.shift, 3);
    }

    #[test]
    fn inversion_assessment() {
        assert_eq!(assess_inversion(b"CCCGGG"), InversionAssessment::Palindrome);
        assert_eq!(assess_inversion(b"GGAT"), InversionAssessment::AsIs);
        assert_eq!(assess_inversion(b"GGATC"), InversionAssessment::Trim(1));
    }

    #[test]
    fn delins_classification() {
        assert_eq!(classify_delins(b"CCC", b"CCC"), DelinsClassification::NoChange);
        assert_eq!(
            classify_delins(b"CCC", b"CCG"),
            DelinsClassification::Substitution {
                lcp: 2,
                deleted: b'C',
                inserted: b'G'
            }
        );
        assert_eq!(
            classify_delins(b"CC", b"CCTT"),
            DelinsClassification::Insertion {
                lcp: 2,
                inserted: b"TT".to_vec()
            }
        );
        assert_eq!(
            classify_delins(b"CCTT", b"CT"),
            DelinsClassification::Deletion { lcp: 1, lcs: 1 }
        );
        assert_eq!(
            classify_delins(b"AACGTA", b"AACGTTTA"),
            DelinsClassification::Insertion {
                lcp: 5,
                inserted: b"TT".to_vec()
            }
        );
        assert_eq!(
            classify_delins(b"TAACG", b"TGTTG"),
            DelinsClassification::Inversion { lcp: 1, lcs: 1 }
        );
        assert_eq!(
            classify_delins(b"ACCT", b"AGGGT"),
            DelinsClassification::Delins {
                lcp: 1,
                lcs: 1,
                inserted: b"GGG".to_vec()
            }
        );
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
