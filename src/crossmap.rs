//! Mapping positions between the genomic axis and a transcript's coding axis.
//!
//! `Crossmap` is bound to one transcript: a flat list of splice sites on the
//! genomic axis, an optional CDS location and an orientation.

// Implementation note re: "no-zero correction": HGVS does not have a 0 on
// the coding axis.  Counting is -3, -2, -1, 1, 2, 3 and the 3' UTR counts
// `*1, *2, ...` from the base after the CDS stop.  Internally a single
// signed integer is used in which the UTR positions continue the CDS
// numbering (`*k` is `cds_stop_c + k`); the discontinuity at zero is handled
// when converting between that integer and a transcript offset.
//
//              5' UTR           CDS             3' UTR
//                        |>            >|
//            ——————————— ||||||||||||||| ———————————
//    c.        -2    -1  !  1  ...    9  ! *1    *2
//    int       -2    -1     1  ...    9    10    11
//    n          1     2     3  ...   11    12    13

pub use crate::crossmap::error::Error;
use crate::description::Main;

mod error {
    /// Error type for coordinate mapping.
    #[derive(thiserror::Error, Debug, Clone)]
    pub enum Error {
        #[error("splice site list must be non-empty and of even length")]
        InvalidSpliceSites,
        #[error("splice sites must be ordered, got {0} before {1}")]
        UnorderedSpliceSites(i32, i32),
        #[error("orientation must be +1 or -1, got {0}")]
        InvalidOrientation(i32),
        #[error("CDS boundary {0} does not lie on an exon")]
        CdsNotExonic(i32),
        #[error("position 0 does not exist on the coding axis")]
        ZeroPosition,
        #[error("`*` positions are only defined for coding transcripts")]
        NoCds,
        #[error("position is unknown (`?`)")]
        UnknownPosition,
    }
}

/// A position on the coding axis: a main coordinate (in the internal signed
/// encoding, see module docs) plus an intronic offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxPos {
    pub main: i32,
    pub offset: i32,
}

/// Coordinate mapper for one transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossmap {
    /// Flat splice-site list on the genomic axis (1-based, ascending).
    rna: Vec<i32>,
    /// Genomic CDS location `(left, right)`, if the transcript is coding.
    cds: Option<(i32, i32)>,
    /// `+1` for forward, `-1` for reverse transcripts.
    pub orientation: i32,

    /// Total transcript length.
    tgt_len: i32,
    /// Transcript position of the first CDS base (0 when non-coding).
    cds_start_n: i32,
    /// Coding-axis value of the last CDS base (0 when non-coding).
    cds_stop_c: i32,
}

impl Crossmap {
    pub fn new(rna: Vec<i32>, cds: Option<(i32, i32)>, orientation: i32) -> Result<Self, Error> {
        if rna.is_empty() || rna.len() % 2 != 0 {
            return Err(Error::InvalidSpliceSites);
        }
        for pair in rna.windows(2) {
            if pair[0] > pair[1] {
                return Err(Error::UnorderedSpliceSites(pair[0], pair[1]));
            }
        }
        if orientation != 1 && orientation != -1 {
            return Err(Error::InvalidOrientation(orientation));
        }

        let tgt_len = rna
            .chunks_exact(2)
            .map(|pair| pair[1] - pair[0] + 1)
            .sum();

        let mut result = Self {
            rna,
            cds,
            orientation,
            tgt_len,
            cds_start_n: 0,
            cds_stop_c: 0,
        };
        if let Some((left, right)) = cds {
            let (start_g, stop_g) = if orientation == 1 {
                (left, right)
            } else {
                (right, left)
            };
            let cds_start_n = result.g_to_n(start_g).ok_or(Error::CdsNotExonic(start_g))?;
            let cds_stop_n = result.g_to_n(stop_g).ok_or(Error::CdsNotExonic(stop_g))?;
            result.cds_start_n = cds_start_n;
            result.cds_stop_c = cds_stop_n - cds_start_n + 1;
        }
        Ok(result)
    }

    /// Exons as `(g_first, g_last)` of their first and last base in
    /// transcript reading order.
    fn exons_tx_order(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let n = self.rna.len() / 2;
        (0..n).map(move |k| {
            if self.orientation == 1 {
                (self.rna[2 * k], self.rna[2 * k + 1])
            } else {
                let j = n - 1 - k;
                (self.rna[2 * j + 1], self.rna[2 * j])
            }
        })
    }

    /// Genomic position of the first transcribed base.
    fn transcript_first_g(&self) -> i32 {
        if self.orientation == 1 {
            self.rna[0]
        } else {
            self.rna[self.rna.len() - 1]
        }
    }

    /// Genomic position of the last transcribed base.
    fn transcript_last_g(&self) -> i32 {
        if self.orientation == 1 {
            self.rna[self.rna.len() - 1]
        } else {
            self.rna[0]
        }
    }

    /// Transcript position (1-based) of an exonic genomic position.
    fn g_to_n(&self, g: i32) -> Option<i32> {
        let mut t = 1;
        for (g_first, g_last) in self.exons_tx_order() {
            let len = (g_last - g_first) * self.orientation + 1;
            let offset = (g - g_first) * self.orientation;
            if offset >= 0 && offset < len {
                return Some(t + offset);
            }
            t += len;
        }
        None
    }

    /// Genomic position of a transcript position, extrapolating past the
    /// transcript ends.
    fn n_to_g(&self, n: i32) -> i32 {
        if n < 1 {
            return self.transcript_first_g() - self.orientation * (1 - n);
        }
        if n > self.tgt_len {
            return self.transcript_last_g() + self.orientation * (n - self.tgt_len);
        }

        let mut t = 1;
        for (g_first, g_last) in self.exons_tx_order() {
            let len = (g_last - g_first) * self.orientation + 1;
            if n < t + len {
                return g_first + self.orientation * (n - t);
            }
            t += len;
        }
        unreachable!("transcript position {} within bounds has an exon", n)
    }

    fn n_to_c(&self, n: i32) -> i32 {
        if self.cds.is_none() {
            n
        } else if n < self.cds_start_n {
            n - self.cds_start_n
        } else {
            n - self.cds_start_n + 1
        }
    }

    fn c_to_n(&self, c: i32) -> Result<i32, Error> {
        if c == 0 {
            return Err(Error::ZeroPosition);
        }
        if self.cds.is_none() {
            Ok(c)
        } else if c < 0 {
            Ok(c + self.cds_start_n)
        } else {
            Ok(c + self.cds_start_n - 1)
        }
    }

    /// Coding position (+ intronic offset) to genomic position.
    pub fn x2g(&self, main: i32, offset: i32) -> Result<i32, Error> {
        let n = self.c_to_n(main)?;
        Ok(self.n_to_g(n) + self.orientation * offset)
    }

    /// Genomic position to coding position.
    ///
    /// Exonic positions map with offset 0; intronic positions map to the
    /// nearest splice site plus a signed offset; positions outside the
    /// transcribed region map to the first or last transcribed base.
    pub fn g2c(&self, g: i32) -> TxPos {
        if let Some(n) = self.g_to_n(g) {
            return TxPos {
                main: self.n_to_c(n),
                offset: 0,
            };
        }

        let first = self.rna[0];
        let last = self.rna[self.rna.len() - 1];
        if g < first || g > last {
            let site = if g < first { first } else { last };
            let n = self.g_to_n(site).expect("splice sites are exonic");
            return TxPos {
                main: self.n_to_c(n),
                offset: self.orientation * (g - site),
            };
        }

        // Intronic: pick the nearest flanking splice site (ties go to the
        // genomically left one).
        for i in (1..self.rna.len() - 1).step_by(2) {
            let (left, right) = (self.rna[i], self.rna[i + 1]);
            if g > left && g < right {
                let site = if g - left <= right - g { left } else { right };
                let n = self.g_to_n(site).expect("splice sites are exonic");
                return TxPos {
                    main: self.n_to_c(n),
                    offset: self.orientation * (g - site),
                };
            }
        }
        unreachable!("position {} is exonic, intronic or outside", g)
    }

    /// Resolve a parsed main coordinate to the internal signed encoding.
    pub fn main_to_int(&self, main: &Main) -> Result<i32, Error> {
        match main {
            Main::Base(value) => Ok(*value),
            Main::Star(value) => {
                if self.cds.is_some() {
                    Ok(self.cds_stop_c + value)
                } else {
                    Err(Error::NoCds)
                }
            }
            Main::Unknown => Err(Error::UnknownPosition),
        }
    }

    /// Render an internal main coordinate the HGVS way (`-12`, `45`, `*3`).
    pub fn int_to_main(&self, main: i32) -> String {
        if self.cds.is_some() && main > self.cds_stop_c {
            format!("*{}", main - self.cds_stop_c)
        } else {
            format!("{}", main)
        }
    }

    /// Render a [`TxPos`] the HGVS way (`45`, `45+3`, `-12-2`, `*3`).
    pub fn tuple_string(&self, pos: &TxPos) -> String {
        let main = self.int_to_main(pos.main);
        if pos.offset == 0 {
            main
        } else if pos.offset > 0 {
            format!("{}+{}", main, pos.offset)
        } else {
            format!("{}{}", main, pos.offset)
        }
    }

    /// Check that an intronic `(main, offset)` pair is consistent: the main
    /// coordinate must be a splice site and the offset sign must agree with
    /// the site being an acceptor (negative) or donor (positive).
    pub fn check_intronic_position(&self, main: i32, offset: i32) -> Result<bool, Error> {
        if offset == 0 {
            return Ok(true);
        }

        let main_g = self.x2g(main, 0)?;
        let oriented_offset = offset * self.orientation;
        match self.rna.iter().position(|site| *site == main_g) {
            None => Ok(false),
            Some(i) => {
                if i % 2 == 0 {
                    // Splice acceptor, so the oriented sign must be -.
                    Ok(oriented_offset < 0)
                } else {
                    // Splice donor, so the oriented sign must be +.
                    Ok(oriented_offset > 0)
                }
            }
        }
    }

    /// The splice-site list on the genomic axis.
    pub fn splice_sites(&self) -> &[i32] {
        &self.rna
    }

    /// Genomic position of the `index`-th splice site (0-based into the flat
    /// list).
    pub fn get_splice_site(&self, index: usize) -> i32 {
        self.rna[index]
    }

    pub fn number_of_exons(&self) -> usize {
        self.rna.len() / 2
    }

    pub fn number_of_introns(&self) -> usize {
        self.number_of_exons() - 1
    }

    /// `(trans_start, trans_end, cds_stop)` on the coding axis.
    pub fn info(&self) -> (i32, i32, i32) {
        (self.n_to_c(1), self.n_to_c(self.tgt_len), self.cds_stop_c)
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
