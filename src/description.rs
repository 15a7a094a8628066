//! Data structures for parsed HGVS variant descriptions.
//!
//! This is the tree handed over by the grammar: the checker consumes it, it
//! never builds one itself.

/// A complete parsed description, e.g. `NM_002001.2:c.12del`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParsedDescription {
    /// The description as it was typed.
    pub input: String,
    pub ref_type: RefType,
    /// Accession of the reference sequence, e.g. `NM_002001`.
    pub ref_seq_acc: Option<String>,
    /// Version of the reference sequence, e.g. `2`.
    pub version: Option<String>,
    /// LRG accession, e.g. `LRG_9`, for LRG references.
    pub lrg_acc: Option<String>,
    /// Transcript selector of an LRG reference, e.g. the `t1` of `LRG_9t1`.
    pub lrg_transcript_id: Option<String>,
    /// Gene and transcript selector for annotated references.
    pub gene: Option<GeneSelector>,
    pub variants: Variants,
}

impl ParsedDescription {
    /// The part of the input before the first colon.
    pub fn pre_colon(&self) -> &str {
        self.input.split(':').next().unwrap_or(&self.input)
    }

    /// The part of the input after the last colon.
    pub fn post_colon(&self) -> &str {
        self.input.split(':').next_back().unwrap_or(&self.input)
    }
}

/// The coordinate system the description is anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RefType {
    /// `g.`
    Genomic,
    /// `c.`
    Coding,
    /// `n.`
    NonCoding,
    /// `m.`
    Mitochondrial,
    /// `r.` (rejected by the checker)
    Rna,
}

/// Gene, transcript-variant and protein-isoform selectors, e.g.
/// `AB026906.1(SDHD_v001)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeneSelector {
    pub symbol: String,
    pub trans_var: Option<String>,
    pub prot_iso: Option<String>,
}

/// One or more raw variants on the same allele.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Variants {
    Single(RawVariant),
    /// `[var;var;...]`, applied left to right to the same reference.
    Allele(Vec<RawVariant>),
}

/// A single parsed variant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum RawVariant {
    /// `4A>T`
    Substitution {
        location: VariantLocation,
        reference: String,
        alternative: String,
    },
    /// `4_6del`, `4_6del3`, `4_6delCCC`
    Deletion {
        location: VariantLocation,
        argument: Option<String>,
    },
    /// `4_6dup`, with the same optional argument as a deletion
    Duplication {
        location: VariantLocation,
        argument: Option<String>,
    },
    /// `4_6inv`
    Inversion { location: VariantLocation },
    /// `6_7insCCC`
    Insertion {
        location: VariantLocation,
        inserted: String,
    },
    /// `4_6delinsTT`, optionally naming the deleted sequence
    Delins {
        location: VariantLocation,
        deleted: Option<String>,
        inserted: String,
    },
}

impl RawVariant {
    pub fn location(&self) -> &VariantLocation {
        match self {
            RawVariant::Substitution { location, .. }
            | RawVariant::Deletion { location, .. }
            | RawVariant::Duplication { location, .. }
            | RawVariant::Inversion { location }
            | RawVariant::Insertion { location, .. }
            | RawVariant::Delins { location, .. } => location,
        }
    }
}

/// Where a variant sits on the reference.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum VariantLocation {
    /// A start location with an optional end location.
    Range {
        start: Location,
        end: Option<Location>,
    },
    /// An `EX` exon-number location, e.g. `EX2` or `EX2del` spans.
    Exon { first: u32, last: Option<u32> },
}

impl VariantLocation {
    /// Convenience constructor for a single-point location.
    pub fn point(main: i32) -> Self {
        VariantLocation::Range {
            start: Location::Point(PointLoc::base(main)),
            end: None,
        }
    }

    /// Convenience constructor for a plain `first_last` range.
    pub fn range(first: i32, last: i32) -> Self {
        VariantLocation::Range {
            start: Location::Point(PointLoc::base(first)),
            end: Some(Location::Point(PointLoc::base(last))),
        }
    }
}

/// A point or intron location.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Location {
    Point(PointLoc),
    /// `IVS` intron-number location.
    Intron(IntronLoc),
}

/// A point location: main coordinate plus optional intronic offset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointLoc {
    pub main: Main,
    pub offset: Option<Offset>,
}

impl PointLoc {
    pub fn base(main: i32) -> Self {
        Self {
            main: Main::Base(main),
            offset: None,
        }
    }

    pub fn with_offset(main: Main, offset: i32) -> Self {
        Self {
            main,
            offset: Some(Offset::Known(offset)),
        }
    }

    /// Whether an offset is present at all (even `+0` or `?`).
    pub fn has_offset(&self) -> bool {
        self.offset.is_some()
    }

    /// The offset as an integer; `?` counts as 0.
    pub fn offset_value(&self) -> i32 {
        match &self.offset {
            None => 0,
            Some(Offset::Known(value)) => *value,
            Some(Offset::Unknown) => 0,
        }
    }
}

/// Main coordinate of a point location, e.g. `-45`, `123` or `*6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Main {
    /// A (possibly negative) position relative to the CDS start.
    Base(i32),
    /// A `*k` position in the 3' UTR.
    Star(i32),
    /// `?`
    Unknown,
}

/// Intronic offset of a point location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Offset {
    Known(i32),
    /// `?`, which counts as 0.
    Unknown,
}

/// An `IVSn±k` location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IntronLoc {
    /// 1-based intron number.
    pub number: u32,
    pub side: IntronSide,
    pub offset: u32,
}

/// Which end of the intron the offset counts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum IntronSide {
    /// `+`: counted from the donor site that opens the intron.
    Donor,
    /// `-`: counted back from the acceptor site that closes it.
    Acceptor,
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
