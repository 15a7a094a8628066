//! The reference record model: genes, transcripts and the canonical names
//! the checker writes back into them.

use crate::crossmap::Crossmap;
use crate::sequences::{complement, revcomp};
use crate::Sequence;

/// Molecule type of the reference record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MolType {
    /// `g.`: genomic DNA.
    Genomic,
    /// `n.`: an RNA reference (deposited as cDNA).
    Transcript,
    /// `m.`: mitochondrial DNA.
    Mitochondrial,
}

impl MolType {
    pub fn code(&self) -> char {
        match self {
            MolType::Genomic => 'g',
            MolType::Transcript => 'n',
            MolType::Mitochondrial => 'm',
        }
    }
}

/// Where the record came from; decides description and batch formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SourceType {
    Lrg,
    GenBank,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Lrg => "LRG",
            SourceType::GenBank => "GB",
        }
    }
}

/// Chromosomal context of a record that is a slice of a chromosome.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Chromosome {
    /// Accession of the chromosome, e.g. `NC_000011.9`.
    pub accession: String,
    /// 1-based chromosomal position of the record's first base.
    pub offset: i32,
}

/// Molecule type of a transcript-level description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TranscriptMolType {
    Coding,
    NonCoding,
}

impl TranscriptMolType {
    pub fn code(&self) -> char {
        match self {
            TranscriptMolType::Coding => 'c',
            TranscriptMolType::NonCoding => 'n',
        }
    }
}

/// The coding region of a transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cds {
    /// Per-exon genomic position list of the CDS.
    pub position_list: Vec<i32>,
    /// Genomic location `(left, right)` of the CDS as a whole.
    pub location: (i32, i32),
}

/// One transcript of a gene.
#[derive(Clone, Debug, PartialEq)]
pub struct Transcript {
    /// Transcript-variant number, zero padded, e.g. `001`.
    pub name: String,
    pub mol_type: TranscriptMolType,
    pub transcribe: bool,
    pub translate: bool,
    /// NCBI translation table id.
    pub tx_table: u8,
    pub transcript_id: String,
    pub protein_id: String,
    pub locus_tag: String,
    pub transcript_product: String,
    pub protein_product: String,
    pub link_method: String,
    /// Genomic position list of the transcribed exons.
    pub mrna: Vec<i32>,
    pub cds: Option<Cds>,
    pub crossmap: Crossmap,
    /// Canonical names accumulated by the check, in application order.
    pub descriptions: Vec<String>,
    /// `p.` description derived for this transcript.
    pub protein_description: String,
}

impl Transcript {
    /// The accumulated variant description (`=` when nothing was named).
    pub fn description(&self) -> String {
        if self.descriptions.is_empty() {
            "=".to_string()
        } else {
            self.descriptions.join(";")
        }
    }
}

/// One gene with its transcripts.
#[derive(Clone, Debug, PartialEq)]
pub struct Gene {
    pub name: String,
    pub transcripts: Vec<Transcript>,
}

impl Gene {
    /// Transcript-variant names, in record order.
    pub fn list_loci(&self) -> Vec<&str> {
        self.transcripts.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn find_locus(&self, name: &str) -> Option<usize> {
        self.transcripts.iter().position(|t| t.name == name)
    }
}

/// A reference record with the canonical descriptions the check derives.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub seq: Sequence,
    pub mol_type: MolType,
    /// Accession (with version) of the record itself.
    pub record_id: String,
    pub source_type: SourceType,
    pub chromosome: Option<Chromosome>,
    pub gene_list: Vec<Gene>,
    /// Canonical names on the record's own axis, in application order.
    pub descriptions: Vec<String>,
    /// Canonical names on the chromosomal axis, when known.
    pub chrom_descriptions: Vec<String>,
}

/// The payload of a canonical name.
#[derive(Clone, Debug, PartialEq)]
pub enum NamedEdit<'a> {
    Substitution { reference: u8, alternative: u8 },
    Deletion,
    Duplication,
    Inversion,
    Insertion { inserted: &'a [u8] },
    Delins { inserted: &'a [u8] },
}

impl Record {
    pub fn new(seq: Sequence, mol_type: MolType, record_id: &str, source_type: SourceType) -> Self {
        Self {
            seq,
            mol_type,
            record_id: record_id.to_string(),
            source_type,
            chromosome: None,
            gene_list: Vec::new(),
            descriptions: Vec::new(),
            chrom_descriptions: Vec::new(),
        }
    }

    pub fn list_genes(&self) -> Vec<&str> {
        self.gene_list.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn find_gene(&self, name: &str) -> Option<usize> {
        self.gene_list.iter().position(|g| g.name == name)
    }

    /// The accumulated variant description (`=` when nothing was named).
    pub fn description(&self) -> String {
        if self.descriptions.is_empty() {
            "=".to_string()
        } else {
            self.descriptions.join(";")
        }
    }

    pub fn chrom_description(&self) -> String {
        if self.chrom_descriptions.is_empty() {
            "=".to_string()
        } else {
            self.chrom_descriptions.join(";")
        }
    }

    /// Emit the canonical name of an edit on `[first, last]` into the record
    /// and all of its transcripts.
    ///
    /// `roll` carries `(back, shift)`: the genomic (and chromosomal) names
    /// use the 3' shift, while reverse-strand transcripts roll back by
    /// `back` — the 3' direction on their own strand — swap the interval
    /// ends and take the reverse complement of any sequence argument.
    pub fn name(&mut self, first: i32, last: i32, edit: &NamedEdit, roll: Option<(i32, i32)>) {
        let (back, shift) = roll.unwrap_or((0, 0));
        let forward = (first + shift, last + shift);
        let reverse = (first - back, last - back);

        self.descriptions.push(format_edit(
            &forward.0.to_string(),
            &forward.1.to_string(),
            edit,
            false,
        ));
        if let Some(chromosome) = &self.chromosome {
            let offset = chromosome.offset - 1;
            self.chrom_descriptions.push(format_edit(
                &(forward.0 + offset).to_string(),
                &(forward.1 + offset).to_string(),
                edit,
                false,
            ));
        }

        for gene in &mut self.gene_list {
            for transcript in &mut gene.transcripts {
                let cm = &transcript.crossmap;
                let description = if cm.orientation == -1 {
                    let start = cm.g2c(reverse.1);
                    let end = cm.g2c(reverse.0);
                    format_edit(&cm.tuple_string(&start), &cm.tuple_string(&end), edit, true)
                } else {
                    let start = cm.g2c(forward.0);
                    let end = cm.g2c(forward.1);
                    format_edit(&cm.tuple_string(&start), &cm.tuple_string(&end), edit, false)
                };
                transcript.descriptions.push(description);
            }
        }
    }
}

/// Render one edit in HGVS notation; `reverse` complements the sequence
/// arguments for reverse-strand transcripts.
fn format_edit(first: &str, last: &str, edit: &NamedEdit, reverse: bool) -> String {
    let orient = |seq: &[u8]| -> String {
        let seq = if reverse { revcomp(seq) } else { seq.to_vec() };
        String::from_utf8_lossy(&seq).to_string()
    };
    let base = |nt: u8| -> char {
        if reverse {
            complement(nt) as char
        } else {
            nt as char
        }
    };

    match edit {
        NamedEdit::Substitution {
            reference,
            alternative,
        } => format!("{}{}>{}", first, base(*reference), base(*alternative)),
        NamedEdit::Deletion => {
            if first == last {
                format!("{}del", first)
            } else {
                format!("{}_{}del", first, last)
            }
        }
        NamedEdit::Duplication => {
            if first == last {
                format!("{}dup", first)
            } else {
                format!("{}_{}dup", first, last)
            }
        }
        NamedEdit::Inversion => format!("{}_{}inv", first, last),
        NamedEdit::Insertion { inserted } => {
            format!("{}_{}ins{}", first, last, orient(inserted))
        }
        NamedEdit::Delins { inserted } => {
            format!("{}_{}delins{}", first, last, orient(inserted))
        }
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
