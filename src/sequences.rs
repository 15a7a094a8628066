//! Utility code for working with nucleotide and protein sequences.
//!
//! Everything in here is pure: rolling, palindrome detection, trimming,
//! splicing and codon translation never touch anything but their arguments.

pub use crate::sequences::error::Error;
use crate::Sequence;
use ahash::AHashMap;
use std::sync::LazyLock;

mod error {
    /// Error type for sequence operations.
    #[derive(thiserror::Error, Debug, Clone)]
    pub enum Error {
        #[error("codon is undefined in codon table: {0}")]
        UndefinedCodon(String),
        #[error("invalid 1-letter aminoacid: {0} at {1}")]
        InvalidOneLetterAminoAcid(String, String),
        #[error("can only translate DNA sequences whose length is a multiple of 3, but is: {0}")]
        UntranslatableDnaLength(usize),
        #[error("coding sequence does not begin with a start codon: {0}")]
        MissingStartCodon(String),
        #[error("coding sequence does not end with a stop codon")]
        MissingStopCodon,
        #[error("coding sequence contains an in-frame stop codon")]
        InFrameStopCodon,
    }
}

/// Whether `s` is non-empty and consists of unambiguous DNA only.
pub fn is_dna(s: &[u8]) -> bool {
    !s.is_empty() && s.iter().all(|&c| matches!(c, b'A' | b'C' | b'G' | b'T'))
}

/// Watson-Crick complement of a single base.
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        other => other,
    }
}

/// Reverse complementing shortcut.
pub fn revcomp(seq: &[u8]) -> Sequence {
    bio::alphabets::dna::revcomp(seq)
}

/// Length of the longest common prefix of two sequences.
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Length of the longest common suffix of two sequences.
fn common_suffix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Strip the longest common prefix of the pair.
pub fn trim_common_prefixes(reference: &[u8], alternative: &[u8]) -> (usize, Sequence, Sequence) {
    let trim = common_prefix_len(reference, alternative);
    (
        trim,
        reference[trim..].to_vec(),
        alternative[trim..].to_vec(),
    )
}

/// Strip the longest common suffix of the pair.
pub fn trim_common_suffixes(reference: &[u8], alternative: &[u8]) -> (usize, Sequence, Sequence) {
    let trim = common_suffix_len(reference, alternative);
    (
        trim,
        reference[..reference.len() - trim].to_vec(),
        alternative[..alternative.len() - trim].to_vec(),
    )
}

/// Strip the longest common prefix, then the longest common suffix of the
/// remainders.
///
/// # Returns
///
/// The trimmed pair together with the prefix and suffix lengths, so that
/// `lcp + lcs + |a'| == |a|` (and likewise for `b`).
pub fn trim_common(reference: &[u8], alternative: &[u8]) -> (Sequence, Sequence, usize, usize) {
    let (lcp, reference, alternative) = trim_common_prefixes(reference, alternative);
    let (lcs, reference, alternative) = trim_common_suffixes(&reference, &alternative);
    (reference, alternative, lcp, lcs)
}

/// Inspect a sequence for being a reverse-complement palindrome.
///
/// # Returns
///
/// * `0` for an empty sequence,
/// * `-1` if the whole sequence equals its own reverse complement (an
///   inversion of it would be a no-op),
/// * otherwise the largest `k < |s| / 2` such that the length-`k` prefix is
///   the reverse complement of the length-`k` suffix (0 if there is none).
pub fn palindrome_snoop(s: &[u8]) -> i32 {
    if s.is_empty() {
        return 0;
    }

    let rc = revcomp(s);
    let half = s.len().div_ceil(2);
    for i in 0..half {
        if s[i] != rc[i] {
            return i as i32;
        }
    }

    -1
}

/// Determine the variability of the interval `[first, last]` (1-based,
/// closed) of `s` by looking at cyclic permutations.
///
/// # Returns
///
/// `(back, forward)`: how far the interval can be moved to the left and to
/// the right without changing the sequence that results from deleting it.
/// Neither direction ever crosses an end of `s`.
pub fn roll(s: &[u8], first: usize, last: usize) -> (usize, usize) {
    let pattern = &s[first - 1..last];
    let plen = pattern.len() as isize;

    let mut minimum = first as isize - 2;
    let mut j = plen - 1;
    while minimum > -1 && s[minimum as usize] == pattern[j.rem_euclid(plen) as usize] {
        j -= 1;
        minimum -= 1;
    }

    let mut maximum = last;
    let mut j = 0;
    while maximum < s.len() && s[maximum] == pattern[j % pattern.len()] {
        j += 1;
        maximum += 1;
    }

    ((first as isize - minimum - 2) as usize, maximum - last)
}

/// Concatenate the closed 1-based ranges of a splice-site position list.
pub fn splice(seq: &[u8], sites: &[i32]) -> Sequence {
    let mut out = Sequence::new();
    for pair in sites.chunks_exact(2) {
        out.extend_from_slice(&seq[(pair[0] - 1) as usize..pair[1] as usize]);
    }
    out
}

/// Like [`splice`], but only keep the part between the CDS start and the
/// transcript end (in transcript reading direction).
///
/// For a forward transcript this is the slice from `cds.0` to the last exon
/// end; for a reverse transcript from the first exon start to `cds.1`, which
/// after reverse complementing again runs from the CDS start to the 3' end.
pub fn nsplice(seq: &[u8], sites: &[i32], cds: (i32, i32), orientation: i32) -> Sequence {
    let mut out = Sequence::new();
    if orientation == 1 {
        for pair in sites.chunks_exact(2) {
            if cds.0 >= pair[0] && cds.0 <= pair[1] {
                out.extend_from_slice(&seq[(cds.0 - 1) as usize..pair[1] as usize]);
            } else if pair[0] > cds.0 {
                out.extend_from_slice(&seq[(pair[0] - 1) as usize..pair[1] as usize]);
            }
        }
    } else {
        for pair in sites.chunks_exact(2) {
            if cds.1 >= pair[0] && cds.1 <= pair[1] {
                out.extend_from_slice(&seq[(pair[0] - 1) as usize..cds.1 as usize]);
            } else if pair[1] < cds.1 {
                out.extend_from_slice(&seq[(pair[0] - 1) as usize..pair[1] as usize]);
            }
        }
    }
    out
}

/// Total length covered by a position list.
pub fn cds_length(sites: &[i32]) -> usize {
    sites
        .chunks_exact(2)
        .map(|pair| (pair[1] - pair[0] + 1) as usize)
        .sum()
}

/// Whether the closed interval `[first, last]` crosses an exon boundary.
pub fn over_splice_site(first: i32, last: i32, sites: &[i32]) -> bool {
    for pair in sites.chunks_exact(2) {
        let (acceptor, donor) = (pair[0], pair[1]);
        if first < acceptor && last >= acceptor {
            return true;
        }
        if first <= donor && last > donor {
            return true;
        }
    }
    false
}

/// Render a 1-based closed range the HGVS way: `"4"` or `"4_6"`.
pub fn format_range(first: i32, last: i32) -> String {
    if first == last {
        format!("{}", first)
    } else {
        format!("{}_{}", first, last)
    }
}

/// Allow selection of translation table by NCBI id.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum TranslationTable {
    #[default]
    Standard,
    VertebrateMitochondrial,
}

impl TranslationTable {
    /// Look up a table by its NCBI genetic code id (1 and 2 are supported).
    pub fn from_ncbi_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(TranslationTable::Standard),
            2 => Some(TranslationTable::VertebrateMitochondrial),
            _ => None,
        }
    }

    fn start_codons(self) -> &'static [&'static [u8; 3]] {
        match self {
            TranslationTable::Standard => &[b"TTG", b"CTG", b"ATG"],
            TranslationTable::VertebrateMitochondrial => {
                &[b"ATT", b"ATC", b"ATA", b"ATG", b"GTG"]
            }
        }
    }
}

type Codon = [u8; 3];

#[rustfmt::skip]
const DNA_TO_AA1_STANDARD_VEC: &[(&str, &str)] = &[
    ("TTT", "F"), ("TTC", "F"), ("TTA", "L"), ("TTG", "L"),
    ("CTT", "L"), ("CTC", "L"), ("CTA", "L"), ("CTG", "L"),
    ("ATT", "I"), ("ATC", "I"), ("ATA", "I"), ("ATG", "M"),
    ("GTT", "V"), ("GTC", "V"), ("GTA", "V"), ("GTG", "V"),
    ("TCT", "S"), ("TCC", "S"), ("TCA", "S"), ("TCG", "S"),
    ("CCT", "P"), ("CCC", "P"), ("CCA", "P"), ("CCG", "P"),
    ("ACT", "T"), ("ACC", "T"), ("ACA", "T"), ("ACG", "T"),
    ("GCT", "A"), ("GCC", "A"), ("GCA", "A"), ("GCG", "A"),
    ("TAT", "Y"), ("TAC", "Y"), ("TAA", "*"), ("TAG", "*"),
    ("CAT", "H"), ("CAC", "H"), ("CAA", "Q"), ("CAG", "Q"),
    ("AAT", "N"), ("AAC", "N"), ("AAA", "K"), ("AAG", "K"),
    ("GAT", "D"), ("GAC", "D"), ("GAA", "E"), ("GAG", "E"),
    ("TGT", "C"), ("TGC", "C"), ("TGA", "*"), ("TGG", "W"),
    ("CGT", "R"), ("CGC", "R"), ("CGA", "R"), ("CGG", "R"),
    ("AGT", "S"), ("AGC", "S"), ("AGA", "R"), ("AGG", "R"),
    ("GGT", "G"), ("GGC", "G"), ("GGA", "G"), ("GGG", "G"),
];

/// Differences of NCBI table 2 relative to the standard code.
#[rustfmt::skip]
const DNA_TO_AA1_CHRMT_VERTEBRATE_DIFF: &[(&str, &str)] = &[
    ("AGA", "*"), ("AGG", "*"), ("ATA", "M"), ("TGA", "W"),
];

static DNA_TO_AA1_STANDARD: LazyLock<AHashMap<Codon, u8>> = LazyLock::new(|| {
    let mut m = AHashMap::default();
    for (dna, aa1) in DNA_TO_AA1_STANDARD_VEC {
        let d = dna.as_bytes();
        m.insert([d[0], d[1], d[2]], aa1.as_bytes()[0]);
    }
    m
});

static DNA_TO_AA1_CHRMT_VERTEBRATE: LazyLock<AHashMap<Codon, u8>> = LazyLock::new(|| {
    let mut m = DNA_TO_AA1_STANDARD.clone();
    for (dna, aa1) in DNA_TO_AA1_CHRMT_VERTEBRATE_DIFF {
        let d = dna.as_bytes();
        m.insert([d[0], d[1], d[2]], aa1.as_bytes()[0]);
    }
    m
});

fn normalize_base(c: u8) -> u8 {
    match c {
        b'u' | b'U' => b'T',
        other => other.to_ascii_uppercase(),
    }
}

fn iupac_expansion(c: u8) -> Option<&'static [u8]> {
    match c {
        b'A' | b'C' | b'G' | b'T' => None,
        b'R' => Some(b"AG"),
        b'Y' => Some(b"CT"),
        b'S' => Some(b"CG"),
        b'W' => Some(b"AT"),
        b'K' => Some(b"GT"),
        b'M' => Some(b"AC"),
        b'B' => Some(b"CGT"),
        b'D' => Some(b"AGT"),
        b'H' => Some(b"ACT"),
        b'V' => Some(b"ACG"),
        b'N' => Some(b"ACGT"),
        _ => None,
    }
}

/// Allow translation of `&[u8]` DNA codons to `u8` amino acids.
struct CodonTranslator {
    /// Mapping from unambiguous DNA codon to amino acid 1-letter ASCII.
    dna_to_aa1: &'static AHashMap<Codon, u8>,

    /// Buffer.
    codon: Codon,
}

impl CodonTranslator {
    pub fn new(table: TranslationTable) -> Self {
        Self {
            dna_to_aa1: match table {
                TranslationTable::Standard => &DNA_TO_AA1_STANDARD,
                TranslationTable::VertebrateMitochondrial => &DNA_TO_AA1_CHRMT_VERTEBRATE,
            },
            codon: [0; 3],
        }
    }

    /// Translate the given codon to an amino acid.
    ///
    /// Degenerate codons whose expansions all agree translate to the common
    /// amino acid; other ambiguous codons translate to `X`.
    pub fn translate(&mut self, codon: &[u8]) -> Result<u8, Error> {
        for (i, c) in codon[..3].iter().enumerate() {
            self.codon[i] = normalize_base(*c);
        }

        if let Some(aa) = self.dna_to_aa1.get(&self.codon) {
            return Ok(*aa);
        }

        if !self
            .codon
            .iter()
            .all(|&c| iupac_expansion(c).is_some() || matches!(c, b'A' | b'C' | b'G' | b'T'))
        {
            return Err(Error::UndefinedCodon(
                String::from_utf8_lossy(codon).to_string(),
            ));
        }

        let mut aa = 0u8;
        for b0 in expand(self.codon[0]) {
            for b1 in expand(self.codon[1]) {
                for b2 in expand(self.codon[2]) {
                    let resolved = *self
                        .dna_to_aa1
                        .get(&[*b0, *b1, *b2])
                        .expect("expansion yields unambiguous codons");
                    if aa == 0 {
                        aa = resolved;
                    } else if aa != resolved {
                        return Ok(b'X');
                    }
                }
            }
        }
        Ok(aa)
    }
}

fn expand(c: u8) -> &'static [u8] {
    match iupac_expansion(c) {
        Some(bases) => bases,
        None => match c {
            b'A' => b"A",
            b'C' => b"C",
            b'G' => b"G",
            _ => b"T",
        },
    }
}

/// Translate a DNA (or RNA) sequence into single-letter amino acids.
///
/// Trailing bases that do not fill a codon are ignored.
pub fn translate(seq: &[u8], table: TranslationTable) -> Result<Sequence, Error> {
    let mut translator = CodonTranslator::new(table);
    let mut result = Sequence::with_capacity(seq.len() / 3);
    for chunk in seq.chunks_exact(3) {
        result.push(translator.translate(chunk)?);
    }
    Ok(result)
}

/// Translate and cut the result before the first stop codon.
pub fn translate_to_stop(seq: &[u8], table: TranslationTable) -> Result<Sequence, Error> {
    let mut result = translate(seq, table)?;
    if let Some(stop) = result.iter().position(|aa| *aa == b'*') {
        result.truncate(stop);
    }
    Ok(result)
}

/// Whether `seq` begins with one of the table's start codons.
pub fn starts_with_start_codon(seq: &[u8], table: TranslationTable) -> bool {
    if seq.len() < 3 {
        return false;
    }
    let codon = [
        normalize_base(seq[0]),
        normalize_base(seq[1]),
        normalize_base(seq[2]),
    ];
    table.start_codons().iter().any(|c| **c == codon)
}

/// Translate a complete coding sequence.
///
/// The sequence must be a whole number of codons, begin with a start codon
/// (which always translates to `M`), end with a stop codon and contain no
/// other in-frame stop.  The returned protein does not include the stop.
pub fn translate_coding(seq: &[u8], table: TranslationTable) -> Result<Sequence, Error> {
    if seq.len() % 3 != 0 || seq.is_empty() {
        return Err(Error::UntranslatableDnaLength(seq.len()));
    }
    if !starts_with_start_codon(seq, table) {
        return Err(Error::MissingStartCodon(
            String::from_utf8_lossy(&seq[..3]).to_string(),
        ));
    }

    let full = translate(seq, table)?;
    match full.last() {
        Some(b'*') => (),
        _ => return Err(Error::MissingStopCodon),
    }
    if full[..full.len() - 1].contains(&b'*') {
        return Err(Error::InFrameStopCodon);
    }

    let mut protein = full;
    protein.pop();
    protein[0] = b'M';
    Ok(protein)
}

fn aa1_to_aa3_byte(aa1: u8) -> Option<&'static str> {
    match aa1 {
        b'A' => Some("Ala"),
        b'R' => Some("Arg"),
        b'N' => Some("Asn"),
        b'D' => Some("Asp"),
        b'C' => Some("Cys"),
        b'Q' => Some("Gln"),
        b'E' => Some("Glu"),
        b'G' => Some("Gly"),
        b'H' => Some("His"),
        b'I' => Some("Ile"),
        b'L' => Some("Leu"),
        b'K' => Some("Lys"),
        b'M' => Some("Met"),
        b'F' => Some("Phe"),
        b'P' => Some("Pro"),
        b'S' => Some("Ser"),
        b'T' => Some("Thr"),
        b'W' => Some("Trp"),
        b'Y' => Some("Tyr"),
        b'V' => Some("Val"),
        b'U' => Some("Sec"),
        b'X' => Some("Xaa"),
        b'*' => Some("Ter"),
        _ => None,
    }
}

/// Converts string of 1-letter amino acids to 3-letter amino acids.
pub fn aa1_to_aa3(seq: &[u8]) -> Result<String, Error> {
    let mut result = String::with_capacity(seq.len() * 3);
    for (i, aa1) in seq.iter().enumerate() {
        let aa3 = aa1_to_aa3_byte(*aa1).ok_or_else(|| {
            Error::InvalidOneLetterAminoAcid(format!("{:?}", *aa1 as char), format!("{}", i + 1))
        })?;
        result.push_str(aa3);
    }
    Ok(result)
}

/// Description of the difference between two proteins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinDescription {
    /// The `p.` description (without accession).
    pub description: String,
    /// First changed residue (0-based), for display highlighting.
    pub first: usize,
    /// One past the last changed residue of the original protein.
    pub last_original: usize,
    /// One past the last changed residue of the variant protein.
    pub last_variant: usize,
}

impl ProteinDescription {
    fn new(description: String, first: usize, last_original: usize, last_variant: usize) -> Self {
        Self {
            description,
            first,
            last_original,
            last_variant,
        }
    }
}

fn aa3(aa: u8) -> &'static str {
    aa1_to_aa3_byte(aa).unwrap_or("Xaa")
}

/// Describe the difference between an original and a variant protein.
///
/// `cds_len` is the length of the mutated CDS; when it is no longer a whole
/// number of codons the reading frame is broken and the protein effect is
/// unknown (`p.?`).  Both proteins are expected without their stop residue.
pub fn protein_description(
    cds_len: usize,
    original: &[u8],
    variant: &[u8],
) -> Result<ProteinDescription, Error> {
    if cds_len % 3 != 0 || original.is_empty() {
        return Ok(ProteinDescription::new("p.?".to_string(), 0, 0, 0));
    }
    if original == variant {
        return Ok(ProteinDescription::new("p.(=)".to_string(), 0, 0, 0));
    }

    let lcp = common_prefix_len(original, variant);
    let lcs = common_suffix_len(&original[lcp..], &variant[lcp..]);
    let s1_end = original.len() - lcs;
    let s2_end = variant.len() - lcs;

    // Pure insertion, duplication or C-terminal extension.
    if s1_end == lcp && lcp > 0 {
        if original.len() == lcp {
            // The variant protein reads through the original stop.
            return Ok(ProteinDescription::new(
                format!(
                    "p.(*{}{}ext*{})",
                    original.len() + 1,
                    aa3(variant[original.len()]),
                    variant.len() - original.len()
                ),
                lcp,
                original.len() + 1,
                variant.len() + 1,
            ));
        }
        let ins = &variant[lcp..s2_end];
        if lcp >= ins.len() && &original[lcp - ins.len()..lcp] == ins {
            let description = if ins.len() == 1 {
                format!("p.({}{}dup)", aa3(original[lcp - 1]), lcp)
            } else {
                format!(
                    "p.({}{}_{}{}dup)",
                    aa3(original[lcp - ins.len()]),
                    lcp - ins.len() + 1,
                    aa3(original[lcp - 1]),
                    lcp
                )
            };
            return Ok(ProteinDescription::new(description, lcp, s1_end, s2_end));
        }
        return Ok(ProteinDescription::new(
            format!(
                "p.({}{}_{}{}ins{})",
                aa3(original[lcp - 1]),
                lcp,
                aa3(original[lcp]),
                lcp + 1,
                aa1_to_aa3(ins)?
            ),
            lcp,
            s1_end,
            s2_end,
        ));
    }

    // Pure deletion, or a stop at the first changed residue.
    if s2_end == lcp {
        let description = if variant.len() == lcp {
            format!("p.({}{}*)", aa3(original[lcp]), lcp + 1)
        } else if s1_end == lcp + 1 {
            format!("p.({}{}del)", aa3(original[lcp]), lcp + 1)
        } else {
            format!(
                "p.({}{}_{}{}del)",
                aa3(original[lcp]),
                lcp + 1,
                aa3(original[s1_end - 1]),
                s1_end
            )
        };
        return Ok(ProteinDescription::new(description, lcp, s1_end, s2_end));
    }

    // Substitution.
    if s1_end == lcp + 1 && s2_end == lcp + 1 {
        return Ok(ProteinDescription::new(
            format!("p.({}{}{})", aa3(original[lcp]), lcp + 1, aa3(variant[lcp])),
            lcp,
            s1_end,
            s2_end,
        ));
    }

    // Everything else reads as a delins.
    let inserted = aa1_to_aa3(&variant[lcp..s2_end])?;
    let description = if s1_end == lcp + 1 {
        format!("p.({}{}delins{})", aa3(original[lcp]), lcp + 1, inserted)
    } else {
        format!(
            "p.({}{}_{}{}delins{})",
            aa3(original[lcp]),
            lcp + 1,
            aa3(original[s1_end.max(lcp + 1) - 1]),
            s1_end,
            inserted
        )
    };
    Ok(ProteinDescription::new(description, lcp, s1_end, s2_end))
}

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn dna_predicate() {
        assert!(is_dna(b"ACGT"));
        assert!(!is_dna(b""));
        assert!(!is_dna(b"ACGU"));
        assert!(!is_dna(b"ACGN"));
    }

    #[test]
    fn prefix_trimming() {
        assert_eq!(trim_common_prefixes(b"", b""), (0, vec![], vec![]));
        assert_eq!(trim_common_prefixes(b"", b"CG"), (0, vec![], b"CG".to_vec()));
        assert_eq!(
            trim_common_prefixes(b"TA", b"GA"),
            (0, b"TA".to_vec(), b"GA".to_vec())
        );
        assert_eq!(
            trim_common_prefixes(b"CGTA", b"CGGA"),
            (2, b"TA".to_vec(), b"GA".to_vec())
        );
        assert_eq!(trim_common_prefixes(b"ACG", b"ACGT"), (3, vec![], b"T".to_vec()));
    }

    #[test]
    fn suffix_trimming() {
        assert_eq!(trim_common_suffixes(b"", b""), (0, vec![], vec![]));
        assert_eq!(trim_common_suffixes(b"C", b""), (0, b"C".to_vec(), vec![]));
        assert_eq!(trim_common_suffixes(b"A", b"AA"), (1, vec![], b"A".to_vec()));
        assert_eq!(
            trim_common_suffixes(b"AT", b"AG"),
            (0, b"AT".to_vec(), b"AG".to_vec())
        );
        assert_eq!(
            trim_common_suffixes(b"ATCG", b"AGCG"),
            (2, b"AT".to_vec(), b"AG".to_vec())
        );
    }

    #[test]
    fn common_trimming() {
        let (d, i, lcp, lcs) = trim_common(b"CCC", b"CCG");
        assert_eq!((d, i, lcp, lcs), (b"C".to_vec(), b"G".to_vec(), 2, 0));

        let (d, i, lcp, lcs) = trim_common(b"ACCT", b"AGGT");
        assert_eq!((d, i, lcp, lcs), (b"CC".to_vec(), b"GG".to_vec(), 1, 1));
    }

    #[test]
    fn revcomp_cases() {
        assert_eq!(revcomp(b""), b"");
        assert_eq!(revcomp(b"A"), b"T");
        assert_eq!(revcomp(b"AG"), b"CT");
        assert_eq!(revcomp(b"CGAG"), b"CTCG");
    }

    #[test]
    fn palindrome_snooping() {
        assert_eq!(palindrome_snoop(b""), 0);
        assert_eq!(palindrome_snoop(b"CCCGGG"), -1);
        assert_eq!(palindrome_snoop(b"GGATCC"), -1);
        assert_eq!(palindrome_snoop(b"GGAT"), 0);
        assert_eq!(palindrome_snoop(b"GGATC"), 1);
        assert_eq!(palindrome_snoop(b"ACCTG"), 0);
    }

    #[test]
    fn roll_distances() {
        assert_eq!(roll(b"AAAAAA", 5, 5), (4, 1));
        assert_eq!(roll(b"ACCCCA", 3, 3), (1, 2));
        assert_eq!(roll(b"ATCGATCGA", 1, 4), (0, 5));
        // Neither direction crosses a sequence boundary.
        assert_eq!(roll(b"AAA", 1, 3), (0, 0));
    }

    #[test]
    fn splicing() {
        assert_eq!(splice(b"AAACCCGGGTTT", &[1, 3, 7, 9]), b"AAAGGG".to_vec());
        assert_eq!(
            nsplice(b"GGGATGGCTTGGTAACCC", &[1, 18], (4, 15), 1),
            b"ATGGCTTGGTAACCC".to_vec()
        );
        assert_eq!(
            nsplice(b"GGGTTACCAAGCCATCCC", &[1, 18], (4, 15), -1),
            b"GGGTTACCAAGCCAT".to_vec()
        );
        assert_eq!(cds_length(&[4, 15]), 12);
        assert_eq!(cds_length(&[1, 3, 7, 9]), 6);
    }

    #[test]
    fn splice_site_overlap() {
        let sites = &[11, 15, 21, 25];
        assert!(!over_splice_site(11, 15, sites));
        assert!(!over_splice_site(16, 20, sites));
        assert!(over_splice_site(14, 16, sites));
        assert!(over_splice_site(20, 21, sites));
        assert!(!over_splice_site(21, 25, sites));
    }

    #[test]
    fn range_formatting() {
        assert_eq!(format_range(4, 4), "4");
        assert_eq!(format_range(4, 6), "4_6");
    }

    #[test]
    fn translate_examples() -> Result<(), Error> {
        assert_eq!(translate(b"ATGCGA", TranslationTable::Standard)?, b"MR".to_vec());
        assert_eq!(translate(b"AUGCGA", TranslationTable::Standard)?, b"MR".to_vec());
        assert_eq!(translate(b"", TranslationTable::Standard)?, b"".to_vec());
        assert_eq!(translate(b"ATGCG", TranslationTable::Standard)?, b"M".to_vec());
        assert_eq!(translate(b"TRA", TranslationTable::Standard)?, b"*".to_vec());
        assert_eq!(translate(b"CCN", TranslationTable::Standard)?, b"P".to_vec());
        assert_eq!(translate(b"CTB", TranslationTable::Standard)?, b"L".to_vec());
        assert_eq!(translate(b"AGM", TranslationTable::Standard)?, b"X".to_vec());
        assert_eq!(translate(b"ATGTAN", TranslationTable::Standard)?, b"MX".to_vec());
        assert!(translate(b"AUGCGQ", TranslationTable::Standard).is_err());

        // Vertebrate mitochondrial reassignments.
        let chrmt = TranslationTable::VertebrateMitochondrial;
        assert_eq!(translate(b"ATA", chrmt)?, b"M".to_vec());
        assert_eq!(translate(b"AGA", chrmt)?, b"*".to_vec());
        assert_eq!(translate(b"TGA", chrmt)?, b"W".to_vec());

        Ok(())
    }

    #[test]
    fn translate_to_stop_examples() -> Result<(), Error> {
        assert_eq!(
            translate_to_stop(b"ATGGCTTAGTAACCC", TranslationTable::Standard)?,
            b"MA".to_vec()
        );
        assert_eq!(
            translate_to_stop(b"ATGGCT", TranslationTable::Standard)?,
            b"MA".to_vec()
        );
        Ok(())
    }

    #[test]
    fn translate_coding_examples() {
        let table = TranslationTable::Standard;
        assert_eq!(
            translate_coding(b"ATGGCTTGGTAA", table).unwrap(),
            b"MAW".to_vec()
        );
        // CTG is a valid standard-code start and still reads as M.
        assert_eq!(translate_coding(b"CTGGCTTAA", table).unwrap(), b"MA".to_vec());
        assert!(translate_coding(b"GCTGCTTAA", table).is_err());
        assert!(translate_coding(b"ATGGCTGCT", table).is_err());
        assert!(translate_coding(b"ATGTAATGGTAA", table).is_err());
        assert!(translate_coding(b"ATGGCTTA", table).is_err());
    }

    #[test]
    fn aa1_to_aa3_examples() -> Result<(), Error> {
        assert_eq!(aa1_to_aa3(b"")?, "");
        assert_eq!(
            aa1_to_aa3(b"CATSARELAME")?,
            "CysAlaThrSerAlaArgGluLeuAlaMetGlu"
        );
        assert_eq!(aa1_to_aa3(b"*")?, "Ter");
        assert!(aa1_to_aa3(b"J").is_err());
        Ok(())
    }

    #[test]
    fn protein_descriptions() -> Result<(), Error> {
        let descr = |o: &[u8], v: &[u8]| -> Result<String, Error> {
            Ok(protein_description(12, o, v)?.description)
        };

        assert_eq!(descr(b"MAW", b"MAW")?, "p.(=)");
        assert_eq!(descr(b"MAW", b"MCW")?, "p.(Ala2Cys)");
        assert_eq!(descr(b"MAW", b"MA")?, "p.(Trp3*)");
        assert_eq!(descr(b"MAWK", b"MAK")?, "p.(Trp3del)");
        assert_eq!(descr(b"MAWWK", b"MAK")?, "p.(Trp3_Trp4del)");
        assert_eq!(descr(b"MAW", b"MAAW")?, "p.(Ala2dup)");
        assert_eq!(descr(b"MAW", b"MACW")?, "p.(Ala2_Trp3insCys)");
        assert_eq!(descr(b"MAW", b"MAWR")?, "p.(*4Argext*1)");
        assert_eq!(descr(b"MAWK", b"MRRK")?, "p.(Ala2_Trp3delinsArgArg)");

        // A frame-shifted CDS has no certain protein prediction.
        assert_eq!(protein_description(13, b"MAW", b"MC")?.description, "p.?");

        Ok(())
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
