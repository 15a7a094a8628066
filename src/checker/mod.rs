//! The checker driver.
//!
//! Takes a parsed description and a retrieved reference record, converts the
//! variant locations to genomic intervals, dispatches each raw variant to
//! the applier, and derives the mRNA and protein consequences together with
//! the canonical descriptions on every axis.

pub mod applier;
mod error;

pub use crate::checker::error::Error;

use serde_json::{json, Value};

use crate::{
    checker::applier::{
        apply_deletion_duplication, apply_delins, apply_insertion, apply_inversion,
        apply_substitution, check_optional_argument, DelDup,
    },
    crossmap::Crossmap,
    description::{
        IntronLoc, IntronSide, Location, ParsedDescription, PointLoc, RawVariant, RefType,
        VariantLocation, Variants,
    },
    mutator,
    mutator::Mutator,
    output::{Code, Output, Severity},
    record::{MolType, Record, SourceType, Transcript, TranscriptMolType},
    sequences::{
        cds_length, is_dna, nsplice, over_splice_site, protein_description, revcomp, splice,
        starts_with_start_codon, translate, translate_coding, translate_to_stop, TranslationTable,
    },
};

/// Configuration for a variant check.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub mutator: mutator::Config,
}

/// Check the variant in `description` against `record` and populate
/// `output` with the canonical descriptions, derived sequences and
/// diagnostics.
///
/// The record accumulates the canonical names; everything else lands in the
/// output log.  A fatal diagnostic abandons the check, leaving whatever was
/// accumulated up to that point.
pub fn check_variant(
    description: &ParsedDescription,
    record: &mut Record,
    config: &Config,
    output: &mut Output,
) {
    output.add_output("inputvariant", description.input.as_str());

    let (record_type, record_id) = if let Some(lrg_acc) = &description.lrg_acc {
        (SourceType::Lrg, lrg_acc.clone())
    } else {
        let record_id = match (&description.ref_seq_acc, &description.version) {
            (Some(acc), Some(version)) => format!("{}.{}", acc, version),
            (Some(acc), None) => acc.clone(),
            _ => record.record_id.clone(),
        };
        (SourceType::GenBank, record_id)
    };

    let (gene_symbol, transcript_id) = if description.lrg_acc.is_some() {
        (
            String::new(),
            description.lrg_transcript_id.clone().unwrap_or_default(),
        )
    } else if let Some(gene) = &description.gene {
        if gene.prot_iso.is_some() {
            output.add_message(
                Severity::Fatal,
                Code::ProteinIsoform,
                "Indexing by protein isoform is not supported.",
            );
        }
        (
            gene.symbol.clone(),
            gene.trans_var.clone().unwrap_or_default(),
        )
    } else {
        (String::new(), String::new())
    };

    output.add_output("recordType", record_type.as_str());
    output.add_output("reference", record_id.as_str());
    // geneSymbol[0] doubles as a filter for batch runs.
    output.add_output("geneSymbol", json!([gene_symbol, transcript_id]));
    // preColon filters out batch entries that would fail identically.
    output.add_output("preColon", description.pre_colon());
    output.add_output("variant", description.post_colon());

    let mut mutator = Mutator::new(record.seq.clone(), config.mutator.clone());

    if process_variant(&mut mutator, description, record, output).is_err() {
        return;
    }

    if derive_protein_descriptions(&mutator, record, output).is_err() {
        return;
    }

    emit_descriptions(description, record, output);

    output.add_output(
        "original",
        String::from_utf8_lossy(&mutator.orig).to_string(),
    );
    output.add_output(
        "mutated",
        String::from_utf8_lossy(mutator.mutated()).to_string(),
    );
}

fn process_variant(
    mutator: &mut Mutator,
    description: &ParsedDescription,
    record: &mut Record,
    output: &mut Output,
) -> Result<(), Error> {
    if matches!(&description.variants, Variants::Allele(set) if set.is_empty()) {
        return Ok(());
    }

    if description.ref_type == RefType::Rna {
        output.add_message(
            Severity::Fatal,
            Code::RnaReference,
            "Descriptions on RNA level are not supported.",
        );
        return Err(Error::CheckAborted);
    }

    let selected = if matches!(description.ref_type, RefType::Coding | RefType::NonCoding) {
        Some(select_transcript(description, record, output)?)
    } else {
        None
    };

    if let Some((gene, transcript)) = selected {
        if !record.gene_list[gene].transcripts[transcript].transcribe {
            return Ok(());
        }
    }

    match &description.variants {
        Variants::Single(variant) => {
            if let Err(Error::CheckAborted) =
                process_raw_variant(mutator, variant, record, selected, output)
            {
                return Err(Error::CheckAborted);
            }
        }
        Variants::Allele(set) => {
            // A rejected variant is skipped; the rest of the allele keeps
            // going against the mutator state as it stood.
            for variant in set {
                if let Err(Error::CheckAborted) =
                    process_raw_variant(mutator, variant, record, selected, output)
                {
                    return Err(Error::CheckAborted);
                }
            }
        }
    }

    let Some((gene, transcript)) = selected else {
        return Ok(());
    };
    if record.gene_list.is_empty() {
        return Ok(());
    }

    derive_transcript_outputs(mutator, record, gene, transcript, output)
}

/// Pick the transcript the description refers to.
///
/// LRG records use their first gene and select by transcript id; GenBank
/// records select the gene by symbol (or uniqueness) and the transcript by
/// its zero-padded variant number (or uniqueness).
fn select_transcript(
    description: &ParsedDescription,
    record: &Record,
    output: &mut Output,
) -> Result<(usize, usize), Error> {
    let mut gene: Option<usize> = None;
    let mut transcript: Option<usize> = None;

    if description.lrg_acc.is_some() {
        if record.gene_list.is_empty() {
            output.add_message(Severity::Fatal, Code::Internal, "An unknown error occurred.");
            return Err(Error::CheckAborted);
        }
        gene = Some(0);
        let lrg_gene = &record.gene_list[0];
        match &description.lrg_transcript_id {
            Some(id) => match lrg_gene.find_locus(id) {
                Some(index) => transcript = Some(index),
                None => output.add_message(
                    Severity::Fatal,
                    Code::NoTranscript,
                    format!(
                        "Multiple transcripts found for gene {}. Please choose from: {}",
                        lrg_gene.name,
                        lrg_gene.list_loci().join(", ")
                    ),
                ),
            },
            None => {
                if lrg_gene.transcripts.len() == 1 {
                    transcript = Some(0);
                } else {
                    output.add_message(
                        Severity::Fatal,
                        Code::NoTranscript,
                        format!(
                            "No transcript given for gene {}. Please choose from: {}",
                            lrg_gene.name,
                            lrg_gene.list_loci().join(", ")
                        ),
                    );
                }
            }
        }
    } else {
        let gene_symbol = description
            .gene
            .as_ref()
            .map(|gene| gene.symbol.as_str())
            .unwrap_or("");
        let transcript_id = description
            .gene
            .as_ref()
            .and_then(|gene| gene.trans_var.as_ref())
            .map(|id| match id.parse::<u32>() {
                Ok(number) => format!("{:03}", number),
                Err(_) => id.clone(),
            });

        if let Some(index) = record.find_gene(gene_symbol) {
            gene = Some(index);
        } else if record.gene_list.len() == 1 && gene_symbol.is_empty() {
            // No gene given and there is only one gene in the record.
            gene = Some(0);
        } else {
            output.add_message(
                Severity::Fatal,
                Code::InvalidGene,
                format!(
                    "Gene {} not found. Please choose from: {}",
                    gene_symbol,
                    record.list_genes().join(", ")
                ),
            );
        }

        if let Some(gene_index) = gene {
            let found = &record.gene_list[gene_index];
            match &transcript_id {
                Some(id) => match found.find_locus(id) {
                    Some(index) => transcript = Some(index),
                    None => output.add_message(
                        Severity::Fatal,
                        Code::NoTranscript,
                        format!(
                            "Multiple transcripts found for gene {}. Please choose from: {}",
                            found.name,
                            found.list_loci().join(", ")
                        ),
                    ),
                },
                None => {
                    if found.transcripts.len() == 1 {
                        transcript = Some(0);
                    } else {
                        output.add_message(
                            Severity::Fatal,
                            Code::NoTranscript,
                            format!(
                                "Multiple transcripts found for gene {}. Please choose from: {}",
                                found.name,
                                found.list_loci().join(", ")
                            ),
                        );
                    }
                }
            }
        }
    }

    // Report what was actually selected.
    let gene_name = gene
        .map(|index| record.gene_list[index].name.clone())
        .unwrap_or_default();
    let transcript_name = match (gene, transcript) {
        (Some(gene), Some(index)) => record.gene_list[gene].transcripts[index].name.clone(),
        _ => String::new(),
    };
    output.add_output("geneSymbol", json!([gene_name, transcript_name]));

    match (gene, transcript) {
        (Some(gene), Some(index)) => Ok((gene, index)),
        _ => {
            // Batch runs skip later entries with the same pre-colon part.
            let pre_colon = output
                .last_output_str("preColon")
                .unwrap_or_default()
                .to_string();
            output.add_output("BatchFlags", json!(["S2", pre_colon]));
            Err(Error::CheckAborted)
        }
    }
}

fn process_raw_variant(
    mutator: &mut Mutator,
    variant: &RawVariant,
    record: &mut Record,
    selected: Option<(usize, usize)>,
    output: &mut Output,
) -> Result<(), Error> {
    let crossmap =
        selected.map(|(gene, index)| record.gene_list[gene].transcripts[index].crossmap.clone());
    let orientation = crossmap.as_ref().map(|cm| cm.orientation).unwrap_or(1);

    // Reverse-strand transcripts hand their sequence arguments over reverse
    // complemented; numeric length arguments pass through untouched.
    let adjust = |argument: &str| -> Vec<u8> {
        let bytes = argument.as_bytes().to_vec();
        if orientation == -1 && is_dna(&bytes) {
            revcomp(&bytes)
        } else {
            bytes
        }
    };

    let (first, last) = resolve_range(variant.location(), record, crossmap.as_ref(), output)?;

    if last < first {
        output.add_message(
            Severity::Error,
            Code::OutOfRange,
            "End position is smaller than the begin position.",
        );
        return Err(Error::VariantRejected);
    }
    if first < 1 {
        output.add_message(
            Severity::Error,
            Code::OutOfRange,
            format!("Position {} is out of range.", first),
        );
        return Err(Error::VariantRejected);
    }
    if last as usize > mutator.orig.len() {
        output.add_message(
            Severity::Error,
            Code::OutOfRange,
            format!("Position {} is out of range.", last),
        );
        return Err(Error::VariantRejected);
    }

    if let Some(cm) = &crossmap {
        if over_splice_site(first, last, cm.splice_sites()) {
            output.add_message(
                Severity::Warning,
                Code::OverSpliceSite,
                "Variant hits one or more splice sites.",
            );
        }
    }

    // On RNA references a roll may not cross a splice site of the annotated
    // transcript.
    let clip_sites: Option<Vec<i32>> = if record.mol_type == MolType::Transcript {
        record
            .gene_list
            .first()
            .and_then(|gene| gene.transcripts.first())
            .map(|transcript| transcript.mrna.clone())
    } else {
        None
    };
    let clip = clip_sites.as_deref();

    match variant {
        RawVariant::Substitution {
            reference,
            alternative,
            ..
        } => {
            if first != last {
                output.add_message(
                    Severity::Error,
                    Code::InvalidPosition,
                    "A substitution must be given a single position.",
                );
                return Err(Error::VariantRejected);
            }
            let claimed = adjust(reference);
            let substitute = adjust(alternative);
            check_optional_argument(&mutator.orig, first, last, Some(claimed.as_slice()), output)?;
            if claimed.len() != 1 || substitute.len() != 1 {
                output.add_message(Severity::Error, Code::NotDna, "Invalid letter in input.");
                return Err(Error::VariantRejected);
            }
            apply_substitution(first, claimed[0], substitute[0], mutator, record, output)
        }
        RawVariant::Deletion { argument, .. } | RawVariant::Duplication { argument, .. } => {
            let argument = argument.as_ref().map(|argument| adjust(argument));
            check_optional_argument(&mutator.orig, first, last, argument.as_deref(), output)?;
            let kind = if matches!(variant, RawVariant::Deletion { .. }) {
                DelDup::Deletion
            } else {
                DelDup::Duplication
            };
            apply_deletion_duplication(first, last, kind, clip, mutator, record, output)
        }
        RawVariant::Inversion { .. } => apply_inversion(first, last, mutator, record, output),
        RawVariant::Insertion { inserted, .. } => {
            let inserted = adjust(inserted);
            apply_insertion(first, last, &inserted, clip, mutator, record, output)
        }
        RawVariant::Delins {
            deleted, inserted, ..
        } => {
            let deleted = deleted.as_ref().map(|deleted| adjust(deleted));
            check_optional_argument(&mutator.orig, first, last, deleted.as_deref(), output)?;
            let inserted = adjust(inserted);
            // A numeric deletion argument only asserts the length; the
            // deleted sequence itself comes from the reference.
            let deleted = deleted.filter(|argument| is_dna(argument));
            apply_delins(
                first,
                last,
                deleted.as_deref(),
                &inserted,
                clip,
                mutator,
                record,
                output,
            )
        }
    }
}

/// Convert a parsed variant location to a genomic interval.
fn resolve_range(
    location: &VariantLocation,
    record: &Record,
    crossmap: Option<&Crossmap>,
    output: &mut Output,
) -> Result<(i32, i32), Error> {
    match location {
        VariantLocation::Exon { first, last } => {
            let range = crossmap.and_then(|cm| exonic_to_genomic(*first, *last, cm));
            match range {
                Some(range) => Ok(range),
                None => {
                    output.add_message(
                        Severity::Error,
                        Code::InvalidPosition,
                        "Invalid EX position given.",
                    );
                    Err(Error::VariantRejected)
                }
            }
        }
        VariantLocation::Range {
            start: Location::Intron(start),
            end,
        } => {
            if record.mol_type != MolType::Genomic {
                output.add_message(
                    Severity::Error,
                    Code::NoIntron,
                    "Intronic position given for a non-genomic reference sequence.",
                );
                return Err(Error::VariantRejected);
            }
            let first = crossmap.and_then(|cm| intronic_to_genomic(start, cm));
            let Some(first) = first else {
                output.add_message(
                    Severity::Error,
                    Code::InvalidPosition,
                    "Invalid IVS position given.",
                );
                return Err(Error::VariantRejected);
            };
            let mut last = first;
            if let Some(Location::Intron(end)) = end {
                let end = crossmap.and_then(|cm| intronic_to_genomic(end, cm));
                let Some(end) = end else {
                    output.add_message(
                        Severity::Error,
                        Code::InvalidPosition,
                        "Invalid IVS position given.",
                    );
                    return Err(Error::VariantRejected);
                };
                last = end;
            }
            if last < first {
                Ok((last, first))
            } else {
                Ok((first, last))
            }
        }
        VariantLocation::Range {
            start: Location::Point(start),
            end,
        } => {
            let end = match end {
                None => start,
                Some(Location::Point(end)) => end,
                Some(Location::Intron(_)) => {
                    output.add_message(
                        Severity::Error,
                        Code::InvalidIntronic,
                        "Invalid intronic position given.",
                    );
                    return Err(Error::VariantRejected);
                }
            };
            if record.mol_type != MolType::Genomic && (start.has_offset() || end.has_offset()) {
                output.add_message(
                    Severity::Error,
                    Code::NoIntron,
                    "Intronic position given for a non-genomic reference sequence.",
                );
                return Err(Error::VariantRejected);
            }
            let range = match crossmap {
                Some(cm) => coding_to_genomic(start, end, cm),
                None => genomic_to_genomic(start, end),
            };
            match range {
                Some(range) => Ok(range),
                None => {
                    output.add_message(
                        Severity::Error,
                        Code::InvalidIntronic,
                        "Invalid intronic position given.",
                    );
                    Err(Error::VariantRejected)
                }
            }
        }
    }
}

fn genomic_to_genomic(start: &PointLoc, end: &PointLoc) -> Option<(i32, i32)> {
    match (&start.main, &end.main) {
        (crate::description::Main::Base(first), crate::description::Main::Base(last)) => {
            Some((*first, *last))
        }
        _ => None,
    }
}

fn coding_to_genomic(start: &PointLoc, end: &PointLoc, cm: &Crossmap) -> Option<(i32, i32)> {
    let first_main = cm.main_to_int(&start.main).ok()?;
    let first_offset = start.offset_value();
    let last_main = cm.main_to_int(&end.main).ok()?;
    let last_offset = end.offset_value();

    let first = cm.x2g(first_main, first_offset).ok()?;
    let last = cm.x2g(last_main, last_offset).ok()?;

    if !cm.check_intronic_position(first_main, first_offset).ok()? {
        return None;
    }
    if !cm.check_intronic_position(last_main, last_offset).ok()? {
        return None;
    }

    if cm.orientation == -1 {
        Some((last, first))
    } else {
        Some((first, last))
    }
}

fn intronic_to_genomic(location: &IntronLoc, cm: &Crossmap) -> Option<i32> {
    let number = location.number as usize;
    if number < 1 || number > cm.number_of_introns() {
        return None;
    }
    let position = match location.side {
        IntronSide::Donor => {
            cm.get_splice_site(2 * number - 1) + cm.orientation * location.offset as i32
        }
        IntronSide::Acceptor => {
            cm.get_splice_site(2 * number) - cm.orientation * location.offset as i32
        }
    };
    Some(position)
}

fn exonic_to_genomic(first_exon: u32, last_exon: Option<u32>, cm: &Crossmap) -> Option<(i32, i32)> {
    let first_exon = first_exon as usize;
    if first_exon < 1 || first_exon > cm.number_of_exons() {
        return None;
    }
    let first = cm.get_splice_site(2 * first_exon - 2);

    let last_exon = last_exon.map(|exon| exon as usize).unwrap_or(first_exon);
    if last_exon < 1 || last_exon > cm.number_of_exons() {
        return None;
    }
    let last = cm.get_splice_site(2 * last_exon - 1);

    if last < first {
        Some((last, first))
    } else {
        Some((first, last))
    }
}

fn translation_failed(output: &mut Output) -> Error {
    output.add_message(
        Severity::Fatal,
        Code::TranslationFailed,
        "Original CDS could not be translated.",
    );
    Error::CheckAborted
}

fn internal_error(output: &mut Output) -> Error {
    output.add_message(Severity::Fatal, Code::Internal, "An unknown error occurred.");
    Error::CheckAborted
}

/// Exon table, CDS bounds, mRNA and protein consequences for the selected
/// transcript.
fn derive_transcript_outputs(
    mutator: &Mutator,
    record: &Record,
    gene: usize,
    transcript: usize,
    output: &mut Output,
) -> Result<(), Error> {
    let transcript = &record.gene_list[gene].transcripts[transcript];
    let cm = &transcript.crossmap;

    for exon in 0..cm.number_of_exons() {
        let acceptor = cm.get_splice_site(2 * exon);
        let donor = cm.get_splice_site(2 * exon + 1);
        output.add_output(
            "exonInfo",
            json!([
                acceptor,
                donor,
                cm.tuple_string(&cm.g2c(acceptor)),
                cm.tuple_string(&cm.g2c(donor)),
            ]),
        );
    }

    if transcript.cds.is_some() {
        let cds_stop = cm.info().2;
        let cds_start_g = cm.x2g(1, 0).map_err(|_| internal_error(output))?;
        let cds_stop_g = cm.x2g(cds_stop, 0).map_err(|_| internal_error(output))?;
        output.add_output("cdsStart_g", cds_start_g);
        output.add_output("cdsStart_c", 1);
        output.add_output("cdsStop_g", cds_stop_g);
        output.add_output("cdsStop_c", cds_stop);
    }

    if transcript.transcribe {
        output.add_output("myTranscriptDescription", transcript.description());
        output.add_output(
            "origMRNA",
            String::from_utf8_lossy(&splice(&mutator.orig, &transcript.mrna)).to_string(),
        );
        output.add_output(
            "mutatedMRNA",
            String::from_utf8_lossy(&splice(
                mutator.mutated(),
                &mutator.shift_sites(&transcript.mrna),
            ))
            .to_string(),
        );
    }

    let Some(cds) = &transcript.cds else {
        return Ok(());
    };
    if !transcript.translate {
        return Ok(());
    }

    let table = TranslationTable::from_ncbi_id(transcript.tx_table).unwrap_or_default();

    let mut cds_original = splice(&mutator.orig, &cds.position_list);
    let new_cds_location = (
        mutator.shift_pos(cds.location.0),
        mutator.shift_pos(cds.location.1),
    );
    let mut cds_variant = nsplice(
        mutator.mutated(),
        &mutator.shift_sites(&transcript.mrna),
        new_cds_location,
        cm.orientation,
    );
    if cm.orientation == -1 {
        cds_original = revcomp(&cds_original);
        cds_variant = revcomp(&cds_variant);
    }

    let full_original = translate(&cds_original, table).map_err(|_| translation_failed(output))?;
    if full_original[..full_original.len().saturating_sub(1)].contains(&b'*') {
        output.add_message(Severity::Error, Code::InFrameStop, "In frame stop codon found.");
        return Ok(());
    }

    let protein_original =
        translate_to_stop(&cds_original, table).map_err(|_| translation_failed(output))?;
    let protein_variant =
        translate_to_stop(&cds_variant, table).map_err(|_| translation_failed(output))?;

    output.add_output(
        "origCDS",
        String::from_utf8_lossy(&cds_original).to_string(),
    );
    let new_cds_end = ((protein_variant.len() + 1) * 3).min(cds_variant.len());
    output.add_output(
        "newCDS",
        String::from_utf8_lossy(&cds_variant[..new_cds_end]).to_string(),
    );
    output.add_output(
        "oldprotein",
        format!("{}*", String::from_utf8_lossy(&protein_original)),
    );

    if protein_variant.is_empty() || protein_variant[0] != b'M' {
        // The start codon is gone; look for an alternative start.
        if cds_variant.len() >= 3 && starts_with_start_codon(&cds_variant[..3], table) {
            output.add_output("newprotein", "?");
            output.add_output(
                "altStart",
                String::from_utf8_lossy(&cds_variant[..3]).to_string(),
            );
            let tail_original = protein_original.get(1..).unwrap_or_default();
            let tail_variant = protein_variant.get(1..).unwrap_or_default();
            if tail_original != tail_variant {
                output.add_output(
                    "altProtein",
                    format!("M{}*", String::from_utf8_lossy(tail_variant)),
                );
            }
        } else {
            output.add_output("newprotein", "?");
        }
    } else {
        let new_cds_length = cds_length(&mutator.shift_sites(&cds.position_list));
        let described = protein_description(new_cds_length, &protein_original, &protein_variant)
            .map_err(|_| translation_failed(output))?;
        output.add_output("myProteinDescription", described.description);
        if protein_original != protein_variant {
            output.add_output(
                "newprotein",
                format!("{}*", String::from_utf8_lossy(&protein_variant)),
            );
        }
    }

    Ok(())
}

/// Derive a protein description for every translated transcript in the
/// record (skipped for allele sets).
fn derive_protein_descriptions(
    mutator: &Mutator,
    record: &mut Record,
    output: &mut Output,
) -> Result<(), Error> {
    for gene_index in 0..record.gene_list.len() {
        for transcript_index in 0..record.gene_list[gene_index].transcripts.len() {
            let transcript = &record.gene_list[gene_index].transcripts[transcript_index];
            if transcript.description().contains(';') || !transcript.translate {
                continue;
            }
            let Some(cds) = transcript.cds.clone() else {
                continue;
            };
            let gene_name = record.gene_list[gene_index].name.clone();
            let transcript_name = transcript.name.clone();
            let mrna = transcript.mrna.clone();
            let orientation = transcript.crossmap.orientation;
            let table = TranslationTable::from_ncbi_id(transcript.tx_table).unwrap_or_default();

            let mut cds_original = splice(&mutator.orig, &cds.position_list);
            let new_cds_location = (
                mutator.shift_pos(cds.location.0),
                mutator.shift_pos(cds.location.1),
            );
            let mut cds_variant = nsplice(
                mutator.mutated(),
                &mutator.shift_sites(&mrna),
                new_cds_location,
                orientation,
            );
            if orientation == -1 {
                cds_original = revcomp(&cds_original);
                cds_variant = revcomp(&cds_variant);
            }

            let described = if cds_original.len() % 3 == 0 {
                let protein_original = match translate_coding(&cds_original, table) {
                    Ok(protein) => protein,
                    Err(_) => return Err(translation_failed(output)),
                };
                let protein_variant = match translate_to_stop(&cds_variant, table) {
                    Ok(protein) => protein,
                    Err(_) => return Err(translation_failed(output)),
                };
                let new_cds_length = cds_length(&mutator.shift_sites(&cds.position_list));
                protein_description(new_cds_length, &protein_original, &protein_variant)
                    .map(|described| described.description)
                    .unwrap_or_else(|_| "?".to_string())
            } else {
                output.add_message(
                    Severity::Warning,
                    Code::CdsLength,
                    format!(
                        "CDS length is not a multiple of three in gene {}, transcript \
                         variant {}.",
                        gene_name, transcript_name
                    ),
                );
                "?".to_string()
            };

            record.gene_list[gene_index].transcripts[transcript_index].protein_description =
                described;
        }
    }
    Ok(())
}

/// One row of the per-transcript description table.
struct NewDescription {
    gene: String,
    transcript: String,
    mol_type: char,
    coding: String,
    protein: String,
    genomic_id: String,
    coding_id: String,
    protein_id: String,
    full: String,
    full_protein: String,
}

fn wrap(description: String) -> String {
    if description.contains(';') {
        format!("[{}]", description)
    } else {
        description
    }
}

/// Emit the canonical descriptions on every axis, the legend, and the batch
/// line.
fn emit_descriptions(description: &ParsedDescription, record: &Record, output: &mut Output) {
    let reference = output
        .last_output_str("reference")
        .unwrap_or(&record.record_id)
        .to_string();

    let generated = wrap(record.description());
    output.add_output(
        "genomicDescription",
        format!("{}:{}.{}", reference, record.mol_type.code(), generated),
    );
    output.add_output(
        "gDescription",
        format!("{}.{}", record.mol_type.code(), generated),
    );
    output.add_output("molType", record.mol_type.code().to_string());

    if let Some(chromosome) = &record.chromosome {
        output.add_output(
            "genomicChromDescription",
            format!(
                "{}:{}.{}",
                chromosome.accession,
                record.mol_type.code(),
                wrap(record.chrom_description())
            ),
        );
    }

    let mut new_descriptions: Vec<NewDescription> = Vec::new();

    for gene in &record.gene_list {
        let mut transcripts: Vec<&Transcript> = gene.transcripts.iter().collect();
        transcripts.sort_by(|a, b| a.name.cmp(&b.name));

        for transcript in transcripts {
            let generated = wrap(transcript.description());
            let mut full = String::new();

            if record.source_type == SourceType::Lrg {
                if !transcript.name.is_empty() {
                    full = format!(
                        "{}t{}:{}.{}",
                        reference,
                        transcript.name,
                        transcript.mol_type.code(),
                        generated
                    );
                    output.add_output("descriptions", full.as_str());
                } else {
                    output.add_output("descriptions", gene.name.as_str());
                }
            } else {
                full = format!(
                    "{}({}_v{}):{}.{}",
                    reference,
                    gene.name,
                    transcript.name,
                    transcript.mol_type.code(),
                    generated
                );
                output.add_output("descriptions", full.as_str());
            }

            let mut coding = String::new();
            let mut protein = String::new();
            let mut full_protein = String::new();
            let mut coding_id = String::new();
            let mut protein_id = String::new();

            if transcript.mol_type == TranscriptMolType::Coding {
                coding = format!("c.{}", generated);
                protein = transcript.protein_description.clone();
                full_protein = if record.source_type == SourceType::Lrg {
                    format!("{}p{}:{}", reference, transcript.name, protein)
                } else {
                    format!("{}({}_i{}):{}", reference, gene.name, transcript.name, protein)
                };
                coding_id = transcript.transcript_id.clone();
                protein_id = transcript.protein_id.clone();
                output.add_output("protDescriptions", full_protein.as_str());
            }

            let row = NewDescription {
                gene: gene.name.clone(),
                transcript: transcript.name.clone(),
                mol_type: transcript.mol_type.code(),
                coding,
                protein,
                genomic_id: String::new(),
                coding_id,
                protein_id,
                full,
                full_protein,
            };
            output.add_output(
                "NewDescriptions",
                json!([
                    row.gene,
                    row.transcript,
                    row.mol_type.to_string(),
                    row.coding,
                    row.protein,
                    row.genomic_id,
                    row.coding_id,
                    row.protein_id,
                    row.full,
                    row.full_protein,
                ]),
            );
            new_descriptions.push(row);

            // The legend excludes nameless transcripts.
            if transcript.name.is_empty() {
                continue;
            }
            output.add_output(
                "legends",
                json!([
                    format!("{}_v{}", gene.name, transcript.name),
                    transcript.transcript_id,
                    transcript.locus_tag,
                    transcript.transcript_product,
                    transcript.link_method,
                ]),
            );
            if transcript.translate {
                output.add_output(
                    "legends",
                    json!([
                        format!("{}_i{}", gene.name, transcript.name),
                        transcript.protein_id,
                        transcript.locus_tag,
                        transcript.protein_product,
                        transcript.link_method,
                    ]),
                );
            }
        }
    }

    output.add_output(
        "geneOfInterest",
        description
            .gene
            .as_ref()
            .map(|gene| {
                json!({
                    "GeneSymbol": gene.symbol,
                    "TransVar": gene.trans_var,
                    "ProtIso": gene.prot_iso,
                })
            })
            .unwrap_or_else(|| json!({})),
    );

    add_batch_output(&new_descriptions, output);
}

/// Reformat the results as one tab-delimited line for batch consumers:
/// 13 fields, 12 tabs.
fn add_batch_output(descriptions: &[NewDescription], output: &mut Output) {
    if descriptions.is_empty() {
        return;
    }
    if output.summary().0 > 0 {
        // There were errors during the run.
        return;
    }

    let (gene_of_interest, transcript_of_interest) = output
        .last_output("geneSymbol")
        .and_then(Value::as_array)
        .map(|pair| {
            (
                pair.first()
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                pair.get(1).and_then(Value::as_str).unwrap_or("").to_string(),
            )
        })
        .unwrap_or_default();

    let reference = output
        .last_output_str("reference")
        .unwrap_or("")
        .to_string();
    let record_type = output
        .output("recordType")
        .first()
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let variant = output.last_output_str("variant").unwrap_or("").to_string();
    let g_description = output
        .output("gDescription")
        .first()
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let mut selected: Option<&NewDescription> = None;
    for row in descriptions {
        if row.gene.contains(gene_of_interest.as_str())
            && row.transcript.contains(transcript_of_interest.as_str())
        {
            if selected.is_some() {
                // More than one transcript matches; leave the per-transcript
                // fields empty and only report the alternatives.
                selected = None;
                break;
            }
            selected = Some(row);
        }
    }

    let mut fields: Vec<String> = Vec::with_capacity(13);
    if let Some(row) = selected {
        let gene = format!(
            "{}_v{:03}",
            row.gene,
            row.transcript.parse::<u32>().unwrap_or(0)
        );
        let gene_coding = if row.coding.is_empty() {
            String::new()
        } else {
            format!("{}:{}", gene, row.coding)
        };
        let gene_protein = if row.protein.is_empty() {
            String::new()
        } else {
            format!("{}:{}", gene, row.protein)
        };

        let mut genomic_acc = row.genomic_id.clone();
        if record_type == "LRG" {
            genomic_acc = reference.clone();
        } else if record_type == "GB" {
            const GENOMIC_PREFIXES: [&str; 7] = ["NC", "NG", "AC", "NT", "NW", "NZ", "NS"];
            if GENOMIC_PREFIXES
                .iter()
                .any(|prefix| reference.starts_with(prefix))
            {
                genomic_acc = reference.clone();
            }
        }

        fields.extend([
            reference,
            gene,
            variant,
            g_description,
            row.coding.clone(),
            row.protein.clone(),
            gene_coding,
            gene_protein,
            genomic_acc,
            row.coding_id.clone(),
            row.protein_id.clone(),
        ]);
    } else {
        for _ in 0..11 {
            fields.push(String::new());
        }
    }

    fields.push(
        descriptions
            .iter()
            .map(|row| row.full.as_str())
            .collect::<Vec<_>>()
            .join("|"),
    );
    fields.push(
        descriptions
            .iter()
            .map(|row| row.full_protein.as_str())
            .collect::<Vec<_>>()
            .join("|"),
    );

    output.add_output("batchDone", fields.join("\t"));
}

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::description::{GeneSelector, Location, Main, PointLoc, VariantLocation};
    use crate::record::{Cds, Chromosome, Gene};

    fn transcript(
        name: &str,
        rna: Vec<i32>,
        cds: Option<(Vec<i32>, (i32, i32))>,
        orientation: i32,
        coding: bool,
    ) -> Transcript {
        let location = cds.as_ref().map(|(_, location)| *location);
        Transcript {
            name: name.to_string(),
            mol_type: if coding {
                TranscriptMolType::Coding
            } else {
                TranscriptMolType::NonCoding
            },
            transcribe: true,
            translate: coding,
            tx_table: 1,
            transcript_id: "NM_002001.2".to_string(),
            protein_id: "NP_001992.1".to_string(),
            locus_tag: String::new(),
            transcript_product: String::new(),
            protein_product: String::new(),
            link_method: "exhaustion".to_string(),
            mrna: rna.clone(),
            cds: cds.map(|(position_list, location)| Cds {
                position_list,
                location,
            }),
            crossmap: Crossmap::new(rna, location, orientation).unwrap(),
            descriptions: Vec::new(),
            protein_description: String::new(),
        }
    }

    fn single_gene_record(seq: &[u8], mol_type: MolType, transcripts: Vec<Transcript>) -> Record {
        let mut record = Record::new(seq.to_vec(), mol_type, "AB026906.1", SourceType::GenBank);
        record.gene_list.push(Gene {
            name: "SDHD".to_string(),
            transcripts,
        });
        record
    }

    fn coding_forward_record() -> Record {
        single_gene_record(
            b"GGGATGGCTTGGTAACCC",
            MolType::Genomic,
            vec![transcript(
                "001",
                vec![1, 18],
                Some((vec![4, 15], (4, 15))),
                1,
                true,
            )],
        )
    }

    fn coding_reverse_record() -> Record {
        single_gene_record(
            b"GGGTTACCAAGCCATCCC",
            MolType::Genomic,
            vec![transcript(
                "001",
                vec![1, 18],
                Some((vec![4, 15], (4, 15))),
                -1,
                true,
            )],
        )
    }

    fn two_exon_record() -> Record {
        single_gene_record(
            b"GGGATGGCTTGTAAGTAAAGGGACTTAACC",
            MolType::Genomic,
            vec![transcript(
                "001",
                vec![1, 10, 21, 30],
                Some((vec![4, 10, 21, 28], (4, 28))),
                1,
                true,
            )],
        )
    }

    fn rna_record() -> Record {
        single_gene_record(
            b"AATTTTTTAAAAAAAA",
            MolType::Transcript,
            vec![transcript("001", vec![1, 6, 10, 16], None, 1, false)],
        )
    }

    fn parsed(
        input: &str,
        ref_type: RefType,
        gene: Option<GeneSelector>,
        variants: Variants,
    ) -> ParsedDescription {
        ParsedDescription {
            input: input.to_string(),
            ref_type,
            ref_seq_acc: input.split(':').next().map(str::to_string),
            version: None,
            lrg_acc: None,
            lrg_transcript_id: None,
            gene,
            variants,
        }
    }

    fn sdhd(trans_var: Option<&str>) -> Option<GeneSelector> {
        Some(GeneSelector {
            symbol: "SDHD".to_string(),
            trans_var: trans_var.map(str::to_string),
            prot_iso: None,
        })
    }

    fn run(record: &mut Record, description: &ParsedDescription) -> Output {
        let mut output = Output::new();
        check_variant(description, record, &Config::default(), &mut output);
        output
    }

    fn run_genomic(seq: &[u8], variant: RawVariant) -> Output {
        let mut record = Record::new(seq.to_vec(), MolType::Genomic, "G1", SourceType::GenBank);
        let description = parsed("G1:g.x", RefType::Genomic, None, Variants::Single(variant));
        run(&mut record, &description)
    }

    #[rstest]
    #[case::substitution(
        RawVariant::Substitution {
            location: VariantLocation::point(5),
            reference: "C".to_string(),
            alternative: "T".to_string(),
        },
        "G1:g.5C>T", "AAACTCGGGTTT", None
    )]
    #[case::deletion(
        RawVariant::Deletion { location: VariantLocation::range(4, 6), argument: None },
        "G1:g.4_6del", "AAAGGGTTT", None
    )]
    #[case::duplication(
        RawVariant::Duplication { location: VariantLocation::range(4, 6), argument: None },
        "G1:g.4_6dup", "AAACCCCCCGGGTTT", None
    )]
    #[case::palindromic_inversion(
        RawVariant::Inversion { location: VariantLocation::range(4, 9) },
        "G1:g.=", "AAACCCGGGTTT", Some(Code::NoChange)
    )]
    #[case::insertion_is_duplication(
        RawVariant::Insertion {
            location: VariantLocation::range(6, 7),
            inserted: "CCC".to_string(),
        },
        "G1:g.4_6dup", "AAACCCCCCGGGTTT", Some(Code::InsertionIsDuplication)
    )]
    #[case::delins_is_substitution(
        RawVariant::Delins {
            location: VariantLocation::range(4, 6),
            deleted: None,
            inserted: "CCG".to_string(),
        },
        "G1:g.6C>G", "AAACCGGGGTTT", Some(Code::WrongType)
    )]
    fn canonicalization_scenarios(
        #[case] variant: RawVariant,
        #[case] expected_description: &str,
        #[case] expected_mutated: &str,
        #[case] expected_code: Option<Code>,
    ) {
        let output = run_genomic(b"AAACCCGGGTTT", variant);
        assert_eq!(
            output.last_output_str("genomicDescription"),
            Some(expected_description)
        );
        assert_eq!(output.last_output_str("mutated"), Some(expected_mutated));
        if let Some(code) = expected_code {
            assert!(output.has_code(code), "expected {}", code);
        }
    }

    #[test]
    fn single_base_deletion_rolls_to_the_3_prime_end() {
        let output = run_genomic(
            b"AAAAAA",
            RawVariant::Deletion {
                location: VariantLocation::range(5, 5),
                argument: None,
            },
        );
        assert_eq!(output.last_output_str("genomicDescription"), Some("G1:g.6del"));
        assert_eq!(output.last_output_str("mutated"), Some("AAAAA"));
        assert!(output.has_code(Code::Roll));
    }

    #[test]
    fn deletions_in_a_repeat_share_a_canonical_name() {
        for (first, last) in [(2, 2), (4, 4), (6, 6)] {
            let output = run_genomic(
                b"ACCCCCA",
                RawVariant::Deletion {
                    location: VariantLocation::range(first, last),
                    argument: None,
                },
            );
            assert_eq!(
                output.last_output_str("genomicDescription"),
                Some("G1:g.6del"),
                "del {}_{}",
                first,
                last
            );
            assert_eq!(output.last_output_str("mutated"), Some("ACCCCA"));
        }
    }

    #[test]
    fn insertion_after_its_own_copy_becomes_a_duplication() {
        let output = run_genomic(
            b"TGACGT",
            RawVariant::Insertion {
                location: VariantLocation::range(4, 5),
                inserted: "AC".to_string(),
            },
        );
        assert_eq!(output.last_output_str("genomicDescription"), Some("G1:g.3_4dup"));
        assert_eq!(output.last_output_str("mutated"), Some("TGACACGT"));
        assert!(output.has_code(Code::InsertionIsDuplication));
    }

    #[test]
    fn delins_reduction_matches_the_direct_variant() {
        let reduced = run_genomic(
            b"AAACCCGGGTTT",
            RawVariant::Delins {
                location: VariantLocation::range(4, 6),
                deleted: None,
                inserted: "CCG".to_string(),
            },
        );
        let direct = run_genomic(
            b"AAACCCGGGTTT",
            RawVariant::Substitution {
                location: VariantLocation::point(6),
                reference: "C".to_string(),
                alternative: "G".to_string(),
            },
        );
        assert_eq!(
            reduced.last_output_str("genomicDescription"),
            direct.last_output_str("genomicDescription")
        );
        assert_eq!(
            reduced.last_output_str("mutated"),
            direct.last_output_str("mutated")
        );
    }

    #[test]
    fn length_argument_must_match_the_range() {
        let output = run_genomic(
            b"AAACCCGGGTTT",
            RawVariant::Deletion {
                location: VariantLocation::range(4, 6),
                argument: Some("4".to_string()),
            },
        );
        assert!(output.has_code(Code::ArgumentLength));
        assert_eq!(output.last_output_str("genomicDescription"), Some("G1:g.="));
        assert_eq!(output.last_output_str("mutated"), Some("AAACCCGGGTTT"));
    }

    #[test]
    fn sequence_argument_must_match_the_reference() {
        let output = run_genomic(
            b"AAACCCGGGTTT",
            RawVariant::Deletion {
                location: VariantLocation::range(4, 6),
                argument: Some("CCG".to_string()),
            },
        );
        assert!(output.has_code(Code::ReferenceMismatch));
        assert_eq!(output.last_output_str("mutated"), Some("AAACCCGGGTTT"));
    }

    #[test]
    fn matching_arguments_pass() {
        for argument in ["3", "CCC"] {
            let output = run_genomic(
                b"AAACCCGGGTTT",
                RawVariant::Deletion {
                    location: VariantLocation::range(4, 6),
                    argument: Some(argument.to_string()),
                },
            );
            assert_eq!(
                output.last_output_str("genomicDescription"),
                Some("G1:g.4_6del"),
                "argument {}",
                argument
            );
        }
    }

    #[test]
    fn substitution_by_the_same_base_warns_and_applies() {
        let output = run_genomic(
            b"AAACCCGGGTTT",
            RawVariant::Substitution {
                location: VariantLocation::point(5),
                reference: "C".to_string(),
                alternative: "C".to_string(),
            },
        );
        assert!(output.has_code(Code::NoVariation));
        assert_eq!(output.last_output_str("mutated"), Some("AAACCCGGGTTT"));
    }

    #[test]
    fn out_of_range_variants_are_skipped() {
        let output = run_genomic(
            b"AAACCCGGGTTT",
            RawVariant::Deletion {
                location: VariantLocation::range(10, 13),
                argument: None,
            },
        );
        assert!(output.has_code(Code::OutOfRange));
        assert_eq!(output.last_output_str("genomicDescription"), Some("G1:g.="));

        let output = run_genomic(
            b"AAACCCGGGTTT",
            RawVariant::Deletion {
                location: VariantLocation::range(6, 4),
                argument: None,
            },
        );
        assert!(output.has_code(Code::OutOfRange));
    }

    #[test]
    fn chromosomal_slices_also_report_chromosomal_descriptions() {
        let mut record =
            Record::new(b"AAACCCGGGTTT".to_vec(), MolType::Genomic, "G1", SourceType::GenBank);
        record.chromosome = Some(Chromosome {
            accession: "NC_000011.9".to_string(),
            offset: 5001,
        });
        let description = parsed(
            "G1:g.4_6del",
            RefType::Genomic,
            None,
            Variants::Single(RawVariant::Deletion {
                location: VariantLocation::range(4, 6),
                argument: None,
            }),
        );
        let output = run(&mut record, &description);
        assert_eq!(output.last_output_str("genomicDescription"), Some("G1:g.4_6del"));
        assert_eq!(
            output.last_output_str("genomicChromDescription"),
            Some("NC_000011.9:g.5004_5006del")
        );
    }

    #[test]
    fn rna_descriptions_are_rejected() {
        let mut record =
            Record::new(b"AAACCCGGGTTT".to_vec(), MolType::Genomic, "G1", SourceType::GenBank);
        let description = parsed(
            "G1:r.5c>u",
            RefType::Rna,
            None,
            Variants::Single(RawVariant::Substitution {
                location: VariantLocation::point(5),
                reference: "C".to_string(),
                alternative: "T".to_string(),
            }),
        );
        let output = run(&mut record, &description);
        assert!(output.has_code(Code::RnaReference));
        assert!(output.last_output("genomicDescription").is_none());
        assert!(output.last_output("mutated").is_none());
    }

    #[test]
    fn allele_sets_apply_in_order_on_one_mutator() {
        let mut record =
            Record::new(b"AAACCCGGGTTT".to_vec(), MolType::Genomic, "G1", SourceType::GenBank);
        let description = parsed(
            "G1:g.[4_6del;10T>A]",
            RefType::Genomic,
            None,
            Variants::Allele(vec![
                RawVariant::Deletion {
                    location: VariantLocation::range(4, 6),
                    argument: None,
                },
                RawVariant::Substitution {
                    location: VariantLocation::point(10),
                    reference: "T".to_string(),
                    alternative: "A".to_string(),
                },
            ]),
        );
        let output = run(&mut record, &description);
        assert_eq!(
            output.last_output_str("genomicDescription"),
            Some("G1:g.[4_6del;10T>A]")
        );
        assert_eq!(output.last_output_str("mutated"), Some("AAAGGGATT"));
    }

    #[test]
    fn failing_allele_member_is_skipped() {
        let mut record =
            Record::new(b"AAACCCGGGTTT".to_vec(), MolType::Genomic, "G1", SourceType::GenBank);
        let description = parsed(
            "G1:g.[4_6del5;10T>A]",
            RefType::Genomic,
            None,
            Variants::Allele(vec![
                RawVariant::Deletion {
                    location: VariantLocation::range(4, 6),
                    argument: Some("5".to_string()),
                },
                RawVariant::Substitution {
                    location: VariantLocation::point(10),
                    reference: "T".to_string(),
                    alternative: "A".to_string(),
                },
            ]),
        );
        let output = run(&mut record, &description);
        assert!(output.has_code(Code::ArgumentLength));
        assert_eq!(output.last_output_str("genomicDescription"), Some("G1:g.10T>A"));
        assert_eq!(output.last_output_str("mutated"), Some("AAACCCGGGATT"));
    }

    #[test]
    fn coding_substitution_derives_all_consequences() {
        let mut record = coding_forward_record();
        let description = parsed(
            "AB026906.1:c.8G>A",
            RefType::Coding,
            sdhd(None),
            Variants::Single(RawVariant::Substitution {
                location: VariantLocation::point(8),
                reference: "G".to_string(),
                alternative: "A".to_string(),
            }),
        );
        let output = run(&mut record, &description);

        assert_eq!(
            output.last_output_str("genomicDescription"),
            Some("AB026906.1:g.11G>A")
        );
        assert_eq!(
            output.output("descriptions").first().and_then(Value::as_str),
            Some("AB026906.1(SDHD_v001):c.8G>A")
        );
        assert_eq!(
            output.output("protDescriptions").first().and_then(Value::as_str),
            Some("AB026906.1(SDHD_i001):p.(Trp3*)")
        );

        assert_eq!(output.last_output_str("origMRNA"), Some("GGGATGGCTTGGTAACCC"));
        assert_eq!(output.last_output_str("mutatedMRNA"), Some("GGGATGGCTTAGTAACCC"));
        assert_eq!(output.last_output_str("origCDS"), Some("ATGGCTTGGTAA"));
        assert_eq!(output.last_output_str("newCDS"), Some("ATGGCTTAG"));
        assert_eq!(output.last_output_str("oldprotein"), Some("MAW*"));
        assert_eq!(output.last_output_str("newprotein"), Some("MA*"));
        assert_eq!(output.last_output_str("myProteinDescription"), Some("p.(Trp3*)"));

        assert_eq!(output.last_output("cdsStart_g"), Some(&json!(4)));
        assert_eq!(output.last_output("cdsStart_c"), Some(&json!(1)));
        assert_eq!(output.last_output("cdsStop_g"), Some(&json!(15)));
        assert_eq!(output.last_output("cdsStop_c"), Some(&json!(12)));
        assert_eq!(
            output.output("exonInfo").to_vec(),
            vec![json!([1, 18, "-3", "*3"])]
        );

        let legends = output.output("legends");
        assert_eq!(legends.len(), 2);
        assert_eq!(legends[0][0], json!("SDHD_v001"));
        assert_eq!(legends[1][0], json!("SDHD_i001"));

        let batch = output.last_output_str("batchDone").unwrap().to_string();
        let fields: Vec<&str> = batch.split('\t').collect();
        assert_eq!(fields.len(), 13);
        assert_eq!(fields[0], "AB026906.1");
        assert_eq!(fields[1], "SDHD_v001");
        assert_eq!(fields[2], "c.8G>A");
        assert_eq!(fields[3], "g.11G>A");
        assert_eq!(fields[4], "c.8G>A");
        assert_eq!(fields[5], "p.(Trp3*)");
        assert_eq!(fields[6], "SDHD_v001:c.8G>A");
        assert_eq!(fields[7], "SDHD_v001:p.(Trp3*)");
        assert_eq!(fields[8], "");
        assert_eq!(fields[9], "NM_002001.2");
        assert_eq!(fields[10], "NP_001992.1");
        assert_eq!(fields[11], "AB026906.1(SDHD_v001):c.8G>A");
        assert_eq!(fields[12], "AB026906.1(SDHD_i001):p.(Trp3*)");
    }

    #[test]
    fn reverse_strand_naming_and_consequences() {
        let mut record = coding_reverse_record();
        let description = parsed(
            "AB026906.1:c.8G>A",
            RefType::Coding,
            sdhd(None),
            Variants::Single(RawVariant::Substitution {
                location: VariantLocation::point(8),
                reference: "G".to_string(),
                alternative: "A".to_string(),
            }),
        );
        let output = run(&mut record, &description);

        assert_eq!(
            output.last_output_str("genomicDescription"),
            Some("AB026906.1:g.8C>T")
        );
        assert_eq!(
            output.output("descriptions").first().and_then(Value::as_str),
            Some("AB026906.1(SDHD_v001):c.8G>A")
        );
        assert_eq!(
            output.output("protDescriptions").first().and_then(Value::as_str),
            Some("AB026906.1(SDHD_i001):p.(Trp3*)")
        );
        assert_eq!(output.last_output_str("origCDS"), Some("ATGGCTTGGTAA"));
        assert_eq!(output.last_output_str("oldprotein"), Some("MAW*"));
        assert_eq!(output.last_output_str("newprotein"), Some("MA*"));
        assert_eq!(output.last_output("cdsStart_g"), Some(&json!(15)));
        assert_eq!(output.last_output("cdsStop_g"), Some(&json!(4)));
        assert_eq!(
            output.output("exonInfo").to_vec(),
            vec![json!([1, 18, "*3", "-3"])]
        );
    }

    #[test]
    fn intron_locations_resolve_through_the_splice_sites() {
        let mut record = two_exon_record();
        let description = parsed(
            "AB026906.1:c.IVS1+2del",
            RefType::Coding,
            sdhd(None),
            Variants::Single(RawVariant::Deletion {
                location: VariantLocation::Range {
                    start: Location::Intron(IntronLoc {
                        number: 1,
                        side: IntronSide::Donor,
                        offset: 2,
                    }),
                    end: None,
                },
                argument: None,
            }),
        );
        let output = run(&mut record, &description);
        assert_eq!(
            output.last_output_str("genomicDescription"),
            Some("AB026906.1:g.12del")
        );
        assert_eq!(
            output.output("descriptions").first().and_then(Value::as_str),
            Some("AB026906.1(SDHD_v001):c.7+2del")
        );
        assert_eq!(
            output.output("protDescriptions").first().and_then(Value::as_str),
            Some("AB026906.1(SDHD_i001):p.(=)")
        );

        let mut record = two_exon_record();
        let description = parsed(
            "AB026906.1:c.IVS1-2del",
            RefType::Coding,
            sdhd(None),
            Variants::Single(RawVariant::Deletion {
                location: VariantLocation::Range {
                    start: Location::Intron(IntronLoc {
                        number: 1,
                        side: IntronSide::Acceptor,
                        offset: 2,
                    }),
                    end: None,
                },
                argument: None,
            }),
        );
        let output = run(&mut record, &description);
        assert_eq!(
            output.last_output_str("genomicDescription"),
            Some("AB026906.1:g.19del")
        );
        assert_eq!(
            output.output("descriptions").first().and_then(Value::as_str),
            Some("AB026906.1(SDHD_v001):c.8-2del")
        );
    }

    #[test]
    fn exon_locations_span_whole_exons() {
        let mut record = two_exon_record();
        let description = parsed(
            "AB026906.1:c.EX2del",
            RefType::Coding,
            sdhd(None),
            Variants::Single(RawVariant::Deletion {
                location: VariantLocation::Exon {
                    first: 2,
                    last: None,
                },
                argument: None,
            }),
        );
        let output = run(&mut record, &description);
        assert_eq!(
            output.last_output_str("genomicDescription"),
            Some("AB026906.1:g.21_30del")
        );
        assert_eq!(
            output.output("descriptions").first().and_then(Value::as_str),
            Some("AB026906.1(SDHD_v001):c.8_*2del")
        );
    }

    #[test]
    fn variants_crossing_a_splice_site_warn() {
        let mut record = two_exon_record();
        let description = parsed(
            "AB026906.1:c.7_7+2del",
            RefType::Coding,
            sdhd(None),
            Variants::Single(RawVariant::Deletion {
                location: VariantLocation::Range {
                    start: Location::Point(PointLoc::base(7)),
                    end: Some(Location::Point(PointLoc::with_offset(Main::Base(7), 2))),
                },
                argument: None,
            }),
        );
        let output = run(&mut record, &description);
        assert!(output.has_code(Code::OverSpliceSite));
    }

    #[test]
    fn rolls_clip_at_splice_sites_on_rna_references() {
        let mut record = rna_record();
        let description = parsed(
            "NR_000001.1:n.4del",
            RefType::NonCoding,
            sdhd(None),
            Variants::Single(RawVariant::Deletion {
                location: VariantLocation::point(4),
                argument: None,
            }),
        );
        let output = run(&mut record, &description);
        assert!(output.has_code(Code::Roll));
        assert!(output.has_code(Code::RollBack));
        assert_eq!(
            output.last_output_str("genomicDescription"),
            Some("NR_000001.1:n.6del")
        );
        assert_eq!(
            output.output("descriptions").first().and_then(Value::as_str),
            Some("NR_000001.1(SDHD_v001):n.6del")
        );
        assert_eq!(output.last_output_str("mutated"), Some("AATTTTTAAAAAAAA"));
    }

    #[test]
    fn intronic_offsets_need_a_genomic_reference() {
        let mut record = rna_record();
        let description = parsed(
            "NR_000001.1:n.4+1del",
            RefType::NonCoding,
            sdhd(None),
            Variants::Single(RawVariant::Deletion {
                location: VariantLocation::Range {
                    start: Location::Point(PointLoc::with_offset(Main::Base(4), 1)),
                    end: None,
                },
                argument: None,
            }),
        );
        let output = run(&mut record, &description);
        assert!(output.has_code(Code::NoIntron));
        assert_eq!(output.last_output_str("mutated"), Some("AATTTTTTAAAAAAAA"));
    }

    #[test]
    fn start_codon_loss_reports_an_alternative_start() {
        let mut record = coding_forward_record();
        let description = parsed(
            "AB026906.1:c.1A>T",
            RefType::Coding,
            sdhd(None),
            Variants::Single(RawVariant::Substitution {
                location: VariantLocation::point(1),
                reference: "A".to_string(),
                alternative: "T".to_string(),
            }),
        );
        let output = run(&mut record, &description);
        assert_eq!(output.last_output_str("newprotein"), Some("?"));
        assert_eq!(output.last_output_str("altStart"), Some("TTG"));
        assert!(output.last_output("altProtein").is_none());
        assert_eq!(
            output.output("protDescriptions").first().and_then(Value::as_str),
            Some("AB026906.1(SDHD_i001):p.(Met1Leu)")
        );
    }

    #[test]
    fn in_frame_stop_in_the_reference_aborts_protein_work() {
        let mut record = single_gene_record(
            b"GGGATGTAATGGTAACCC",
            MolType::Genomic,
            vec![transcript(
                "001",
                vec![1, 18],
                Some((vec![4, 15], (4, 15))),
                1,
                true,
            )],
        );
        let description = parsed(
            "AB026906.1:c.8G>A",
            RefType::Coding,
            sdhd(None),
            Variants::Single(RawVariant::Substitution {
                location: VariantLocation::point(8),
                reference: "G".to_string(),
                alternative: "A".to_string(),
            }),
        );
        let output = run(&mut record, &description);
        assert!(output.has_code(Code::InFrameStop));
        assert!(output.has_code(Code::TranslationFailed));
        assert!(output.last_output("genomicDescription").is_none());
    }

    #[test]
    fn ambiguous_transcript_selection_is_fatal() {
        let mut record = single_gene_record(
            b"GGGATGGCTTGGTAACCC",
            MolType::Genomic,
            vec![
                transcript("001", vec![1, 18], Some((vec![4, 15], (4, 15))), 1, true),
                transcript("002", vec![1, 18], Some((vec![4, 15], (4, 15))), 1, true),
            ],
        );
        let description = parsed(
            "AB026906.1:c.8G>A",
            RefType::Coding,
            sdhd(None),
            Variants::Single(RawVariant::Substitution {
                location: VariantLocation::point(8),
                reference: "G".to_string(),
                alternative: "A".to_string(),
            }),
        );
        let output = run(&mut record, &description);
        assert!(output.has_code(Code::NoTranscript));
        assert_eq!(
            output.last_output("geneSymbol"),
            Some(&json!(["SDHD", ""]))
        );
        assert_eq!(
            output.last_output("BatchFlags"),
            Some(&json!(["S2", "AB026906.1"]))
        );
        assert!(output.last_output("genomicDescription").is_none());
    }

    #[test]
    fn transcript_selection_by_variant_number() {
        let mut record = single_gene_record(
            b"GGGATGGCTTGGTAACCC",
            MolType::Genomic,
            vec![
                transcript("001", vec![1, 18], Some((vec![4, 15], (4, 15))), 1, true),
                transcript("002", vec![1, 18], Some((vec![4, 15], (4, 15))), 1, true),
            ],
        );
        let description = parsed(
            "AB026906.1:c.8G>A",
            RefType::Coding,
            sdhd(Some("2")),
            Variants::Single(RawVariant::Substitution {
                location: VariantLocation::point(8),
                reference: "G".to_string(),
                alternative: "A".to_string(),
            }),
        );
        let output = run(&mut record, &description);
        assert_eq!(
            output.last_output("geneSymbol"),
            Some(&json!(["SDHD", "002"]))
        );
        assert_eq!(
            output.last_output_str("genomicDescription"),
            Some("AB026906.1:g.11G>A")
        );
    }

    #[test]
    fn unknown_genes_are_rejected() {
        let mut record = coding_forward_record();
        let description = parsed(
            "AB026906.1:c.8G>A",
            RefType::Coding,
            Some(GeneSelector {
                symbol: "BRCA1".to_string(),
                trans_var: None,
                prot_iso: None,
            }),
            Variants::Single(RawVariant::Substitution {
                location: VariantLocation::point(8),
                reference: "G".to_string(),
                alternative: "A".to_string(),
            }),
        );
        let output = run(&mut record, &description);
        assert!(output.has_code(Code::InvalidGene));
        assert!(output.last_output("BatchFlags").is_some());
    }

    #[test]
    fn protein_isoform_selectors_are_not_supported() {
        let mut record = coding_forward_record();
        let description = parsed(
            "AB026906.1(SDHD_i001):c.8G>A",
            RefType::Coding,
            Some(GeneSelector {
                symbol: "SDHD".to_string(),
                trans_var: None,
                prot_iso: Some("001".to_string()),
            }),
            Variants::Single(RawVariant::Substitution {
                location: VariantLocation::point(8),
                reference: "G".to_string(),
                alternative: "A".to_string(),
            }),
        );
        let output = run(&mut record, &description);
        assert!(output.has_code(Code::ProteinIsoform));
    }

    #[test]
    fn lrg_references_select_by_transcript_id() {
        let mut record = single_gene_record(
            b"GGGATGGCTTGGTAACCC",
            MolType::Genomic,
            vec![transcript("1", vec![1, 18], Some((vec![4, 15], (4, 15))), 1, true)],
        );
        record.source_type = SourceType::Lrg;
        record.record_id = "LRG_9".to_string();
        let description = ParsedDescription {
            input: "LRG_9t1:c.8G>A".to_string(),
            ref_type: RefType::Coding,
            ref_seq_acc: None,
            version: None,
            lrg_acc: Some("LRG_9".to_string()),
            lrg_transcript_id: Some("1".to_string()),
            gene: None,
            variants: Variants::Single(RawVariant::Substitution {
                location: VariantLocation::point(8),
                reference: "G".to_string(),
                alternative: "A".to_string(),
            }),
        };
        let output = run(&mut record, &description);

        assert_eq!(output.last_output_str("reference"), Some("LRG_9"));
        assert_eq!(
            output.output("recordType").first().and_then(Value::as_str),
            Some("LRG")
        );
        assert_eq!(
            output.output("descriptions").first().and_then(Value::as_str),
            Some("LRG_9t1:c.8G>A")
        );
        assert_eq!(
            output.output("protDescriptions").first().and_then(Value::as_str),
            Some("LRG_9p1:p.(Trp3*)")
        );

        let batch = output.last_output_str("batchDone").unwrap().to_string();
        let fields: Vec<&str> = batch.split('\t').collect();
        assert_eq!(fields.len(), 13);
        assert_eq!(fields[1], "SDHD_v001");
        assert_eq!(fields[8], "LRG_9");
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
