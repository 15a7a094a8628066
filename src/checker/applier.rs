//! Per-kind semantic checks and application of raw variants.
//!
//! Each entry point checks its arguments against the reference, runs the
//! normalization that applies to its kind, drives the mutator, and emits the
//! canonical name into the record.

use crate::checker::Error;
use crate::mutator::Mutator;
use crate::normalizer::{
    assess_inversion, classify_delins, splice_aware_shift, DelinsClassification,
    InversionAssessment, Roll,
};
use crate::output::{Code, Output, Severity};
use crate::record::{NamedEdit, Record};
use crate::sequences::{complement, format_range, is_dna};

/// Whether a range edit deletes or duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelDup {
    Deletion,
    Duplication,
}

fn internal_error(output: &mut Output, error: impl std::fmt::Display) -> Error {
    output.add_message(
        Severity::Fatal,
        Code::Internal,
        format!("An unknown error occurred: {}.", error),
    );
    Error::CheckAborted
}

/// Check the optional length-or-sequence argument of a variant.
///
/// A decimal argument must equal the interval length; anything else must be
/// DNA and must match the reference over the interval.
pub fn check_optional_argument(
    reference: &[u8],
    first: i32,
    last: i32,
    argument: Option<&[u8]>,
    output: &mut Output,
) -> Result<(), Error> {
    let Some(argument) = argument else {
        return Ok(());
    };
    if argument.is_empty() {
        return Ok(());
    }

    if argument.iter().all(u8::is_ascii_digit) {
        let length: i64 = String::from_utf8_lossy(argument).parse().unwrap_or(-1);
        let interval = (last - first + 1) as i64;
        if length != interval {
            output.add_message(
                Severity::Error,
                Code::ArgumentLength,
                format!(
                    "The length ({}) differed from that of the range ({}).",
                    length, interval
                ),
            );
            return Err(Error::VariantRejected);
        }
        return Ok(());
    }

    if !is_dna(argument) {
        output.add_message(
            Severity::Fatal,
            Code::NotDna,
            "Invalid letters in argument.",
        );
        return Err(Error::CheckAborted);
    }

    let ref_slice = &reference[(first - 1) as usize..last as usize];
    if ref_slice != argument {
        output.add_message(
            Severity::Error,
            Code::ReferenceMismatch,
            format!(
                "{} not found at position {}, found {} instead.",
                String::from_utf8_lossy(argument),
                format_range(first, last),
                String::from_utf8_lossy(ref_slice),
            ),
        );
        return Err(Error::VariantRejected);
    }

    Ok(())
}

/// Check and apply a substitution, and give it a name.
pub fn apply_substitution(
    position: i32,
    claimed: u8,
    substitute: u8,
    mutator: &mut Mutator,
    record: &mut Record,
    output: &mut Output,
) -> Result<(), Error> {
    if !is_dna(&[substitute]) {
        output.add_message(Severity::Error, Code::NotDna, "Invalid letter in input.");
        return Err(Error::VariantRejected);
    }

    if claimed == substitute {
        output.add_message(
            Severity::Error,
            Code::NoVariation,
            format!(
                "No mutation given ({}>{}) at position {}.",
                claimed as char, substitute as char, position
            ),
        );
    }

    let reference = mutator.orig[(position - 1) as usize];
    mutator
        .substitute(position, substitute)
        .map_err(|e| internal_error(output, e))?;

    record.name(
        position,
        position,
        &NamedEdit::Substitution {
            reference,
            alternative: substitute,
        },
        None,
    );
    Ok(())
}

/// Check and apply a deletion or duplication, and give it a name.
///
/// The interval is rolled to its most 3' position first; on RNA references
/// the roll is clipped at splice sites (`splice_sites` carries the exon
/// position list to clip against).
pub fn apply_deletion_duplication(
    first: i32,
    last: i32,
    kind: DelDup,
    splice_sites: Option<&[i32]>,
    mutator: &mut Mutator,
    record: &mut Record,
    output: &mut Output,
) -> Result<(), Error> {
    let Roll {
        back,
        forward,
        shift,
    } = splice_aware_shift(&mutator.orig, first, last, splice_sites);

    if shift != 0 {
        let new_first = first + shift;
        let new_last = last + shift;
        output.add_message(
            Severity::Warning,
            Code::Roll,
            format!(
                "Sequence \"{}\" at position {} was given, however, the HGVS notation \
                 prescribes that it should be \"{}\" at position {}.",
                mutator.visualise(&mutator.orig[(first - 1) as usize..last as usize]),
                format_range(first, last),
                mutator.visualise(&mutator.orig[(new_first - 1) as usize..new_last as usize]),
                format_range(new_first, new_last),
            ),
        );
    }

    if shift != forward {
        // The full roll was cut short because it crossed a splice site.
        let incorrect_first = first + forward;
        let incorrect_last = last + forward;
        output.add_message(
            Severity::Info,
            Code::RollBack,
            format!(
                "Sequence \"{}\" at position {} was not corrected to \"{}\" at position {}, \
                 since they reside in different exons.",
                mutator.visualise(&mutator.orig[(first - 1) as usize..last as usize]),
                format_range(first, last),
                mutator
                    .visualise(&mutator.orig[(incorrect_first - 1) as usize..incorrect_last as usize]),
                format_range(incorrect_first, incorrect_last),
            ),
        );
    }

    match kind {
        DelDup::Deletion => mutator.delete(first, last),
        DelDup::Duplication => mutator.duplicate(first, last),
    }
    .map_err(|e| internal_error(output, e))?;

    let edit = match kind {
        DelDup::Deletion => NamedEdit::Deletion,
        DelDup::Duplication => NamedEdit::Duplication,
    };
    record.name(first, last, &edit, Some((back, shift)));
    Ok(())
}

/// Check and apply an inversion, and give it a name.
pub fn apply_inversion(
    first: i32,
    last: i32,
    mutator: &mut Mutator,
    record: &mut Record,
    output: &mut Output,
) -> Result<(), Error> {
    let segment = mutator.orig[(first - 1) as usize..last as usize].to_vec();

    let (first, last) = match assess_inversion(&segment) {
        InversionAssessment::Palindrome => {
            output.add_message(
                Severity::Warning,
                Code::NoChange,
                format!(
                    "Sequence \"{}\" at position {}_{} is a palindrome (its own reverse \
                     complement).",
                    mutator.visualise(&segment),
                    first,
                    last
                ),
            );
            return Ok(());
        }
        InversionAssessment::Trim(trim) => {
            output.add_message(
                Severity::Warning,
                Code::NotMinimal,
                format!(
                    "Sequence \"{}\" at position {}_{} is a partial palindrome (the first \
                     {} nucleotide(s) are the reverse complement of the last one(s)), the \
                     HGVS notation prescribes that it should be \"{}\" at position {}_{}.",
                    mutator.visualise(&segment),
                    first,
                    last,
                    trim,
                    mutator.visualise(
                        &mutator.orig[(first + trim - 1) as usize..(last - trim) as usize]
                    ),
                    first + trim,
                    last - trim,
                ),
            );
            (first + trim, last - trim)
        }
        InversionAssessment::AsIs => (first, last),
    };

    if first == last {
        output.add_message(
            Severity::Warning,
            Code::WrongType,
            format!("Inversion at position {} is actually a substitution.", first),
        );
        let reference = mutator.orig[(first - 1) as usize];
        return apply_substitution(
            first,
            reference,
            complement(reference),
            mutator,
            record,
            output,
        );
    }

    mutator
        .invert(first, last)
        .map_err(|e| internal_error(output, e))?;
    record.name(first, last, &NamedEdit::Inversion, None);
    Ok(())
}

/// Check and apply an insertion, and give it a name.
///
/// The insertion is applied first; if the inserted copy together with its
/// roll spans a full preceding copy, the variant is renamed to a
/// duplication, otherwise it is rolled to its most 3' position like a
/// deletion.
pub fn apply_insertion(
    before: i32,
    after: i32,
    seq: &[u8],
    splice_sites: Option<&[i32]>,
    mutator: &mut Mutator,
    record: &mut Record,
    output: &mut Output,
) -> Result<(), Error> {
    if before + 1 != after {
        output.add_message(
            Severity::Error,
            Code::InsertionRange,
            format!("{} and {} are not consecutive positions.", before, after),
        );
        return Err(Error::VariantRejected);
    }

    if seq.is_empty() || !is_dna(seq) {
        output.add_message(
            Severity::Error,
            Code::UnknownEffect,
            "Although the syntax of this variant is correct, the effect can not be analysed.",
        );
        return Err(Error::VariantRejected);
    }

    let insertion_length = seq.len() as i32;

    mutator
        .insert(before, seq)
        .map_err(|e| internal_error(output, e))?;
    let new_before = mutator.shift_pos(before);
    let new_last = new_before + insertion_length;

    let mutated = mutator.mutated().clone();
    let Roll {
        back,
        forward,
        shift,
    } = splice_aware_shift(&mutated, new_before + 1, new_last, splice_sites);

    if back + shift >= insertion_length {
        // The inserted bases duplicate what directly precedes them.
        let rolled =
            &mutated[(new_before + shift) as usize..(new_last + shift) as usize];
        output.add_message(
            Severity::Warning,
            Code::InsertionIsDuplication,
            format!(
                "Insertion of {} at position {}_{} was given, however, the HGVS notation \
                 prescribes that it should be a duplication of {} at position {}_{}.",
                String::from_utf8_lossy(seq),
                before,
                before + 1,
                String::from_utf8_lossy(rolled),
                before + shift,
                before + shift + insertion_length - 1,
            ),
        );
        let after = after + shift - 1;
        let first = after - insertion_length + 1;
        record.name(
            first,
            after,
            &NamedEdit::Duplication,
            Some((back + shift - insertion_length, 0)),
        );
        return Ok(());
    }

    if shift != 0 {
        output.add_message(
            Severity::Warning,
            Code::Roll,
            format!(
                "Insertion of {} at position {}_{} was given, however, the HGVS notation \
                 prescribes that it should be an insertion of {} at position {}_{}.",
                String::from_utf8_lossy(seq),
                before,
                before + 1,
                String::from_utf8_lossy(
                    &mutated[(new_before + shift) as usize..(new_last + shift) as usize]
                ),
                new_before + shift,
                new_before + shift + 1,
            ),
        );
    }
    if shift != forward {
        output.add_message(
            Severity::Info,
            Code::RollBack,
            format!(
                "Insertion of {} at position {}_{} was not corrected to an insertion of {} \
                 at position {}_{}, since they reside in different exons.",
                String::from_utf8_lossy(seq),
                before,
                before + 1,
                String::from_utf8_lossy(
                    &mutated[(new_before + forward) as usize..(new_last + forward) as usize]
                ),
                new_before + forward,
                new_before + forward + 1,
            ),
        );
    }

    let rolled = mutated[(new_before + shift) as usize..(new_last + shift) as usize].to_vec();
    record.name(
        before,
        before + 1,
        &NamedEdit::Insertion { inserted: &rolled },
        Some((back, shift)),
    );
    Ok(())
}

/// Check and apply a delins, reclassifying it when it is really a variant
/// of another kind, and give it a name.
pub fn apply_delins(
    first: i32,
    last: i32,
    deleted: Option<&[u8]>,
    inserted: &[u8],
    splice_sites: Option<&[i32]>,
    mutator: &mut Mutator,
    record: &mut Record,
    output: &mut Output,
) -> Result<(), Error> {
    let deleted = match deleted {
        Some(deleted) => deleted.to_vec(),
        None => mutator.orig[(first - 1) as usize..last as usize].to_vec(),
    };

    let wrong_type = |output: &mut Output, kind: &str| {
        output.add_message(
            Severity::Warning,
            Code::WrongType,
            format!("The given DelIns is actually {}.", kind),
        );
    };

    match classify_delins(&deleted, inserted) {
        DelinsClassification::NoChange => {
            output.add_message(
                Severity::Warning,
                Code::NoChange,
                format!(
                    "Sequence \"{}\" at position {}_{} is identical to the variant.",
                    mutator.visualise(&mutator.orig[(first - 1) as usize..last as usize]),
                    first,
                    last
                ),
            );
            Ok(())
        }
        DelinsClassification::Insertion { lcp, inserted } => {
            wrong_type(output, "an insertion");
            apply_insertion(
                first + lcp - 1,
                first + lcp,
                &inserted,
                splice_sites,
                mutator,
                record,
                output,
            )
        }
        DelinsClassification::Substitution {
            lcp,
            deleted,
            inserted,
        } => {
            wrong_type(output, "a substitution");
            apply_substitution(first + lcp, deleted, inserted, mutator, record, output)
        }
        DelinsClassification::Deletion { lcp, lcs } => {
            wrong_type(output, "a deletion");
            apply_deletion_duplication(
                first + lcp,
                last - lcs,
                DelDup::Deletion,
                splice_sites,
                mutator,
                record,
                output,
            )
        }
        DelinsClassification::Inversion { lcp, lcs } => {
            wrong_type(output, "an inversion");
            apply_inversion(first + lcp, last - lcs, mutator, record, output)
        }
        DelinsClassification::Delins {
            lcp,
            lcs,
            inserted: inserted_trimmed,
        } => {
            if inserted.len() != inserted_trimmed.len() {
                output.add_message(
                    Severity::Warning,
                    Code::NotMinimal,
                    format!(
                        "Sequence \"{}\" at position {}_{} has the same prefix or suffix as \
                         the inserted sequence \"{}\". The HGVS notation prescribes that it \
                         should be \"{}\" at position {}_{}.",
                        mutator.visualise(&mutator.orig[(first - 1) as usize..last as usize]),
                        first,
                        last,
                        String::from_utf8_lossy(inserted),
                        String::from_utf8_lossy(&inserted_trimmed),
                        first + lcp,
                        last - lcs,
                    ),
                );
            }
            mutator
                .delins(first + lcp, last - lcs, &inserted_trimmed)
                .map_err(|e| internal_error(output, e))?;
            record.name(
                first + lcp,
                last - lcs,
                &NamedEdit::Delins {
                    inserted: &inserted_trimmed,
                },
                None,
            );
            Ok(())
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
