//! The output collector: a key/value log plus diagnostic messages.
//!
//! One `Output` lives for one check.  Keys keep their insertion order so the
//! log renders the way the check progressed.

use indexmap::IndexMap;
use serde_json::Value;

/// Severity of a diagnostic message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Severity {
    Info = 1,
    Warning = 2,
    /// The current variant is skipped.
    Error = 3,
    /// The whole check is abandoned.
    Fatal = 4,
}

/// Diagnostic codes emitted by the checker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Code {
    /// `EARGLEN`: length argument does not match the range.
    ArgumentLength,
    /// `ENODNA`: a sequence argument is not DNA.
    NotDna,
    /// `EREF`: a sequence argument does not match the reference.
    ReferenceMismatch,
    /// `ENOVAR`: substitution of a base by itself.
    NoVariation,
    /// `EINSRANGE`: insertion positions are not consecutive.
    InsertionRange,
    /// `EUNKVAR`: the effect of the variant cannot be analysed.
    UnknownEffect,
    /// `EPOS`: invalid IVS/EX position.
    InvalidPosition,
    /// `ENOINTRON`: intronic position on a reference without introns.
    NoIntron,
    /// `ESPLICE`: inconsistent intronic position.
    InvalidIntronic,
    /// `ERANGE`: position outside the reference sequence.
    OutOfRange,
    /// `ERNA`: descriptions on RNA level are not supported.
    RnaReference,
    /// `EINVALIDGENE`: the selected gene does not exist in the record.
    InvalidGene,
    /// `ENOTRANSCRIPT`: no (unique) transcript could be selected.
    NoTranscript,
    /// `EPROT`: protein isoform selectors are not supported.
    ProteinIsoform,
    /// `ESTOP`: in-frame stop codon in the original CDS.
    InFrameStop,
    /// `EUNKNOWN`: internal invariant violation.
    Internal,
    /// `ECDS`: CDS length is not a multiple of three.
    CdsLength,
    /// `ETRANS`: the original CDS could not be translated.
    TranslationFailed,
    /// `WROLL`: the variant was rolled to its most 3' position.
    Roll,
    /// `IROLLBACK`: a roll was clipped at a splice site.
    RollBack,
    /// `WINSDUP`: the insertion is really a duplication.
    InsertionIsDuplication,
    /// `WNOCHANGE`: the variant does not change the sequence.
    NoChange,
    /// `WNOTMINIMAL`: the description was not minimal.
    NotMinimal,
    /// `WWRONGTYPE`: the variant is really of another kind.
    WrongType,
    /// `WOVERSPLICE`: the variant hits one or more splice sites.
    OverSpliceSite,
}

impl Code {
    pub fn as_str(&self) -> &'static str {
        match self {
            Code::ArgumentLength => "EARGLEN",
            Code::NotDna => "ENODNA",
            Code::ReferenceMismatch => "EREF",
            Code::NoVariation => "ENOVAR",
            Code::InsertionRange => "EINSRANGE",
            Code::UnknownEffect => "EUNKVAR",
            Code::InvalidPosition => "EPOS",
            Code::NoIntron => "ENOINTRON",
            Code::InvalidIntronic => "ESPLICE",
            Code::OutOfRange => "ERANGE",
            Code::RnaReference => "ERNA",
            Code::InvalidGene => "EINVALIDGENE",
            Code::NoTranscript => "ENOTRANSCRIPT",
            Code::ProteinIsoform => "EPROT",
            Code::InFrameStop => "ESTOP",
            Code::Internal => "EUNKNOWN",
            Code::CdsLength => "ECDS",
            Code::TranslationFailed => "ETRANS",
            Code::Roll => "WROLL",
            Code::RollBack => "IROLLBACK",
            Code::InsertionIsDuplication => "WINSDUP",
            Code::NoChange => "WNOCHANGE",
            Code::NotMinimal => "WNOTMINIMAL",
            Code::WrongType => "WWRONGTYPE",
            Code::OverSpliceSite => "WOVERSPLICE",
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Message {
    pub severity: Severity,
    pub code: Code,
    pub text: String,
}

/// Collector for the outputs and diagnostics of one check.
#[derive(Debug, Default)]
pub struct Output {
    messages: Vec<Message>,
    data: IndexMap<String, Vec<Value>>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, severity: Severity, code: Code, text: impl Into<String>) {
        let text = text.into();
        log::debug!("{}: {}", code, text);
        self.messages.push(Message {
            severity,
            code,
            text,
        });
    }

    pub fn add_output(&mut self, key: &str, value: impl Into<Value>) {
        self.data.entry(key.to_string()).or_default().push(value.into());
    }

    /// All values recorded under `key`, oldest first.
    pub fn output(&self, key: &str) -> &[Value] {
        self.data.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The most recent value recorded under `key`.
    pub fn last_output(&self, key: &str) -> Option<&Value> {
        self.output(key).last()
    }

    /// The most recent value under `key`, as a string.
    pub fn last_output_str(&self, key: &str) -> Option<&str> {
        self.last_output(key).and_then(Value::as_str)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn has_code(&self, code: Code) -> bool {
        self.messages.iter().any(|m| m.code == code)
    }

    /// `(errors, warnings)` counts over the recorded messages.
    pub fn summary(&self) -> (usize, usize) {
        let errors = self
            .messages
            .iter()
            .filter(|m| m.severity >= Severity::Error)
            .count();
        let warnings = self
            .messages
            .iter()
            .filter(|m| m.severity == Severity::Warning)
            .count();
        (errors, warnings)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn codes_render_canonically() {
        assert_eq!(Code::ArgumentLength.to_string(), "EARGLEN");
        assert_eq!(Code::Roll.to_string(), "WROLL");
        assert_eq!(Code::RollBack.to_string(), "IROLLBACK");
    }

    #[test]
    fn outputs_keep_order_and_history() {
        let mut output = Output::new();
        output.add_output("reference", "AB026906.1");
        output.add_output("geneSymbol", serde_json::json!(["SDHD", "001"]));
        output.add_output("reference", "AB026906.2");

        assert_eq!(output.last_output_str("reference"), Some("AB026906.2"));
        assert_eq!(output.output("reference").len(), 2);
        assert_eq!(output.output("missing"), &[] as &[Value]);
    }

    #[test]
    fn summary_counts() {
        let mut output = Output::new();
        output.add_message(Severity::Warning, Code::Roll, "rolled");
        output.add_message(Severity::Error, Code::OutOfRange, "out of range");
        output.add_message(Severity::Fatal, Code::RnaReference, "rna");
        output.add_message(Severity::Info, Code::RollBack, "clipped");
        assert_eq!(output.summary(), (2, 1));
        assert!(output.has_code(Code::Roll));
        assert!(!output.has_code(Code::NoChange));
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
