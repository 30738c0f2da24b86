//! Header signatures for each section type
//!
//! The registry is built once, validated, and then only read. Rules are
//! matched against an uppercased header line, so accent variants must be
//! spelled out in the pattern itself (`MATI[EÈ]RES`).

use crate::error::SplitError;
use crate::types::SectionType;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Built-in signatures for French labor agreements, in precedence order
const AGREEMENT_SIGNATURES: &[(&str, &[(&str, u8)])] = &[
    (
        "TOC",
        &[(r"^TABLE\s+DES\s+MATI[EÈ]RES", 100), (r"^SOMMAIRE\s*$", 95)],
    ),
    (
        "Lettres_Entente",
        &[
            (r"^LETTRES?\s+D['’]ENTENTE\s+N[O°]?\s*\d+", 100),
            (r"^LETTRES?\s+D['’]ENTENTE", 95),
            (r"^M[ÉE]MORANDU?M", 90),
        ],
    ),
    (
        "Annexe",
        &[
            (r"^ANNEXE\s+[A-Z]\s*[-–—:]", 100),
            (r"^ANNEXE\s+[IVX]+\s*[-–—:]", 100),
            (r"^ANNEXE\s+\d+\s*[-–—:]", 100),
            // page number glued to the heading by the text layer
            (r"^\d+\s+\d+ANNEXE\s+[A-Z]", 95),
        ],
    ),
    (
        "Articles",
        &[
            (r"^CHAPITRE\s+[IVX\d]+\s*[-–—:]", 95),
            (r"^SECTION\s+[IVX\d]+\s*[-–—:]", 95),
        ],
    ),
    (
        "Signatures",
        &[(r"^SIGNATURES?\s*$", 90), (r"^EN\s+FOI\s+DE\s+QUOI", 85)],
    ),
];

/// One matcher with the confidence it awards
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
    confidence: u8,
}

impl PatternRule {
    pub fn new(label: &str, pattern: &str, confidence: u8) -> Result<Self, SplitError> {
        if !(1..=100).contains(&confidence) {
            return Err(SplitError::ConfigError(format!(
                "Confidence {} for pattern '{}' in section {} is outside 1-100",
                confidence, pattern, label
            )));
        }

        let regex = Regex::new(pattern).map_err(|source| SplitError::InvalidPattern {
            label: label.to_string(),
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self { regex, confidence })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Ordered mapping from section type to its rules
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    sections: Vec<(SectionType, Vec<PatternRule>)>,
}

impl PatternRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry for French labor agreements (TOC, letters of understanding,
    /// appendices, chapters, signatures)
    pub fn agreement() -> Result<Self, SplitError> {
        AGREEMENT_SIGNATURES
            .iter()
            .fold(Self::builder(), |builder, (label, rules)| {
                builder.section(*label, rules)
            })
            .build()
    }

    /// Load a registry from a TOML definition file
    pub fn from_toml_file(path: &Path) -> Result<Self, SplitError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SplitError::ConfigError(format!(
                "Cannot read pattern file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse a registry definition:
    ///
    /// ```toml
    /// [[sections]]
    /// label = "TOC"
    /// rules = [{ pattern = '^SOMMAIRE\s*$', confidence = 95 }]
    /// ```
    pub fn from_toml_str(raw: &str) -> Result<Self, SplitError> {
        let file: RegistryFile = toml::from_str(raw)
            .map_err(|e| SplitError::ConfigError(format!("Invalid pattern file: {}", e)))?;

        let mut builder = Self::builder();
        for def in file.sections {
            let rules: Vec<(&str, u8)> = def
                .rules
                .iter()
                .map(|r| (r.pattern.as_str(), r.confidence))
                .collect();
            builder = builder.section(def.label.as_str(), &rules);
        }
        builder.build()
    }

    /// Rules for a label in declaration order; empty for unknown labels
    pub fn rules_for(&self, label: &SectionType) -> &[PatternRule] {
        self.sections
            .iter()
            .find(|(section_type, _)| section_type == label)
            .map(|(_, rules)| rules.as_slice())
            .unwrap_or(&[])
    }

    /// Labels in declaration order
    pub fn labels(&self) -> impl Iterator<Item = &SectionType> {
        self.sections.iter().map(|(section_type, _)| section_type)
    }

    /// Sections with their rules, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&SectionType, &[PatternRule])> {
        self.sections
            .iter()
            .map(|(section_type, rules)| (section_type, rules.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Collects section definitions; everything is validated in `build`
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    sections: Vec<(String, Vec<(String, u8)>)>,
}

impl RegistryBuilder {
    pub fn section(mut self, label: &str, rules: &[(&str, u8)]) -> Self {
        self.sections.push((
            label.to_string(),
            rules
                .iter()
                .map(|(pattern, confidence)| (pattern.to_string(), *confidence))
                .collect(),
        ));
        self
    }

    pub fn build(self) -> Result<PatternRegistry, SplitError> {
        let mut sections: Vec<(SectionType, Vec<PatternRule>)> = Vec::new();

        for (label, rules) in self.sections {
            let label = label.trim();
            if label.is_empty() {
                return Err(SplitError::ConfigError("Section label is empty".into()));
            }
            if sections.iter().any(|(existing, _)| existing.as_str() == label) {
                return Err(SplitError::ConfigError(format!(
                    "Section {} is declared twice",
                    label
                )));
            }
            if rules.is_empty() {
                return Err(SplitError::ConfigError(format!(
                    "Section {} has no rules",
                    label
                )));
            }

            let compiled = rules
                .iter()
                .map(|(pattern, confidence)| PatternRule::new(label, pattern, *confidence))
                .collect::<Result<Vec<_>, _>>()?;

            sections.push((SectionType::new(label), compiled));
        }

        if sections.is_empty() {
            return Err(SplitError::ConfigError(
                "Pattern registry has no sections".into(),
            ));
        }

        Ok(PatternRegistry { sections })
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    sections: Vec<SectionDef>,
}

#[derive(Debug, Deserialize)]
struct SectionDef {
    label: String,
    rules: Vec<RuleDef>,
}

#[derive(Debug, Deserialize)]
struct RuleDef {
    pattern: String,
    confidence: u8,
}
