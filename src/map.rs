use std::io::{self, BufRead};

use thiserror::Error;

/// Genotype encoding seeded into every marker's alphabet for missing calls.
pub const MISSING_GENOTYPE: &str = "00";

/// Distinct genotype encodings observed for one marker, in first-observed order.
///
/// ARFF nominal value sets are emitted in iteration order, so the order here is
/// deterministic: the missing code `00` first, then each encoding in the order
/// it was first seen across all transcoded datasets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alphabet {
    values: Vec<String>,
}

impl Alphabet {
    pub fn new() -> Self {
        Self {
            values: vec![MISSING_GENOTYPE.to_string()],
        }
    }

    /// Insert an encoding, keeping set semantics. Returns `true` if it was new.
    pub fn insert(&mut self, encoding: &str) -> bool {
        if self.contains(encoding) {
            false
        } else {
            self.values.push(encoding.to_string());
            true
        }
    }

    pub fn contains(&self, encoding: &str) -> bool {
        self.values.iter().any(|v| v == encoding)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new()
    }
}

/// One marker (SNP) from the map file: its identifier and the alphabet of
/// genotype encodings observed at it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Marker {
    pub id: String,
    pub alphabet: Alphabet,
}

/// Errors raised while building the marker index from a map file.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("map line {line}: expected at least two whitespace-delimited fields, found {found}")]
    FieldCount { line: u64, found: usize },
}

/// Ordered marker list built from a PLINK `.map` file.
///
/// Marker order matches the map file and therefore the genotype column order
/// in the pedigree file. Duplicate marker identifiers are not detected; if
/// present, their alphabets merge and column alignment in the output is
/// corrupted.
#[derive(Clone, Debug)]
pub struct MarkerIndex {
    markers: Vec<Marker>,
}

impl MarkerIndex {
    /// Read a map file, taking the marker identifier from the second field of
    /// each line. Blank lines are skipped.
    pub fn from_reader<R>(reader: R) -> Result<Self, MapError>
    where
        R: BufRead,
    {
        let mut markers = Vec::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let id = trimmed
                .split_whitespace()
                .nth(1)
                .ok_or_else(|| MapError::FieldCount {
                    line: number as u64 + 1,
                    found: count_fields(trimmed),
                })?;

            markers.push(Marker {
                id: id.to_string(),
                alphabet: Alphabet::new(),
            });
        }

        Ok(Self { markers })
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Record one individual's genotype encodings, one per marker in order.
    /// The caller must have checked that `genotypes.len()` equals `self.len()`.
    pub fn observe(&mut self, genotypes: &[String]) {
        for (marker, genotype) in self.markers.iter_mut().zip(genotypes) {
            marker.alphabet.insert(genotype);
        }
    }
}

fn count_fields(line: &str) -> usize {
    line.split_whitespace().count()
}
