use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::map::MarkerIndex;
use crate::ped::{self, Individual};

/// Errors raised while transcoding a pedigree file into exemplar rows.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error(transparent)]
    Parse(#[from] ped::ParseError),
    #[error("line {line}: pedigree row carries {found} genotypes but the map lists {expected} markers")]
    MarkerCountMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("failed to write exemplar row")]
    Io(#[from] io::Error),
}

/// Per-dataset transcoding counters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TranscodeSummary {
    pub rows_emitted: u64,
    pub missing_phenotype: u64,
}

/// Stream a pedigree file into comma-separated exemplar rows, accumulating
/// each observed genotype encoding into its marker's alphabet.
///
/// Individuals with a missing phenotype contribute neither a row nor alphabet
/// updates. Rows are written as they are read, one per retained individual:
/// genotypes in marker order, then the phenotype code.
///
/// A genotype count differing from the marker count signals a PED/MAP
/// mismatch and aborts the run rather than producing misaligned output.
pub fn transcode<R, W>(
    reader: ped::Reader<R>,
    index: &mut MarkerIndex,
    mut out: W,
) -> Result<TranscodeSummary, TranscodeError>
where
    R: BufRead,
    W: Write,
{
    let mut summary = TranscodeSummary::default();

    for individual in reader {
        let individual = individual?;

        if individual.phenotype.is_missing() {
            summary.missing_phenotype += 1;
            continue;
        }

        if individual.genotypes.len() != index.len() {
            return Err(TranscodeError::MarkerCountMismatch {
                line: individual.line,
                expected: index.len(),
                found: individual.genotypes.len(),
            });
        }

        index.observe(&individual.genotypes);
        write_row(&mut out, &individual)?;
        summary.rows_emitted += 1;
    }

    out.flush()?;
    Ok(summary)
}

fn write_row<W>(out: &mut W, individual: &Individual) -> io::Result<()>
where
    W: Write,
{
    for genotype in &individual.genotypes {
        out.write_all(genotype.as_bytes())?;
        out.write_all(b",")?;
    }
    writeln!(out, "{}", individual.phenotype.code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MarkerIndex;

    fn two_marker_index() -> MarkerIndex {
        MarkerIndex::from_reader(&b"1 rs1 0 1000\n1 rs2 0 2000\n"[..]).expect("map")
    }

    #[test]
    fn writes_rows_and_accumulates_alphabets() {
        let mut index = two_marker_index();
        let ped = b"fam1 ind1 0 0 1 2 A A G T\nfam1 ind2 0 0 2 1 A G G G\n";
        let mut out = Vec::new();

        let summary =
            transcode(ped::Reader::new(&ped[..]), &mut index, &mut out).expect("transcode");

        assert_eq!(summary.rows_emitted, 2);
        assert_eq!(summary.missing_phenotype, 0);
        assert_eq!(out, b"AA,GT,2\nAG,GG,1\n");

        let rs1: Vec<&str> = index.markers()[0].alphabet.iter().collect();
        let rs2: Vec<&str> = index.markers()[1].alphabet.iter().collect();
        assert_eq!(rs1, ["00", "AA", "AG"]);
        assert_eq!(rs2, ["00", "GT", "GG"]);
    }

    #[test]
    fn missing_phenotype_contributes_nothing() {
        let mut index = two_marker_index();
        let ped = b"fam1 ind1 0 0 1 -9 A A G T\nfam1 ind2 0 0 1 1 C C T T\n";
        let mut out = Vec::new();

        let summary =
            transcode(ped::Reader::new(&ped[..]), &mut index, &mut out).expect("transcode");

        assert_eq!(summary.rows_emitted, 1);
        assert_eq!(summary.missing_phenotype, 1);
        assert_eq!(out, b"CC,TT,1\n");
        // The filtered individual's AA/GT never reach the alphabets.
        assert!(!index.markers()[0].alphabet.contains("AA"));
        assert!(!index.markers()[1].alphabet.contains("GT"));
    }

    #[test]
    fn marker_count_mismatch_is_fatal() {
        let mut index = two_marker_index();
        let ped = b"fam1 ind1 0 0 1 2 A A\n";
        let mut out = Vec::new();

        let err = transcode(ped::Reader::new(&ped[..]), &mut index, &mut out).unwrap_err();
        match err {
            TranscodeError::MarkerCountMismatch {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 1);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_errors_propagate_with_line_numbers() {
        let mut index = two_marker_index();
        let ped = b"fam1 ind1 0 0 1 2 A A G T\nfam1 ind2 0 0 1 2 A A G\n";
        let mut out = Vec::new();

        let err = transcode(ped::Reader::new(&ped[..]), &mut index, &mut out).unwrap_err();
        match err {
            TranscodeError::Parse(parse) => assert_eq!(parse.line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_genotypes_do_not_grow_alphabets() {
        let mut index = two_marker_index();
        let ped = b"fam1 ind1 0 0 1 1 A A G T\nfam1 ind2 0 0 1 1 A A G T\n";
        let mut out = Vec::new();

        transcode(ped::Reader::new(&ped[..]), &mut index, &mut out).expect("transcode");
        assert_eq!(index.markers()[0].alphabet.len(), 2);
        assert_eq!(index.markers()[1].alphabet.len(), 2);
    }
}
