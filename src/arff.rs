use std::io::{self, Read, Write};

use crate::map::MarkerIndex;
use crate::ped::Phenotype;

/// Write a complete ARFF document: a header derived from the finalized marker
/// index, then the exemplars file copied verbatim as the data section.
///
/// The index must not be transcoded into after this point; callers emit only
/// once every dataset (primary and validation) has been transcoded, so the
/// attribute alphabets are complete. The phenotype attribute is always the
/// closed set `{1,2}` since missing-phenotype rows never reach the exemplars
/// file.
pub fn write_arff<W, R>(
    mut out: W,
    relation: &str,
    index: &MarkerIndex,
    mut exemplars: R,
) -> io::Result<()>
where
    W: Write,
    R: Read,
{
    writeln!(out, "@relation '{relation}'")?;

    for marker in index.markers() {
        let values: Vec<&str> = marker.alphabet.iter().collect();
        writeln!(out, "@attribute {} {{{}}}", marker.id, values.join(","))?;
    }
    writeln!(
        out,
        "@attribute phenotype {{{},{}}}",
        Phenotype::Unaffected.code(),
        Phenotype::Affected.code()
    )?;

    writeln!(out, "@data")?;
    io::copy(&mut exemplars, &mut out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MarkerIndex;

    #[test]
    fn emits_header_then_verbatim_data() {
        let mut index = MarkerIndex::from_reader(&b"1 rs1 0 1000\n1 rs2 0 2000\n"[..]).unwrap();
        index.observe(&["AA".to_string(), "GT".to_string()]);

        let mut out = Vec::new();
        write_arff(&mut out, "study", &index, &b"AA,GT,2\n"[..]).expect("write");

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "@relation 'study'\n\
             @attribute rs1 {00,AA}\n\
             @attribute rs2 {00,GT}\n\
             @attribute phenotype {1,2}\n\
             @data\n\
             AA,GT,2\n"
        );
    }

    #[test]
    fn unobserved_marker_declares_only_missing_code() {
        let index = MarkerIndex::from_reader(&b"1 rs1 0 1000\n"[..]).unwrap();

        let mut out = Vec::new();
        write_arff(&mut out, "empty", &index, &b""[..]).expect("write");

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("@attribute rs1 {00}\n"));
        assert!(text.ends_with("@data\n"));
    }
}
