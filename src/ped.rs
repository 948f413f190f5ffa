use std::{
    fmt,
    io::{self, BufRead},
    str::FromStr,
};

use thiserror::Error;

/// Case/control status code from the sixth pedigree column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phenotype {
    Unaffected,
    Affected,
    Missing,
}

impl Phenotype {
    /// PLINK code as it appears in the pedigree file and in emitted rows.
    pub fn code(self) -> &'static str {
        match self {
            Self::Unaffected => "1",
            Self::Affected => "2",
            Self::Missing => "-9",
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl FromStr for Phenotype {
    type Err = ParseErrorKind;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "1" => Ok(Self::Unaffected),
            "2" => Ok(Self::Affected),
            "-9" => Ok(Self::Missing),
            other => Err(ParseErrorKind::UnknownPhenotype(other.to_string())),
        }
    }
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One pedigree line: the phenotype label plus one genotype encoding per
/// marker, in map order. Each encoding is the order-preserving concatenation
/// of two consecutive allele tokens.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Individual {
    pub line: u64,
    pub phenotype: Phenotype,
    pub genotypes: Vec<String>,
}

/// Iterator over individuals in a PLINK `.ped` file.
pub struct Reader<R> {
    inner: R,
    line: u64,
    buf: String,
}

impl<R> Reader<R>
where
    R: BufRead,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> Iterator for Reader<R>
where
    R: BufRead,
{
    type Item = Result<Individual, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    let trimmed = self.buf.trim_end_matches(&['\n', '\r'][..]);
                    if trimmed.trim().is_empty() {
                        continue;
                    }

                    let line = self.line;
                    return Some(
                        parse_individual(trimmed, line)
                            .map_err(|kind| ParseError { line, kind }),
                    );
                }
                Err(e) => {
                    return Some(Err(ParseError {
                        line: self.line,
                        kind: ParseErrorKind::Io(e),
                    }));
                }
            }
        }
    }
}

/// Errors that can arise while parsing a pedigree line.
#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: u64,
    #[source]
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("expected at least six whitespace-delimited fields, found {0}")]
    FieldCount(usize),
    #[error("unknown phenotype code '{0}'")]
    UnknownPhenotype(String),
    #[error("odd number of allele tokens ({0}) after the phenotype column")]
    UnpairedAllele(usize),
}

fn parse_individual(line: &str, number: u64) -> Result<Individual, ParseErrorKind> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 6 {
        return Err(ParseErrorKind::FieldCount(fields.len()));
    }

    let phenotype: Phenotype = fields[5].parse()?;

    let alleles = &fields[6..];
    if alleles.len() % 2 != 0 {
        return Err(ParseErrorKind::UnpairedAllele(alleles.len()));
    }

    let genotypes = alleles
        .chunks_exact(2)
        .map(|pair| [pair[0], pair[1]].concat())
        .collect();

    Ok(Individual {
        line: number,
        phenotype,
        genotypes,
    })
}
