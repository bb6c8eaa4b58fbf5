use std::io::{self, Write};

use crate::coordinate::SortOutcome;

pub struct Reporter {
    show_file_values: bool,
}

impl Reporter {
    pub fn new(show_file_values: bool) -> Self {
        Self { show_file_values }
    }

    pub fn write<W: Write>(&self, outcome: &SortOutcome, out: &mut W) -> io::Result<()> {
        if self.show_file_values {
            writeln!(out, "Numbers from file: {}", join(&outcome.from_file))?;
            for malformed in &outcome.malformed {
                writeln!(
                    out,
                    "Malformed token {:?} at position {}",
                    malformed.token, malformed.position
                )?;
            }
        }
        writeln!(out, "Sorted numbers:")?;
        writeln!(out, "{}", join(&outcome.sorted))?;
        out.flush()
    }
}

fn join(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::Reporter;
    use crate::{coordinate::SortOutcome, ingest::MalformedToken};
    use eyre::Result;
    use indoc::indoc;

    fn outcome() -> SortOutcome {
        SortOutcome {
            sorted: vec![1, 3, 5, 8, 9],
            from_file: vec![5, 3, 8],
            malformed: vec![MalformedToken {
                position: 4,
                token: String::from("abc"),
            }],
            generated: 2,
        }
    }

    #[test]
    fn sorted_only() -> Result<()> {
        let mut out = Vec::new();
        Reporter::new(false).write(&outcome(), &mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            indoc! {"
                Sorted numbers:
                1 3 5 8 9
            "}
        );
        Ok(())
    }

    #[test]
    fn with_file_values() -> Result<()> {
        let mut out = Vec::new();
        Reporter::new(true).write(&outcome(), &mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            indoc! {r#"
                Numbers from file: 5 3 8
                Malformed token "abc" at position 4
                Sorted numbers:
                1 3 5 8 9
            "#}
        );
        Ok(())
    }
}
