//! Instrument universe loading.

use std::fs;
use std::path::Path;

use crosswatch_core::{Symbol, ValidationError};

use crate::error::CliError;

/// Parsed universe: accepted symbols in file order, plus the lines that
/// failed validation (reported as diagnostics, never fatal).
#[derive(Debug, Default)]
pub struct Universe {
    pub symbols: Vec<Symbol>,
    pub rejected: Vec<(String, ValidationError)>,
}

/// Read a newline-delimited symbol list: upper-cased, blank lines ignored.
pub fn load_universe(path: &Path) -> Result<Universe, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Universe {
        path: path.to_path_buf(),
        source,
    })?;

    let mut universe = Universe::default();
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match Symbol::parse(trimmed) {
            Ok(symbol) => universe.symbols.push(symbol),
            Err(error) => universe.rejected.push((trimmed.to_owned(), error)),
        }
    }

    if universe.symbols.is_empty() && universe.rejected.is_empty() {
        return Err(CliError::EmptyUniverse {
            path: path.to_path_buf(),
        });
    }

    Ok(universe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_symbols_skipping_blanks() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "petr4.sa\n\n  vale3.sa  \n4bad$\n").expect("write fixture");

        let universe = load_universe(file.path()).expect("universe should load");

        let symbols: Vec<&str> = universe.symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(symbols, ["PETR4.SA", "VALE3.SA"]);
        assert_eq!(universe.rejected.len(), 1);
        assert_eq!(universe.rejected[0].0, "4bad$");
    }

    #[test]
    fn missing_file_is_a_universe_error() {
        let err = load_universe(Path::new("/nonexistent/tickers.txt")).expect_err("must fail");
        assert!(matches!(err, CliError::Universe { .. }));
    }
}
