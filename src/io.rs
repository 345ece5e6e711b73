use std::io::Write;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use thiserror::Error;

use crate::error::Error;
use crate::graph::{DirectedGraph, Multigraph};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: cannot parse {token:?} as an integer")]
    Parse { line: usize, token: String },
    #[error("line {line}: expected {expected} entries, found {found}")]
    Shape { line: usize, expected: usize, found: usize },
    #[error(transparent)]
    Graph(#[from] Error),
}

fn parse_line(line: usize, text: &str) -> Result<Vec<i64>, IoError> {
    text.split_whitespace()
        .map(|token| token.parse().map_err(|_| IoError::Parse { line, token: token.to_owned() }))
        .collect()
}

/// Reads an adjacency matrix: the first non-empty line holds the number of
/// vertices n, the next n non-empty lines one row of n integers each.
/// Line numbers in errors start at 1.
/// ```
/// let m = multidigraph_distance::io::parse_matrix("2\n0 3\n1 0\n").unwrap();
/// assert_eq!(m[(0, 1)], 3);
/// ```
pub fn parse_matrix(text: &str) -> Result<Array2<i64>, IoError> {
    let mut lines = (1..).zip(text.lines()).filter(|(_, l)| !l.trim().is_empty());
    let Some((first, header)) = lines.next() else {
        return Ok(Array2::zeros((0, 0)));
    };
    let header_values = parse_line(first, header)?;
    let n = match header_values[..] {
        [n] if n >= 0 => n as usize,
        _ => return Err(IoError::Parse { line: first, token: header.trim().to_owned() }),
    };

    // grows with the rows actually read
    let mut entries = Vec::new();
    let mut last = first;
    for _ in 0..n {
        let Some((line, row)) = lines.next() else {
            return Err(IoError::Shape { line: last + 1, expected: n, found: 0 });
        };
        let row = parse_line(line, row)?;
        if row.len() != n {
            return Err(IoError::Shape { line, expected: n, found: row.len() });
        }
        entries.extend(row);
        last = line;
    }
    if let Some((line, extra)) = lines.next() {
        return Err(IoError::Shape { line, expected: 0, found: extra.split_whitespace().count() });
    }
    Array2::from_shape_vec((n, n), entries).map_err(|_| IoError::Shape { line: last, expected: n, found: 0 })
}

pub fn read_matrix_file<P: AsRef<Path>>(path: P, prune_isolated: bool) -> Result<Multigraph, IoError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| IoError::Io { path: path.to_owned(), source })?;
    let matrix = parse_matrix(&text)?;
    Ok(Multigraph::new(matrix.view(), prune_isolated)?)
}

/// Graphviz digraph, one line per edge with its multiplicity as label
/// (omitted for single edges).
pub fn write_dot<W: Write>(out: &mut W, graph: &Multigraph) -> std::io::Result<()> {
    writeln!(out, "digraph {{")?;
    for v in graph.iter_nodes() {
        writeln!(out, "  {v};")?;
    }
    for e in graph.edges() {
        match graph.multiplicity(e.tail, e.head) {
            1 => writeln!(out, "  {} -> {};", e.tail, e.head)?,
            m => writeln!(out, "  {} -> {} [label={m}];", e.tail, e.head)?,
        }
    }
    writeln!(out, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use ndarray::arr2;

    #[test]
    fn parses_matrix() {
        let text = "3\n0 1 0\n\n1 0 2\n  1 0 0  \n";
        assert_eq!(parse_matrix(text).unwrap(), arr2(&[[0, 1, 0], [1, 0, 2], [1, 0, 0]]));
        assert_eq!(parse_matrix("").unwrap().dim(), (0, 0));
    }

    #[test]
    fn wrong_row_length() {
        let err = parse_matrix("2\n0 1\n1 0 0\n").unwrap_err();
        assert!(matches!(err, IoError::Shape { line: 3, expected: 2, found: 3 }));
        assert_eq!(err.to_string(), "line 3: expected 2 entries, found 3");

        let err = parse_matrix("3\n0 1 0\n").unwrap_err();
        assert!(matches!(err, IoError::Shape { line: 3, expected: 3, found: 0 }));

        assert!(matches!(parse_matrix("1\n0\n0\n"), Err(IoError::Shape { line: 3, .. })));
    }

    #[test]
    fn bad_tokens() {
        let err = parse_matrix("2\n0 x\n1 0\n").unwrap_err();
        assert!(matches!(err, IoError::Parse { line: 2, ref token } if token == "x"));
        assert!(matches!(parse_matrix("2 2\n"), Err(IoError::Parse { line: 1, .. })));
        assert!(matches!(parse_matrix("-1\n"), Err(IoError::Parse { line: 1, .. })));
    }

    #[test]
    fn oversized_header() {
        let err = parse_matrix("4294967296\n").unwrap_err();
        assert!(matches!(err, IoError::Shape { line: 2, expected: 4294967296, found: 0 }));
        let err = parse_matrix("100000000\n0 1\n").unwrap_err();
        assert!(matches!(err, IoError::Shape { line: 2, expected: 100000000, found: 2 }));
    }

    #[test]
    fn negative_entries_fail_validation() {
        let dir = std::env::temp_dir().join(format!("multidigraph-distance-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("negative.txt");
        std::fs::write(&path, "2\n0 -1\n1 0\n").unwrap();
        let err = read_matrix_file(&path, true).unwrap_err();
        assert!(matches!(
            err,
            IoError::Graph(Error::Validation(ValidationError::NegativeEntry { row: 0, col: 1, value: -1 }))
        ));

        std::fs::write(&path, "3\n0 2 0\n0 0 0\n0 0 0\n").unwrap();
        assert_eq!(read_matrix_file(&path, true).unwrap().size(), (2, 2));
        assert_eq!(read_matrix_file(&path, false).unwrap().size(), (3, 2));
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(read_matrix_file(dir.join("missing.txt"), true), Err(IoError::Io { .. })));
    }

    #[test]
    fn dot_labels_multiplicities() {
        let g = Multigraph::new(arr2(&[[0, 2], [1, 0]]).view(), true).unwrap();
        let mut out = Vec::new();
        write_dot(&mut out, &g).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "digraph {\n  0;\n  1;\n  0 -> 1 [label=2];\n  1 -> 0;\n}\n");
    }
}
