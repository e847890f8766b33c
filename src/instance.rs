//! Instance files: a graph, its terminals and, when known, the optimal tree weight.
//!
//! Two layouts are read. The plain layout is
//!
//! ```text
//! <optimal cost>
//! <number of edges>
//! E <u> <v> <weight>      (once per edge)
//! <number of terminals>
//! T <node>                (once per terminal)
//! ```
//!
//! and the PACE 2018 layout (`SECTION Graph ... END`, `SECTION Terminals ... END`, `EOF`)
//! is detected by its leading `SECTION` keyword. Node ids are kept exactly as written.

use crate::graph::EdgeWeight;
use crate::util::GenericResult;
use crate::Graph;
use std::error::Error;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Instance {
    pub graph: Graph<u32>,
    pub terminals: Vec<u32>,
    /// Known optimum; the PACE layout does not carry one.
    pub optimal_cost: Option<u64>,
}

impl Instance {
    pub fn from_file<P: AsRef<Path>>(path: P) -> GenericResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(content.parse()?)
    }
}

impl FromStr for Instance {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(s);
        cursor.skip_empty_lines();
        if cursor.skip_whitespace().rest.starts_with("SECTION") {
            parse_pace(cursor)
        } else {
            parse_plain(cursor)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseError {
    line: usize,
    column: usize,
    message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: String) -> Self {
        ParseError {
            line,
            column,
            message,
        }
    }

    /// One-based line of the error.
    pub fn line(&self) -> usize {
        self.line + 1
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}:{})", self.message, self.line + 1, self.column)
    }
}

impl Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// Rest of the input with the position of its first character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cursor<'a> {
    rest: &'a str,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            line: 0,
            column: 0,
        }
    }

    fn error<T>(self, message: String) -> ParseResult<T> {
        Err(ParseError::new(self.line, self.column, message))
    }

    /// Skip whitespace, but not line breaks.
    fn skip_whitespace(self) -> Self {
        let trimmed = self
            .rest
            .trim_start_matches(|c: char| c.is_ascii_whitespace() && c != '\n');
        Self {
            rest: trimmed,
            column: self.column + self.rest.len() - trimmed.len(),
            ..self
        }
    }

    /// Error if the input (after whitespace) does not start with `expected`.
    fn symbol(self, expected: &str) -> ParseResult<Self> {
        let state = self.skip_whitespace();
        match state.rest.strip_prefix(expected) {
            Some(rest) => Ok(Self {
                rest,
                column: state.column + expected.len(),
                ..state
            }),
            None => state.error(format!(
                "expected '{}' but got {:?}",
                expected,
                state.rest.split_terminator('\n').next().unwrap_or("")
            )),
        }
    }

    /// Next whitespace-separated token on this line, parsed.
    fn token<T: FromStr>(self) -> ParseResult<(T, Self)>
    where
        T::Err: Error,
    {
        let state = self.skip_whitespace();
        let text = state
            .rest
            .split_ascii_whitespace()
            .next()
            .filter(|_| !state.rest.starts_with('\n'))
            .ok_or_else(|| {
                ParseError::new(state.line, state.column, "unexpected end of line".into())
            })?;
        let value = text.parse::<T>().map_err(|err| {
            ParseError::new(
                state.line,
                state.column,
                format!("could not parse '{}': {}", text, err),
            )
        })?;
        let next = Self {
            rest: &state.rest[text.len()..],
            column: state.column + text.len(),
            ..state
        };
        Ok((value, next))
    }

    /// Error unless only whitespace remains on this line.
    fn end_of_line(self) -> ParseResult<Self> {
        let state = self.skip_whitespace();
        if state.rest.is_empty() || state.rest.starts_with('\n') || state.rest.starts_with('\r') {
            Ok(state)
        } else {
            state.error("expected end of line".to_string())
        }
    }

    /// Move to the start of the next line (or to the end of input).
    fn next_line(self) -> Self {
        match self.rest.find('\n') {
            Some(i) => Self {
                rest: &self.rest[i + 1..],
                line: self.line + 1,
                column: 0,
            },
            None => Self {
                rest: "",
                column: self.column + self.rest.len(),
                ..self
            },
        }
    }

    fn line_is_empty(self) -> bool {
        let state = self.skip_whitespace();
        !state.rest.is_empty() && (state.rest.starts_with('\n') || state.rest.starts_with('\r'))
    }

    fn skip_empty_lines(&mut self) {
        while self.line_is_empty() {
            *self = self.next_line();
        }
    }

    /// A line holding a single value.
    fn value_line<T: FromStr>(&mut self) -> ParseResult<T>
    where
        T::Err: Error,
    {
        self.skip_empty_lines();
        let (value, state) = self.token()?;
        *self = state.end_of_line()?.next_line();
        Ok(value)
    }

    /// A line of the form `KEY value`.
    fn keyed_line<T: FromStr>(&mut self, key: &str) -> ParseResult<T>
    where
        T::Err: Error,
    {
        let (value, state) = self.symbol(key)?.token()?;
        *self = state.end_of_line()?.next_line();
        Ok(value)
    }

    /// An edge line `E u v w`.
    fn edge_line(&mut self) -> ParseResult<(u32, u32, EdgeWeight)> {
        let state = self.symbol("E")?;
        let (from, state) = state.token()?;
        let (to, state) = state.token()?;
        let (weight, state) = state.token()?;
        *self = state.end_of_line()?.next_line();
        Ok((from, to, weight))
    }

    fn expect_the_end(mut self) -> ParseResult<()> {
        self.skip_empty_lines();
        let state = self.skip_whitespace();
        if state.rest.trim().is_empty() {
            Ok(())
        } else {
            state.error("expected end of input".to_string())
        }
    }
}

fn parse_plain(mut cursor: Cursor) -> ParseResult<Instance> {
    let optimal_cost: u64 = cursor.value_line()?;
    let num_edges: usize = cursor.value_line()?;
    let mut graph = Graph::new();
    for _ in 0..num_edges {
        cursor.skip_empty_lines();
        let (from, to, weight) = cursor.edge_line()?;
        graph.add_edge(from, to, weight);
    }
    let num_terminals: usize = cursor.value_line()?;
    let mut terminals = Vec::with_capacity(num_terminals);
    for _ in 0..num_terminals {
        cursor.skip_empty_lines();
        let terminal = cursor.keyed_line("T")?;
        if graph.node_index(&terminal).is_none() {
            return cursor.error(format!("terminal {} is not an edge endpoint", terminal));
        }
        if !terminals.contains(&terminal) {
            terminals.push(terminal);
        }
    }
    cursor.expect_the_end()?;
    Ok(Instance {
        graph,
        terminals,
        optimal_cost: Some(optimal_cost),
    })
}

/// Since we're dealing with an NP-hard problem and thus the graphs are not going to be
/// "huge" it's acceptable to expect the whole file to be read into memory.
fn parse_pace(mut cursor: Cursor) -> ParseResult<Instance> {
    cursor = cursor.symbol("SECTION")?.symbol("Graph")?.end_of_line()?.next_line();
    let num_nodes: u32 = cursor.keyed_line("Nodes")?;
    let num_edges: usize = cursor.keyed_line("Edges")?;
    let mut graph = Graph::new();
    for node in 1..=num_nodes {
        graph.add_node(node);
    }
    for _ in 0..num_edges {
        let line = cursor;
        let (from, to, weight) = cursor.edge_line()?;
        if from == 0 || to == 0 || from > num_nodes || to > num_nodes {
            return line.error(format!(
                "node indices must be between 1 and {} (got {} and {})",
                num_nodes, from, to
            ));
        }
        graph.add_edge(from, to, weight);
    }
    cursor = cursor.symbol("END")?.next_line();
    cursor.skip_empty_lines();
    cursor = cursor.symbol("SECTION")?.symbol("Terminals")?.end_of_line()?.next_line();
    let num_terminals: usize = cursor.keyed_line("Terminals")?;
    let mut terminals = Vec::with_capacity(num_terminals);
    for _ in 0..num_terminals {
        let line = cursor;
        let terminal: u32 = cursor.keyed_line("T")?;
        if terminal == 0 || terminal > num_nodes {
            return line.error(format!("invalid terminal {}", terminal));
        }
        if !terminals.contains(&terminal) {
            terminals.push(terminal);
        }
    }
    cursor = cursor.symbol("END")?.next_line();
    cursor.skip_empty_lines();
    cursor.symbol("EOF")?.next_line().expect_the_end()?;
    Ok(Instance {
        graph,
        terminals,
        optimal_cost: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::TestResult;

    const PLAIN: &str = "2\n\
        4\n\
        E 1 2 1\n\
        E 2 3 1\n\
        E 3 4 1\n\
        E 4 1 1\n\
        2\n\
        T 1\n\
        T 3\n";

    const PACE: &str = "SECTION Graph\n\
        Nodes 3\n\
        Edges 3\n\
        E 1 2 1\n\
        E 2 3 2\n\
        E 3 1 3\n\
        END\n\
        \n\
        SECTION Terminals\n\
        Terminals 2\n\
        T 1\n\
        T 3\n\
        END\n\
        \n\
        EOF\n";

    #[test]
    fn test_parse_plain() -> TestResult {
        let instance: Instance = PLAIN.parse()?;
        assert_eq!(instance.optimal_cost, Some(2));
        assert_eq!(instance.terminals, vec![1, 3]);
        assert_eq!(instance.graph.num_nodes(), 4);
        assert_eq!(instance.graph.num_edges(), 4);
        assert!(instance.graph.node_index(&4).is_some());
        Ok(())
    }

    #[test]
    fn test_parse_plain_tolerates_blank_lines_and_trailing_space() -> TestResult {
        let text = "\n7 \n2\nE 10 20 3\n\nE 20 30 4  \n1\nT 30\n\n";
        let instance: Instance = text.parse()?;
        assert_eq!(instance.optimal_cost, Some(7));
        assert_eq!(instance.terminals, vec![30]);
        assert_eq!(instance.graph.num_edges(), 2);
        Ok(())
    }

    #[test]
    fn test_parse_pace() -> TestResult {
        let instance: Instance = PACE.parse()?;
        assert_eq!(instance.optimal_cost, None);
        assert_eq!(instance.terminals, vec![1, 3]);
        let one = instance.graph.node_index(&1).ok_or("node 1 missing")?;
        let three = instance.graph.node_index(&3).ok_or("node 3 missing")?;
        assert_eq!(instance.graph.min_weight(one, three), Some(3));
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        let missing_weight = "2\n1\nE 1 2\n1\nT 1\n".parse::<Instance>();
        assert_eq!(missing_weight.map(|_| ()).unwrap_err().line(), 3);

        let negative = "2\n1\nE 1 2 -4\n1\nT 1\n".parse::<Instance>();
        assert!(negative.is_err());

        let unknown_terminal = "2\n1\nE 1 2 4\n1\nT 9\n".parse::<Instance>();
        assert!(unknown_terminal.is_err());

        let trailing = format!("{}garbage\n", PLAIN).parse::<Instance>();
        assert!(trailing.is_err());

        let bad_pace = PACE.replace("T 3", "T 4").parse::<Instance>();
        assert!(bad_pace.is_err());
    }

    #[test]
    fn test_cursor_symbol() -> ParseResult<()> {
        let cursor = Cursor::new("\thello world");
        assert!(cursor.symbol("hallo").is_err());
        let cursor = cursor.symbol("hello")?;
        assert_eq!(cursor.column, 6);
        let cursor = cursor.symbol("world")?;
        assert_eq!(cursor.rest, "");
        Ok(())
    }

    #[test]
    fn test_cursor_token() -> ParseResult<()> {
        let (value, cursor) = Cursor::new(" 42 x").token::<u32>()?;
        assert_eq!(value, 42);
        assert_eq!(cursor.rest, " x");
        assert!(cursor.token::<u32>().is_err());
        assert!(Cursor::new("\n5").token::<u32>().is_err());
        Ok(())
    }
}
