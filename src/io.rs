use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
use crate::tree_decomposition::TreeDecomposition;
use std::convert::TryFrom;
use std::io::{self, BufRead, ErrorKind, Write};

fn invalid_line(line: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidInput, format!("Invalid line: {}", line))
}

fn parse_pair(line: &str, tokens: &[&str]) -> Result<(usize, usize), io::Error> {
    if tokens.len() != 2 {
        return Err(invalid_line(line));
    }
    let u = tokens[0].parse().map_err(|_| invalid_line(line))?;
    let v = tokens[1].parse().map_err(|_| invalid_line(line))?;
    Ok((u, v))
}

/// `p tw <n> <m>`
pub fn pace_p(line: &str) -> Result<(usize, usize), io::Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 4 || tokens[0] != "p" || tokens[1] != "tw" {
        return Err(invalid_line(line));
    }
    parse_pair(line, &tokens[2..])
}

/// `<u> <v>` with 1-based vertex ids, returned 0-based.
pub fn pace_e(line: &str, n: usize) -> Result<(usize, usize), io::Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (u, v) = parse_pair(line, &tokens)?;
    if u == 0 || v == 0 || u > n || v > n {
        return Err(invalid_line(line));
    }
    Ok((u - 1, v - 1))
}

/// Reads graphs in the PACE `.gr` format.
pub struct PaceReader<T: BufRead>(pub T);

impl<T: BufRead> TryFrom<PaceReader<T>> for HashMapGraph {
    type Error = io::Error;

    fn try_from(reader: PaceReader<T>) -> Result<Self, Self::Error> {
        let reader = reader.0;
        let mut graph: Option<HashMapGraph> = None;
        let mut order = 0;
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            match trimmed.chars().next() {
                None | Some('c') => {}
                Some('p') => {
                    if graph.is_some() {
                        return Err(invalid_line(trimmed));
                    }
                    let (n, m) = pace_p(trimmed)?;
                    let mut g = HashMapGraph::with_capacity(n);
                    for u in 0..n {
                        g.add_vertex_with_capacity(u, if n > 0 { (2 * m) / n } else { 0 });
                    }
                    order = n;
                    graph = Some(g);
                }
                _ => {
                    let graph = graph.as_mut().ok_or_else(|| invalid_line(trimmed))?;
                    let (u, v) = pace_e(trimmed, order)?;
                    if u != v {
                        graph.add_edge(u, v);
                    }
                }
            }
        }
        graph.ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "Missing problem line"))
    }
}

/// Writes a tree decomposition in the PACE `.td` format, vertices and bags 1-based.
pub struct PaceWriter<'a, T: Write> {
    td: &'a TreeDecomposition,
    graph: &'a HashMapGraph,
    writer: T,
}

impl<'a, T: Write> PaceWriter<'a, T> {
    pub fn new(td: &'a TreeDecomposition, graph: &'a HashMapGraph, writer: T) -> Self {
        Self { td, graph, writer }
    }

    pub fn output(mut self) -> io::Result<()> {
        let n = self
            .graph
            .vertices()
            .max()
            .map(|v| v + 1)
            .unwrap_or(0)
            .max(self.graph.order());
        writeln!(
            self.writer,
            "s td {} {} {}",
            self.td.bags.len(),
            self.td.max_bag_size,
            n
        )?;
        for bag in self.td.bags.iter() {
            let mut vertices: Vec<usize> = bag.vertex_set.iter().map(|v| v + 1).collect();
            vertices.sort_unstable();
            let vertices: Vec<String> = vertices.iter().map(|v| v.to_string()).collect();
            if vertices.is_empty() {
                writeln!(self.writer, "b {}", bag.id + 1)?;
            } else {
                writeln!(self.writer, "b {} {}", bag.id + 1, vertices.join(" "))?;
            }
        }
        for bag in self.td.bags.iter() {
            let mut neighbors: Vec<usize> = bag
                .neighbors
                .iter()
                .copied()
                .filter(|n| *n > bag.id)
                .collect();
            neighbors.sort_unstable();
            for neighbor in neighbors {
                writeln!(self.writer, "{} {}", bag.id + 1, neighbor + 1)?;
            }
        }
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{BaseGraph, HashMapGraph};
    use crate::io::{PaceReader, PaceWriter};
    use crate::solver::Solver;
    use std::convert::TryFrom;
    use std::io::{BufReader, ErrorKind};

    fn read(input: &str) -> std::io::Result<HashMapGraph> {
        HashMapGraph::try_from(PaceReader(BufReader::new(input.as_bytes())))
    }

    #[test]
    fn reads_graph_with_comments_and_isolated_vertices() {
        let graph = read("c a comment\np tw 5 3\n1 2\n2 3\nc another\n3 1\n\n").unwrap();
        assert_eq!(graph.order(), 5);
        assert_eq!(graph.size(), 3);
        assert!(graph.has_edge(0, 2));
        assert_eq!(graph.degree(3), 0);
        assert_eq!(graph.degree(4), 0);
    }

    #[test]
    fn self_loops_are_dropped() {
        let graph = read("p tw 2 2\n1 1\n1 2\n").unwrap();
        assert_eq!(graph.size(), 1);
    }

    #[test]
    fn malformed_input() {
        for input in [
            "1 2\n",
            "p tw 2\n1 2\n",
            "p td 2 1\n1 2\n",
            "p tw 2 1\n1 x\n",
            "p tw 2 1\n1 3\n",
            "p tw 2 1\n0 1\n",
            "p tw 2 1\n1 2 3\n",
            "c only a comment\n",
        ]
        .iter()
        {
            let err = read(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{:?}", input);
        }
    }

    #[test]
    fn writes_td_format() {
        let graph = read("p tw 4 3\n1 2\n2 3\n3 4\n").unwrap();
        let td = Solver::default_exact().seed(Some(1)).solve(&graph).unwrap();
        let mut out = vec![];
        PaceWriter::new(&td, &graph, &mut out).output().unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], format!("s td {} 2 4", td.bags.len()));
        assert_eq!(
            lines.iter().filter(|l| l.starts_with("b ")).count(),
            td.bags.len()
        );
        let edges = lines
            .iter()
            .skip(1 + td.bags.len())
            .filter(|l| !l.is_empty())
            .count();
        assert_eq!(edges, td.bags.len() - 1);
        for line in lines.iter().filter(|l| l.starts_with("b ")) {
            let vertices: Vec<usize> = line
                .split_whitespace()
                .skip(2)
                .map(|v| v.parse().unwrap())
                .collect();
            assert!(vertices.iter().all(|v| *v >= 1 && *v <= 4));
        }
    }
}
