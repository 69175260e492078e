use anyhow::Error;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use searcher::{SearchOptions, SearchProblem, SearchResult, Solution, Strategy};
use strsim::levenshtein;

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use crate::puzzles::timed;
use crate::{LabError, Settings};

/// Aligned sentences less alike than this don't count as copied.
const THRESHOLD: f64 = 0.5;

/// A document as a list of normalized sentences: lower case, with
/// punctuation removed and runs of whitespace collapsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Document(Vec<String>);

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+").unwrap();
            static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s]").unwrap();
        }

        let sentences: Vec<String> = SENTENCE_END
            .split(s)
            .map(|sentence| {
                let lower = sentence.to_lowercase();
                let bare = PUNCTUATION.replace_all(&lower, "");
                bare.split_whitespace().collect::<Vec<_>>().join(" ")
            })
            .filter(|sentence| !sentence.is_empty())
            .collect();

        if sentences.is_empty() {
            return Err(LabError::InvalidInput(format!("No sentences in {:?}", s)).into());
        }
        Ok(Document(sentences))
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sentence in &self.0 {
            writeln!(f, "  {}", sentence)?;
        }
        Ok(())
    }
}

impl Document {
    fn sentences(&self) -> usize {
        self.0.len()
    }

    fn shortest(&self) -> usize {
        self.0.iter().map(|s| s.chars().count()).min().unwrap_or_default()
    }
}

/// How many sentences of each document have been consumed.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
struct Cursor {
    left: usize,
    right: usize,
}

/// Sentence alignment as a path through both documents.
///
/// Pairing two sentences costs their edit distance. Skipping a
/// sentence costs its length, which is its distance from nothing.
#[derive(Debug)]
struct Alignment<'d> {
    left: &'d Document,
    right: &'d Document,
    gap: usize,
}

impl<'d> Alignment<'d> {
    fn new(left: &'d Document, right: &'d Document) -> Self {
        Self {
            left,
            right,
            gap: left.shortest().min(right.shortest()),
        }
    }
}

impl<'d> SearchProblem for Alignment<'d> {
    type State = Cursor;
    type Cost = usize;

    fn is_goal(&self, state: &Cursor) -> bool {
        state.left == self.left.sentences() && state.right == self.right.sentences()
    }

    fn successors(&self, state: &Cursor) -> Vec<(Cursor, usize)> {
        let mut next = Vec::with_capacity(3);
        let left = self.left.0.get(state.left);
        let right = self.right.0.get(state.right);

        if let (Some(a), Some(b)) = (left, right) {
            let pair = Cursor {
                left: state.left + 1,
                right: state.right + 1,
            };
            next.push((pair, levenshtein(a, b)));
        }
        if let Some(a) = left {
            let skip = Cursor {
                left: state.left + 1,
                ..*state
            };
            next.push((skip, a.chars().count()));
        }
        if let Some(b) = right {
            let skip = Cursor {
                right: state.right + 1,
                ..*state
            };
            next.push((skip, b.chars().count()));
        }
        next
    }

    /// Whichever document has more sentences left needs at least that
    /// many skips, and no skip is cheaper than the shortest sentence.
    fn heuristic(&self, state: &Cursor) -> usize {
        let left = self.left.sentences() - state.left;
        let right = self.right.sentences() - state.right;
        left.abs_diff(right) * self.gap
    }
}

/// Similarity of two sentences from 0 to 1, by edit distance.
///
/// Anything under the threshold counts as unrelated.
fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }

    let score = 1.0 - levenshtein(a, b) as f64 / longest as f64;
    if score < THRESHOLD {
        0.0
    } else {
        score
    }
}

/// Sentences paired by the cheapest alignment, with their similarity.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Report {
    pairs: Vec<(usize, usize, f64)>,
    cost: usize,
    expanded: usize,
}

impl Report {
    fn from_solution(left: &Document, right: &Document, solution: &Solution<Cursor, usize>) -> Report {
        let pairs = solution
            .path()
            .windows(2)
            .filter(|step| step[1].left > step[0].left && step[1].right > step[0].right)
            .map(|step| {
                let (i, j) = (step[0].left, step[0].right);
                (i, j, similarity(&left.0[i], &right.0[j]))
            })
            .collect();

        Report {
            pairs,
            cost: solution.cost(),
            expanded: solution.expanded(),
        }
    }

    /// Mean similarity of the aligned sentences.
    pub(crate) fn level(&self) -> f64 {
        if self.pairs.is_empty() {
            return 0.0;
        }
        self.pairs.iter().map(|(_, _, s)| s).sum::<f64>() / self.pairs.len() as f64
    }
}

fn compare(left: &Document, right: &Document, options: SearchOptions) -> SearchResult<Report> {
    let solution = searcher::search_with(Alignment::new(left, right), Cursor::default(), Strategy::AStar, options)?;
    Ok(Report::from_solution(left, right, &solution))
}

pub(crate) fn main(mut input: Box<dyn Read + 'static>, settings: &Settings) -> ::std::result::Result<(), Error> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    let mut documents = Vec::new();
    let mut block = Vec::new();
    for line in text.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !block.is_empty() {
                documents.push(block.join(" ").parse::<Document>()?);
                block.clear();
            }
        } else {
            block.push(line);
        }
    }

    if documents.is_empty() || documents.len() % 2 != 0 {
        return Err(LabError::InvalidInput(format!(
            "Expected pairs of documents separated by blank lines, found {}",
            documents.len()
        ))
        .into());
    }

    for pair in documents.chunks(2) {
        let (left, right) = (&pair[0], &pair[1]);
        print!("First document:\n{}", left);
        print!("Second document:\n{}", right);

        let (report, elapsed) = timed(|| compare(left, right, settings.search_options()));
        let report = report?;
        info!(
            "Aligned {} sentence pairs at cost {}, {} nodes expanded in {:?}",
            report.pairs.len(),
            report.cost,
            report.expanded,
            elapsed
        );

        for (i, j, score) in &report.pairs {
            debug!("{:?} ~ {:?}", left.0[*i], right.0[*j]);
            println!("Sentence {} ~ sentence {}: {:.2}", i + 1, j + 1, score);
        }
        println!("Overall level of plagiarism: {:.2}%", report.level() * 100.0);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    const ORIGINAL: &str = "The cat sat on the mat. Dogs bark at night! Birds sing in the morning.";

    fn document(s: &str) -> Document {
        s.parse().unwrap()
    }

    /// Cheapest alignment cost, by filling in the whole table.
    fn table_cost(left: &Document, right: &Document) -> usize {
        let (n, m) = (left.sentences(), right.sentences());
        let mut cost = vec![vec![0; m + 1]; n + 1];
        for i in 0..=n {
            for j in 0..=m {
                let mut best = None;
                if i > 0 {
                    best = Some(cost[i - 1][j] + left.0[i - 1].chars().count());
                }
                if j > 0 {
                    let skip = cost[i][j - 1] + right.0[j - 1].chars().count();
                    best = Some(best.map_or(skip, |b: usize| b.min(skip)));
                }
                if i > 0 && j > 0 {
                    let pair = cost[i - 1][j - 1] + levenshtein(&left.0[i - 1], &right.0[j - 1]);
                    best = Some(best.map_or(pair, |b: usize| b.min(pair)));
                }
                cost[i][j] = best.unwrap_or_default();
            }
        }
        cost[n][m]
    }

    #[test]
    fn parse_document() {
        let doc = document("Hello, World!  This is   a test...");
        assert_eq!(doc.0, vec!["hello world", "this is a test"]);
        assert!(" ... ! ".parse::<Document>().is_err());
    }

    #[test]
    fn sentence_similarity() {
        assert!((similarity("abcd", "abcf") - 0.75).abs() < 1e-9);
        assert_eq!(similarity("abcd", "wxyz"), 0.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn identical_documents() {
        let doc = document(ORIGINAL);
        let report = compare(&doc, &doc, SearchOptions::default()).unwrap();
        assert_eq!(report.cost, 0);
        assert_eq!(report.pairs.len(), 3);
        assert_eq!(report.level(), 1.0);
    }

    #[test]
    fn inserted_sentence_is_skipped() {
        let left = document(ORIGINAL);
        let right = document(
            "The cat sat on the mat. It rained all day. Dogs bark at night. Birds sing in the morning?",
        );

        let report = compare(&left, &right, SearchOptions::default()).unwrap();
        assert_eq!(report.cost, "it rained all day".len());
        let aligned: Vec<(usize, usize)> = report.pairs.iter().map(|(i, j, _)| (*i, *j)).collect();
        assert_eq!(aligned, vec![(0, 0), (1, 2), (2, 3)]);
        assert_eq!(report.level(), 1.0);
    }

    #[test]
    fn astar_finds_the_cheapest_alignment() {
        let left = document("Search is everywhere. A star uses a heuristic. Costs add up along the path.");
        let right = document("Search is all around us. The heuristic guides A star. Path costs add up.");

        let report = compare(&left, &right, SearchOptions::default()).unwrap();
        assert_eq!(report.cost, 52);
        assert_eq!(report.cost, table_cost(&left, &right));

        let report = compare(&right, &document(ORIGINAL), SearchOptions::default()).unwrap();
        assert_eq!(report.cost, table_cost(&right, &document(ORIGINAL)));
    }

    #[test]
    fn unrelated_documents_score_zero() {
        let report = compare(
            &document("Quantum flux capacitors hum."),
            &document("Apples are red."),
            SearchOptions::default(),
        )
        .unwrap();
        assert_eq!(report.level(), 0.0);
    }
}
