//! Builder for the research-paper dataset
//!
//! Papers are grouped by year (optionally), then by their category path,
//! and become leaves weighted by citation count.

use std::path::Path;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::entities::{NodeSource, PaperRecord};
use crate::domain::error::{DomainError, DomainResult};

/// Intermediate grouping, kept in first-appearance order.
#[derive(Debug)]
enum Entry {
    Category { name: String, entries: Vec<Entry> },
    Paper(PaperRecord),
}

impl Entry {
    fn insert(entries: &mut Vec<Entry>, path: &[String], paper: &PaperRecord) {
        let Some((head, rest)) = path.split_first() else {
            // a repeated title in the same category replaces the earlier paper
            match entries
                .iter_mut()
                .find(|e| matches!(e, Entry::Paper(p) if p.title == paper.title))
            {
                Some(existing) => *existing = Entry::Paper(paper.clone()),
                None => entries.push(Entry::Paper(paper.clone())),
            }
            return;
        };

        let position = entries
            .iter()
            .position(|e| matches!(e, Entry::Category { name, .. } if name == head));
        let position = position.unwrap_or_else(|| {
            entries.push(Entry::Category {
                name: head.clone(),
                entries: Vec::new(),
            });
            entries.len() - 1
        });
        if let Entry::Category { entries, .. } = &mut entries[position] {
            Entry::insert(entries, rest, paper);
        }
    }
}

/// Constructs a paper tree from dataset records.
#[derive(Debug, Clone, Default)]
pub struct PaperBuilder {
    seed: Option<u64>,
}

impl PaperBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed for node colors; entropy when `None`.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Build a tree named `root_name` over `records`.
    ///
    /// With `by_year` the first level below the root holds one node per
    /// publication year; otherwise years are ignored.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(
        &self,
        root_name: &str,
        records: &[PaperRecord],
        by_year: bool,
    ) -> DomainResult<TreeArena> {
        let mut entries = Vec::new();
        for paper in records {
            if by_year {
                let mut path = Vec::with_capacity(paper.categories.len() + 1);
                path.push(paper.year.to_string());
                path.extend(paper.categories.iter().cloned());
                Entry::insert(&mut entries, &path, paper);
            } else {
                Entry::insert(&mut entries, &paper.categories, paper);
            }
        }

        let mut tree = TreeArena::papers(self.seed);
        let children = materialize(&mut tree, entries)?;
        tree.insert_node(Some(root_name), children, 0)?;
        debug!("built paper tree: {} nodes", tree.len());
        Ok(tree)
    }

    /// Load `path` with [`load_papers_csv`] and build the tree.
    pub fn build_from_csv(
        &self,
        path: &Path,
        root_name: &str,
        by_year: bool,
    ) -> DomainResult<TreeArena> {
        let records = load_papers_csv(path)?;
        self.build(root_name, &records, by_year)
    }
}

fn materialize(tree: &mut TreeArena, entries: Vec<Entry>) -> DomainResult<Vec<Index>> {
    let mut result = Vec::with_capacity(entries.len());
    for entry in entries {
        let idx = match entry {
            Entry::Paper(paper) => {
                let idx = tree.insert_leaf(&paper.title, paper.citations);
                tree.set_source(
                    idx,
                    NodeSource::Paper {
                        authors: paper.authors,
                        doi: paper.doi,
                        year: paper.year,
                    },
                );
                idx
            }
            Entry::Category { name, entries } => {
                let children = materialize(tree, entries)?;
                tree.insert_node(Some(&name), children, 0)?
            }
        };
        result.push(idx);
    }
    Ok(result)
}

/// Read paper records from a CSV file with a header row.
///
/// Columns: author, title, year, categories (colon separated), url/doi,
/// citations.
#[instrument(level = "debug")]
pub fn load_papers_csv(path: &Path) -> DomainResult<Vec<PaperRecord>> {
    let csv_err = |source| DomainError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(csv_err)?;
        let line = row.position().map_or(0, |p| p.line());
        records.push(parse_record(&row, line)?);
    }
    debug!("loaded {} papers from {}", records.len(), path.display());
    Ok(records)
}

fn parse_record(row: &csv::StringRecord, line: u64) -> DomainResult<PaperRecord> {
    let field = |i: usize, column: &str| {
        row.get(i)
            .map(str::trim)
            .ok_or_else(|| DomainError::InvalidRecord {
                line,
                message: format!("missing column '{}'", column),
            })
    };

    let year = field(2, "year")?;
    let year = year.parse::<u32>().map_err(|e| DomainError::InvalidRecord {
        line,
        message: format!("year '{}': {}", year, e),
    })?;
    let citations = field(5, "citations")?;
    let citations = citations
        .parse::<u64>()
        .map_err(|e| DomainError::InvalidRecord {
            line,
            message: format!("citations '{}': {}", citations, e),
        })?;
    let categories = field(3, "categories")?
        .trim_matches('"')
        .split(':')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    Ok(PaperRecord {
        authors: field(0, "author")?.to_string(),
        title: field(1, "title")?.to_string(),
        year,
        categories,
        doi: field(4, "url")?.to_string(),
        citations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, year: u32, categories: &[&str], citations: u64) -> PaperRecord {
        PaperRecord {
            authors: "A. Author".to_string(),
            title: title.to_string(),
            year,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            doi: format!("https://doi.org/{}", title),
            citations,
        }
    }

    #[test]
    fn given_shared_category_when_building_then_papers_grouped_in_order() {
        let records = vec![
            paper("p1", 2001, &["teaching", "labs"], 3),
            paper("p2", 2001, &["teaching"], 4),
            paper("p3", 2001, &["teaching", "labs"], 5),
        ];
        let tree = PaperBuilder::new()
            .seed(Some(1))
            .build("CS1", &records, false)
            .unwrap();

        let root = tree.root().unwrap();
        assert_eq!(tree.name(root), Some("CS1"));
        assert_eq!(tree.weight(root), Some(12));
        let teaching = tree.children(root)[0];
        assert_eq!(tree.name(teaching), Some("teaching"));
        let names: Vec<_> = tree
            .children(teaching)
            .iter()
            .filter_map(|&c| tree.name(c))
            .collect();
        assert_eq!(names, vec!["labs", "p2"]);
        assert_eq!(tree.leaf_nodes(), vec!["p1", "p3", "p2"]);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn given_by_year_when_building_then_years_are_first_level() {
        let records = vec![
            paper("p1", 2003, &["a"], 1),
            paper("p2", 1999, &["a"], 2),
            paper("p3", 2003, &["b"], 3),
        ];
        let tree = PaperBuilder::new().build("CS1", &records, true).unwrap();

        let root = tree.root().unwrap();
        let years: Vec<_> = tree
            .children(root)
            .iter()
            .filter_map(|&c| tree.name(c))
            .collect();
        assert_eq!(years, vec!["2003", "1999"]);
        let first = tree.children(root)[0];
        assert_eq!(tree.weight(first), Some(4));
    }

    #[test]
    fn given_repeated_title_when_building_then_last_wins() {
        let records = vec![paper("dup", 2001, &["a"], 1), paper("dup", 2001, &["a"], 9)];
        let tree = PaperBuilder::new().build("CS1", &records, false).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.weight(root), Some(9));
        assert_eq!(tree.leaf_nodes(), vec!["dup"]);
    }

    #[test]
    fn given_paper_leaf_when_rendering_path_then_paper_suffix() {
        let records = vec![paper("p1", 2001, &["a", "b"], 1)];
        let tree = PaperBuilder::new().build("CS1", &records, true).unwrap();
        let (leaf, _) = tree.iter().find(|(_, n)| n.is_leaf()).unwrap();
        assert_eq!(
            tree.path_string(leaf, false).as_deref(),
            Some("CS1/2001/a/b/p1 (paper)")
        );
    }

    #[test]
    fn given_no_records_when_building_then_root_is_weightless_leaf() {
        let tree = PaperBuilder::new().build("CS1", &[], true).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.weight(root), Some(0));
        assert!(tree.children(root).is_empty());
    }
}
