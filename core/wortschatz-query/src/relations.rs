use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Directed;
use std::collections::HashMap;
use wortschatz_protocol::{Word, WordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Synonym,
    Antonym,
    /// Easily confused look-alike ("words to watch").
    Watch,
}

/// Directed graph over the related-word links embedded in the collection.
/// Synonym links are inserted in both directions so clusters are walkable
/// from either end.
pub struct RelationGraph {
    graph: Graph<WordId, Relation, Directed>,
    index_map: HashMap<WordId, NodeIndex>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            index_map: HashMap::new(),
        }
    }

    /// Build from the in-memory word collection.
    pub fn from_words(words: &[Word]) -> Self {
        let mut graph = Self::new();
        for word in words {
            for &other in &word.synonyms {
                graph.add_relation(word.id, other, Relation::Synonym);
                graph.add_relation(other, word.id, Relation::Synonym);
            }
            for &other in &word.antonyms {
                graph.add_relation(word.id, other, Relation::Antonym);
            }
            for &other in &word.watch_words {
                graph.add_relation(word.id, other, Relation::Watch);
            }
        }
        graph
    }

    pub fn add_relation(&mut self, from: WordId, to: WordId, rel: Relation) {
        let from_idx = *self
            .index_map
            .entry(from)
            .or_insert_with(|| self.graph.add_node(from));
        let to_idx = *self
            .index_map
            .entry(to)
            .or_insert_with(|| self.graph.add_node(to));

        // Dedupe: embedded lists may repeat a link after mutation patches
        let exists = self
            .graph
            .edges(from_idx)
            .any(|e| e.target() == to_idx && *e.weight() == rel);
        if !exists {
            self.graph.add_edge(from_idx, to_idx, rel);
        }
    }

    /// Directly linked words of one relation kind.
    pub fn related(&self, word: WordId, rel: Relation) -> Vec<WordId> {
        let mut out = Vec::new();
        if let Some(idx) = self.index_map.get(&word) {
            for edge in self.graph.edges(*idx) {
                if *edge.weight() == rel {
                    out.push(self.graph[edge.target()]);
                }
            }
        }
        out
    }

    /// Transitive synonym closure (the word itself excluded). Used to pick
    /// quiz distractors that are not accidental correct answers.
    pub fn synonym_cluster(&self, word: WordId) -> Vec<WordId> {
        let start_idx = match self.index_map.get(&word) {
            Some(idx) => *idx,
            None => return Vec::new(),
        };

        let mut stack = vec![start_idx];
        let mut visited = vec![];
        let mut cluster = Vec::new();

        while let Some(current_idx) = stack.pop() {
            if visited.contains(&current_idx) {
                continue;
            }
            visited.push(current_idx);

            for edge in self.graph.edges(current_idx) {
                if *edge.weight() == Relation::Synonym {
                    let target = edge.target();
                    let id = self.graph[target];
                    if id != word && !cluster.contains(&id) {
                        cluster.push(id);
                    }
                    stack.push(target);
                }
            }
        }

        cluster
    }
}

impl Default for RelationGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linked_word(id: u32, synonyms: &[u32], antonyms: &[u32]) -> Word {
        Word {
            id: WordId(id),
            value: format!("wort{id}"),
            plural: None,
            meanings: vec![],
            sentences: vec![],
            article: None,
            level: None,
            topic: None,
            pos: None,
            synonyms: synonyms.iter().copied().map(WordId).collect(),
            antonyms: antonyms.iter().copied().map(WordId).collect(),
            watch_words: vec![],
        }
    }

    #[test]
    fn test_synonyms_are_symmetric() {
        let words = vec![linked_word(1, &[2], &[]), linked_word(2, &[], &[])];
        let graph = RelationGraph::from_words(&words);

        assert_eq!(graph.related(WordId(1), Relation::Synonym), vec![WordId(2)]);
        assert_eq!(graph.related(WordId(2), Relation::Synonym), vec![WordId(1)]);
    }

    #[test]
    fn test_antonyms_are_directed() {
        let words = vec![linked_word(1, &[], &[2]), linked_word(2, &[], &[])];
        let graph = RelationGraph::from_words(&words);

        assert_eq!(graph.related(WordId(1), Relation::Antonym), vec![WordId(2)]);
        assert!(graph.related(WordId(2), Relation::Antonym).is_empty());
    }

    #[test]
    fn test_synonym_cluster_is_transitive() {
        // 1 - 2 - 3 chain; cluster of 1 reaches 3
        let words = vec![
            linked_word(1, &[2], &[]),
            linked_word(2, &[3], &[]),
            linked_word(3, &[], &[]),
        ];
        let graph = RelationGraph::from_words(&words);

        let mut cluster = graph.synonym_cluster(WordId(1));
        cluster.sort();
        assert_eq!(cluster, vec![WordId(2), WordId(3)]);
    }

    #[test]
    fn test_unknown_word_has_no_relations() {
        let graph = RelationGraph::from_words(&[]);
        assert!(graph.related(WordId(9), Relation::Synonym).is_empty());
        assert!(graph.synonym_cluster(WordId(9)).is_empty());
    }
}
