use std::collections::HashMap;

/// Read access to a corpus of already-decoded documents.
///
/// Implementations own the content; the engine only borrows it for the
/// duration of a call and never mutates it.
pub trait DocumentStore {
    fn get(&self, id: &str) -> Option<&str>;

    /// All identifiers, in the store's stable order.
    fn list(&self) -> Vec<String>;
}

/// Splits `content` on `\n`, `\r\n` and a lone `\r`.
///
/// A trailing line break does not produce an empty final line.
pub fn source_lines(content: &str) -> SourceLines<'_> {
    SourceLines { rest: content }
}

#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for SourceLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(idx) = self.rest.find(['\n', '\r']) else {
            return Some(std::mem::take(&mut self.rest));
        };
        let line = &self.rest[..idx];
        let width = if self.rest[idx..].starts_with("\r\n") { 2 } else { 1 };
        self.rest = &self.rest[idx + width..];
        Some(line)
    }
}

/// A single loaded submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    /// Raw lines paired with their 1-based line numbers.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        source_lines(&self.content).enumerate().map(|(idx, line)| (idx + 1, line))
    }
}

/// Insertion-ordered in-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    docs: Vec<Document>,
    index: HashMap<String, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document. A replaced document keeps its position.
    pub fn insert(&mut self, doc: Document) {
        match self.index.get(&doc.id) {
            Some(&pos) => self.docs[pos] = doc,
            None => {
                self.index.insert(doc.id.clone(), self.docs.len());
                self.docs.push(doc);
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Document> {
        let pos = self.index.remove(id)?;
        let doc = self.docs.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(doc)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, id: &str) -> Option<&str> {
        self.index
            .get(id)
            .map(|&pos| self.docs[pos].content.as_str())
    }

    fn list(&self) -> Vec<String> {
        self.docs.iter().map(|d| d.id.clone()).collect()
    }
}

impl FromIterator<Document> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut store = Self::new();
        for doc in iter {
            store.insert(doc);
        }
        store
    }
}
