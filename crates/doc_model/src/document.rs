//! Document root: body blocks plus header and footer content

use crate::{Paragraph, Result, Table};
use serde::{Deserialize, Serialize};

/// Document metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// A top-level body block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        }
    }
}

impl From<Paragraph> for Block {
    fn from(p: Paragraph) -> Self {
        Block::Paragraph(p)
    }
}

impl From<Table> for Block {
    fn from(t: Table) -> Self {
        Block::Table(t)
    }
}

/// The document source handed to the layout engine; read-only during layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub metadata: DocumentMetadata,
    /// Body content in reading order
    pub body: Vec<Block>,
    /// Paragraphs repeated at the top of every page
    #[serde(default)]
    pub header: Vec<Paragraph>,
    /// Paragraphs repeated at the bottom of every page
    #[serde(default)]
    pub footer: Vec<Paragraph>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a body block
    pub fn push(&mut self, block: impl Into<Block>) -> &mut Self {
        self.body.push(block.into());
        self
    }

    /// Number of body blocks
    pub fn block_count(&self) -> usize {
        self.body.len()
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.body.get(index)
    }

    /// Iterate over the body paragraphs, skipping tables
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(Block::as_paragraph)
    }

    /// Validate every paragraph reachable from the document
    pub fn validate(&self) -> Result<()> {
        for block in &self.body {
            match block {
                Block::Paragraph(p) => p.validate()?,
                Block::Table(t) => t.validate()?,
            }
        }
        for p in self.header.iter().chain(self.footer.iter()) {
            p.validate()?;
        }
        Ok(())
    }
}
