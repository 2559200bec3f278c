//! Tantivy-based search index module.
//!
//! Matches the query as a case-insensitive substring of a notebook title or
//! of any tag name, ranking title matches above tag matches.

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, Query, RegexQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, STORED, STRING,
};
use tantivy::tokenizer::{LowerCaser, RawTokenizer, TextAnalyzer};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Notebook;

/// Field boost values.
const BOOST_TITLE: f32 = 10.0;
const BOOST_TAG_NAMES: f32 = 4.0;

/// Whole values, lower-cased, indexed as a single term.
const WHOLE_LOWERCASE: &str = "whole_lowercase";

/// Search hit with its relevance score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub notebook_id: String,
    pub score: f32,
}

/// Search index schema fields.
struct SearchFields {
    notebook_id: Field,
    title: Field,
    tag_names: Field,
}

/// In-memory Tantivy index over the catalog.
pub struct SearchIndex {
    reader: IndexReader,
    writer: RwLock<IndexWriter>,
    fields: SearchFields,
}

/// Regex matching any term that contains the lower-cased query.
fn substring_pattern(query: &str) -> String {
    format!(".*{}.*", regex::escape(&query.to_lowercase()))
}

impl SearchIndex {
    /// Create an empty in-memory index.
    pub fn in_memory() -> Result<Self, AppError> {
        let whole_value = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(WHOLE_LOWERCASE)
                .set_index_option(IndexRecordOption::Basic),
        );

        let mut schema_builder = Schema::builder();
        let notebook_id = schema_builder.add_text_field("notebook_id", STRING | STORED);
        let title = schema_builder.add_text_field("title", whole_value.clone());
        // One value per tag
        let tag_names = schema_builder.add_text_field("tag_names", whole_value);
        let schema = schema_builder.build();

        let index = Index::create_in_ram(schema);
        index.tokenizers().register(
            WHOLE_LOWERCASE,
            TextAnalyzer::builder(RawTokenizer::default())
                .filter(LowerCaser)
                .build(),
        );

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer_with_num_threads(1, 15_000_000)
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            reader,
            writer: RwLock::new(writer),
            fields: SearchFields {
                notebook_id,
                title,
                tag_names,
            },
        })
    }

    /// Rebuild the entire index from the catalog notebooks.
    pub async fn rebuild(&self, notebooks: &[Notebook]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_all_documents()?;

        for notebook in notebooks {
            let mut doc = TantivyDocument::default();
            doc.add_text(self.fields.notebook_id, &notebook.id);
            doc.add_text(self.fields.title, &notebook.title);
            for tag in &notebook.tags {
                doc.add_text(self.fields.tag_names, &tag.name);
            }
            writer.add_document(doc)?;
        }

        writer.commit()?;

        // Reload reader to see new documents
        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} notebooks", notebooks.len());
        Ok(())
    }

    /// Search notebooks whose title or any tag name contains the query,
    /// ignoring case. A blank query matches nothing.
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<SearchResult>, AppError> {
        if query_str.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let pattern = substring_pattern(query_str);
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for (field, boost) in [
            (self.fields.title, BOOST_TITLE),
            (self.fields.tag_names, BOOST_TAG_NAMES),
        ] {
            let contains = RegexQuery::from_pattern(&pattern, field)
                .map_err(|e| AppError::Search(format!("Invalid search query: {}", e)))?;
            clauses.push((
                Occur::Should,
                Box::new(BoostQuery::new(Box::new(contains), boost)),
            ));
        }

        let query = BooleanQuery::new(clauses);
        let searcher = self.reader.searcher();

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let results = top_docs
            .into_iter()
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let notebook_id = doc.get_first(self.fields.notebook_id)?.as_str()?.to_string();
                Some(SearchResult { notebook_id, score })
            })
            .collect();

        Ok(results)
    }
}
