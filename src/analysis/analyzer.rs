use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::{OuterPunctuationFilter, PossessiveContractionFilter, StopFilter};
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{EverythingTokenizer, Tokenizer, WordTokenizer};
use crate::core::error::{Error, Result};

/// A tokenizer followed by a chain of filters, applied to a field's raw
/// text to produce the stream indexed and stored against it.
pub struct Analyzer {
    pub name: String,
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
}

impl Analyzer {
    pub fn new(name: impl Into<String>, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer { name: name.into(), tokenizer, filters: Vec::new() }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);
        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }
        tokens
    }

    /// The default analyzer: word tokenization, outer-punctuation and
    /// possessive stripping, then English stop-word marking.
    pub fn standard_english() -> Self {
        Analyzer::new("standard", Box::new(WordTokenizer::default()))
            .add_filter(Box::new(OuterPunctuationFilter::default()))
            .add_filter(Box::new(PossessiveContractionFilter::new()))
            .add_filter(Box::new(StopFilter::english()))
    }

    /// Indexes the entire field value as a single token, for categorical
    /// text and identifier fields.
    pub fn everything() -> Self {
        Analyzer::new("everything", Box::new(EverythingTokenizer))
    }
}

/// Named lookup of the analyzers a writer or reader may apply. Registered
/// once at open time and shared behind a lock since the same registry backs
/// every field's analysis.
pub struct AnalyzerRegistry {
    analyzers: RwLock<HashMap<String, Arc<Analyzer>>>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        let registry = AnalyzerRegistry { analyzers: RwLock::new(HashMap::new()) };
        registry.register("standard", Analyzer::standard_english());
        registry.register("everything", Analyzer::everything());
        registry
    }

    pub fn register(&self, name: &str, analyzer: Analyzer) {
        self.analyzers.write().insert(name.to_string(), Arc::new(analyzer));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Analyzer>> {
        self.analyzers.read().get(name).cloned()
    }

    pub fn analyze(&self, analyzer_name: &str, text: &str) -> Result<Vec<Token>> {
        self.get(analyzer_name)
            .map(|analyzer| analyzer.analyze(text))
            .ok_or_else(|| Error::ContainerMissing(format!("analyzer '{}' not registered", analyzer_name)))
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        AnalyzerRegistry::new()
    }
}
