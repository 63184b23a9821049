use crate::core::error::Result;
use crate::reader::IndexReader;

/// The boundary a plugin runs against: given a read snapshot, produce an
/// opaque bag of key/value state to be stored under `(plugin_type,
/// settings)` via [`crate::writer::IndexWriter::set_plugin_state`].
/// Concrete plugins (sentiment scoring, topic extraction, entity
/// recognition, ...) are external collaborators; this crate only defines
/// the slot they write into and the snapshot they read from.
pub trait Plugin {
    fn plugin_type(&self) -> &str;
    fn settings(&self) -> &str;
    fn run(&self, snapshot: &IndexReader) -> Result<Vec<(String, String)>>;
}
