use crate::schema::Operator;

/// A parsed query. Leaves resolve against the vocabulary or `document_data`;
/// internal nodes compose leaves via the result-set algebra in
/// [`crate::search::result_set`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The literal `*`: every frame in the index.
    All,
    /// A term or wildcard pattern (`?`/`*`), looked up in the vocabulary.
    /// A multi-word operand (`"New York"`, or `New York` unquoted) is kept
    /// joined by single spaces and looked up as one vocabulary entry, since
    /// that is how a compound token is spelled once analyzed.
    Term(String),
    /// A structured-field predicate: `field op value`.
    Predicate { field: String, op: Operator, value: String },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    /// `left NOT right`: everything `left` matches minus everything `right`
    /// matches.
    Not(Box<Expr>, Box<Expr>),
    /// `expr ^ weight`: every score `expr` produces, multiplied by `weight`.
    Weight(Box<Expr>, f64),
}
