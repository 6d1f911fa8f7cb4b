use thiserror::Error;

/// Fatal errors raised while reading the five Bookshelf files into a
/// `Design`. Warnings (header-count mismatches, `/FIXED` on a non-terminal
/// node) are logged and do not appear here.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("missing input file: {0}")]
    MissingInput(String),

    #[error("malformed record in {file}:{line}: {detail}")]
    MalformedRecord {
        file: String,
        line: usize,
        detail: String,
    },

    #[error("net '{net}' references undefined node '{node}' ({file}:{line})")]
    DanglingPin {
        file: String,
        line: usize,
        net: String,
        node: String,
    },

    #[error("header mismatch in {file}: declared {declared} but observed {observed}")]
    HeaderMismatch {
        file: String,
        declared: usize,
        observed: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
