use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReflexionError {
    /// The nth dataflow name is paired with the nth direction tag, so both lists
    /// must have the same length once blanks are dropped.
    #[error("source model row {row} ({entry_point}): {names} dataflow name(s) but {directions} direction tag(s)")]
    MisalignedRow {
        row: usize,
        entry_point: String,
        names: usize,
        directions: usize,
    },
}
