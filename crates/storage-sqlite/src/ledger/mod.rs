mod writer;

pub use writer::LedgerWriter;
