mod model;
mod repository;

pub use model::LedgerAccountDB;
pub use repository::LedgerRepository;
