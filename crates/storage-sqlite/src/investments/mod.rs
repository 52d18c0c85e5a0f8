mod model;
mod repository;

pub use model::{InvestmentDB, ProductDB};
pub use repository::InvestmentRepository;
