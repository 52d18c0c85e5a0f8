mod model;
mod repository;

pub use model::WithdrawalRequestDB;
pub use repository::WithdrawalRepository;
