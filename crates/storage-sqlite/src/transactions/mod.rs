mod model;

pub use model::TransactionDB;
