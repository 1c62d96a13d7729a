pub mod loan;
pub mod reviews;
