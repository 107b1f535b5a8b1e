pub mod balance;
pub mod withdraw;
