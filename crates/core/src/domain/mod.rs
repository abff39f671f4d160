pub mod credit;
pub mod product;
