pub mod exact;
pub mod kou;
pub mod tree;
