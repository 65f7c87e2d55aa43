pub mod lloyd;
