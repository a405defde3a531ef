pub mod changed;
pub mod check;
pub mod run;
