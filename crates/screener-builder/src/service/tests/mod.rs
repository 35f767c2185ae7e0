mod benefits;
mod checks;
mod common;
