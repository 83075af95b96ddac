// tests/_unit_entry.rs
#![allow(clippy::all)]

mod unit_tests {
    pub mod test_cdb;
    pub mod test_executor;
    pub mod test_features;
    pub mod test_mode;
    pub mod test_sense;
    pub mod test_toc;
}
