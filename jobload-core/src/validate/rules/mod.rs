pub(crate) mod generator;
pub(crate) mod run;
pub(crate) mod target;
