pub mod acceptor;
pub mod problem;
pub mod selector;
pub mod solver;
mod utils;

pub mod json;

#[cfg(test)]
pub(crate) mod test_utils;
