mod thread_pool;

pub use thread_pool::*;

#[cfg(test)]
mod thread_pool_tests;
