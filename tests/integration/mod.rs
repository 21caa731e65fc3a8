//! Integration tests for the outcome tree and transaction layer

mod test_utils;
mod transaction_control;
