//! Common utilities for integration tests

pub mod test_helpers;

pub use test_helpers::{
    assert_strictly_increasing, oxygen_limited_session, reference_feed, reference_initial,
    relative_error,
};
