//! Checks that a transformation preserved observable behavior.

pub mod same_behavior;
