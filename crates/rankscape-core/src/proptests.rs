//! Property-based tests for the score formulas and metrics.
