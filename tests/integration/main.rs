//! Integration tests for strokecast

mod helpers;

mod cli_test;
mod recording_test;
mod replay_test;
