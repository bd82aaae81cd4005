//! Library side of the `iss-mapper` command line tool.

pub mod logging;
pub mod workflow;
