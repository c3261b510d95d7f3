//! Text helpers shared by the driver and the command-line front end.

pub mod grouping;
