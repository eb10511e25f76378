//! Background loops for continuous processing.

pub mod proximity_loop;
