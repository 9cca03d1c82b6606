// Domain layer: ledger records and the persistence port.

pub mod model;
pub mod ports;
