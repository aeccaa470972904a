//! Domain types: VP denominations, skin records and the ports the
//! application layer depends on.

pub mod denomination;
pub mod ports;
pub mod skin;
