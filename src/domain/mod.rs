// Domain layer: the test record and the seams (ports) the harness drives.

pub mod model;
pub mod ports;
