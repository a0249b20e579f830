pub mod fitness;
pub mod penalty;

pub use fitness::{find_fitness, transport_cost};
