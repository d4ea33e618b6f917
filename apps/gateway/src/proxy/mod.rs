// Backend proxy: forwards analyzer calls to the upstream service with a
// per-route deadline and a uniform JSON envelope for every outcome.

pub mod gateway;
pub mod handlers;
pub mod route;
pub mod upstream;

#[cfg(test)]
pub mod testing;
