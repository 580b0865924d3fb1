mod airport;

pub use airport::Airport;
