//! Unit test helpers: frame builders for the hosts of the built-in topologies, and a connection
//! that records what the router asked the switch to do.
