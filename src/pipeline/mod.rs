// Concurrent batch pipeline over the synchronous analyzers.

pub mod batch;
