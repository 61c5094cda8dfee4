// HTTP flows against the in-memory store

mod oauth;
mod service;
mod workflow;
