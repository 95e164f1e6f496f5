pub(crate) mod support;

mod classify;
mod orchestrator;
