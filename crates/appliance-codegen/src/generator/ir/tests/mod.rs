mod document;
mod registry;
