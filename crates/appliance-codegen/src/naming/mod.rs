pub mod identifiers;
pub mod slug;

#[cfg(test)]
mod tests;
