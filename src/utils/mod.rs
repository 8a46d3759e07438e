pub mod helper;

#[cfg(test)]
pub(crate) mod testing;
