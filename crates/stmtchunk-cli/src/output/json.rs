use serde::Serialize;
use stmtchunk_core::error::ChunkerError;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), ChunkerError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
