use crate::domain::models::JsonOut;
use serde::Serialize;

/// Stdout helper: `--json` wraps the payload in `{ok, data}`, otherwise the
/// caller's row formatter renders it as plain text.
pub fn print_one<T: Serialize>(json: bool, data: T, row: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}
