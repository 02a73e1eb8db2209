// Collaborators at the edges of the spend engine:
// CSV ledgers in, rendered balance reports out.

pub mod export;
pub mod import;

pub use export::{render_text, write_report, OutputFormat};
pub use import::{parse_timestamp, read_ledger_csv};
