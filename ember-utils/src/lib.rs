/// Generic embed builders shared across commands.
pub mod embed;
/// Shared formatting helpers (display names, batch summaries).
pub mod formatting;
/// Pure parser helpers.
pub mod parse;
/// Permission and role hierarchy helpers.
pub mod permissions;
/// Box-drawn text tables for load reports.
pub mod table;
