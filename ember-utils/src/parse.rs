use anyhow::Context as _;

/// Parse a comma separated list of snowflake ids. Blank entries are skipped.
pub fn parse_id_list(raw: &str) -> anyhow::Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .with_context(|| format!("`{part}` is not a valid id"))
        })
        .collect()
}
