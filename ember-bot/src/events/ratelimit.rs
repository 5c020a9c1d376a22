use tracing::warn;

use ember_core::{BotHandle, EventArgs};

pub async fn on_ratelimit(args: EventArgs, _bot: BotHandle) -> anyhow::Result<()> {
    let EventArgs::Rest(info) = args else {
        return Ok(());
    };

    warn!(
        path = %info.path,
        method = ?info.method,
        limit = info.limit,
        global = info.global,
        timeout_ms = info.timeout.as_millis() as u64,
        "hit a REST rate limit"
    );
    Ok(())
}
