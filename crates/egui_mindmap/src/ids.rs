use web_time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, `0` if the clock is before it.
pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Generates a fresh element id such as `node-1718000000000-3fa2`.
pub fn generate(prefix: &str) -> String {
    let suffix: u16 = rand::random();
    format!("{prefix}-{}-{suffix:04x}", epoch_millis())
}

pub fn node_id() -> String {
    generate("node")
}

pub fn connection_id() -> String {
    generate("conn")
}
