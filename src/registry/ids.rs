use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 5;

/// Server time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

/// Id for a user chat message: `{millis}-{suffix}`
pub fn chat_message_id() -> String {
    format!("{}-{}", now_millis(), random_suffix())
}

/// Id for a system notification: `system-{millis}-{suffix}`
pub fn notification_id() -> String {
    format!("system-{}-{}", now_millis(), random_suffix())
}

/// Id for a notification caused by a dropped connection
pub fn disconnect_notification_id() -> String {
    format!("{}-disconnect", notification_id())
}
