//! Log line rendering
//!
//! Lines have a fixed shape:
//! `COLORED_LEVEL\tYYYY-MM-DD HH:MM:SS\tFILE:LINE\tMESSAGE\n`

use super::message::Message;
use chrono::{DateTime, TimeZone};

/// strftime pattern for the timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp<Tz>(datetime: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// Render a message into the bytes written to the sink.
#[must_use]
pub fn format_line(message: &Message) -> String {
    format!(
        "{}\t{}\t{}\t{}\n",
        message.level().colored_label(),
        format_timestamp(&message.created_at()),
        message.call_site(),
        message.text()
    )
}
