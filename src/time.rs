use chrono::{DateTime, Duration, TimeZone, Utc};

/// NEM network epoch, 2015-03-29 00:06:25 UTC, in Unix seconds.
pub const NEM_EPOCH_UNIX: i64 = 1_427_587_585;

/// Converts a NEM timestamp (seconds since the network epoch) to UTC.
pub fn nem_time_to_utc(timestamp: u32) -> DateTime<Utc> {
    let epoch = Utc
        .timestamp_opt(NEM_EPOCH_UNIX, 0)
        .single()
        .unwrap_or_default();
    epoch + Duration::seconds(i64::from(timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_nem_genesis() {
        assert_eq!(
            nem_time_to_utc(0).to_rfc3339(),
            "2015-03-29T00:06:25+00:00"
        );
    }

    #[test]
    fn adds_seconds() {
        assert_eq!(
            nem_time_to_utc(86_400).to_rfc3339(),
            "2015-03-30T00:06:25+00:00"
        );
    }
}
