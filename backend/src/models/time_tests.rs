#[cfg(test)]
mod tests {
    use crate::models::time::*;

    #[test]
    fn test_range_keys_round_trip() {
        for range in TimeRange::ALL {
            assert_eq!(TimeRange::parse(range.key()), Some(range));
        }
    }

    #[test]
    fn test_window_durations() {
        assert_eq!(window_duration_ms("24h"), 86_400_000);
        assert_eq!(window_duration_ms("7d"), 604_800_000);
        assert_eq!(window_duration_ms("30d"), 2_592_000_000);
        assert_eq!(window_duration_ms("365d"), 31_536_000_000);
    }

    #[test]
    fn test_unknown_range_defaults_to_day() {
        assert_eq!(TimeRange::from_key("unknown-key"), TimeRange::Day);
        assert_eq!(TimeRange::from_key(""), TimeRange::Day);
        assert_eq!(TimeRange::from_key("7D"), TimeRange::Day);
        assert_eq!(window_duration_ms("bogus"), DAY_MS);
        assert_eq!(TimeRange::parse("bogus"), None);
    }

    #[test]
    fn test_cutoff_saturates() {
        assert_eq!(TimeRange::Day.cutoff(2000), 2000 - DAY_MS);
        assert_eq!(TimeRange::Year.cutoff(i64::MIN), i64::MIN);
    }

    #[test]
    fn test_range_serde_uses_keys() {
        let json = serde_json::to_string(&TimeRange::Week).unwrap();
        assert_eq!(json, "\"7d\"");
        let range: TimeRange = serde_json::from_str("\"365d\"").unwrap();
        assert_eq!(range, TimeRange::Year);
    }

    #[test]
    fn test_format_iso() {
        assert_eq!(format_iso(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_iso(1_704_164_645_123), "2024-01-02T03:04:05.123Z");
        assert_eq!(format_iso(i64::MAX), "");
    }

    #[test]
    fn test_parse_iso_variants() {
        assert_eq!(parse_iso("2024-01-02T03:04:05.123Z"), Some(1_704_164_645_123));
        assert_eq!(parse_iso("2024-01-02T04:04:05.123+01:00"), Some(1_704_164_645_123));
        assert_eq!(parse_iso("2024-01-02T03:04:05"), Some(1_704_164_645_000));
        assert_eq!(parse_iso("2024-01-02 03:04:05"), Some(1_704_164_645_000));
        assert_eq!(parse_iso("2024-01-02"), Some(1_704_153_600_000));
        assert_eq!(parse_iso("  2024-01-02  "), Some(1_704_153_600_000));
    }

    #[test]
    fn test_parse_iso_rejects_garbage() {
        assert_eq!(parse_iso(""), None);
        assert_eq!(parse_iso("yesterday"), None);
        assert_eq!(parse_iso("2024-13-45"), None);
        assert_eq!(parse_iso("12:30:00"), None);
    }

    #[test]
    fn test_format_in_fixed_zone() {
        let utc = DisplayZone::utc();
        let ts = 1_704_164_645_000; // 2024-01-02T03:04:05Z
        assert_eq!(utc.format_time(ts), "3:04:05 AM");
        assert_eq!(utc.format_when(ts), "1/2/2024, 3:04:05 AM");
        assert_eq!(utc.format_label(ts, TimeRange::Day), "03:04");
        assert_eq!(utc.format_label(ts, TimeRange::Week), "01/02 03:04");

        let plus_two = DisplayZone::from_offset_minutes(120).unwrap();
        assert_eq!(plus_two.format_time(ts), "5:04:05 AM");

        let minus_five = DisplayZone::from_offset_minutes(-300).unwrap();
        assert_eq!(minus_five.format_when(ts), "1/1/2024, 10:04:05 PM");
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(DisplayZone::from_offset_minutes(24 * 60).is_none());
        assert!(DisplayZone::from_offset_minutes(i32::MAX).is_none());
    }

    #[test]
    fn test_unrepresentable_timestamps_render_empty() {
        let zone = DisplayZone::utc();
        assert_eq!(zone.format_time(i64::MAX), "");
        assert!(!is_representable(i64::MAX));
        assert!(is_representable(0));
    }
}
