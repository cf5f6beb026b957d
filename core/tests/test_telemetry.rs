#[cfg(test)]
mod telemetry_snapshot_tests {
    use dspack_core::codec::Codec;
    use dspack_core::row::Value;
    use dspack_core::telemetry::{TelemetryCounters, TelemetrySnapshot};

    fn make_counters() -> TelemetryCounters {
        TelemetryCounters {
            rows_encoded: 3,
            rows_decoded: 1,
            bytes_records: 200,
            bytes_prefix: 16,
            bytes_schema: 12,
        }
    }

    #[test]
    fn snapshot_ratios() {
        let snapshot = TelemetrySnapshot::from(&make_counters());
        assert!((snapshot.prefix_overhead_ratio - 0.08).abs() < 1e-9);
        assert!((snapshot.avg_record_bytes - 50.0).abs() < 1e-9);
        assert!(snapshot.sanity_check());
    }

    #[test]
    fn empty_counters_have_zero_ratios() {
        let snapshot = TelemetrySnapshot::from(&TelemetryCounters::default());
        assert_eq!(snapshot.prefix_overhead_ratio, 0.0);
        assert_eq!(snapshot.avg_record_bytes, 0.0);
        assert!(snapshot.sanity_check());
    }

    #[test]
    fn merge_and_add_assign_agree() {
        let mut a = make_counters();
        a.merge(&make_counters());

        let mut b = make_counters();
        b += make_counters();

        assert_eq!(a, b);
        assert_eq!(a.rows_encoded, 6);
        assert_eq!(a.total_bytes(), 424);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let json = TelemetrySnapshot::from(&make_counters()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows_encoded"], 3);
        assert_eq!(value["bytes_schema"], 12);

        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bytes_prefix, 16);
    }

    #[test]
    fn packer_snapshot_matches_output() {
        let codec = Codec::new("~s(body)").unwrap();
        let mut packer = codec.packer_with(dspack_core::PackConfig::new(None, Some(true)));
        packer.add_row(&[Value::from("payload")]).unwrap();

        let snapshot = packer.snapshot();
        assert_eq!(snapshot.rows_encoded, 1);
        assert_eq!(snapshot.bytes_schema, 4 + "~s(body)".len() as u64);
        assert_eq!(
            snapshot.bytes_records + snapshot.bytes_schema,
            packer.len() as u64
        );
        assert!(snapshot.sanity_check());
    }
}
