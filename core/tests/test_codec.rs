#[cfg(test)]
mod tests {
    use dspack_core::codec::{dumps, loads, loads_self_described, read_schema_block, Codec};
    use dspack_core::config::PackConfig;
    use dspack_core::row::Value;
    use dspack_core::types::PackError;

    fn codec() -> Codec {
        Codec::new("!H(day)B(dev)3s(cc)~s(name)").unwrap()
    }

    fn row(day: u16, name: &str) -> Vec<Value> {
        vec![
            Value::from(day),
            Value::from(1u8),
            Value::from("CNX"),
            Value::from(name),
        ]
    }

    #[test]
    fn codec_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Codec>();

        let a = codec();
        let b = a.clone();
        assert_eq!(a.segments(), b.segments());
    }

    #[test]
    fn packer_appends_in_order() {
        let mut packer = codec().packer();
        packer.add_row(&row(1, "a")).unwrap();
        packer.add_row(&row(2, "bb")).unwrap();
        assert_eq!(packer.rows_written(), 2);

        let codec = codec();
        let rows: Vec<_> = codec
            .decode_all(packer.data())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows, vec![row(1, "a"), row(2, "bb")]);
    }

    #[test]
    fn concatenated_records_form_a_stream() {
        let codec = codec();
        let mut stream = codec.encode(&row(1, "x")).unwrap().to_vec();
        stream.extend_from_slice(&codec.encode(&row(2, "y")).unwrap());

        let (first, next) = codec.decode_next(&stream, 0).unwrap().unwrap();
        let (second, end) = codec.decode_next(&stream, next).unwrap().unwrap();
        assert_eq!((first, second), (row(1, "x"), row(2, "y")));
        assert!(codec.decode_next(&stream, end).unwrap().is_none());
    }

    #[test]
    fn failed_batch_is_rolled_back() {
        let mut packer = codec().packer();
        packer.add_row(&row(1, "keep")).unwrap();
        let len = packer.len();

        let bad = vec![Value::from(1u16)];
        let res = packer.add_rows([row(2, "a"), bad, row(3, "b")]);
        assert!(matches!(res, Err(PackError::FieldNumber { .. })));
        assert_eq!(packer.len(), len);
        assert_eq!(packer.rows_written(), 1);
        assert_eq!(packer.counters().rows_encoded, 1);
    }

    #[test]
    fn clear_resets_the_buffer() {
        let mut packer = codec().packer();
        packer.add_rows([row(1, "a"), row(2, "b")]).unwrap();
        packer.clear();
        assert!(packer.is_empty());
        assert_eq!(packer.rows_written(), 0);
    }

    #[test]
    fn named_rows() {
        let codec = Codec::new("H(day) x B(dev)").unwrap();
        let mut packer = codec.packer();
        packer
            .add_named_row(&[("dev", Value::from(4u8)), ("day", Value::from(9u16))])
            .unwrap();

        let rows: Vec<_> = codec.decode_all(packer.data()).collect::<Result<_, _>>().unwrap();
        assert_eq!(rows[0], vec![Value::UInt(9), Value::Pad, Value::UInt(4)]);

        let named = codec.named(&rows[0]);
        assert_eq!(named[0], ("day", &Value::UInt(9)));
        assert_eq!(named[2].0, "dev");

        assert!(matches!(
            packer.add_named_row(&[("day", Value::from(1u16))]),
            Err(PackError::MissingField(ref id)) if id == "dev"
        ));
        assert!(matches!(
            codec.row_from_named(&[("day", Value::from(1u16)), ("dev", Value::from(1u8)), ("zzz", Value::Pad)]),
            Err(PackError::UnknownField(ref id)) if id == "zzz"
        ));
    }

    #[test]
    fn rows_iterator_fuses_after_error() {
        let codec = codec();
        let mut buf = codec.encode(&row(1, "ok")).unwrap().to_vec();
        buf.extend_from_slice(&[0, 0, 0, 50, 1]);

        let mut rows = codec.decode_all(&buf);
        assert!(matches!(rows.next(), Some(Ok(_))));
        assert!(matches!(rows.next(), Some(Err(PackError::Truncated { .. }))));
        assert!(rows.next().is_none());
        assert!(rows.next().is_none());

        // a fresh iterator starts over
        assert_eq!(codec.decode_all(&buf).take_while(Result::is_ok).count(), 1);
    }

    #[test]
    fn rows_clone_continues_independently() {
        let codec = codec();
        let data = dumps(codec.schema().text(), &[row(1, "a"), row(2, "b")]).unwrap();

        let mut rows = codec.decode_all(&data);
        rows.next();
        let rest = rows.clone();
        assert_eq!(rows.count(), 1);
        assert_eq!(rest.count(), 1);
    }

    #[test]
    fn dumps_and_loads() {
        let schema = "!~:Q(ids)";
        let rows = vec![vec![Value::list([1u64, 2, 3])], vec![Value::List(vec![])]];
        let data = dumps(schema, &rows).unwrap();
        assert_eq!(loads(schema, &data).unwrap(), rows);

        assert!(matches!(loads("H %", &data), Err(PackError::Schema(_))));
    }

    #[test]
    fn schema_block_describes_the_stream() {
        let mut packer = codec().packer_with(PackConfig::new(Some(64), Some(true)));
        packer.add_row(&row(5, "five")).unwrap();

        let (read, start) = read_schema_block(packer.data()).unwrap();
        assert_eq!(read.schema(), codec().schema());
        assert_eq!(start, 4 + codec().schema().text().len());

        let (codec, rows) = loads_self_described(packer.data()).unwrap();
        assert_eq!(codec.schema().len(), 4);
        assert_eq!(rows, vec![row(5, "five")]);

        packer.clear();
        assert_eq!(packer.len(), start, "clear keeps the schema block");
    }

    #[test]
    fn schema_block_must_be_utf8() {
        let buf = [0, 0, 0, 2, 0xC3, 0x28];
        assert!(matches!(read_schema_block(&buf), Err(PackError::Malformed(_))));

        let short = [0, 0, 0, 9, b'H'];
        assert!(matches!(read_schema_block(&short), Err(PackError::Truncated { .. })));
    }

    #[test]
    fn telemetry_tracks_records_and_prefixes() {
        let codec = codec();
        let mut packer = codec.packer();
        packer.add_rows([row(1, "a"), row(2, "bc")]).unwrap();

        let counters = packer.counters().clone();
        assert_eq!(counters.rows_encoded, 2);
        assert_eq!(counters.bytes_prefix, 8);
        assert_eq!(counters.bytes_records, packer.len() as u64);

        let mut rows = codec.decode_all(packer.data());
        rows.by_ref().for_each(drop);
        assert_eq!(rows.counters().rows_decoded, 2);
        assert_eq!(rows.counters().bytes_records, counters.bytes_records);
    }
}
