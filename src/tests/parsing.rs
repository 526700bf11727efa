#[cfg(test)]
mod test {
    use crate::prelude::*;
    use crate::tests::toolkit::{assert_position, gpst, parse_resource, test_resource};
    use std::io::Cursor;
    #[test]
    fn kinematic_geodetic() {
        let solutions = parse_resource("POS/kinematic_llh.pos");
        assert_eq!(solutions.len(), 8);

        let header = solutions.header();
        assert_eq!(header.time_system, TimeSystem::Gpst);
        assert_eq!(header.coordinates, CoordinateSystem::Geodetic);
        assert_eq!(header.time_format, InputTimeFormat::Calendar);
        assert_eq!(
            header.ref_position,
            Some(GeodeticPosition::new(35.681, 139.767, 40.0))
        );
        assert!(header
            .comments
            .contains(&"program   : RTKPOST ver.2.4.3 b34".to_string()));
        assert!(header.comments.contains(&"pos mode  : kinematic".to_string()));

        let qualities = solutions.iter().map(|r| r.quality).collect::<Vec<_>>();
        assert_eq!(
            qualities,
            vec![
                Quality::Fix,
                Quality::Fix,
                Quality::Fix,
                Quality::Float,
                Quality::Float,
                Quality::Fix,
                Quality::Fix,
                Quality::Single,
            ]
        );

        let first = &solutions.records()[0];
        assert_eq!(first.epoch, gpst("2024-03-01T00:00:00"));
        assert_position(&first.position, (35.6812361, 139.7671254, 40.1234), 1.0E-12, 1.0E-9);
        assert_eq!(first.nb_sat, Some(10));
        let std_dev = first.std_dev.unwrap();
        assert_eq!((std_dev.sdn, std_dev.sde, std_dev.sdu), (0.0032, 0.0027, 0.0081));
        assert_eq!(std_dev.sdun, Some(-0.0021));
        assert_eq!(first.age_s, Some(0.0));
        assert_eq!(first.ratio, Some(12.5));

        assert_eq!(solutions.first_epoch(), Some(gpst("2024-03-01T00:00:00")));
        assert_eq!(solutions.last_epoch(), Some(gpst("2024-03-01T00:01:10")));
    }
    #[test]
    fn static_ecef_utc() {
        let solutions = parse_resource("POS/static_ecef.pos");
        assert_eq!(solutions.len(), 3);
        assert_eq!(solutions.header().time_system, TimeSystem::Utc);
        assert_eq!(solutions.header().coordinates, CoordinateSystem::Ecef);

        // GPST - UTC = 18s
        let first = &solutions.records()[0];
        assert_eq!(first.epoch, gpst("2024-03-01T00:00:18"));
        assert_position(&first.position, (35.6812361, 139.7671254, 40.1234), 1.0E-7, 1.0E-2);

        let last = &solutions.records()[2];
        assert_eq!(last.quality, Quality::Dgps);
        assert_eq!(last.nb_sat, Some(7));
        assert_position(&last.position, (35.681238, 139.767127, 40.119), 1.0E-7, 1.0E-2);
        assert!(last.ratio.is_none());
        assert_eq!(last.std_dev.unwrap().sdne, Some(0.1));
    }
    #[test]
    fn baseline_jst() {
        let solutions = parse_resource("POS/baseline_enu.pos");
        assert_eq!(solutions.len(), 3);
        assert_eq!(solutions.header().time_system, TimeSystem::Jst);
        assert_eq!(solutions.header().coordinates, CoordinateSystem::Enu);

        // JST = UTC + 9h
        let records = solutions.records();
        assert_eq!(records[0].epoch, gpst("2024-03-01T00:00:18"));
        assert_eq!(records[1].epoch, gpst("2024-03-01T00:00:23"));

        // null baseline is the reference position
        assert_position(&records[0].position, (35.681, 139.767, 40.0), 1.0E-7, 1.0E-3);

        // 20m north, 10m east, 1.5m up
        let dlat = records[1].position.latitude_ddeg - 35.681;
        let dlon = records[1].position.longitude_ddeg - 139.767;
        assert!(dlat > 1.7E-4 && dlat < 1.9E-4, "dlat={}", dlat);
        assert!(dlon > 1.0E-4 && dlon < 1.2E-4, "dlon={}", dlon);
        assert!((records[1].position.altitude_m - 41.5).abs() < 1.0E-2);

        assert!(records[2].position.latitude_ddeg < 35.681);
        assert!(records[2].position.longitude_ddeg < 139.767);
        assert_eq!(records[2].quality, Quality::Float);
    }
    #[test]
    fn week_tow_utc() {
        let solutions = parse_resource("POS/weektow_utc.pos");
        assert_eq!(solutions.header().time_format, InputTimeFormat::WeekTow);
        let records = solutions.records();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].epoch, gpst("2024-03-01T00:00:18"));
        assert_eq!(records[3].epoch, gpst("2024-03-01T00:00:21"));
        assert_eq!(
            records.iter().map(|r| r.quality).collect::<Vec<_>>(),
            vec![Quality::Single, Quality::Single, Quality::Sbas, Quality::Ppp]
        );
        assert_eq!(records[3].nb_sat, Some(12));
        assert!(records.iter().all(|r| r.std_dev.is_none()));
        assert_position(&records[0].position, (-33.8567844, 151.2152967, 25.31), 1.0E-12, 1.0E-9);
    }
    #[test]
    fn geodetic_dms() {
        let solutions = parse_resource("POS/geodetic_dms.pos");
        assert_eq!(solutions.header().coordinates, CoordinateSystem::GeodeticDms);
        let records = solutions.records();
        assert_eq!(records.len(), 2);
        assert_position(&records[0].position, (35.6812361, 139.7671254, 40.1234), 1.0E-7, 1.0E-9);
        assert_position(&records[1].position, (-33.8567844, 151.2152967, 25.31), 1.0E-7, 1.0E-9);
        assert_eq!(records[1].quality, Quality::Single);
    }
    #[test]
    fn default_layout() {
        let solutions = parse_resource("POS/no_header.pos");
        assert_eq!(solutions.header(), &SolutionHeader {
            comments: vec!["solution log exported without column header".to_string()],
            ..Default::default()
        });
        assert_eq!(
            solutions.iter().map(|r| r.quality).collect::<Vec<_>>(),
            vec![Quality::Fix, Quality::Float, Quality::Dgps]
        );
        assert_eq!(solutions.records()[2].epoch, gpst("2024-03-01T00:01:00"));
    }
    #[test]
    fn comments_only() {
        let solutions = parse_resource("POS/comments_only.pos");
        assert!(solutions.is_empty());
        assert_eq!(solutions.first_epoch(), None);
        assert_eq!(solutions.header().coordinates, CoordinateSystem::Geodetic);
    }
    #[test]
    fn missing_field() {
        let path = test_resource("POS/missing_field.pos");
        match Solutions::from_path(&path) {
            Err(Error::Parsing {
                line,
                content,
                error,
            }) => {
                assert_eq!(line, 5);
                assert!(content.starts_with("2024/03/01 00:00:00.000"));
                assert_eq!(
                    error,
                    ParsingError::ColumnCount {
                        expected: "7|10|13|14|15".to_string(),
                        found: 6,
                    }
                );
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }
    #[test]
    fn unknown_layout() {
        let path = test_resource("POS/unknown_layout.pos");
        let result = Solutions::from_path(&path);
        assert!(
            matches!(
                result,
                Err(Error::Parsing {
                    line: 2,
                    error: ParsingError::UnknownCoordinates(_),
                    ..
                })
            ),
            "unexpected result: {:?}",
            result
        );
        assert_eq!(
            result.err().map(|e| e.status()),
            Some(ConversionStatus::FormatError)
        );
    }
    #[test]
    fn non_text_line() {
        let mut content = b"% GPST latitude(deg) longitude(deg) height(m) Q ns\n".to_vec();
        content.extend_from_slice(b"2024/03/01 00:00:00.000 35.0 139.0 50.0 1 8\n");
        content.extend_from_slice(b"2024/03/01 00:00:01.000 35.0 139.0 \xff 1 8\n");
        match Solutions::from_reader(Cursor::new(content)) {
            Err(e) => {
                assert_eq!(e.status(), ConversionStatus::FormatError);
                match e {
                    Error::Parsing { line, error, .. } => {
                        assert_eq!(line, 3);
                        assert_eq!(error, ParsingError::Encoding);
                    },
                    e => panic!("unexpected error {}", e),
                }
            },
            Ok(_) => panic!("binary content should not pass"),
        }
    }
    #[test]
    fn ecef_origin_is_rejected() {
        let content = "% GPST x-ecef(m) y-ecef(m) z-ecef(m) Q ns
2024/03/01 00:00:00.000 0.0 0.0 0.0 5 4
";
        match Solutions::from_reader(Cursor::new(content)) {
            Err(Error::Parsing { line, error, .. }) => {
                assert_eq!(line, 2);
                assert!(matches!(error, ParsingError::Coordinates(_)));
            },
            Err(e) => panic!("unexpected error {}", e),
            Ok(solutions) => panic!("parsed invalid positions {:?}", solutions.records()),
        }
    }
    #[test]
    fn unreadable_file() {
        let path = test_resource("POS/does_not_exist.pos");
        let result = Solutions::from_path(&path);
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(
            result.err().map(|e| e.status()),
            Some(ConversionStatus::ReadError)
        );
    }
}
