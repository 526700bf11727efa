#[cfg(test)]
mod test {
    use crate::prelude::*;
    use crate::tests::toolkit::{gpst, parse_resource, records};
    #[test]
    fn null_interval_keeps_window() {
        let solutions = parse_resource("POS/kinematic_llh.pos");
        let window = FilterConfig::default().with_time_window(
            Some(gpst("2024-03-01T00:00:10")),
            Some(gpst("2024-03-01T00:00:50")),
        );
        let windowed = window.apply(solutions.records());
        assert_eq!(windowed.len(), 5);

        let decimated = window
            .with_interval(Duration::ZERO)
            .apply(solutions.records());
        assert_eq!(decimated, windowed);
    }
    #[test]
    fn minimal_spacing() {
        let solutions = parse_resource("POS/kinematic_llh.pos");
        for interval_s in [5.0, 10.0, 15.0, 25.0, 60.0] {
            let interval = Duration::from_seconds(interval_s);
            let retained = FilterConfig::default()
                .with_interval(interval)
                .apply(solutions.records());
            assert_eq!(retained[0], solutions.records()[0]);
            for pair in retained.windows(2) {
                assert!(
                    pair[1].epoch - pair[0].epoch >= interval,
                    "{} -> {} violates {}",
                    pair[0].epoch,
                    pair[1].epoch,
                    interval
                );
            }
        }
        let retained = FilterConfig::default()
            .with_interval(Duration::from_seconds(25.0))
            .apply(solutions.records());
        let epochs = retained.iter().map(|r| r.epoch).collect::<Vec<_>>();
        assert_eq!(
            epochs,
            vec![
                gpst("2024-03-01T00:00:00"),
                gpst("2024-03-01T00:00:30"),
                gpst("2024-03-01T00:01:00"),
            ]
        );
    }
    #[test]
    fn window_containment() {
        let solutions = parse_resource("POS/kinematic_llh.pos");
        let (start, end) = (gpst("2024-03-01T00:00:15"), gpst("2024-03-01T00:00:45"));
        let retained = FilterConfig::default()
            .with_time_window(Some(start), Some(end))
            .apply(solutions.records());
        assert_eq!(retained.len(), 3);
        assert!(retained.iter().all(|r| r.epoch >= start && r.epoch <= end));

        let retained = FilterConfig::default().apply(solutions.records());
        assert_eq!(retained.len(), solutions.len());
    }
    #[test]
    fn quality_mask() {
        let solutions = parse_resource("POS/kinematic_llh.pos");
        for (quality, expected) in [
            (Quality::Fix, 5),
            (Quality::Float, 2),
            (Quality::Single, 1),
            (Quality::Ppp, 0),
        ] {
            let retained = FilterConfig::default()
                .with_quality(quality)
                .apply(solutions.records());
            assert_eq!(retained.len(), expected, "bad {} count", quality);
            assert!(retained.iter().all(|r| r.quality == quality));
        }
    }
    #[test]
    fn null_offset_identity() {
        let solutions = parse_resource("POS/kinematic_llh.pos");
        let retained = FilterConfig::default()
            .with_offset(EnuOffset::new(0.0, 0.0, 0.0))
            .apply(solutions.records());
        assert_eq!(retained, solutions.records());
    }
    #[test]
    fn local_offset() {
        let input = records(&[Quality::Fix, Quality::Fix], 1);
        let offset = EnuOffset::new(1.0, 2.0, 3.0);
        let moved = FilterConfig::default().with_offset(offset).apply(&input);
        for (before, after) in input.iter().zip(moved.iter()) {
            assert_eq!(before.epoch, after.epoch);
            assert_eq!(before.quality, after.quality);
            // back to the original position, in the local frame of the moved point
            let back = after.position.displaced(-1.0, -2.0, -3.0);
            assert!((back.latitude_ddeg - before.position.latitude_ddeg).abs() < 1.0E-9);
            assert!((back.longitude_ddeg - before.position.longitude_ddeg).abs() < 1.0E-9);
            assert!((back.altitude_m - before.position.altitude_m).abs() < 1.0E-5);
            // not a raw addition to degrees
            assert!((after.position.latitude_ddeg - before.position.latitude_ddeg) < 1.0E-4);
        }
    }
}
