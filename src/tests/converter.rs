#[cfg(test)]
mod test {
    use crate::prelude::*;
    use crate::tests::toolkit::{gpst, test_resource};
    use std::sync::{atomic::AtomicBool, Arc};
    use tempfile::tempdir;

    #[test]
    fn kml_conversion() {
        let workspace = tempdir().unwrap();
        let output = workspace.path().join("kinematic.kml");
        let result = convert(
            test_resource("POS/kinematic_llh.pos"),
            &output,
            &FilterConfig::default(),
            &StyleConfig::default(),
            Format::Kml,
        );
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::Success);
        let report = result.unwrap();
        assert_eq!(report.parsed, 8);
        assert_eq!(report.retained, 8);
        assert_eq!(report.output, output);
        assert_eq!(report.format, Format::Kml);

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("<Placemark"));
    }
    #[test]
    fn gpx_conversion() {
        let workspace = tempdir().unwrap();
        let output = workspace.path().join("kinematic.gpx");
        let filter = FilterConfig::default().with_interval(Duration::from_seconds(30.0));
        let mut converter = Converter::new(Format::Gpx).with_filter(filter);
        assert_eq!(converter.stage(), Stage::Idle);

        let report = converter
            .convert(test_resource("POS/kinematic_llh.pos"), &output)
            .unwrap();
        assert_eq!(converter.stage(), Stage::Done);
        assert_eq!(report.retained, 3);

        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content.matches("<trkpt").count(), 3);
    }
    #[test]
    fn no_data() {
        let workspace = tempdir().unwrap();
        let output = workspace.path().join("empty.kml");
        let result = convert(
            test_resource("POS/comments_only.pos"),
            &output,
            &FilterConfig::default(),
            &StyleConfig::default(),
            Format::Kml,
        );
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::NoDataError);
        assert!(!output.exists());

        // everything filtered out
        let filter = FilterConfig::default().with_time_window(Some(gpst("2025-01-01T00:00:00")), None);
        let result = convert(
            test_resource("POS/kinematic_llh.pos"),
            &output,
            &filter,
            &StyleConfig::default(),
            Format::Gpx,
        );
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::NoDataError);
        assert!(!output.exists());
    }
    #[test]
    fn format_error() {
        let workspace = tempdir().unwrap();
        let output = workspace.path().join("malformed.kml");
        let mut converter = Converter::new(Format::Kml);
        let result = converter.convert(test_resource("POS/missing_field.pos"), &output);
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::FormatError);
        assert_eq!(result.err().map(|e| e.status().code()), Some(-2));
        assert_eq!(
            converter.stage(),
            Stage::Failed(ConversionStatus::FormatError)
        );
        assert!(!output.exists());
    }
    #[test]
    fn read_error() {
        let workspace = tempdir().unwrap();
        let output = workspace.path().join("none.kml");
        let result = convert(
            workspace.path().join("none.pos"),
            &output,
            &FilterConfig::default(),
            &StyleConfig::default(),
            Format::Kml,
        );
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::ReadError);
        assert!(!output.exists());
    }
    #[test]
    fn write_error() {
        let workspace = tempdir().unwrap();
        let output = workspace.path().join("missing").join("dir").join("out.kml");
        let result = convert(
            test_resource("POS/kinematic_llh.pos"),
            &output,
            &FilterConfig::default(),
            &StyleConfig::default(),
            Format::Kml,
        );
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::WriteError);
        assert!(!output.exists());
    }
    #[test]
    fn non_text_content() {
        let workspace = tempdir().unwrap();
        let input = workspace.path().join("binary.pos");
        let output = workspace.path().join("binary.kml");
        let mut content = b"2024/03/01 00:00:00.000 35.0 139.0 50.0 1 8\n".to_vec();
        content.extend_from_slice(b"2024/03/01 00:00:01.000 35.0 139.0 50.0 1 \xff\n");
        std::fs::write(&input, content).unwrap();

        let result = convert(
            &input,
            &output,
            &FilterConfig::default(),
            &StyleConfig::default(),
            Format::Kml,
        );
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::FormatError);
        assert!(!output.exists());
    }
    #[test]
    fn existing_output() {
        let workspace = tempdir().unwrap();
        let output = workspace.path().join("existing.kml");
        std::fs::write(&output, "previous content").unwrap();

        // failed conversions preserve existing files
        let result = convert(
            test_resource("POS/missing_field.pos"),
            &output,
            &FilterConfig::default(),
            &StyleConfig::default(),
            Format::Kml,
        );
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::FormatError);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous content");

        // successful conversions replace them
        let result = convert(
            test_resource("POS/kinematic_llh.pos"),
            &output,
            &FilterConfig::default(),
            &StyleConfig::default(),
            Format::Kml,
        );
        assert!(result.is_ok());
        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("<Placemark"));
    }
    #[test]
    fn no_partial_file() {
        let workspace = tempdir().unwrap();
        // renaming onto a directory fails once the content is written
        let output = workspace.path().join("output.kml");
        std::fs::create_dir(&output).unwrap();

        let result = convert(
            test_resource("POS/kinematic_llh.pos"),
            &output,
            &FilterConfig::default(),
            &StyleConfig::default(),
            Format::Kml,
        );
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::WriteError);
        assert!(output.is_dir());

        let entries = std::fs::read_dir(workspace.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect::<Vec<_>>();
        assert_eq!(entries, vec![std::ffi::OsString::from("output.kml")]);
    }
    #[test]
    fn missing_geoid() {
        let workspace = tempdir().unwrap();
        let output = workspace.path().join("msl.kml");
        let style = StyleConfig::default().with_altitude(AltitudeMode::MeanSeaLevel);
        let mut converter = Converter::new(Format::Kml).with_style(style);
        let result = converter.convert(test_resource("POS/kinematic_llh.pos"), &output);
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::ConfigError);
        assert_eq!(converter.stage(), Stage::Failed(ConversionStatus::ConfigError));
        assert!(!output.exists());

        let grid = GeoidGrid::from_gsi_file(&test_resource("GEOID/tokyo_bay.asc")).unwrap();
        let mut converter = converter.with_geoid(Arc::new(grid));
        assert!(converter
            .convert(test_resource("POS/kinematic_llh.pos"), &output)
            .is_ok());
        assert!(output.exists());
    }
    #[test]
    fn geoid_coverage() {
        let workspace = tempdir().unwrap();
        let output = workspace.path().join("sydney.gpx");
        let grid = GeoidGrid::from_gsi_file(&test_resource("GEOID/tokyo_bay.asc")).unwrap();
        let style = StyleConfig::default().with_altitude(AltitudeMode::MeanSeaLevel);
        let result = Converter::new(Format::Gpx)
            .with_style(style)
            .with_geoid(Arc::new(grid))
            .convert(test_resource("POS/weektow_utc.pos"), &output);
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::ConfigError);
        assert!(!output.exists());
    }
    #[test]
    fn cancellation() {
        let workspace = tempdir().unwrap();
        let output = workspace.path().join("cancelled.kml");
        let cancel = Arc::new(AtomicBool::new(true));
        let mut converter = Converter::new(Format::Kml).with_cancellation(cancel.clone());
        let result = converter.convert(test_resource("POS/kinematic_llh.pos"), &output);
        assert_eq!(ConversionStatus::from(&result), ConversionStatus::Cancelled);
        assert_eq!(converter.stage(), Stage::Failed(ConversionStatus::Cancelled));
        assert!(!output.exists());

        cancel.store(false, std::sync::atomic::Ordering::Relaxed);
        assert!(converter
            .convert(test_resource("POS/kinematic_llh.pos"), &output)
            .is_ok());
        assert_eq!(converter.stage(), Stage::Done);
    }
}
