//! KML emission
use dms_coordinates::DMS;
use itertools::Itertools;
use log::debug;
use std::collections::HashMap;
use std::io::Write;

use ::kml::{
    types::{AltitudeMode as KmlAltitudeMode, Coord, Element, Geometry, LineString, Placemark, Point},
    Kml, KmlDocument, KmlVersion, KmlWriter,
};

use crate::{
    emitter::{round_ddeg, Altitudes, Emitter, SharedGeoid},
    solution::SolutionRecord,
    style::{AltitudeMode, Color, ColorMode, QualityPalette, ResolvedStyle, StyleConfig, StyleResolver},
    time::TimeDisplay,
    Error,
};

/// Builds a simple text element
fn text_element(name: &str, content: String) -> Element {
    Element {
        name: name.to_string(),
        content: Some(content),
        ..Default::default()
    }
}

/// <Style id="c.."> with both line and icon colors
fn style_element(color: &Color) -> Element {
    let line = Element {
        name: "LineStyle".to_string(),
        children: vec![
            text_element("color", color.to_hex()),
            text_element("width", "2".to_string()),
        ],
        ..Default::default()
    };
    let icon = Element {
        name: "IconStyle".to_string(),
        children: vec![
            text_element("color", color.to_hex()),
            text_element("scale", "0.5".to_string()),
            Element {
                name: "Icon".to_string(),
                children: vec![text_element(
                    "href",
                    "http://maps.google.com/mapfiles/kml/shapes/shaded_dot.png".to_string(),
                )],
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    Element {
        name: "Style".to_string(),
        attrs: [("id".to_string(), color.style_id())].into_iter().collect(),
        children: vec![line, icon],
        ..Default::default()
    }
}

fn altitude_mode(mode: AltitudeMode) -> KmlAltitudeMode {
    match mode {
        AltitudeMode::None => KmlAltitudeMode::ClampToGround,
        _ => KmlAltitudeMode::Absolute,
    }
}

fn style_url(color: &Color) -> Element {
    text_element("styleUrl", format!("#{}", color.style_id()))
}

/// <ExtendedData> <Data name=".."><value>..</value></Data> </ExtendedData>
fn extended_data(record: &SolutionRecord) -> Element {
    let mut data = vec![("quality", record.quality.to_string())];
    if let Some(nb_sat) = record.nb_sat {
        data.push(("satellites", nb_sat.to_string()));
    }
    if let Some(std_dev) = record.std_dev {
        data.push(("sdn", format!("{:.4}", std_dev.sdn)));
        data.push(("sde", format!("{:.4}", std_dev.sde)));
        data.push(("sdu", format!("{:.4}", std_dev.sdu)));
    }
    if let Some(age) = record.age_s {
        data.push(("age", format!("{:.1}", age)));
    }
    if let Some(ratio) = record.ratio {
        data.push(("ratio", format!("{:.1}", ratio)));
    }
    Element {
        name: "ExtendedData".to_string(),
        children: data
            .into_iter()
            .map(|(name, value)| Element {
                name: "Data".to_string(),
                attrs: [("name".to_string(), name.to_string())].into_iter().collect(),
                children: vec![text_element("value", value)],
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn description(record: &SolutionRecord, time: &TimeDisplay, altitude: Option<f64>) -> String {
    let mut lines = Vec::<String>::with_capacity(6);
    if let Some(datetime) = time.format(record.epoch) {
        lines.push(format!("time: {}", datetime));
    }
    lines.push(format!("quality: {}", record.quality));
    if let Some(nb_sat) = record.nb_sat {
        lines.push(format!("satellites: {}", nb_sat));
    }
    lines.push(format!(
        "latitude: {}",
        DMS::from_ddeg_latitude(record.position.latitude_ddeg)
    ));
    lines.push(format!(
        "longitude: {}",
        DMS::from_ddeg_longitude(record.position.longitude_ddeg)
    ));
    if let Some(altitude) = altitude {
        lines.push(format!("height: {:.4} m", altitude));
    }
    lines.join("\n")
}

/// [KmlEmitter] generates a KML document made of a track
/// (one or several LineStrings) and one Point per record.
#[derive(Clone, Default)]
pub struct KmlEmitter {
    geoid: Option<SharedGeoid>,
    palette: QualityPalette,
}

impl KmlEmitter {
    pub fn new() -> Self {
        Self::default()
    }
    /// Copies and returns [Self] with a geoid model,
    /// required by mean sea level altitudes
    pub fn with_geoid(&self, geoid: SharedGeoid) -> Self {
        let mut s = self.clone();
        s.geoid = Some(geoid);
        s
    }
    /// Copies and returns [Self] with a custom [QualityPalette]
    pub fn with_palette(&self, palette: QualityPalette) -> Self {
        let mut s = self.clone();
        s.palette = palette;
        s
    }
    /// Builds the [KmlDocument], without writing anything
    pub fn document(
        &self,
        records: &[SolutionRecord],
        style: &StyleConfig,
    ) -> Result<KmlDocument<f64>, Error> {
        let altitudes = Altitudes::new(style.altitude, self.geoid.as_ref())?;

        let resolver = StyleResolver::new(style, &self.palette);
        let resolved = records
            .iter()
            .map(|r| resolver.resolve(r))
            .collect::<Vec<ResolvedStyle>>();

        let mut heights = Vec::with_capacity(records.len());
        let mut coords = Vec::with_capacity(records.len());
        for record in records {
            let height = altitudes.altitude(&record.position)?;
            heights.push(height);
            coords.push(Coord {
                x: round_ddeg(record.position.longitude_ddeg),
                y: round_ddeg(record.position.latitude_ddeg),
                z: Some(height.unwrap_or(0.0)),
            });
        }

        let mut elements = resolved
            .iter()
            .flat_map(|s| [s.track, s.point])
            .flatten()
            .unique()
            .map(|color| Kml::Element(style_element(&color)))
            .collect::<Vec<_>>();
        debug!("kml: {} styles", elements.len());

        let track = |color: &Color, coords: Vec<Coord<f64>>| {
            Kml::Placemark(Placemark {
                name: Some("track".to_string()),
                geometry: Some(Geometry::LineString(LineString {
                    coords,
                    extrude: false,
                    tessellate: style.altitude == AltitudeMode::None,
                    altitude_mode: altitude_mode(style.altitude),
                    attrs: HashMap::new(),
                })),
                children: vec![style_url(color)],
                ..Default::default()
            })
        };

        match style.track {
            ColorMode::Off => {},
            ColorMode::Fixed(color) => {
                if !coords.is_empty() {
                    elements.push(track(&color, coords.clone()));
                }
            },
            ColorMode::ByQuality => {
                // contiguous same color runs, each run is connected
                // to the first point of the following run
                let mut start = 0;
                while start < resolved.len() {
                    let color = resolved[start].track;
                    let end = (start..resolved.len())
                        .find(|i| resolved[*i].track != color)
                        .unwrap_or(resolved.len());
                    let last = (end + 1).min(resolved.len());
                    if let Some(color) = color {
                        elements.push(track(&color, coords[start..last].to_vec()));
                    }
                    start = end;
                }
            },
        }

        if style.point != ColorMode::Off {
            for (i, record) in records.iter().enumerate() {
                let mut children = Vec::with_capacity(3);
                if let Some(color) = resolved[i].point {
                    children.push(style_url(&color));
                }
                if let Some(when) = style.time.timestamp(record.epoch) {
                    children.push(Element {
                        name: "TimeStamp".to_string(),
                        children: vec![text_element("when", when)],
                        ..Default::default()
                    });
                }
                children.push(extended_data(record));

                elements.push(Kml::Placemark(Placemark {
                    name: style.time.minute_label(record.epoch),
                    description: Some(description(record, &style.time, heights[i])),
                    geometry: Some(Geometry::Point(Point {
                        coord: coords[i].clone(),
                        extrude: false,
                        altitude_mode: altitude_mode(style.altitude),
                        attrs: HashMap::new(),
                    })),
                    children,
                    ..Default::default()
                }));
            }
        }

        let mut doc = KmlDocument::<f64>::default();
        doc.version = KmlVersion::V22;
        doc.attrs = [(
            "xmlns".to_string(),
            "http://www.opengis.net/kml/2.2".to_string(),
        )]
        .into_iter()
        .collect();
        doc.elements = vec![Kml::Document {
            attrs: HashMap::new(),
            elements,
        }];
        Ok(doc)
    }
}

impl Emitter for KmlEmitter {
    fn emit(
        &self,
        records: &[SolutionRecord],
        style: &StyleConfig,
        writer: &mut dyn Write,
    ) -> Result<(), Error> {
        let doc = self.document(records, style)?;
        let mut kml_writer = KmlWriter::<_, f64>::from_writer(writer);
        kml_writer.write(&Kml::KmlDocument(doc))?;
        Ok(())
    }
}
