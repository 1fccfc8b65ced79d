//! Extraction of records from the simulator's XML reports
//!
//! Every function tells apart a report that is missing, one that cannot be
//! parsed, and one that parses but holds no matching element. A crashed
//! simulation and a simulation where no vehicle finished look the same on
//! disk otherwise.

use crate::error::{AnalysisError, AnalysisResult};
use crate::parser::records::{EmissionRecord, NetworkStep, QueueSample, TripRecord};
use roxmltree::{Document, Node};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Emission attributes are reported in mg and µL.
const EMISSION_UNIT_DIVISOR: f64 = 1000.0;

/// Parse the `tripinfo` children of a trip-info report.
pub fn parse_trips(path: &Path) -> AnalysisResult<Vec<TripRecord>> {
    let text = read_report(path)?;
    let doc = parse_document(path, &text)?;

    let trips = child_elements(doc.root_element(), "tripinfo")
        .map(|trip| {
            Ok(TripRecord {
                id: required_attr(path, trip, "id")?.to_string(),
                duration: numeric_attr(path, trip, "duration")?,
                waiting_time: numeric_attr(path, trip, "waitingTime")?,
                time_loss: numeric_attr(path, trip, "timeLoss")?,
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    debug!("Parsed {} trips from {}", trips.len(), path.display());
    non_empty(path, trips)
}

/// Parse the `emissions` child of every trip that has one.
///
/// CO2 and fuel are converted to grams and millilitres here, not at display time.
pub fn parse_emissions(path: &Path) -> AnalysisResult<Vec<EmissionRecord>> {
    let text = read_report(path)?;
    let doc = parse_document(path, &text)?;

    let mut records = Vec::new();
    for trip in child_elements(doc.root_element(), "tripinfo") {
        let Some(emissions) = child_elements(trip, "emissions").next() else {
            continue;
        };

        records.push(EmissionRecord {
            id: required_attr(path, trip, "id")?.to_string(),
            co2: numeric_attr::<f64>(path, emissions, "CO2_abs")? / EMISSION_UNIT_DIVISOR,
            fuel: numeric_attr::<f64>(path, emissions, "fuel_abs")? / EMISSION_UNIT_DIVISOR,
        });
    }

    debug!("Parsed {} emission records from {}", records.len(), path.display());
    non_empty(path, records)
}

/// Parse jam lengths from a lane/edge report.
///
/// Within an interval all `edge` elements come before all `lane` elements.
/// When `target_ids` is given, segments outside the set are skipped while
/// scanning.
pub fn parse_queues(
    path: &Path,
    target_ids: Option<&HashSet<String>>,
) -> AnalysisResult<Vec<QueueSample>> {
    let text = read_report(path)?;
    let doc = parse_document(path, &text)?;

    let mut samples = Vec::new();
    for interval in child_elements(doc.root_element(), "interval") {
        let time: f64 = numeric_attr(path, interval, "begin")?;

        let segments = child_elements(interval, "edge").chain(child_elements(interval, "lane"));
        for segment in segments {
            let id = required_attr(path, segment, "id")?;
            if target_ids.is_some_and(|targets| !targets.contains(id)) {
                continue;
            }

            let queue_length = match segment.attribute("maxJamLengthInMeters") {
                Some(raw) => parse_number(path, segment, "maxJamLengthInMeters", raw)?,
                None => 0.0,
            };

            samples.push(QueueSample {
                time,
                id: id.to_string(),
                queue_length,
            });
        }
    }

    debug!("Parsed {} queue samples from {}", samples.len(), path.display());
    non_empty(path, samples)
}

/// Parse the top-level `step` elements of a summary report.
pub fn parse_network_steps(path: &Path) -> AnalysisResult<Vec<NetworkStep>> {
    let text = read_report(path)?;
    let doc = parse_document(path, &text)?;

    let steps = child_elements(doc.root_element(), "step")
        .map(|step| {
            Ok(NetworkStep {
                time: numeric_attr(path, step, "time")?,
                mean_speed: numeric_attr(path, step, "meanSpeed")?,
                halting: numeric_attr(path, step, "halting")?,
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    debug!("Parsed {} network steps from {}", steps.len(), path.display());
    non_empty(path, steps)
}

fn read_report(path: &Path) -> AnalysisResult<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(AnalysisError::ReportMissing {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::InvalidData => Err(AnalysisError::MalformedReport {
            path: path.to_path_buf(),
            reason: "not valid UTF-8".to_string(),
        }),
        Err(e) => Err(AnalysisError::Io(e)),
    }
}

fn parse_document<'a>(path: &Path, text: &'a str) -> AnalysisResult<Document<'a>> {
    Document::parse(text).map_err(|e| AnalysisError::MalformedReport {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn child_elements<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    parent
        .children()
        .filter(move |n| n.is_element() && n.has_tag_name(tag))
}

fn required_attr<'a>(path: &Path, node: Node<'a, '_>, name: &str) -> AnalysisResult<&'a str> {
    node.attribute(name).ok_or_else(|| AnalysisError::MalformedReport {
        path: path.to_path_buf(),
        reason: format!(
            "<{}> element missing attribute '{}'",
            node.tag_name().name(),
            name
        ),
    })
}

fn numeric_attr<T: FromStr>(path: &Path, node: Node<'_, '_>, name: &str) -> AnalysisResult<T> {
    let raw = required_attr(path, node, name)?;
    parse_number(path, node, name, raw)
}

fn parse_number<T: FromStr>(path: &Path, node: Node<'_, '_>, name: &str, raw: &str) -> AnalysisResult<T> {
    raw.trim().parse().map_err(|_| AnalysisError::MalformedReport {
        path: path.to_path_buf(),
        reason: format!(
            "attribute '{}' of <{}> is not a valid number: '{}'",
            name,
            node.tag_name().name(),
            raw
        ),
    })
}

fn non_empty<T>(path: &Path, records: Vec<T>) -> AnalysisResult<Vec<T>> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyReport {
            path: path.to_path_buf(),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    const TRIPINFO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tripinfos>
    <tripinfo id="veh0" depart="0.00" duration="10.00" waitingTime="2.00" timeLoss="1.50">
        <emissions CO2_abs="2500000.00" fuel_abs="1075000.00"/>
    </tripinfo>
    <tripinfo id="veh1" depart="3.00" duration="20.00" waitingTime="4.00" timeLoss="6.25"/>
    <tripinfo id="veh2" depart="5.00" duration="35.50" waitingTime="0.00" timeLoss="0.00">
        <emissions CO2_abs="0.00" fuel_abs="1234.00"/>
    </tripinfo>
</tripinfos>
"#;

    const LANES: &str = r#"<meandata>
    <interval begin="0.00" end="60.00" id="queues">
        <edge id="E1" maxJamLengthInMeters="12.50"/>
        <edge id="E2"/>
        <lane id="E1_0" maxJamLengthInMeters="7.50"/>
    </interval>
    <interval begin="60.00" end="120.00" id="queues">
        <edge id="E1" maxJamLengthInMeters="30.00"/>
        <edge id="E2" maxJamLengthInMeters="4.00"/>
    </interval>
</meandata>
"#;

    #[test]
    fn test_parse_trips_reads_every_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "tripinfo.xml", TRIPINFO);

        let trips = parse_trips(&path).unwrap();
        assert_eq!(trips.len(), 3);
        assert_eq!(
            trips[1],
            TripRecord {
                id: "veh1".to_string(),
                duration: 20.0,
                waiting_time: 4.0,
                time_loss: 6.25,
            }
        );
        assert_eq!(trips[2].duration, 35.5);
    }

    #[test]
    fn test_parse_trips_ignores_nested_tripinfo() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "tripinfo.xml",
            r#"<tripinfos><group><tripinfo id="x" duration="1" waitingTime="0" timeLoss="0"/></group></tripinfos>"#,
        );

        assert!(matches!(parse_trips(&path), Err(AnalysisError::EmptyReport { .. })));
    }

    #[test]
    fn test_parse_emissions_converts_units() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "tripinfo.xml", TRIPINFO);

        let records = parse_emissions(&path).unwrap();
        // veh1 has no emissions element
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "veh0");
        assert_eq!(records[0].co2, 2500.0);
        assert_eq!(records[0].fuel, 1075.0);
        assert_eq!(records[1].co2, 0.0);
        assert_eq!(records[1].fuel, 1.234);
    }

    #[test]
    fn test_parse_emissions_without_any_emissions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "tripinfo.xml",
            r#"<tripinfos><tripinfo id="a" duration="1" waitingTime="0" timeLoss="0"/></tripinfos>"#,
        );

        assert!(matches!(parse_emissions(&path), Err(AnalysisError::EmptyReport { .. })));
    }

    #[test]
    fn test_parse_queues_unfiltered() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "lane_output.xml", LANES);

        let samples = parse_queues(&path, None).unwrap();
        let ids: Vec<&str> = samples.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["E1", "E2", "E1_0", "E1", "E2"]);
        assert_eq!(samples[0].time, 0.0);
        assert_eq!(samples[3].time, 60.0);
        assert_eq!(samples[3].queue_length, 30.0);
    }

    #[test]
    fn test_parse_queues_missing_jam_length_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "lane_output.xml", LANES);

        let samples = parse_queues(&path, None).unwrap();
        assert_eq!(samples[1].id, "E2");
        assert_eq!(samples[1].queue_length, 0.0);
    }

    #[test]
    fn test_parse_queues_filters_by_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "lane_output.xml", LANES);
        let targets: HashSet<String> = ["E1".to_string(), "E1_0".to_string()].into();

        let samples = parse_queues(&path, Some(&targets)).unwrap();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| targets.contains(&s.id)));
    }

    #[test]
    fn test_parse_queues_unknown_target_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "lane_output.xml", LANES);
        let targets: HashSet<String> = ["nowhere".to_string()].into();

        assert!(matches!(
            parse_queues(&path, Some(&targets)),
            Err(AnalysisError::EmptyReport { .. })
        ));
    }

    #[test]
    fn test_parse_queues_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "lane_output.xml", "<meandata></meandata>");

        assert!(matches!(parse_queues(&path, None), Err(AnalysisError::EmptyReport { .. })));
    }

    #[test]
    fn test_parse_network_steps() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "summary.xml",
            r#"<summary>
    <step time="0.00" loaded="1" running="0" halting="0" meanSpeed="-1.00"/>
    <step time="1.00" loaded="2" running="2" halting="1" meanSpeed="8.35"/>
</summary>"#,
        );

        let steps = parse_network_steps(&path).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].mean_speed, -1.0);
        assert_eq!(
            steps[1],
            NetworkStep {
                time: 1.0,
                mean_speed: 8.35,
                halting: 1,
            }
        );
    }

    #[test]
    fn test_missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.xml");

        assert!(matches!(parse_network_steps(&path), Err(AnalysisError::ReportMissing { .. })));
    }

    #[test]
    fn test_truncated_report_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "tripinfo.xml",
            r#"<tripinfos><tripinfo id="a" duration="1" waitingTime="0" timeLoss="0"/>"#,
        );

        assert!(matches!(parse_trips(&path), Err(AnalysisError::MalformedReport { .. })));
    }

    #[test]
    fn test_non_numeric_attribute_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "tripinfo.xml",
            r#"<tripinfos><tripinfo id="a" duration="fast" waitingTime="0" timeLoss="0"/></tripinfos>"#,
        );

        match parse_trips(&path) {
            Err(AnalysisError::MalformedReport { reason, .. }) => assert!(reason.contains("duration")),
            other => panic!("expected MalformedReport, got {:?}", other),
        }
    }

    #[test]
    fn test_fractional_halting_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "summary.xml",
            r#"<summary><step time="0" halting="1.5" meanSpeed="3"/></summary>"#,
        );

        assert!(matches!(parse_network_steps(&path), Err(AnalysisError::MalformedReport { .. })));
    }
}
